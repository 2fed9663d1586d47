use scene_inspect::cli::Args;
use scene_inspect::config::{InspectorSettings, SETTINGS_FILE};
use scene_inspect::entities::Texture;
use scene_inspect::paths::{self, PathConfig};
use scene_inspect::shell::Shell;

use std::rc::Rc;

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use log::{debug, info, warn};

/// Image formats offered by the texture picker
const TEXTURE_EXTS: &[&str] = &["png", "jpg", "jpeg", "exr", "hdr", "tga", "tif", "tiff"];

/// Texture picker backed by a native file dialog.
fn pick_texture(slot: &str) -> Option<Texture> {
    let path = rfd::FileDialog::new()
        .add_filter("Images", TEXTURE_EXTS)
        .set_title(format!("Texture for {slot}"))
        .pick_file()?;
    info!("texture for {slot}: {}", path.display());
    Some(Texture::from_path(path))
}

struct InspectApp {
    shell: Shell,
    settings: InspectorSettings,
    path_config: PathConfig,
}

impl InspectApp {
    fn new(settings: InspectorSettings, path_config: PathConfig, start_enabled: bool) -> Self {
        let shell = Shell::new(settings.clone());
        shell.inspector.set_texture_picker(Rc::new(pick_texture));
        if start_enabled {
            shell.inspector.enable();
        }
        Self {
            shell,
            settings,
            path_config,
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let enabled = self.shell.inspector.is_enabled();
            let label = if enabled { "Disable inspector (F9)" } else { "Enable inspector (F9)" };
            if ui.button(label).clicked() {
                self.shell.inspector.toggle();
            }
            ui.checkbox(&mut self.settings.show_tree, "Tree");
            ui.separator();
            ui.label(format!(
                "frame {} | {} tracked | {} trails",
                self.shell.frame(),
                self.shell.inspector.tracked_len(),
                self.shell.trail_count()
            ));
            ui.separator();
            ui.label(self.shell.status.as_str());
        });
    }
}

impl eframe::App for InspectApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let time = ctx.input(|i| i.time);
        self.shell.tick(time);

        if ctx.input(|i| i.key_pressed(egui::Key::F9)) {
            let on = self.shell.inspector.toggle();
            debug!("F9: inspector {}", if on { "on" } else { "off" });
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));

        if self.shell.inspector.is_enabled() {
            let inspector = self.shell.inspector.clone();
            egui::SidePanel::left("outliner")
                .resizable(true)
                .default_width(220.0)
                .show_animated(ctx, self.settings.show_tree, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        inspector.render_outliner(ui);
                    });
                });
            egui::SidePanel::right("pane")
                .resizable(true)
                .default_width(340.0)
                .show(ctx, |ui| {
                    ui.heading(inspector.pane().title());
                    ui.separator();
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        if inspector.folder_id().is_none() {
                            ui.weak("Select a node in the tree");
                        }
                        inspector.render_pane(ui);
                        inspector.render_panes(ui);
                    });
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Scene");
            ui.separator();
            for line in self.shell.summary() {
                ui.monospace(line);
            }
        });

        self.shell.process_events();
        ctx.request_repaint();
    }

    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        if let Err(e) = self.settings.save(&self.path_config) {
            warn!("{e:#}");
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let path_config = PathConfig::from_env_and_cli(args.config_dir.clone());

    // Determine log level based on verbosity flags
    // 0 (default) = warn, 1 (-v) = info, 2 (-vv) = debug, 3+ (-vvv) = trace
    let log_level = match args.verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    if let Some(log_path_opt) = &args.log_file {
        let log_path = log_path_opt
            .as_ref()
            .cloned()
            .unwrap_or_else(|| paths::data_file("scene-inspect.log", &path_config));
        paths::ensure_dirs(&path_config)?;
        let file = std::fs::File::create(&log_path)
            .with_context(|| format!("Failed to create log file: {}", log_path.display()))?;

        env_logger::Builder::new()
            .filter_level(log_level)
            .filter_module("egui", log::LevelFilter::Info) // Suppress egui DEBUG spam
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();

        info!("Logging to file: {} (level: {:?})", log_path.display(), log_level);
    } else {
        // Console logging with specified verbosity level (respects RUST_LOG if set)
        let default_level = match args.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .filter_module("egui", log::LevelFilter::Info) // Suppress egui DEBUG spam
            .format_timestamp_millis()
            .init();
    }

    info!("scene-inspect starting...");
    debug!("Command-line args: {:?}", args);
    info!("Settings path: {}", paths::config_file(SETTINGS_FILE, &path_config).display());

    let mut settings = InspectorSettings::load(&path_config);
    if let Some(poll) = args.poll {
        settings.poll_interval = poll.max(1);
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!("scene-inspect v{} • F9 toggles the inspector", env!("CARGO_PKG_VERSION")))
            .with_inner_size([1280.0, 800.0])
            .with_resizable(true),
        ..Default::default()
    };

    let start_enabled = !args.disabled;
    eframe::run_native(
        "scene-inspect",
        native_options,
        Box::new(move |_cc| Ok(Box::new(InspectApp::new(settings, path_config, start_enabled)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe: {e}"))
}
