use clap::Parser;
use std::path::PathBuf;

// Build version with target info
const VERSION_INFO: &str = const_format::concatcp!(
    env!("CARGO_PKG_VERSION"), "\n",
    "UI:     egui 0.33 / egui_ltreeview 0.6\n",
    "Target: ", std::env::consts::ARCH, "-", std::env::consts::OS
);

/// Live scene inspector demo
#[derive(Parser, Debug)]
#[command(author, version = VERSION_INFO, about, long_about = None)]
pub struct Args {
    /// Enable logging to file (default: scene-inspect.log in the data directory)
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE")]
    pub log_file: Option<Option<PathBuf>>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Custom configuration directory (overrides default platform paths)
    #[arg(short = 'c', long = "config-dir", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Frames between scene observations (overrides the settings file)
    #[arg(short = 'p', long = "poll", value_name = "N")]
    pub poll: Option<u32>,

    /// Start with the inspector off (F9 toggles it)
    #[arg(short = 'd', long = "disabled")]
    pub disabled: bool,
}
