//! Pub/Sub Event Bus for decoupled component communication.
//!
//! Architecture:
//! - Components subscribe to event types with callbacks and get a token back
//! - dispatch() invokes callbacks immediately
//! - emit() invokes callbacks immediately AND queues for deferred processing
//! - poll() returns queued events for batch processing in the host loop
//!
//! Callback order: FIFO (first-subscribed, first-called) within same event type.
//! Cross-type order undefined - don't rely on ordering between different event types.
//!
//! Dispatch works on a snapshot of the handler list taken when the event is
//! raised: handlers subscribed or unsubscribed from inside a callback do not
//! affect the in-flight dispatch, only later ones.
//!
//! The bus is single-threaded (`Rc`/`RefCell`). Handlers routinely capture
//! scene handles, which are `Rc` based themselves.

use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::warn;

/// Maximum events in queue before oldest are evicted
const MAX_QUEUE_SIZE: usize = 1000;

/// Marker trait for events.
pub trait Event: Any + 'static {
    fn as_any(&self) -> &dyn Any;
    fn type_name(&self) -> &'static str;
}

// Blanket impl for all qualifying types
impl<T: Any + 'static> Event for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Type-erased callback
type Callback = Rc<dyn Fn(&dyn Any)>;

/// Boxed event for queue storage
pub type BoxedEvent = Box<dyn Event>;

/// Handle returned by `subscribe`, used to unsubscribe a single handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken {
    type_id: TypeId,
    id: u64,
}

#[derive(Default)]
struct Subscribers {
    by_type: HashMap<TypeId, Vec<(u64, Callback)>>,
}

/// Pub/Sub Event Bus with deferred processing support.
///
/// Two modes of operation:
/// 1. Immediate: subscribe() + dispatch()/emit() triggers callbacks instantly
/// 2. Deferred: emit() also queues events for poll() in the host loop
#[derive(Clone)]
pub struct EventBus {
    subscribers: Rc<RefCell<Subscribers>>,
    queue: Rc<RefCell<Vec<BoxedEvent>>>,
    next_id: Rc<Cell<u64>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_types", &self.subscribers.borrow().by_type.len())
            .field("queue_len", &self.queue.borrow().len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: Rc::new(RefCell::new(Subscribers::default())),
            queue: Rc::new(RefCell::new(Vec::new())),
            next_id: Rc::new(Cell::new(1)),
        }
    }

    // ========== Pub/Sub (immediate) ==========

    /// Subscribe to events of type E.
    ///
    /// # Example
    /// ```ignore
    /// let token = bus.subscribe::<SelectionChangedEvent, _>(move |e| {
    ///     status.borrow_mut().selected = e.uuid;
    /// });
    /// bus.unsubscribe(token);
    /// ```
    pub fn subscribe<E, F>(&self, callback: F) -> SubscriptionToken
    where
        E: Event,
        F: Fn(&E) + 'static,
    {
        let type_id = TypeId::of::<E>();
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let wrapped: Callback = Rc::new(move |any: &dyn Any| {
            if let Some(event) = any.downcast_ref::<E>() {
                callback(event);
            }
        });
        self.subscribers
            .borrow_mut()
            .by_type
            .entry(type_id)
            .or_default()
            .push((id, wrapped));

        SubscriptionToken { type_id, id }
    }

    /// Remove one handler. Returns false if it was already gone.
    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        let mut subs = self.subscribers.borrow_mut();
        let Some(list) = subs.by_type.get_mut(&token.type_id) else {
            return false;
        };
        let before = list.len();
        list.retain(|(id, _)| *id != token.id);
        let removed = list.len() != before;
        if list.is_empty() {
            subs.by_type.remove(&token.type_id);
        }
        removed
    }

    /// Invoke handlers for `event` without queueing it.
    pub fn dispatch<E: Event>(&self, event: &E) {
        for cb in self.snapshot(TypeId::of::<E>()) {
            cb(event.as_any());
        }
    }

    /// Emit event: invoke callbacks immediately AND queue for deferred processing.
    pub fn emit<E: Event>(&self, event: E) {
        self.dispatch(&event);
        self.enqueue(Box::new(event));
    }

    /// Emit boxed event (for dynamic dispatch).
    pub fn emit_boxed(&self, event: BoxedEvent) {
        // Deref to `dyn Event` so the vtable of the original type is used
        let type_id = (*event).as_any().type_id();
        for cb in self.snapshot(type_id) {
            cb((*event).as_any());
        }
        self.enqueue(event);
    }

    fn snapshot(&self, type_id: TypeId) -> Vec<Callback> {
        self.subscribers
            .borrow()
            .by_type
            .get(&type_id)
            .map(|list| list.iter().map(|(_, cb)| Rc::clone(cb)).collect())
            .unwrap_or_default()
    }

    fn enqueue(&self, event: BoxedEvent) {
        let mut queue = self.queue.borrow_mut();
        if queue.len() >= MAX_QUEUE_SIZE {
            let evict_count = queue.len() / 2;
            warn!("EventBus queue full ({} events), evicting oldest {}", queue.len(), evict_count);
            queue.drain(0..evict_count);
        }
        queue.push(event);
    }

    // ========== Deferred Processing ==========

    /// Poll all queued events for batch processing.
    pub fn poll(&self) -> Vec<BoxedEvent> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }

    // ========== Utilities ==========

    /// Clear subscribers for type E
    pub fn unsubscribe_all<E: Event>(&self) {
        self.subscribers.borrow_mut().by_type.remove(&TypeId::of::<E>());
    }

    /// Clear all subscribers and queue
    pub fn clear(&self) {
        self.subscribers.borrow_mut().by_type.clear();
        self.queue.borrow_mut().clear();
    }

    /// Check if there are subscribers for event type E
    pub fn has_subscribers<E: Event>(&self) -> bool {
        self.subscriber_count::<E>() > 0
    }

    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.subscribers
            .borrow()
            .by_type
            .get(&TypeId::of::<E>())
            .map(|v| v.len())
            .unwrap_or(0)
    }

    /// Check queue length
    pub fn queue_len(&self) -> usize {
        self.queue.borrow().len()
    }
}

/// Helper: downcast BoxedEvent to concrete type
///
/// IMPORTANT: Must explicitly deref to `dyn Event` before calling `as_any()`.
/// Without explicit deref, the blanket impl `Event for Box<dyn Event>` intercepts
/// the call and returns `&dyn Any` containing `Box<dyn Event>` instead of the
/// original type, causing downcast to always fail.
#[inline]
pub fn downcast_event<E: Event>(event: &BoxedEvent) -> Option<&E> {
    (**event).as_any().downcast_ref::<E>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct TestEvent {
        value: i32,
    }

    #[derive(Clone, Debug)]
    struct OtherEvent {
        msg: String,
    }

    #[test]
    fn test_subscribe_dispatch_immediate() {
        let bus = EventBus::new();
        let counter = Rc::new(Cell::new(0));
        let c = Rc::clone(&counter);

        bus.subscribe::<TestEvent, _>(move |e| c.set(c.get() + e.value));

        bus.dispatch(&TestEvent { value: 10 });
        assert_eq!(counter.get(), 10);
        bus.emit(TestEvent { value: 5 });
        assert_eq!(counter.get(), 15);
        // dispatch does not queue, emit does
        assert_eq!(bus.queue_len(), 1);
    }

    #[test]
    fn test_emit_queues_for_poll() {
        let bus = EventBus::new();

        bus.emit(TestEvent { value: 1 });
        bus.emit(TestEvent { value: 2 });
        bus.emit(OtherEvent { msg: "hello".into() });

        let events = bus.poll();
        assert_eq!(events.len(), 3);
        assert_eq!(downcast_event::<OtherEvent>(&events[2]).map(|e| e.msg.as_str()), Some("hello"));

        // Queue is empty after poll
        assert_eq!(bus.poll().len(), 0);
    }

    #[test]
    fn test_fifo_order() {
        let bus = EventBus::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let o = Rc::clone(&order);
            bus.subscribe::<TestEvent, _>(move |_| o.borrow_mut().push(tag));
        }
        bus.dispatch(&TestEvent { value: 0 });
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let bus = EventBus::new();
        let counter = Rc::new(Cell::new(0));
        let c = Rc::clone(&counter);
        let token = bus.subscribe::<TestEvent, _>(move |e| c.set(c.get() + e.value));

        assert!(bus.unsubscribe(token));
        assert!(!bus.unsubscribe(token));
        assert!(!bus.has_subscribers::<TestEvent>());

        bus.dispatch(&TestEvent { value: 10 });
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_unsubscribe_during_dispatch_uses_snapshot() {
        let bus = EventBus::new();
        let hits = Rc::new(Cell::new(0));

        // First handler removes the second one; the second must still run for
        // the in-flight event but not for the next one.
        let second_token: Rc<Cell<Option<SubscriptionToken>>> = Rc::new(Cell::new(None));
        let b = bus.clone();
        let t = Rc::clone(&second_token);
        bus.subscribe::<TestEvent, _>(move |_| {
            if let Some(token) = t.get() {
                b.unsubscribe(token);
            }
        });
        let h = Rc::clone(&hits);
        let token = bus.subscribe::<TestEvent, _>(move |_| h.set(h.get() + 1));
        second_token.set(Some(token));

        bus.dispatch(&TestEvent { value: 0 });
        assert_eq!(hits.get(), 1);
        bus.dispatch(&TestEvent { value: 0 });
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_subscribe_during_dispatch_not_invoked() {
        let bus = EventBus::new();
        let late_hits = Rc::new(Cell::new(0));
        let b = bus.clone();
        let l = Rc::clone(&late_hits);
        bus.subscribe::<TestEvent, _>(move |_| {
            let l = Rc::clone(&l);
            b.subscribe::<TestEvent, _>(move |_| l.set(l.get() + 1));
        });

        bus.dispatch(&TestEvent { value: 0 });
        assert_eq!(late_hits.get(), 0);
        assert_eq!(bus.subscriber_count::<TestEvent>(), 2);
    }

    #[test]
    fn test_emit_boxed_reaches_typed_handler() {
        let bus = EventBus::new();
        let counter = Rc::new(Cell::new(0));
        let c = Rc::clone(&counter);
        bus.subscribe::<TestEvent, _>(move |e| c.set(e.value));

        bus.emit_boxed(Box::new(TestEvent { value: 42 }));
        assert_eq!(counter.get(), 42);
        assert_eq!(bus.poll().len(), 1);
    }
}
