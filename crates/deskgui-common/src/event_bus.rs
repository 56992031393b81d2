//! Typed publish/subscribe bus owned by each window and webview.
//!
//! Listeners are keyed by the [`TypeId`] of the event they accept, so an
//! emission only ever reaches listeners registered for exactly that type.
//!
//! Locking: registrations take the write lock, emissions and counts take the
//! read lock. Concurrent emissions run in parallel; registration changes wait
//! for in-flight emissions to finish.
//!
//! Only [`Event`] types travel on the bus. Smart pointers and references to
//! events are not events themselves, so `emit(&mut Box::new(event))` is a
//! compile error rather than an emission nobody listens to.
//!
//! A listener must not connect or disconnect on the bus that is currently
//! calling it. Doing so would need a read-to-write upgrade of a lock held by
//! the same thread, so the bus panics with a descriptive message instead of
//! deadlocking. Emitting again from inside a listener is fine, and so is
//! [`EventBus::clear_connections`]: the bus stops calling listeners at once
//! and drops them when the outermost emission returns.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::events::Event;
use crate::id::UniqueId;

type Callback = Box<dyn Fn(&mut dyn Any) + Send + Sync>;

struct Connection {
    id: UniqueId,
    callback: Callback,
}

thread_local! {
    /// Buses this thread is currently emitting on, innermost last.
    static EMITTING: RefCell<Vec<UniqueId>> = const { RefCell::new(Vec::new()) };
}

fn is_emitting(bus: UniqueId) -> bool {
    EMITTING.with(|stack| stack.borrow().contains(&bus))
}

/// Marks a bus as emitting on this thread until dropped.
struct EmitScope;

impl EmitScope {
    fn enter(bus: UniqueId) -> Self {
        EMITTING.with(|stack| stack.borrow_mut().push(bus));
        Self
    }
}

impl Drop for EmitScope {
    fn drop(&mut self) {
        EMITTING.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

pub struct EventBus {
    id: UniqueId,
    connections: RwLock<HashMap<TypeId, Vec<Connection>>>,
    /// Set when a listener cleared the bus mid-emit.
    clear_pending: AtomicBool,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            id: UniqueId::next(),
            connections: RwLock::new(HashMap::new()),
            clear_pending: AtomicBool::new(false),
        }
    }

    /// Register a listener that receives each emitted `E` by mutable reference.
    ///
    /// The registration is visible to every `emit` that starts after this
    /// returns, from any thread. The listener is not invoked here.
    pub fn connect<E, F>(&self, listener: F) -> UniqueId
    where
        E: Event,
        F: Fn(&mut E) + Send + Sync + 'static,
    {
        self.insert::<E>(Box::new(move |event: &mut dyn Any| {
            if let Some(event) = event.downcast_mut::<E>() {
                listener(event);
            }
        }))
    }

    /// Register a listener that only cares that an `E` happened.
    pub fn connect_signal<E, F>(&self, listener: F) -> UniqueId
    where
        E: Event,
        F: Fn() + Send + Sync + 'static,
    {
        self.insert::<E>(Box::new(move |_: &mut dyn Any| listener()))
    }

    /// Register `method` bound to `instance`.
    ///
    /// Only a weak reference to `instance` is kept. Once the instance has been
    /// dropped the listener stays registered but is skipped on emission.
    pub fn connect_method<E, T>(&self, instance: &Arc<T>, method: fn(&T, &mut E)) -> UniqueId
    where
        E: Event,
        T: Send + Sync + 'static,
    {
        let instance = Arc::downgrade(instance);
        self.connect::<E, _>(move |event| {
            if let Some(instance) = instance.upgrade() {
                method(&instance, event);
            }
        })
    }

    /// Remove the registration `id` for `E`. Unknown ids are ignored.
    pub fn disconnect<E: Event>(&self, id: UniqueId) {
        self.assert_not_emitting("disconnect");
        let mut connections = self.connections.write();
        let type_id = TypeId::of::<E>();

        let Some(listeners) = connections.get_mut(&type_id) else {
            return;
        };
        if let Some(index) = listeners.iter().position(|c| c.id == id) {
            listeners.swap_remove(index);
            debug!(bus = %self.id, listener = %id, event = std::any::type_name::<E>(), "listener disconnected");
        }
        if listeners.is_empty() {
            connections.remove(&type_id);
        }
    }

    /// Call every listener registered for `E` exactly once, in unspecified
    /// order, each with the same event. A cancellation made by one listener is
    /// visible to the next ones and to the caller afterwards.
    ///
    /// Only event values are accepted, never pointers to them:
    ///
    /// ```compile_fail
    /// use deskgui_common::events::WindowResize;
    /// use deskgui_common::{EventBus, ViewSize};
    ///
    /// let bus = EventBus::new();
    /// bus.emit(&mut Box::new(WindowResize::new(ViewSize::new(1, 1))));
    /// ```
    pub fn emit<E: Event>(&self, event: &mut E) {
        let nested = is_emitting(self.id);
        {
            let connections = if nested {
                self.connections.read_recursive()
            } else {
                self.connections.read()
            };

            let Some(listeners) = connections.get(&TypeId::of::<E>()) else {
                return;
            };

            let _scope = EmitScope::enter(self.id);
            trace!(
                bus = %self.id,
                event = std::any::type_name::<E>(),
                listeners = listeners.len(),
                "emit"
            );
            let event: &mut dyn Any = event;
            for connection in listeners {
                if self.clear_pending.load(Ordering::SeqCst) {
                    break;
                }
                (connection.callback)(&mut *event);
            }
        }

        if !nested && self.clear_pending.swap(false, Ordering::SeqCst) {
            self.connections.write().clear();
            debug!(bus = %self.id, "deferred listener clear applied");
        }
    }

    /// Number of listeners currently registered for `E`.
    pub fn connection_count<E: Event>(&self) -> usize {
        if self.clear_pending.load(Ordering::SeqCst) {
            return 0;
        }
        let connections = if is_emitting(self.id) {
            self.connections.read_recursive()
        } else {
            self.connections.read()
        };
        connections
            .get(&TypeId::of::<E>())
            .map_or(0, |listeners| listeners.len())
    }

    /// Remove every registration for every event type.
    ///
    /// From inside one of this bus's listeners the remaining listeners of the
    /// running emission are skipped and the registrations are dropped once
    /// the outermost `emit` returns.
    pub fn clear_connections(&self) {
        if is_emitting(self.id) {
            self.clear_pending.store(true, Ordering::SeqCst);
            debug!(bus = %self.id, "listener clear deferred until emit returns");
            return;
        }
        self.connections.write().clear();
        debug!(bus = %self.id, "all listeners cleared");
    }

    fn insert<E: Event>(&self, callback: Callback) -> UniqueId {
        self.assert_not_emitting("connect");
        let id = UniqueId::next();
        self.connections
            .write()
            .entry(TypeId::of::<E>())
            .or_default()
            .push(Connection { id, callback });
        debug!(bus = %self.id, listener = %id, event = std::any::type_name::<E>(), "listener connected");
        id
    }

    fn assert_not_emitting(&self, operation: &str) {
        if is_emitting(self.id) {
            panic!(
                "EventBus::{operation} called from a listener of the same bus during emit; \
                 defer the change until emit returns"
            );
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let connections = self.connections.read_recursive();
        f.debug_struct("EventBus")
            .field("id", &self.id)
            .field("event_types", &connections.len())
            .field(
                "listeners",
                &connections.values().map(Vec::len).sum::<usize>(),
            )
            .finish()
    }
}
