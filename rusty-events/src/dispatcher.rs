//! Shared handler registry.
//!
//! The gateway loop pushes every event into [`Dispatcher::dispatch`]. Each
//! registered handler declares the typed view it wants through [`EventKind`]
//! and runs on its own Tokio task, so a slow handler never stalls the loop or
//! its sibling handlers.

use std::{
    collections::BTreeMap,
    fmt,
    future::Future,
    sync::{
        Arc, PoisonError, RwLock, Weak,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use futures_util::{FutureExt, future::BoxFuture};
use tokio::task::JoinHandle;
use tracing::trace;

/// Typed view over a root event type.
///
/// The view is resolved once per dispatched event; handlers registered for a
/// view never see events the view does not match.
pub trait EventKind<E>: Sized {
    /// Extract this view from a dispatched event.
    fn from_event(event: &E) -> Option<Self>;
}

pub(crate) type Handler<E> = Arc<dyn Fn(&E) -> Option<BoxFuture<'static, ()>> + Send + Sync>;

struct Registry<E> {
    next_id: AtomicU64,
    handlers: RwLock<BTreeMap<u64, Handler<E>>>,
}

trait Deregister: Send + Sync {
    fn deregister(&self, handler_id: u64);
}

impl<E: 'static> Deregister for Registry<E> {
    fn deregister(&self, handler_id: u64) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&handler_id);
    }
}

/// Cheap-to-clone handle over a shared handler registry.
pub struct Dispatcher<E> {
    registry: Arc<Registry<E>>,
}

impl<E> Clone for Dispatcher<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E: 'static> Default for Dispatcher<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> Dispatcher<E> {
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Registry {
                next_id: AtomicU64::new(0),
                handlers: RwLock::new(BTreeMap::new()),
            }),
        }
    }

    /// Register an async handler for every event matching the `T` view.
    ///
    /// The returned remover deregisters the handler; dropping it does not.
    pub fn add_handler<T, F, Fut>(&self, handler: F) -> HandlerRemover
    where
        T: EventKind<E>,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handler: Handler<E> =
            Arc::new(move |event: &E| T::from_event(event).map(|typed| handler(typed).boxed()));
        self.register(handler)
    }

    pub(crate) fn register(&self, handler: Handler<E>) -> HandlerRemover {
        let handler_id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(handler_id, handler);

        trace!(handler_id, "event handler registered");

        let registry: Arc<dyn Deregister> = self.registry.clone();
        HandlerRemover {
            handler_id,
            registry: Arc::downgrade(&registry),
            removed: AtomicBool::new(false),
        }
    }

    /// Push one event to every interested handler.
    ///
    /// Handlers are consulted in registration order; each match spawns one
    /// task. The returned handles may be awaited or ignored.
    pub fn dispatch(&self, event: &E) -> Vec<JoinHandle<()>> {
        let handlers: Vec<Handler<E>> = self
            .registry
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        handlers
            .iter()
            .filter_map(|handler| handler(event))
            .map(tokio::spawn)
            .collect()
    }

    /// Number of currently registered handlers.
    pub fn handler_count(&self) -> usize {
        self.registry
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Deregistration handle returned by [`Dispatcher::add_handler`].
pub struct HandlerRemover {
    handler_id: u64,
    registry: Weak<dyn Deregister>,
    removed: AtomicBool,
}

impl HandlerRemover {
    /// Deregister the handler. Calling this more than once is a no-op.
    pub fn remove(&self) {
        if self.removed.swap(true, Ordering::AcqRel) {
            return;
        }

        if let Some(registry) = self.registry.upgrade() {
            registry.deregister(self.handler_id);
            trace!(handler_id = self.handler_id, "event handler removed");
        }
    }

    /// Whether [`HandlerRemover::remove`] has already run.
    pub fn is_removed(&self) -> bool {
        self.removed.load(Ordering::Acquire)
    }
}

impl fmt::Debug for HandlerRemover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRemover")
            .field("handler_id", &self.handler_id)
            .field("removed", &self.is_removed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{Dispatcher, EventKind};

    #[derive(Debug, Clone)]
    enum TestEvent {
        Message(String),
        Tick(u32),
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Message(String);

    impl EventKind<TestEvent> for Message {
        fn from_event(event: &TestEvent) -> Option<Self> {
            match event {
                TestEvent::Message(content) => Some(Message(content.clone())),
                TestEvent::Tick(_) => None,
            }
        }
    }

    async fn settle(handles: Vec<tokio::task::JoinHandle<()>>) {
        for handle in handles {
            handle.await.unwrap();
        }
    }

    #[tokio::test]
    async fn handlers_only_see_their_event_kind() {
        let dispatcher = Dispatcher::<TestEvent>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let _remover = dispatcher.add_handler(move |message: Message| {
            let sink = Arc::clone(&sink);
            async move { sink.lock().unwrap().push(message) }
        });

        settle(dispatcher.dispatch(&TestEvent::Tick(1))).await;
        settle(dispatcher.dispatch(&TestEvent::Message("hello".into()))).await;

        assert_eq!(*seen.lock().unwrap(), vec![Message("hello".into())]);
    }

    #[tokio::test]
    async fn removed_handler_stops_receiving() {
        let dispatcher = Dispatcher::<TestEvent>::new();
        let remover = dispatcher.add_handler(|_: Message| async {});
        assert_eq!(dispatcher.handler_count(), 1);

        remover.remove();
        remover.remove();

        assert!(remover.is_removed());
        assert_eq!(dispatcher.handler_count(), 0);
        assert!(dispatcher.dispatch(&TestEvent::Message("late".into())).is_empty());
    }

    #[tokio::test]
    async fn remover_outliving_dispatcher_is_harmless() {
        let dispatcher = Dispatcher::<TestEvent>::new();
        let remover = dispatcher.add_handler(|_: Message| async {});
        drop(dispatcher);

        remover.remove();
        assert!(remover.is_removed());
    }

    #[tokio::test]
    async fn remover_debug_shows_its_state() {
        let dispatcher = Dispatcher::<TestEvent>::new();
        let _first = dispatcher.add_handler(|_: Message| async {});
        let second = dispatcher.add_handler(|_: Message| async {});

        assert_eq!(
            format!("{second:?}"),
            "HandlerRemover { handler_id: 1, removed: false, .. }"
        );

        second.remove();
        assert_eq!(
            format!("{second:?}"),
            "HandlerRemover { handler_id: 1, removed: true, .. }"
        );
    }
}
