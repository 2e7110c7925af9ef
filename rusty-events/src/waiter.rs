//! Single-shot waiting on top of [`subscribe`].

use std::{future::Future, time::Duration};

use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::collector::{EventStream, subscribe};
use crate::dispatcher::{Dispatcher, EventKind};

/// Result of waiting for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome<T> {
    /// The first matching event.
    Event(T),
    /// The deadline passed or the external token fired first.
    Cancelled,
}

impl<T> WaitOutcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, WaitOutcome::Cancelled)
    }

    pub fn into_event(self) -> Option<T> {
        match self {
            WaitOutcome::Event(event) => Some(event),
            WaitOutcome::Cancelled => None,
        }
    }
}

type OnEvent<T> = Box<dyn FnOnce(&T) + Send>;
type OnCancel = Box<dyn FnOnce() + Send>;

/// Waits for the first event accepted by a predicate.
///
/// The subscription is registered when the waiter is built, so events
/// dispatched between [`Waiter::new`] and [`Waiter::wait`] are not missed.
///
/// ```ignore
/// let outcome = Waiter::new(&ctx.events, move |press: &ComponentPress| press.custom_id == id)
///     .timeout(Duration::from_secs(10))
///     .wait()
///     .await;
/// ```
pub struct Waiter<T> {
    events: EventStream<T>,
    timeout: Option<Duration>,
    cancellation: Option<CancellationToken>,
    on_event: Option<OnEvent<T>>,
    on_cancel: Option<OnCancel>,
}

impl<T: Send + 'static> Waiter<T> {
    /// Subscribe to `dispatcher` and prepare to wait for one match.
    pub fn new<E, P>(dispatcher: &Dispatcher<E>, predicate: P) -> Self
    where
        E: 'static,
        T: EventKind<E>,
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let (events, _cancel) = subscribe(dispatcher, predicate);

        Self {
            events,
            timeout: None,
            cancellation: None,
            on_event: None,
            on_cancel: None,
        }
    }

    /// Give up after `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Give up when `token` is cancelled.
    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Run `callback` with the event when one arrives in time.
    pub fn on_event(mut self, callback: impl FnOnce(&T) + Send + 'static) -> Self {
        self.on_event = Some(Box::new(callback));
        self
    }

    /// Run `callback` when the wait is cancelled.
    pub fn on_cancel(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_cancel = Some(Box::new(callback));
        self
    }

    /// Wait for whichever comes first: a matching event, the timeout, or the
    /// external token.
    ///
    /// The subscription is torn down before this returns, and exactly one of
    /// the two callbacks runs.
    pub async fn wait(self) -> WaitOutcome<T> {
        let Waiter {
            mut events,
            timeout,
            cancellation,
            on_event,
            on_cancel,
        } = self;

        let deadline = async move {
            match timeout {
                Some(timeout) => tokio::time::sleep(timeout).await,
                None => std::future::pending().await,
            }
        };
        let external = async move {
            match cancellation {
                Some(token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };

        let outcome = tokio::select! {
            received = events.recv() => match received {
                Some(event) => WaitOutcome::Event(event),
                None => WaitOutcome::Cancelled,
            },
            () = deadline => WaitOutcome::Cancelled,
            () = external => WaitOutcome::Cancelled,
        };

        events.close();

        match &outcome {
            WaitOutcome::Event(event) => {
                if let Some(callback) = on_event {
                    callback(event);
                }
            }
            WaitOutcome::Cancelled => {
                trace!("wait cancelled before a matching event arrived");
                if let Some(callback) = on_cancel {
                    callback();
                }
            }
        }

        outcome
    }
}

/// Wait up to `timeout` for the first event accepted by `predicate`.
///
/// Subscribes immediately; the returned future only waits.
pub fn await_one<E, T, P>(
    dispatcher: &Dispatcher<E>,
    predicate: P,
    timeout: Duration,
) -> impl Future<Output = WaitOutcome<T>> + use<E, T, P>
where
    E: 'static,
    T: EventKind<E> + Send + 'static,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    Waiter::new(dispatcher, predicate).timeout(timeout).wait()
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use tokio_util::sync::CancellationToken;

    use super::{WaitOutcome, Waiter, await_one};
    use crate::dispatcher::{Dispatcher, EventKind};

    #[derive(Debug, Clone, PartialEq)]
    struct Press(u64);

    impl EventKind<u64> for Press {
        fn from_event(event: &u64) -> Option<Self> {
            Some(Press(*event))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn returns_first_matching_event() {
        let dispatcher = Dispatcher::<u64>::new();
        let waiting = await_one(&dispatcher, |press: &Press| press.0 % 2 == 0, Duration::from_secs(10));

        dispatcher.dispatch(&1);
        dispatcher.dispatch(&4);
        dispatcher.dispatch(&6);

        assert_eq!(waiting.await, WaitOutcome::Event(Press(4)));
        assert_eq!(dispatcher.handler_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_cancels_exactly_once() {
        let dispatcher = Dispatcher::<u64>::new();
        let delivered = Arc::new(AtomicUsize::new(0));
        let cancelled = Arc::new(AtomicUsize::new(0));

        let on_event = Arc::clone(&delivered);
        let on_cancel = Arc::clone(&cancelled);
        let waiter = Waiter::new(&dispatcher, |_: &Press| true)
            .timeout(Duration::from_secs(1))
            .on_event(move |_| {
                on_event.fetch_add(1, Ordering::SeqCst);
            })
            .on_cancel(move || {
                on_cancel.fetch_add(1, Ordering::SeqCst);
            });
        let waiting = tokio::spawn(waiter.wait());

        tokio::time::sleep(Duration::from_secs(2)).await;
        let late = dispatcher.dispatch(&7);

        assert_eq!(waiting.await.unwrap(), WaitOutcome::Cancelled);
        assert!(late.is_empty());
        assert_eq!(dispatcher.handler_count(), 0);
        assert_eq!(delivered.load(Ordering::SeqCst), 0);
        assert_eq!(cancelled.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn external_token_cancels() {
        let dispatcher = Dispatcher::<u64>::new();
        let token = CancellationToken::new();
        let waiting = tokio::spawn(
            Waiter::new(&dispatcher, |_: &Press| true)
                .cancel_on(token.clone())
                .wait(),
        );

        token.cancel();

        assert!(waiting.await.unwrap().is_cancelled());
        assert_eq!(dispatcher.handler_count(), 0);
    }

    #[tokio::test]
    async fn event_callback_sees_the_event() {
        let dispatcher = Dispatcher::<u64>::new();
        let seen = Arc::new(AtomicUsize::new(0));

        let sink = Arc::clone(&seen);
        let waiting = Waiter::new(&dispatcher, |press: &Press| press.0 > 10)
            .on_event(move |press| {
                sink.store(press.0 as usize, Ordering::SeqCst);
            })
            .on_cancel(|| {
                panic!("must not cancel");
            })
            .wait();

        dispatcher.dispatch(&3);
        dispatcher.dispatch(&42);

        assert_eq!(waiting.await.into_event(), Some(Press(42)));
        assert_eq!(seen.load(Ordering::SeqCst), 42);
    }
}
