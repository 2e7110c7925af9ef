//! Filtered, cancellable event subscriptions.
//!
//! [`subscribe`] attaches a predicate to a [`Dispatcher`] and hands matching
//! events to an [`EventStream`] one at a time. Delivery goes through a
//! single-slot channel: a consumer that stops reading stalls only its own
//! listener, never the dispatcher or other listeners, and nothing is queued
//! without bound.

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use futures_util::FutureExt;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::dispatcher::{Dispatcher, EventKind, Handler, HandlerRemover};

enum Delivery<T> {
    Event(T),
    PredicatePanicked(Box<dyn Any + Send>),
}

/// Hands out delivery tickets in dispatch order and lets exactly one
/// delivery task send at a time.
struct Lane {
    next_ticket: AtomicU64,
    turn: watch::Sender<u64>,
}

/// Subscribe to every `T` event accepted by `predicate`.
///
/// The predicate runs inside [`Dispatcher::dispatch`], in dispatch order, and
/// rejected events leave no trace. Accepted events reach the stream in the
/// order they were dispatched. A predicate panic is re-raised from the
/// consumer's next [`EventStream::recv`].
///
/// Both returned halves can end the subscription: [`Cancel::cancel`] or
/// dropping the stream.
pub fn subscribe<E, T, P>(dispatcher: &Dispatcher<E>, predicate: P) -> (EventStream<T>, Cancel)
where
    E: 'static,
    T: EventKind<E> + Send + 'static,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    let (tx, rx) = mpsc::channel(1);
    let token = CancellationToken::new();
    let (turn, _) = watch::channel(0_u64);
    let lane = Arc::new(Lane {
        next_ticket: AtomicU64::new(0),
        turn,
    });

    let delivery_token = token.clone();
    let handler: Handler<E> = Arc::new(move |event: &E| {
        let event = T::from_event(event)?;

        let delivery = match panic::catch_unwind(AssertUnwindSafe(|| predicate(&event))) {
            Ok(false) => return None,
            Ok(true) => Delivery::Event(event),
            Err(payload) => Delivery::PredicatePanicked(payload),
        };

        let ticket = lane.next_ticket.fetch_add(1, Ordering::AcqRel);
        let lane = Arc::clone(&lane);
        let tx = tx.clone();
        let token = delivery_token.clone();

        Some(
            async move {
                let mut turn = lane.turn.subscribe();
                let deliver = async {
                    let my_turn = turn.wait_for(|current| *current == ticket).await.is_ok();
                    if !my_turn {
                        return;
                    }
                    let _ = tx.send(delivery).await;
                    lane.turn.send_modify(|current| *current += 1);
                };

                tokio::select! {
                    () = token.cancelled() => trace!(ticket, "pending delivery dropped on cancel"),
                    () = deliver => {}
                }
            }
            .boxed(),
        )
    });

    let remover = dispatcher.register(handler);
    let cancel = Cancel {
        state: Arc::new(CancelState {
            cancelled: AtomicBool::new(false),
            token: token.clone(),
            remover,
        }),
    };

    let stream = EventStream {
        rx,
        token,
        cancel: cancel.clone(),
    };

    (stream, cancel)
}

struct CancelState {
    cancelled: AtomicBool,
    token: CancellationToken,
    remover: HandlerRemover,
}

/// One-shot teardown for a subscription.
///
/// Clones share the same guard, so any number of calls, from any number of
/// tasks, tear the subscription down exactly once.
#[derive(Clone)]
pub struct Cancel {
    state: Arc<CancelState>,
}

impl Cancel {
    /// Deregister the listener and close the stream for good.
    ///
    /// Unblocks every delivery still waiting on the consumer. Never blocks.
    pub fn cancel(&self) {
        if self
            .state
            .cancelled
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        self.state.remover.remove();
        self.state.token.cancel();
    }

    /// Whether the subscription has been torn down.
    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::Acquire)
    }
}

/// Receiving half of a subscription.
pub struct EventStream<T> {
    rx: mpsc::Receiver<Delivery<T>>,
    token: CancellationToken,
    cancel: Cancel,
}

impl<T> EventStream<T> {
    /// Wait for the next matching event.
    ///
    /// Returns `None` once the subscription is cancelled, and on every call
    /// after that.
    ///
    /// # Panics
    ///
    /// Re-raises a panic thrown by the subscription's predicate.
    pub async fn recv(&mut self) -> Option<T> {
        let delivery = tokio::select! {
            biased;
            () = self.token.cancelled() => {
                self.rx.close();
                return None;
            }
            delivery = self.rx.recv() => delivery?,
        };

        match delivery {
            Delivery::Event(event) => Some(event),
            Delivery::PredicatePanicked(payload) => panic::resume_unwind(payload),
        }
    }

    /// Tear down the subscription. Same as [`Cancel::cancel`].
    pub fn close(&self) {
        self.cancel.cancel();
    }

    /// Whether the subscription has been torn down.
    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl<T> Drop for EventStream<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
