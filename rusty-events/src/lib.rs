//! Typed event dispatch, filtered collectors and single-shot waiters.

/// Filtered, cancellable event subscriptions.
pub mod collector;
/// Shared handler registry fed by the gateway loop.
pub mod dispatcher;
/// Typed views over twilight gateway events.
pub mod gateway;
/// Single-shot waiting with timeout and external cancellation.
pub mod waiter;

pub use collector::{Cancel, EventStream, subscribe};
pub use dispatcher::{Dispatcher, EventKind, HandlerRemover};
pub use waiter::{WaitOutcome, Waiter, await_one};
