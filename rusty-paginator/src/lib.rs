//! Interactive multi-page messages driven by button presses.
//!
//! A [`Manager`] owns the live paginators, renders their pages and
//! navigation buttons, and routes presses delivered by a
//! [`rusty_events::Dispatcher`] back to them.

/// Navigation button row builders.
pub mod components;
/// Immutable manager configuration.
pub mod config;
/// Structured `prefix:id:action` custom ids.
pub mod custom_id;
/// Page embed rendering.
pub mod embed;
mod error;
/// Button-press views over twilight interactions.
pub mod interaction;
mod manager;
/// Pure list slicing helpers.
pub mod page;
mod paginator;
/// Platform client seam and response helpers.
pub mod respond;

pub use config::{ButtonConfig, ButtonsConfig, ConfigOverride, PaginatorConfig};
pub use custom_id::PageAction;
pub use error::PaginatorError;
pub use interaction::{ComponentPress, InteractionRef, MessageHandle};
pub use manager::Manager;
pub use paginator::{PageRenderer, PaginatorBuilder};
pub use respond::InteractionClient;
