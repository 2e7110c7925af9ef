/// Environment-driven bot configuration.
pub mod config;

use std::sync::Arc;

use twilight_http::Client;
use twilight_model::gateway::event::Event;

use rusty_events::Dispatcher;
use rusty_paginator::{Manager, PaginatorConfig};

pub use config::BotConfig;

/// Single source of truth for the message-command prefix.
pub const COMMAND_PREFIX: char = '!';

/// Shared application context passed into command handlers.
///
/// Cheap to clone because it only stores reference-counted shared state.
#[derive(Clone)]
pub struct Context {
    pub http: Arc<Client>,
    /// Every gateway event passes through here; collectors and waiters
    /// subscribe to it.
    pub events: Dispatcher<Event>,
    pub paginators: Manager<Client>,
}

impl Context {
    /// Create a new application context.
    ///
    /// Starts the paginator expiry sweep, so this must run inside a Tokio
    /// runtime.
    pub fn new(http: Arc<Client>, paginator_config: PaginatorConfig) -> Self {
        let paginators = Manager::new(Arc::clone(&http), paginator_config);

        Self {
            http,
            events: Dispatcher::new(),
            paginators,
        }
    }
}
