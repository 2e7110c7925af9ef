use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use twilight_gateway::{EventTypeFlags, Intents, Shard, ShardId, StreamExt as _};
use twilight_http::Client;
use twilight_model::gateway::payload::incoming::{MessageCreate, Ready};

use rustls::crypto::ring::default_provider;

use rusty_commands::handle_message;
use rusty_core::{BotConfig, Context};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    // Load the .env file
    dotenvy::dotenv().ok();

    let config = BotConfig::from_env()?;

    // Create a single shared HTTP Client
    let http = Arc::new(Client::new(config.token.clone()));
    let ctx = Context::new(Arc::clone(&http), config.paginator);

    // Button presses flow from the dispatcher into the paginator registry
    let _paginator_routes = ctx.paginators.attach(&ctx.events)?;

    let command_ctx = ctx.clone();
    let _command_routes = ctx.events.add_handler(move |msg: Box<MessageCreate>| {
        let ctx = command_ctx.clone();
        async move {
            if let Err(source) = handle_message(ctx, msg).await {
                error!(?source, "message command failed");
            }
        }
    });

    let _ready_log = ctx.events.add_handler(|ready: Box<Ready>| async move {
        info!(user = %ready.user.name, guilds = ready.guilds.len(), "Rusty has successfully awoken!");
    });

    // Declare which intents the bot has
    let intents = Intents::GUILDS | Intents::GUILD_MESSAGES | Intents::MESSAGE_CONTENT;

    // A shard is one Gateway WebSocket connection to Discord
    let mut shard = Shard::new(ShardId::new(0, 1), config.token, intents);

    info!("Rusty is connecting...");

    while let Some(item) = shard.next_event(EventTypeFlags::all()).await {
        let event = match item {
            Ok(event) => event,
            Err(source) => {
                error!(?source, "gateway event stream error");
                continue;
            }
        };

        // Handlers run on their own tasks; the shard keeps reading
        ctx.events.dispatch(&event);
    }

    Ok(()) // Return Success, shutdown cleanly
}
