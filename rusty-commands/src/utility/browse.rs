use std::time::Duration;

use tracing::{debug, warn};
use twilight_model::{
    channel::message::component::{ActionRow, Button, ButtonStyle, Component},
    gateway::payload::incoming::MessageCreate,
    id::{Id, marker::UserMarker},
};

use crate::CommandMeta;
use crate::utility::pages::catalogue_paginator;
use rusty_core::Context;
use rusty_events::{EventStream, subscribe};
use rusty_paginator::{
    ComponentPress, InteractionClient,
    respond::{defer_component_update, respond_ephemeral_message},
};

pub const META: CommandMeta = CommandMeta {
    name: "browse",
    desc: "Open the sample catalogue from a button.",
    usage: "!browse",
};

const OPEN_TIMEOUT: Duration = Duration::from_secs(30);
const NOT_YOUR_BUTTON: &str = "Only the person who ran `!browse` can open this.";

/// Post an "Open" button and turn the same message into a paginator once
/// the author presses it.
pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let http = &ctx.http;
    let author = msg.author.id;
    let custom_id = format!("browse:{}", msg.id);

    let wanted = custom_id.clone();
    let (mut presses, cancel) = subscribe(&ctx.events, move |press: &ComponentPress| {
        press.custom_id == wanted
    });

    let prompt = http
        .create_message(msg.channel_id)
        .content("Press **Open** to browse the catalogue.")
        .components(&[open_button(custom_id)])
        .await?
        .model()
        .await?;

    let opened = wait_for_opener(&**http, &mut presses, author, OPEN_TIMEOUT).await;
    cancel.cancel();

    let Some(press) = opened else {
        debug!(message_id = %prompt.id, "browse prompt expired");
        http.update_message(msg.channel_id, prompt.id)
            .content(Some("No longer open."))
            .components(Some(&[]))
            .await?;
        return Ok(());
    };

    defer_component_update(&**http, &press.interaction).await?;

    let mut builder = catalogue_paginator(author);
    if let Some(message) = press.message {
        builder = builder.message(message);
    }
    ctx.paginators
        .create_from_interaction(&press.interaction, builder, true)
        .await?;

    Ok(())
}

/// First press by `opener` within `timeout`. Everyone else is told the
/// button isn't theirs.
async fn wait_for_opener<C: InteractionClient>(
    client: &C,
    presses: &mut EventStream<ComponentPress>,
    opener: Id<UserMarker>,
    timeout: Duration,
) -> Option<ComponentPress> {
    let waited = tokio::time::timeout(timeout, async {
        while let Some(press) = presses.recv().await {
            if press.user_id == Some(opener) {
                return Some(press);
            }

            if let Err(source) =
                respond_ephemeral_message(client, &press.interaction, NOT_YOUR_BUTTON).await
            {
                warn!(?source, "failed to turn away browse press");
            }
        }
        None
    })
    .await;

    waited.ok().flatten()
}

fn open_button(custom_id: String) -> Component {
    Component::ActionRow(ActionRow {
        id: None,
        components: vec![Component::Button(Button {
            id: None,
            custom_id: Some(custom_id),
            disabled: false,
            emoji: None,
            label: Some("Open".to_owned()),
            style: ButtonStyle::Primary,
            url: None,
            sku_id: None,
        })],
    })
}
