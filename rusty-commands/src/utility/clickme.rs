use std::time::Duration;

use twilight_model::{
    channel::message::component::{ActionRow, Button, ButtonStyle, Component},
    gateway::payload::incoming::MessageCreate,
    http::interaction::{InteractionResponse, InteractionResponseType},
};
use twilight_util::builder::InteractionResponseDataBuilder;

use crate::CommandMeta;
use rusty_core::Context;
use rusty_events::{WaitOutcome, await_one};
use rusty_paginator::{ComponentPress, InteractionClient};

pub const META: CommandMeta = CommandMeta {
    name: "clickme",
    desc: "First one to press the button wins.",
    usage: "!clickme",
};

const CLICK_TIMEOUT: Duration = Duration::from_secs(10);

/// Race for a button: the first presser within the timeout wins.
pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let http = &ctx.http;
    let custom_id = format!("clickme:{}", msg.id);

    let wanted = custom_id.clone();
    let first_press = await_one(
        &ctx.events,
        move |press: &ComponentPress| press.custom_id == wanted,
        CLICK_TIMEOUT,
    );

    let message = http
        .create_message(msg.channel_id)
        .content("Click me!")
        .components(&[click_button(custom_id)])
        .await?
        .model()
        .await?;

    match first_press.await {
        WaitOutcome::Event(press) => {
            let winner = match press.user_id {
                Some(user_id) => format!("<@{user_id}> clicked first!"),
                None => "Someone clicked first!".to_owned(),
            };
            InteractionClient::create_response(
                &*ctx.http,
                &press.interaction,
                &winner_response(winner),
            )
            .await?;
        }
        WaitOutcome::Cancelled => {
            http.update_message(msg.channel_id, message.id)
                .content(Some("too slow!"))
                .components(Some(&[]))
                .await?;
        }
    }

    Ok(())
}

fn winner_response(content: String) -> InteractionResponse {
    InteractionResponse {
        kind: InteractionResponseType::UpdateMessage,
        data: Some(
            InteractionResponseDataBuilder::new()
                .content(content)
                .components(Vec::new())
                .build(),
        ),
    }
}

fn click_button(custom_id: String) -> Component {
    Component::ActionRow(ActionRow {
        id: None,
        components: vec![Component::Button(Button {
            id: None,
            custom_id: Some(custom_id),
            disabled: false,
            emoji: None,
            label: Some("Click me".to_owned()),
            style: ButtonStyle::Success,
            url: None,
            sku_id: None,
        })],
    })
}
