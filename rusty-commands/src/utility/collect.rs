use std::time::Duration;

use tracing::debug;
use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::CommandMeta;
use rusty_core::Context;
use rusty_events::{EventStream, subscribe};

pub const META: CommandMeta = CommandMeta {
    name: "collect",
    desc: "Collect your next few messages in this channel.",
    usage: "!collect",
};

const WANTED: usize = 5;
const COLLECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Gather the author's next messages in this channel, or report a timeout.
pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let http = &ctx.http;
    let author = msg.author.id;
    let channel_id = msg.channel_id;

    let (mut messages, cancel) = subscribe(&ctx.events, move |next: &Box<MessageCreate>| {
        next.author.id == author && next.channel_id == channel_id
    });

    let collected = collect_within(&mut messages, WANTED, COLLECT_TIMEOUT).await;
    cancel.cancel();

    let out = match collected {
        Some(collected) => {
            let contents: Vec<String> = collected.into_iter().map(|next| next.content.clone()).collect();
            collected_summary(&contents)
        }
        None => "timed out".to_owned(),
    };
    http.create_message(channel_id).content(&out).await?;

    Ok(())
}

/// Take `wanted` events from `events`, or `None` if they don't all arrive
/// within `timeout`.
async fn collect_within<T>(
    events: &mut EventStream<T>,
    wanted: usize,
    timeout: Duration,
) -> Option<Vec<T>> {
    let mut collected = Vec::with_capacity(wanted);
    let finished = tokio::time::timeout(timeout, async {
        while collected.len() < wanted {
            let Some(next) = events.recv().await else {
                break;
            };
            collected.push(next);
        }
    })
    .await;

    if finished.is_ok() && collected.len() == wanted {
        return Some(collected);
    }

    debug!(collected = collected.len(), wanted, "collection timed out");
    None
}

fn collected_summary(collected: &[String]) -> String {
    let quoted: Vec<String> = collected
        .iter()
        .map(|content| format!("`{content}`"))
        .collect();
    format!("Collected: {}", quoted.join(", "))
}
