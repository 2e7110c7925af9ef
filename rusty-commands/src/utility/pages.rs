use std::{sync::Arc, time::Duration};

use twilight_model::{
    gateway::payload::incoming::MessageCreate,
    id::{Id, marker::UserMarker},
};

use crate::CommandMeta;
use rusty_core::Context;
use rusty_paginator::{
    PaginatorBuilder,
    page::{bulleted_page, parse_one_based_page, total_pages},
};

pub const META: CommandMeta = CommandMeta {
    name: "pages",
    desc: "Browse a sample list one page at a time.",
    usage: "!pages [page]",
};

const ITEMS_PER_PAGE: usize = 5;
const CATALOGUE_TTL: Duration = Duration::from_secs(5 * 60);

/// Send the sample catalogue as a paginator only the author can drive.
///
/// Inputs:
/// - optional page number: `!pages [page]`.
///
/// Error behavior:
/// - returns usage text on invalid page input.
/// - returns bounds text when the requested page is out of range.
pub async fn run(ctx: Context, msg: Box<MessageCreate>, arg1: Option<&str>) -> anyhow::Result<()> {
    let http = &ctx.http;
    let total = total_pages(catalogue_items().len(), ITEMS_PER_PAGE);

    let Some(start_page) = parse_one_based_page(arg1) else {
        let usage = format!("Usage: `{}` (page starts at 1)", META.usage);
        http.create_message(msg.channel_id).content(&usage).await?;
        return Ok(());
    };

    if start_page >= total {
        let out = format!(
            "Page {} does not exist. Available pages: 1-{}.",
            start_page + 1,
            total
        );
        http.create_message(msg.channel_id).content(&out).await?;
        return Ok(());
    }

    let builder = catalogue_paginator(msg.author.id).start_page(start_page);
    ctx.paginators
        .create_from_message(msg.channel_id, builder)
        .await?;

    Ok(())
}

/// Paginator over the sample catalogue, owned by `owner` and kept alive
/// while in use.
pub fn catalogue_paginator(owner: Id<UserMarker>) -> PaginatorBuilder {
    let items: Arc<[String]> = catalogue_items().into();
    let total = total_pages(items.len(), ITEMS_PER_PAGE);

    PaginatorBuilder::new(total, move |page, embed| {
        embed
            .title("Sample Catalogue")
            .description(bulleted_page(&items, ITEMS_PER_PAGE, page))
    })
    .creator(owner)
    .ttl(CATALOGUE_TTL)
    .refresh_expiry_on_use(true)
}

fn catalogue_items() -> Vec<String> {
    (1..=24)
        .map(|index| format!("Sample catalogue item #{index}"))
        .collect()
}
