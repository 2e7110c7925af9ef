use twilight_model::channel::message::embed::Embed;
use twilight_util::builder::embed::{EmbedBuilder, EmbedFooterBuilder};

use crate::paginator::PageRenderer;

/// Footer text shown under every page, one-based.
pub fn page_footer(page: usize, max_pages: usize) -> String {
    format!("Page: {}/{}", page + 1, max_pages)
}

/// Render one page: the accent color and page footer first, then the
/// caller's renderer, then embed validation.
pub fn build_page_embed(
    color: u32,
    page: usize,
    max_pages: usize,
    renderer: &PageRenderer,
) -> anyhow::Result<Embed> {
    let base = EmbedBuilder::new()
        .color(color)
        .footer(EmbedFooterBuilder::new(page_footer(page, max_pages)).build());

    let embed = renderer(page, base).validate()?.build();
    Ok(embed)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn footer_is_one_based() {
        assert_eq!(page_footer(0, 3), "Page: 1/3");
        assert_eq!(page_footer(2, 3), "Page: 3/3");
    }

    #[test]
    fn renderer_fills_the_styled_base() {
        let renderer: PageRenderer =
            Arc::new(|page, embed| embed.description(format!("content {page}")));

        let embed = build_page_embed(0x12_34_56, 1, 4, &renderer).unwrap();

        assert_eq!(embed.color, Some(0x12_34_56));
        assert_eq!(embed.description.as_deref(), Some("content 1"));
        assert_eq!(embed.footer.unwrap().text, "Page: 2/4");
    }

    #[test]
    fn invalid_embed_is_an_error() {
        let renderer: PageRenderer = Arc::new(|_, embed| embed.title("t".repeat(1000)));
        assert!(build_page_embed(0, 0, 1, &renderer).is_err());
    }
}
