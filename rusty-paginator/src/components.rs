//! Navigation button row for a paginator message.

use twilight_model::channel::message::component::{ActionRow, Button, Component};

use crate::config::ButtonsConfig;
use crate::custom_id::{PageAction, build_custom_id};

/// Whether `action` cannot move away from `current_page`.
///
/// `stop` is never disabled.
pub fn is_at_boundary(action: PageAction, current_page: usize, max_pages: usize) -> bool {
    let last_page = max_pages.saturating_sub(1);
    match action {
        PageAction::First | PageAction::Back => current_page == 0,
        PageAction::Next | PageAction::Last => current_page >= last_page,
        PageAction::Stop => false,
    }
}

/// Build the navigation row: one button per configured action, in
/// first/back/stop/next/last order, with boundary buttons disabled.
///
/// Returns no row at all when every button is suppressed.
pub fn build_nav_components(
    buttons: &ButtonsConfig,
    prefix: &str,
    paginator_id: &str,
    current_page: usize,
    max_pages: usize,
) -> Vec<Component> {
    let row: Vec<Component> = PageAction::ALL
        .into_iter()
        .filter_map(|action| {
            let look = buttons.get(action)?;
            Some(Component::Button(Button {
                id: None,
                custom_id: Some(build_custom_id(prefix, paginator_id, action)),
                disabled: is_at_boundary(action, current_page, max_pages),
                emoji: look.emoji.clone(),
                label: look.label.clone(),
                style: look.style,
                url: None,
                sku_id: None,
            }))
        })
        .collect();

    if row.is_empty() {
        return vec![];
    }

    vec![Component::ActionRow(ActionRow {
        id: None,
        components: row,
    })]
}
