//! Pure helpers for slicing item lists into zero-based pages.

/// Compute the number of pages for a list, never less than one.
pub fn total_pages(item_count: usize, per_page: usize) -> usize {
    item_count.div_ceil(per_page.max(1)).max(1)
}

/// Return start/end indices of a zero-based page window.
pub fn page_window(total_items: usize, per_page: usize, page: usize) -> (usize, usize) {
    let safe_per_page = per_page.max(1);
    let start = page.saturating_mul(safe_per_page).min(total_items);
    let end = start.saturating_add(safe_per_page).min(total_items);
    (start, end)
}

/// Bullet list of the items on one zero-based page.
pub fn bulleted_page(items: &[String], per_page: usize, page: usize) -> String {
    let (start, end) = page_window(items.len(), per_page, page);
    if start == end {
        return String::new();
    }
    format!("- {}", items[start..end].join("\n- "))
}

/// Parse a one-based page argument into a zero-based index.
///
/// A missing argument means the first page; `0` and non-numbers are `None`.
pub fn parse_one_based_page(raw: Option<&str>) -> Option<usize> {
    match raw {
        Some(value) => value
            .parse::<usize>()
            .ok()
            .and_then(|page| page.checked_sub(1)),
        None => Some(0),
    }
}
