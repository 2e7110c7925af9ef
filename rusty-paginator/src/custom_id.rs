//! Structured button custom ids: `<prefix>:<paginator id>:<action>`.

use std::{fmt, str::FromStr};

use crate::error::PaginatorError;

/// Field separator inside a custom id.
pub const SEPARATOR: char = ':';

/// Navigation action carried by a paginator button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageAction {
    First,
    Back,
    Stop,
    Next,
    Last,
}

impl PageAction {
    /// All actions in the order their buttons appear.
    pub const ALL: [PageAction; 5] = [
        PageAction::First,
        PageAction::Back,
        PageAction::Stop,
        PageAction::Next,
        PageAction::Last,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PageAction::First => "first",
            PageAction::Back => "back",
            PageAction::Stop => "stop",
            PageAction::Next => "next",
            PageAction::Last => "last",
        }
    }
}

impl fmt::Display for PageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageAction {
    type Err = PaginatorError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        PageAction::ALL
            .into_iter()
            .find(|action| action.as_str() == raw)
            .ok_or_else(|| PaginatorError::UnknownAction(raw.to_owned()))
    }
}

/// Parsed custom id of a paginator button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedCustomId<'a> {
    pub paginator_id: &'a str,
    pub action: PageAction,
}

/// Build the custom id for one paginator button.
pub fn build_custom_id(prefix: &str, paginator_id: &str, action: PageAction) -> String {
    format!("{prefix}{SEPARATOR}{paginator_id}{SEPARATOR}{action}")
}

/// Parse a custom id against a manager prefix.
///
/// Returns `Ok(None)` when the id belongs to someone else, and an error when
/// it carries the prefix but is not a well-formed paginator id.
pub fn parse_custom_id<'a>(
    prefix: &str,
    custom_id: &'a str,
) -> Result<Option<ParsedCustomId<'a>>, PaginatorError> {
    let Some((head, rest)) = custom_id.split_once(SEPARATOR) else {
        return Ok(None);
    };

    if head != prefix {
        return Ok(None);
    }

    let mut parts = rest.split(SEPARATOR);
    let (Some(paginator_id), Some(action), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(PaginatorError::MalformedCustomId(custom_id.to_owned()));
    };

    if paginator_id.is_empty() {
        return Err(PaginatorError::MalformedCustomId(custom_id.to_owned()));
    }

    Ok(Some(ParsedCustomId {
        paginator_id,
        action: action.parse()?,
    }))
}

/// Whether `value` can sit in a custom id field.
pub fn is_valid_field(value: &str) -> bool {
    !value.is_empty() && !value.contains(SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_colon_delimited_id() {
        assert_eq!(
            build_custom_id("paginator", "123", PageAction::Next),
            "paginator:123:next"
        );
    }

    #[test]
    fn parses_own_ids() {
        let parsed = parse_custom_id("paginator", "paginator:abc-1:last")
            .unwrap()
            .unwrap();
        assert_eq!(parsed.paginator_id, "abc-1");
        assert_eq!(parsed.action, PageAction::Last);
    }

    #[test]
    fn ignores_foreign_ids() {
        assert_eq!(parse_custom_id("paginator", "click_me:42"), Ok(None));
        assert_eq!(parse_custom_id("paginator", "paginatorx:1:next"), Ok(None));
        assert_eq!(parse_custom_id("paginator", "no-separator"), Ok(None));
    }

    #[test]
    fn rejects_malformed_ids_with_our_prefix() {
        assert_eq!(
            parse_custom_id("paginator", "paginator:only-id"),
            Err(PaginatorError::MalformedCustomId("paginator:only-id".into()))
        );
        assert_eq!(
            parse_custom_id("paginator", "paginator:1:next:extra"),
            Err(PaginatorError::MalformedCustomId(
                "paginator:1:next:extra".into()
            ))
        );
        assert_eq!(
            parse_custom_id("paginator", "paginator:1:jump"),
            Err(PaginatorError::UnknownAction("jump".into()))
        );
    }

    #[test]
    fn action_names_round_trip() {
        for action in PageAction::ALL {
            assert_eq!(action.as_str().parse::<PageAction>(), Ok(action));
        }
    }
}
