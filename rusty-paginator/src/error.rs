/// Caller and configuration mistakes surfaced by the paginator registry.
///
/// Transport failures are not represented here; they travel as
/// [`anyhow::Error`] straight from the platform client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginatorError {
    #[error("custom id prefix must be non-empty and must not contain ':' (got {0:?})")]
    InvalidPrefix(String),

    #[error("sweep interval must be greater than zero")]
    ZeroSweepInterval,

    #[error("paginator id must be non-empty and must not contain ':' (got {0:?})")]
    InvalidId(String),

    #[error("paginator {0:?} is already registered")]
    DuplicateId(String),

    #[error("a paginator needs at least one page")]
    NoPages,

    #[error("start page {page} is out of range for {max_pages} pages")]
    StartPageOutOfRange { page: usize, max_pages: usize },

    #[error("malformed paginator custom id {0:?}")]
    MalformedCustomId(String),

    #[error("unknown paginator action {0:?}")]
    UnknownAction(String),

    #[error("manager is already attached to a dispatcher")]
    AlreadyAttached,
}
