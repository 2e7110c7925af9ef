//! Per-message paginator state machine.

use std::{fmt, sync::Arc, time::Duration};

use tokio::time::Instant;
use twilight_model::id::{Id, marker::UserMarker};
use twilight_util::builder::embed::EmbedBuilder;

use crate::custom_id::{PageAction, is_valid_field};
use crate::error::PaginatorError;
use crate::interaction::MessageHandle;

/// Fills in the content of one zero-based page on top of a pre-styled embed.
pub type PageRenderer = Arc<dyn Fn(usize, EmbedBuilder) -> EmbedBuilder + Send + Sync>;

/// Caller-side description of a paginator to create.
pub struct PaginatorBuilder {
    id: Option<String>,
    creator: Option<Id<UserMarker>>,
    start_page: usize,
    max_pages: usize,
    renderer: PageRenderer,
    ttl: Option<Duration>,
    refresh_expiry_on_use: bool,
    message: Option<MessageHandle>,
}

impl PaginatorBuilder {
    /// A paginator over `max_pages` pages rendered by `renderer`.
    pub fn new(
        max_pages: usize,
        renderer: impl Fn(usize, EmbedBuilder) -> EmbedBuilder + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: None,
            creator: None,
            start_page: 0,
            max_pages,
            renderer: Arc::new(renderer),
            ttl: None,
            refresh_expiry_on_use: false,
            message: None,
        }
    }

    /// Registry key. Defaults to an id derived from the message or interaction.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Only this user may navigate.
    pub fn creator(mut self, creator: Id<UserMarker>) -> Self {
        self.creator = Some(creator);
        self
    }

    /// Zero-based page shown first.
    pub fn start_page(mut self, page: usize) -> Self {
        self.start_page = page;
        self
    }

    /// Expire the paginator `ttl` after creation. Without a TTL it lives
    /// until stopped.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Restart the TTL on every navigation.
    pub fn refresh_expiry_on_use(mut self, refresh: bool) -> Self {
        self.refresh_expiry_on_use = refresh;
        self
    }

    /// Message the paginator will be shown in, when the caller already
    /// knows it. Lets expiry strip the buttons before the first press.
    pub fn message(mut self, message: MessageHandle) -> Self {
        self.message = Some(message);
        self
    }

    pub(crate) fn build(self, default_id: String, now: Instant) -> Result<Paginator, PaginatorError> {
        let id = self.id.unwrap_or(default_id);
        if !is_valid_field(&id) {
            return Err(PaginatorError::InvalidId(id));
        }

        if self.max_pages == 0 {
            return Err(PaginatorError::NoPages);
        }

        if self.start_page >= self.max_pages {
            return Err(PaginatorError::StartPageOutOfRange {
                page: self.start_page,
                max_pages: self.max_pages,
            });
        }

        Ok(Paginator {
            id,
            creator: self.creator,
            current_page: self.start_page,
            max_pages: self.max_pages,
            renderer: self.renderer,
            ttl: self.ttl,
            expiry: self.ttl.map(|ttl| now + ttl),
            refresh_expiry_on_use: self.refresh_expiry_on_use,
            message: self.message,
        })
    }
}

pub struct Paginator {
    pub(crate) id: String,
    pub(crate) creator: Option<Id<UserMarker>>,
    pub(crate) current_page: usize,
    pub(crate) max_pages: usize,
    pub(crate) renderer: PageRenderer,
    ttl: Option<Duration>,
    pub(crate) expiry: Option<Instant>,
    refresh_expiry_on_use: bool,
    pub(crate) message: Option<MessageHandle>,
}

impl fmt::Debug for Paginator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginator")
            .field("id", &self.id)
            .field("creator", &self.creator)
            .field("current_page", &self.current_page)
            .field("max_pages", &self.max_pages)
            .field("expiry", &self.expiry)
            .field("refresh_expiry_on_use", &self.refresh_expiry_on_use)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl Paginator {
    /// Move to the page `action` points at, staying within
    /// `0..max_pages`. `stop` leaves the page alone.
    pub(crate) fn navigate(&mut self, action: PageAction) {
        let last_page = self.max_pages - 1;
        self.current_page = match action {
            PageAction::First => 0,
            PageAction::Back => self.current_page.saturating_sub(1),
            PageAction::Next => (self.current_page + 1).min(last_page),
            PageAction::Last => last_page,
            PageAction::Stop => self.current_page,
        };
    }

    /// Record a successful use at `now`.
    pub(crate) fn touch(&mut self, now: Instant) {
        if self.refresh_expiry_on_use
            && let Some(ttl) = self.ttl
        {
            self.expiry = Some(now + ttl);
        }
    }

    pub(crate) fn is_expired(&self, now: Instant) -> bool {
        self.expiry.is_some_and(|expiry| expiry <= now)
    }

    /// Whether `user` may drive this paginator.
    pub(crate) fn accepts(&self, user: Option<Id<UserMarker>>) -> bool {
        match self.creator {
            Some(creator) => user == Some(creator),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paginator(max_pages: usize) -> Paginator {
        PaginatorBuilder::new(max_pages, |_, embed| embed)
            .build("test".into(), Instant::now())
            .unwrap()
    }

    #[test]
    fn navigation_stays_in_range() {
        let mut pages = paginator(3);

        pages.navigate(PageAction::Back);
        assert_eq!(pages.current_page, 0);

        for _ in 0..3 {
            pages.navigate(PageAction::Next);
        }
        assert_eq!(pages.current_page, 2);

        pages.navigate(PageAction::First);
        assert_eq!(pages.current_page, 0);

        pages.navigate(PageAction::Last);
        assert_eq!(pages.current_page, 2);

        pages.navigate(PageAction::Stop);
        assert_eq!(pages.current_page, 2);
    }

    #[test]
    fn builder_validates() {
        let now = Instant::now();
        let build = |builder: PaginatorBuilder| builder.build("fallback".into(), now).err();

        assert_eq!(
            build(PaginatorBuilder::new(0, |_, e| e)),
            Some(PaginatorError::NoPages)
        );
        assert_eq!(
            build(PaginatorBuilder::new(2, |_, e| e).start_page(2)),
            Some(PaginatorError::StartPageOutOfRange {
                page: 2,
                max_pages: 2
            })
        );
        assert_eq!(
            build(PaginatorBuilder::new(2, |_, e| e).id("a:b")),
            Some(PaginatorError::InvalidId("a:b".into()))
        );
        assert_eq!(build(PaginatorBuilder::new(2, |_, e| e).id("custom")), None);
    }

    #[test]
    fn caller_id_wins_over_default() {
        let pages = PaginatorBuilder::new(1, |_, e| e)
            .id("mine")
            .build("fallback".into(), Instant::now())
            .unwrap();
        assert_eq!(pages.id, "mine");
    }

    #[tokio::test(start_paused = true)]
    async fn ttl_refreshes_only_when_asked() {
        let start = Instant::now();
        let ttl = Duration::from_secs(60);

        let mut fixed = PaginatorBuilder::new(2, |_, e| e)
            .ttl(ttl)
            .build("fixed".into(), start)
            .unwrap();
        let mut refreshing = PaginatorBuilder::new(2, |_, e| e)
            .ttl(ttl)
            .refresh_expiry_on_use(true)
            .build("refreshing".into(), start)
            .unwrap();

        let later = start + Duration::from_secs(45);
        fixed.touch(later);
        refreshing.touch(later);

        let check = start + Duration::from_secs(70);
        assert!(fixed.is_expired(check));
        assert!(!refreshing.is_expired(check));
        assert!(refreshing.is_expired(later + ttl));
    }

    #[test]
    fn known_message_is_carried_over() {
        let handle = MessageHandle {
            channel_id: Id::new(5),
            message_id: Id::new(6),
        };
        let pages = PaginatorBuilder::new(1, |_, e| e)
            .message(handle)
            .build("known".into(), Instant::now())
            .unwrap();

        assert_eq!(pages.message, Some(handle));
        assert_eq!(paginator(1).message, None);
    }

    #[test]
    fn no_ttl_never_expires() {
        let pages = paginator(1);
        assert!(!pages.is_expired(Instant::now() + Duration::from_secs(86_400)));
    }

    #[test]
    fn creator_scoping() {
        let owner = Id::new(1);
        let scoped = PaginatorBuilder::new(1, |_, e| e)
            .creator(owner)
            .build("scoped".into(), Instant::now())
            .unwrap();

        assert!(scoped.accepts(Some(owner)));
        assert!(!scoped.accepts(Some(Id::new(2))));
        assert!(!scoped.accepts(None));
        assert!(paginator(1).accepts(None));
    }
}
