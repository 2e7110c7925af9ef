//! Registry of live paginators.
//!
//! The manager owns every paginator it creates, routes button presses to
//! them and sweeps expired ones in the background. A paginator is in the
//! registry exactly while its buttons are live; presses that reference an
//! unknown id are stale UI and are dropped.
//!
//! Locking: the id map sits behind a short-lived [`std::sync::Mutex`] that is
//! never held across `.await`. Each paginator has its own async lock, held
//! across mutate, render and respond, so the message always shows the
//! paginator's current page and concurrent presses cannot lose updates.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, PoisonError, Weak,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::{SystemTime, UNIX_EPOCH},
};

use rusty_events::{Dispatcher, EventKind, HandlerRemover};
use tokio::{
    sync::Mutex as AsyncMutex,
    time::{Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use twilight_model::{
    channel::message::{component::Component, embed::Embed},
    id::{Id, marker::ChannelMarker},
};

use crate::components::build_nav_components;
use crate::config::PaginatorConfig;
use crate::custom_id::{PageAction, parse_custom_id};
use crate::embed::build_page_embed;
use crate::error::PaginatorError;
use crate::interaction::{ComponentPress, InteractionRef};
use crate::paginator::{Paginator, PaginatorBuilder};
use crate::respond::{
    InteractionClient, channel_message_response, defer_component_update, respond_ephemeral_message,
    strip_components_response, update_message_response,
};

type Entry = Arc<AsyncMutex<Paginator>>;

struct Inner<C> {
    client: Arc<C>,
    config: PaginatorConfig,
    paginators: Mutex<HashMap<String, Entry>>,
    id_sequence: AtomicU64,
    attached: AtomicBool,
    shutdown: CancellationToken,
}

impl<C> Drop for Inner<C> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Cheap-to-clone handle to a paginator registry.
///
/// The background sweep lives as long as at least one handle does.
pub struct Manager<C> {
    inner: Arc<Inner<C>>,
}

impl<C> Clone for Manager<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: InteractionClient> Manager<C> {
    /// Create a manager and start its expiry sweep.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(client: Arc<C>, config: PaginatorConfig) -> Self {
        let inner = Arc::new(Inner {
            client,
            config,
            paginators: Mutex::new(HashMap::new()),
            id_sequence: AtomicU64::new(0),
            attached: AtomicBool::new(false),
            shutdown: CancellationToken::new(),
        });

        spawn_sweeper(Arc::downgrade(&inner));

        Self { inner }
    }

    pub fn config(&self) -> &PaginatorConfig {
        &self.inner.config
    }

    /// Route this manager's button presses from `dispatcher`.
    ///
    /// A manager can be attached once. The handler holds only a weak
    /// reference, so it goes quiet once every manager handle is dropped.
    pub fn attach<E>(&self, dispatcher: &Dispatcher<E>) -> anyhow::Result<HandlerRemover>
    where
        E: 'static,
        ComponentPress: EventKind<E>,
    {
        if self.inner.attached.swap(true, Ordering::AcqRel) {
            return Err(PaginatorError::AlreadyAttached.into());
        }

        let weak = Arc::downgrade(&self.inner);
        Ok(dispatcher.add_handler(move |press: ComponentPress| {
            let weak = Weak::clone(&weak);
            async move {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let manager = Manager { inner };
                if let Err(source) = manager.on_interaction(&press).await {
                    error!(?source, custom_id = %press.custom_id, "paginator interaction failed");
                }
            }
        }))
    }

    /// Send a paginator as a new message in `channel_id`.
    ///
    /// The id defaults to one derived from the channel. Returns the id the
    /// paginator was registered under.
    pub async fn create_from_message(
        &self,
        channel_id: Id<ChannelMarker>,
        builder: PaginatorBuilder,
    ) -> anyhow::Result<String> {
        let default_id = format!(
            "{}-{}-{}",
            channel_id,
            unix_millis(),
            self.inner.id_sequence.fetch_add(1, Ordering::Relaxed)
        );
        let paginator = builder.build(default_id, Instant::now())?;
        let (embeds, components) = self.render(&paginator)?;
        let (id, entry) = self.insert(paginator)?;

        match self
            .inner
            .client
            .create_message(channel_id, &embeds, &components)
            .await
        {
            Ok(message) => {
                entry.lock().await.message = Some(message);
                info!(paginator_id = %id, %channel_id, "paginator created");
                Ok(id)
            }
            Err(source) => {
                self.remove(&id);
                Err(source)
            }
        }
    }

    /// Answer `interaction` with a paginator.
    ///
    /// The id defaults to the interaction id. An interaction can be
    /// acknowledged only once: pass `acknowledged` when it already was, and
    /// the original response is edited instead.
    pub async fn create_from_interaction(
        &self,
        interaction: &InteractionRef,
        builder: PaginatorBuilder,
        acknowledged: bool,
    ) -> anyhow::Result<String> {
        let paginator = builder.build(interaction.id.to_string(), Instant::now())?;
        let (embeds, components) = self.render(&paginator)?;
        let (id, _entry) = self.insert(paginator)?;

        let client = &self.inner.client;
        let sent = if acknowledged {
            client
                .update_response(interaction, &embeds, &components)
                .await
        } else {
            client
                .create_response(interaction, &channel_message_response(embeds, components))
                .await
        };

        match sent {
            Ok(()) => {
                info!(paginator_id = %id, acknowledged, "paginator created from interaction");
                Ok(id)
            }
            Err(source) => {
                self.remove(&id);
                Err(source)
            }
        }
    }

    /// Handle one button press.
    ///
    /// Presses for other custom ids and for unknown paginators are ignored.
    /// Errors are reserved for malformed custom ids carrying this manager's
    /// prefix; transport failures are logged and leave the paginator as is.
    pub async fn on_interaction(&self, press: &ComponentPress) -> anyhow::Result<()> {
        let prefix = self.inner.config.custom_id_prefix();
        let Some(parsed) = parse_custom_id(prefix, &press.custom_id)? else {
            return Ok(());
        };
        let paginator_id = parsed.paginator_id;

        let Some(entry) = self.get(paginator_id) else {
            debug!(%paginator_id, "press for unknown paginator dropped");
            return Ok(());
        };

        let mut paginator = entry.lock().await;
        if !self.is_registered(paginator_id, &entry) {
            debug!(%paginator_id, "paginator went away while waiting for it");
            return Ok(());
        }

        let client = &*self.inner.client;

        if !paginator.accepts(press.user_id) {
            debug!(%paginator_id, user_id = ?press.user_id, "press from non-creator rejected");
            if let Err(source) = respond_ephemeral_message(
                client,
                &press.interaction,
                self.inner.config.not_your_paginator_message(),
            )
            .await
            {
                warn!(?source, %paginator_id, "failed to send rejection");
            }
            return Ok(());
        }

        if let Some(message) = press.message {
            paginator.message = Some(message);
        }

        if parsed.action == PageAction::Stop {
            self.remove(paginator_id);
            info!(%paginator_id, "paginator stopped");
            if let Err(source) = client
                .create_response(&press.interaction, &strip_components_response())
                .await
            {
                warn!(?source, %paginator_id, "failed to strip paginator buttons");
            }
            return Ok(());
        }

        paginator.navigate(parsed.action);
        paginator.touch(Instant::now());
        debug!(
            %paginator_id,
            action = %parsed.action,
            page = paginator.current_page,
            "paginator navigated"
        );

        let response = match self.render(&paginator) {
            Ok((embeds, components)) => update_message_response(embeds, components),
            Err(source) => {
                error!(?source, %paginator_id, "failed to render page");
                if let Err(source) = defer_component_update(client, &press.interaction).await {
                    warn!(?source, %paginator_id, "failed to acknowledge press");
                }
                return Ok(());
            }
        };

        if let Err(source) = client.create_response(&press.interaction, &response).await {
            warn!(?source, %paginator_id, "failed to update paginator message");
        }

        Ok(())
    }

    /// Remove every paginator whose expiry has passed.
    ///
    /// Paginators busy handling a press are skipped until the next pass.
    /// Buttons of swept paginators with a known message are stripped in the
    /// background. Returns how many were removed.
    pub fn remove_expired(&self) -> usize {
        let now = Instant::now();
        let mut swept = Vec::new();

        {
            let mut paginators = self.lock_map();
            paginators.retain(|id, entry| {
                let Ok(paginator) = entry.try_lock() else {
                    return true;
                };
                if !paginator.is_expired(now) {
                    return true;
                }
                swept.push((id.clone(), paginator.message));
                false
            });
        }

        for (paginator_id, message) in &swept {
            debug!(%paginator_id, "paginator expired");
            if let Some(message) = *message {
                let client = Arc::clone(&self.inner.client);
                let paginator_id = paginator_id.clone();
                tokio::spawn(async move {
                    let empty_components: [Component; 0] = [];
                    if let Err(source) = client.update_message(message, &empty_components).await {
                        warn!(?source, %paginator_id, "failed to strip expired paginator buttons");
                    }
                });
            }
        }

        swept.len()
    }

    pub fn contains(&self, paginator_id: &str) -> bool {
        self.lock_map().contains_key(paginator_id)
    }

    pub fn len(&self) -> usize {
        self.lock_map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Zero-based page a registered paginator currently shows.
    pub async fn current_page(&self, paginator_id: &str) -> Option<usize> {
        let entry = self.get(paginator_id)?;
        let paginator = entry.lock().await;
        Some(paginator.current_page)
    }

    fn render(&self, paginator: &Paginator) -> anyhow::Result<(Vec<Embed>, Vec<Component>)> {
        let config = &self.inner.config;
        let embed = build_page_embed(
            config.embed_color(),
            paginator.current_page,
            paginator.max_pages,
            &paginator.renderer,
        )?;
        let components = build_nav_components(
            config.buttons(),
            config.custom_id_prefix(),
            &paginator.id,
            paginator.current_page,
            paginator.max_pages,
        );
        Ok((vec![embed], components))
    }

    fn insert(&self, paginator: Paginator) -> Result<(String, Entry), PaginatorError> {
        let id = paginator.id.clone();
        let mut paginators = self.lock_map();
        if paginators.contains_key(&id) {
            return Err(PaginatorError::DuplicateId(id));
        }
        let entry = Arc::new(AsyncMutex::new(paginator));
        paginators.insert(id.clone(), Arc::clone(&entry));
        Ok((id, entry))
    }

    fn get(&self, paginator_id: &str) -> Option<Entry> {
        self.lock_map().get(paginator_id).cloned()
    }

    fn remove(&self, paginator_id: &str) {
        self.lock_map().remove(paginator_id);
    }

    fn is_registered(&self, paginator_id: &str, entry: &Entry) -> bool {
        self.lock_map()
            .get(paginator_id)
            .is_some_and(|current| Arc::ptr_eq(current, entry))
    }

    fn lock_map(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry>> {
        self.inner
            .paginators
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn spawn_sweeper<C: InteractionClient>(weak: Weak<Inner<C>>) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let period = inner.config.sweep_interval();
    let shutdown = inner.shutdown.clone();
    drop(inner);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let Some(inner) = weak.upgrade() else {
                break;
            };
            let removed = Manager { inner }.remove_expired();
            if removed > 0 {
                debug!(removed, "expired paginators swept");
            }
        }

        debug!("paginator sweep stopped");
    });
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}
