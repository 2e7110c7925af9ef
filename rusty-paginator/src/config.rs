//! Immutable paginator configuration.
//!
//! A [`PaginatorConfig`] is built once, from a fresh default plus an explicit
//! list of [`ConfigOverride`]s, and then owned by a single manager.

use std::time::Duration;

use twilight_model::channel::message::{EmojiReactionType, component::ButtonStyle};

use crate::custom_id::{PageAction, is_valid_field};
use crate::error::PaginatorError;

/// Stock accent color for page embeds.
pub const DEFAULT_EMBED_COLOR: u32 = 0x4c_50_c1;
/// Stock custom id prefix.
pub const DEFAULT_CUSTOM_ID_PREFIX: &str = "paginator";
/// Stock reply for users pressing someone else's paginator.
pub const DEFAULT_NOT_YOUR_PAGINATOR_MESSAGE: &str =
    "You can't interact with this paginator because it's not yours.";
/// How often expired paginators are swept.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(30);

/// Look of one navigation button.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonConfig {
    pub style: ButtonStyle,
    pub label: Option<String>,
    pub emoji: Option<EmojiReactionType>,
}

impl ButtonConfig {
    /// A button showing a unicode emoji.
    pub fn emoji(style: ButtonStyle, emoji: &str) -> Self {
        Self {
            style,
            label: None,
            emoji: Some(EmojiReactionType::Unicode {
                name: emoji.to_owned(),
            }),
        }
    }

    /// A button showing a text label.
    pub fn label(style: ButtonStyle, label: &str) -> Self {
        Self {
            style,
            label: Some(label.to_owned()),
            emoji: None,
        }
    }
}

/// Per-action buttons. `None` leaves that button out of the row.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonsConfig {
    pub first: Option<ButtonConfig>,
    pub back: Option<ButtonConfig>,
    pub stop: Option<ButtonConfig>,
    pub next: Option<ButtonConfig>,
    pub last: Option<ButtonConfig>,
}

impl ButtonsConfig {
    pub fn get(&self, action: PageAction) -> Option<&ButtonConfig> {
        match action {
            PageAction::First => self.first.as_ref(),
            PageAction::Back => self.back.as_ref(),
            PageAction::Stop => self.stop.as_ref(),
            PageAction::Next => self.next.as_ref(),
            PageAction::Last => self.last.as_ref(),
        }
    }
}

impl Default for ButtonsConfig {
    fn default() -> Self {
        Self {
            first: Some(ButtonConfig::emoji(ButtonStyle::Primary, "⏮")),
            back: Some(ButtonConfig::emoji(ButtonStyle::Primary, "◀")),
            stop: Some(ButtonConfig::emoji(ButtonStyle::Danger, "🗑")),
            next: Some(ButtonConfig::emoji(ButtonStyle::Primary, "▶")),
            last: Some(ButtonConfig::emoji(ButtonStyle::Primary, "⏩")),
        }
    }
}

/// One field to change relative to the default configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigOverride {
    Buttons(ButtonsConfig),
    NotYourPaginatorMessage(String),
    CustomIdPrefix(String),
    EmbedColor(u32),
    SweepInterval(Duration),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaginatorConfig {
    buttons: ButtonsConfig,
    not_your_paginator_message: String,
    custom_id_prefix: String,
    embed_color: u32,
    sweep_interval: Duration,
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self {
            buttons: ButtonsConfig::default(),
            not_your_paginator_message: DEFAULT_NOT_YOUR_PAGINATOR_MESSAGE.to_owned(),
            custom_id_prefix: DEFAULT_CUSTOM_ID_PREFIX.to_owned(),
            embed_color: DEFAULT_EMBED_COLOR,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl PaginatorConfig {
    /// Build a configuration from the defaults plus `overrides`, applied in
    /// order. Later overrides of the same field win.
    pub fn with_overrides(
        overrides: impl IntoIterator<Item = ConfigOverride>,
    ) -> Result<Self, PaginatorError> {
        let mut config = Self::default();

        for item in overrides {
            match item {
                ConfigOverride::Buttons(buttons) => config.buttons = buttons,
                ConfigOverride::NotYourPaginatorMessage(message) => {
                    config.not_your_paginator_message = message;
                }
                ConfigOverride::CustomIdPrefix(prefix) => config.custom_id_prefix = prefix,
                ConfigOverride::EmbedColor(color) => config.embed_color = color,
                ConfigOverride::SweepInterval(interval) => config.sweep_interval = interval,
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), PaginatorError> {
        if !is_valid_field(&self.custom_id_prefix) {
            return Err(PaginatorError::InvalidPrefix(self.custom_id_prefix.clone()));
        }

        if self.sweep_interval.is_zero() {
            return Err(PaginatorError::ZeroSweepInterval);
        }

        Ok(())
    }

    pub fn buttons(&self) -> &ButtonsConfig {
        &self.buttons
    }

    pub fn not_your_paginator_message(&self) -> &str {
        &self.not_your_paginator_message
    }

    pub fn custom_id_prefix(&self) -> &str {
        &self.custom_id_prefix
    }

    pub fn embed_color(&self) -> u32 {
        self.embed_color
    }

    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }
}
