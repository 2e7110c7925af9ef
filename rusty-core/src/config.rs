use std::env;

use anyhow::{Context as _, bail};
use rusty_paginator::{ConfigOverride, PaginatorConfig};

/// Settings read from the process environment at start-up.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub paginator: PaginatorConfig,
}

impl BotConfig {
    /// Read the configuration from environment variables.
    ///
    /// `DISCORD_TOKEN` is required. `PAGINATOR_PREFIX`,
    /// `PAGINATOR_EMBED_COLOR` and `PAGINATOR_NOT_YOURS_MESSAGE` override
    /// the paginator defaults when set.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let token = lookup("DISCORD_TOKEN").context("DISCORD_TOKEN is not set")?;

        let mut overrides = Vec::new();
        if let Some(prefix) = lookup("PAGINATOR_PREFIX") {
            overrides.push(ConfigOverride::CustomIdPrefix(prefix));
        }
        if let Some(raw) = lookup("PAGINATOR_EMBED_COLOR") {
            let color = parse_hex_color(&raw)
                .with_context(|| format!("PAGINATOR_EMBED_COLOR is not a color: {raw:?}"))?;
            overrides.push(ConfigOverride::EmbedColor(color));
        }
        if let Some(message) = lookup("PAGINATOR_NOT_YOURS_MESSAGE") {
            overrides.push(ConfigOverride::NotYourPaginatorMessage(message));
        }

        let paginator = PaginatorConfig::with_overrides(overrides)?;

        Ok(Self { token, paginator })
    }
}

/// Parse an RGB color written as hex, with an optional `#` or `0x` prefix.
pub fn parse_hex_color(raw: &str) -> anyhow::Result<u32> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let color = u32::from_str_radix(digits, 16)?;
    if color > 0xFF_FF_FF {
        bail!("{color:#x} does not fit in 24 bits");
    }

    Ok(color)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rusty_paginator::PaginatorError;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<BotConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        BotConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn colors_accept_common_spellings() {
        assert_eq!(parse_hex_color("4c50c1").unwrap(), 0x4c_50_c1);
        assert_eq!(parse_hex_color("#4C50C1").unwrap(), 0x4c_50_c1);
        assert_eq!(parse_hex_color("0xff0000").unwrap(), 0xff_00_00);
        assert!(parse_hex_color("1000000").is_err());
        assert!(parse_hex_color("blue").is_err());
        assert!(parse_hex_color("").is_err());
    }

    #[test]
    fn token_is_required() {
        assert!(load(&[]).is_err());
    }

    #[test]
    fn defaults_without_overrides() {
        let config = load(&[("DISCORD_TOKEN", "abc")]).unwrap();
        assert_eq!(config.token, "abc");
        assert_eq!(config.paginator, PaginatorConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = load(&[
            ("DISCORD_TOKEN", "abc"),
            ("PAGINATOR_PREFIX", "pages"),
            ("PAGINATOR_EMBED_COLOR", "#00ff00"),
            ("PAGINATOR_NOT_YOURS_MESSAGE", "hands off"),
        ])
        .unwrap();

        assert_eq!(config.paginator.custom_id_prefix(), "pages");
        assert_eq!(config.paginator.embed_color(), 0x00_ff_00);
        assert_eq!(config.paginator.not_your_paginator_message(), "hands off");
    }

    #[test]
    fn invalid_prefix_surfaces_paginator_error() {
        let error = load(&[("DISCORD_TOKEN", "abc"), ("PAGINATOR_PREFIX", "a:b")]).unwrap_err();
        assert_eq!(
            error.downcast_ref::<PaginatorError>(),
            Some(&PaginatorError::InvalidPrefix("a:b".into()))
        );
    }
}
