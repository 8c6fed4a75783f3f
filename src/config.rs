// Copyright (c) 2025 - Cowboy AI, Inc.
//! Service configuration loaded from environment variables

use anyhow::{Context, Result};
use std::time::Duration;

/// Settings for the dictionary scraper and local storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Dictionary page URL; the looked-up word is appended to it
    pub google_translator_url: String,
    /// How long the scraper waits for elements to become visible
    pub web_scraper_timeout: Duration,
    pub dictionary_link_css_selector: String,
    pub button_css_selector: String,
    pub definition_css_selector: String,
    pub synonym_css_selector: String,
    pub translation_css_selector: String,
    pub example_css_selector: String,
    pub postgres_dsn: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            google_translator_url: "https://www.google.com/search?hl=en&q=define+".to_string(),
            web_scraper_timeout: Duration::from_secs(5),
            dictionary_link_css_selector: String::new(),
            button_css_selector: String::new(),
            definition_css_selector: String::new(),
            synonym_css_selector: String::new(),
            translation_css_selector: String::new(),
            example_css_selector: String::new(),
            postgres_dsn: String::new(),
        }
    }
}

impl Settings {
    /// Load settings from environment variables, falling back to defaults
    ///
    /// `WEB_SCRAPER_TIMEOUT` is a whole number of seconds.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let text = |name: &str, default: String| lookup(name).unwrap_or(default);

        let web_scraper_timeout = match lookup("WEB_SCRAPER_TIMEOUT") {
            Some(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .with_context(|| format!("WEB_SCRAPER_TIMEOUT is not a number of seconds: {raw:?}"))?,
            ),
            None => defaults.web_scraper_timeout,
        };

        Ok(Self {
            google_translator_url: text("GOOGLE_TRANSLATOR_URL", defaults.google_translator_url),
            web_scraper_timeout,
            dictionary_link_css_selector: text(
                "DICTIONARY_LINK_CSS_SELECTOR",
                defaults.dictionary_link_css_selector,
            ),
            button_css_selector: text("BUTTON_CSS_SELECTOR", defaults.button_css_selector),
            definition_css_selector: text("DEFINITION_CSS_SELECTOR", defaults.definition_css_selector),
            synonym_css_selector: text("SYNONYM_CSS_SELECTOR", defaults.synonym_css_selector),
            translation_css_selector: text(
                "TRANSLATION_CSS_SELECTOR",
                defaults.translation_css_selector,
            ),
            example_css_selector: text("EXAMPLE_CSS_SELECTOR", defaults.example_css_selector),
            postgres_dsn: text("POSTGRES_DSN", defaults.postgres_dsn),
        })
    }
}
