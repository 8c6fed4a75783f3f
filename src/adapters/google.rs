// Copyright (c) 2025 - Cowboy AI, Inc.
//! Online Dictionary Repository
//!
//! Looks words up on the Google dictionary page through a browser-driving
//! [`WebScraper`]. Each lookup opens its own browser session:
//!
//! ```text
//! open session → load page → dictionary block visible?
//!                                 │ no → None
//!                                 ▼ yes
//!                 press expander buttons → extract sections → Flashcard
//! ```
//!
//! A missing section yields an empty list rather than failing the lookup.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};

use super::RemoteFlashcardRepository;
use crate::config::Settings;
use crate::domain::Flashcard;
use crate::errors::ScraperResult;
use crate::unit_of_work::{SeenSet, Shared};

/// Starts browser sessions
pub trait WebScraper: Send + Sync {
    type Session: ScraperSession;

    /// Start a session; the browser is shut down when the session is dropped
    fn open(&self, timeout: Duration) -> ScraperResult<Self::Session>;
}

/// One live browser session
pub trait ScraperSession {
    type Element;

    fn load_web_page(&mut self, url: &str) -> ScraperResult<()>;

    /// Whether elements matching `selector` became visible before the timeout
    fn check_dictionary_availability(&mut self, selector: &str) -> bool;

    fn find_all_elements_by_css_selector(&mut self, selector: &str)
        -> ScraperResult<Vec<Self::Element>>;

    fn press_a_button(&mut self, button: &Self::Element) -> ScraperResult<()>;

    fn element_text(&self, element: &Self::Element) -> String;

    fn extract_text_from_elements(&mut self, selector: &str) -> ScraperResult<Vec<String>> {
        let elements = self.find_all_elements_by_css_selector(selector)?;
        Ok(elements
            .iter()
            .map(|element| self.element_text(element))
            .collect())
    }
}

/// Remote flashcard repository backed by the Google dictionary page
pub struct GoogleFlashcardRepository<S> {
    scraper: S,
    settings: Settings,
    seen: SeenSet<Flashcard>,
}

impl<S: WebScraper> GoogleFlashcardRepository<S> {
    pub fn new(scraper: S, settings: Settings) -> Self {
        Self {
            scraper,
            settings,
            seen: SeenSet::new(),
        }
    }

    fn scrape(&self, word: &str) -> ScraperResult<Option<Flashcard>> {
        let url = format!("{}{}", self.settings.google_translator_url, word);
        let mut session = self.scraper.open(self.settings.web_scraper_timeout)?;

        session.load_web_page(&url)?;
        if !session.check_dictionary_availability(&self.settings.dictionary_link_css_selector) {
            debug!(word, "Dictionary block not available");
            return Ok(None);
        }

        match session.find_all_elements_by_css_selector(&self.settings.button_css_selector) {
            Ok(buttons) => {
                for button in &buttons {
                    session.press_a_button(button)?;
                }
            }
            Err(err) => debug!(word, error = %err, "No expander buttons found"),
        }

        let definitions = extract_or_empty(&mut session, &self.settings.definition_css_selector);
        let synonyms = extract_or_empty(&mut session, &self.settings.synonym_css_selector);
        let translations = extract_or_empty(&mut session, &self.settings.translation_css_selector);
        let examples = extract_or_empty(&mut session, &self.settings.example_css_selector);

        Ok(Some(Flashcard::new(
            word,
            definitions,
            synonyms,
            translations,
            examples,
        )))
    }
}

fn extract_or_empty<T: ScraperSession>(session: &mut T, selector: &str) -> Vec<String> {
    session
        .extract_text_from_elements(selector)
        .unwrap_or_else(|err| {
            debug!(selector, error = %err, "Section missing, using empty list");
            Vec::new()
        })
}

impl<S: WebScraper> RemoteFlashcardRepository for GoogleFlashcardRepository<S> {
    fn retrieve_flashcard_by_word(&self, word: &str) -> ScraperResult<Option<Shared<Flashcard>>> {
        let Some(flashcard) = self.scrape(word)? else {
            return Ok(None);
        };

        info!(word, "Fetched flashcard from online dictionary");
        let flashcard: Shared<Flashcard> = Arc::new(Mutex::new(flashcard));
        self.seen.add(&flashcard);
        Ok(Some(flashcard))
    }

    fn seen(&self) -> &SeenSet<Flashcard> {
        &self.seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ScraperError;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Page where each selector maps to the texts of its elements
    #[derive(Default, Clone)]
    struct Page {
        sections: HashMap<String, Vec<String>>,
    }

    struct FakeScraper {
        page: Option<Page>,
        pressed: Arc<AtomicUsize>,
    }

    struct FakeSession {
        page: Option<Page>,
        loaded: bool,
        pressed: Arc<AtomicUsize>,
    }

    impl WebScraper for FakeScraper {
        type Session = FakeSession;

        fn open(&self, _timeout: Duration) -> ScraperResult<FakeSession> {
            Ok(FakeSession {
                page: self.page.clone(),
                loaded: false,
                pressed: Arc::clone(&self.pressed),
            })
        }
    }

    impl ScraperSession for FakeSession {
        type Element = String;

        fn load_web_page(&mut self, _url: &str) -> ScraperResult<()> {
            self.loaded = true;
            Ok(())
        }

        fn check_dictionary_availability(&mut self, _selector: &str) -> bool {
            self.loaded && self.page.is_some()
        }

        fn find_all_elements_by_css_selector(&mut self, selector: &str) -> ScraperResult<Vec<String>> {
            self.page
                .as_ref()
                .and_then(|page| page.sections.get(selector).cloned())
                .ok_or_else(|| ScraperError::ElementsNotFound(selector.to_string()))
        }

        fn press_a_button(&mut self, _button: &String) -> ScraperResult<()> {
            self.pressed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn element_text(&self, element: &String) -> String {
            element.clone()
        }
    }

    fn settings() -> Settings {
        Settings {
            button_css_selector: "button".to_string(),
            definition_css_selector: "definition".to_string(),
            synonym_css_selector: "synonym".to_string(),
            translation_css_selector: "translation".to_string(),
            example_css_selector: "example".to_string(),
            ..Settings::default()
        }
    }

    fn page(sections: Vec<(&str, Vec<&str>)>) -> Page {
        Page {
            sections: sections
                .into_iter()
                .map(|(selector, texts)| {
                    (
                        selector.to_string(),
                        texts.iter().map(|text| text.to_string()).collect(),
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn unavailable_dictionary_yields_nothing() {
        let repository = GoogleFlashcardRepository::new(
            FakeScraper {
                page: None,
                pressed: Arc::default(),
            },
            settings(),
        );

        let found = repository.retrieve_flashcard_by_word("WORD").unwrap();

        assert!(found.is_none());
        assert!(repository.seen().is_empty());
    }

    #[test]
    fn missing_sections_become_empty_lists() {
        let pressed = Arc::new(AtomicUsize::new(0));
        let repository = GoogleFlashcardRepository::new(
            FakeScraper {
                page: Some(page(vec![
                    ("button", vec!["more", "more"]),
                    ("definition", vec!["a call to take part in a contest"]),
                    ("translation", vec!["вызов"]),
                ])),
                pressed: Arc::clone(&pressed),
            },
            settings(),
        );

        let found = repository
            .retrieve_flashcard_by_word("challenge")
            .unwrap()
            .unwrap();
        let flashcard = crate::unit_of_work::lock(&found).detached();

        assert_eq!(pressed.load(Ordering::SeqCst), 2);
        assert_eq!(flashcard.word, "challenge");
        assert_eq!(flashcard.definitions, vec!["a call to take part in a contest"]);
        assert!(flashcard.synonyms.is_empty());
        assert_eq!(flashcard.translations, vec!["вызов"]);
        assert!(flashcard.examples.is_empty());
        assert!(repository.seen().contains(&found));
    }
}
