// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for flashcards-core
//!
//! Provides a fake online dictionary, test messages and handler builders
//! that record their side effects into a shared journal.
//!
//! # Design Principles
//! - Side effects are observed only through the journal or the unit of work
//! - Timing scenarios use [`TIME_UNIT`] so thresholds stay in one place

#![allow(dead_code)]

use futures::future::{self, BoxFuture, FutureExt};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use flashcards_core::adapters::{
    FlashcardTransaction, GoogleFlashcardRepository, LocalFlashcardRepository, ScraperSession,
    WebScraper,
};
use flashcards_core::domain::{Command, Entity, Event, Flashcard};
use flashcards_core::errors::{HandlerError, HandlerResult, ScraperError, ScraperResult};
use flashcards_core::{InMemoryUnitOfWork, Settings, Transaction, UnitOfWork};

/// Duration of one simulated unit of handler work
pub const TIME_UNIT: Duration = Duration::from_millis(100);

pub const DICTIONARY_URL: &str = "https://dictionary.test/define?q=";

// ============================================================================
// Journal
// ============================================================================

/// Ordered record of handler side effects
pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn journal() -> Journal {
    Arc::default()
}

pub fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug, Clone)]
pub struct SayHello {
    pub name: String,
}
impl Event for SayHello {}

#[derive(Debug, Clone)]
pub struct EmailSent {
    pub to: String,
}
impl Event for EmailSent {}

#[derive(Debug, Clone)]
pub struct SleepFor {
    pub id: usize,
}
impl Event for SleepFor {}

/// Creates a flashcard and raises two [`EmailSent`] events on it
#[derive(Debug, Clone)]
pub struct CreateFlashcardWithTwoEvents {
    pub word: String,
}
impl Command for CreateFlashcardWithTwoEvents {}

/// Stages a flashcard and raises [`EmailSent`] on it, then fails before
/// committing
#[derive(Debug, Clone)]
pub struct FailAfterStaging {
    pub word: String,
}
impl Command for FailAfterStaging {}

/// Commits an empty transaction
#[derive(Debug, Clone)]
pub struct Noop;
impl Command for Noop {}

/// Command no handler is ever registered for
#[derive(Debug, Clone)]
pub struct Nonexistent;
impl Command for Nonexistent {}

pub const FIRST_RECIPIENT: &str = "first@example.com";
pub const SECOND_RECIPIENT: &str = "second@example.com";
pub const ROLLED_BACK_RECIPIENT: &str = "rolled-back@example.com";

// ============================================================================
// Handlers
// ============================================================================

pub type TestHandler<E> =
    Box<dyn Fn(Arc<E>, Arc<InMemoryUnitOfWork>) -> BoxFuture<'static, HandlerResult<()>> + Send + Sync>;

pub async fn create_with_two_events(
    command: CreateFlashcardWithTwoEvents,
    uow: Arc<InMemoryUnitOfWork>,
) -> HandlerResult<Value> {
    let mut tx = uow.begin().await?;
    let flashcard = tx
        .flashcards()
        .create_flashcard(Flashcard::bare(command.word.clone()))
        .await?;
    {
        let mut flashcard = flashcard.lock().unwrap();
        flashcard.raise(EmailSent {
            to: FIRST_RECIPIENT.to_string(),
        });
        flashcard.raise(EmailSent {
            to: SECOND_RECIPIENT.to_string(),
        });
    }
    tx.commit().await?;
    Ok(json!({ "word": command.word }))
}

pub async fn fail_after_staging(
    command: FailAfterStaging,
    uow: Arc<InMemoryUnitOfWork>,
) -> HandlerResult<Value> {
    let mut tx = uow.begin().await?;
    let flashcard = tx
        .flashcards()
        .create_flashcard(Flashcard::bare(command.word))
        .await?;
    flashcard.lock().unwrap().raise(EmailSent {
        to: ROLLED_BACK_RECIPIENT.to_string(),
    });
    Err(HandlerError::Other("failed before commit".to_string()))
}

pub async fn noop(_command: Noop, uow: Arc<InMemoryUnitOfWork>) -> HandlerResult<Value> {
    uow.begin().await?.commit().await?;
    Ok(Value::Null)
}

/// Event handler appending `describe(event)` to the journal
pub fn record<E, F>(journal: &Journal, describe: F) -> TestHandler<E>
where
    E: Event,
    F: Fn(&E) -> String + Send + Sync + 'static,
{
    let journal = Arc::clone(journal);
    Box::new(move |event: Arc<E>, _uow: Arc<InMemoryUnitOfWork>| {
        journal.lock().unwrap().push(describe(&event));
        future::ready(Ok::<_, HandlerError>(())).boxed()
    })
}

/// Event handler that sleeps `units` time units, then records
pub fn sleep_then_record<E, F>(journal: &Journal, units: u32, describe: F) -> TestHandler<E>
where
    E: Event,
    F: Fn(&E) -> String + Send + Sync + 'static,
{
    let journal = Arc::clone(journal);
    Box::new(move |event: Arc<E>, _uow: Arc<InMemoryUnitOfWork>| {
        let journal = Arc::clone(&journal);
        let entry = describe(&event);
        async move {
            tokio::time::sleep(TIME_UNIT * units).await;
            journal.lock().unwrap().push(entry);
            Ok::<_, HandlerError>(())
        }
        .boxed()
    })
}

/// Event handler that always fails
pub fn failing<E: Event>(reason: &'static str) -> TestHandler<E> {
    Box::new(move |_event: Arc<E>, _uow: Arc<InMemoryUnitOfWork>| {
        future::ready(Err::<(), _>(HandlerError::Other(reason.to_string()))).boxed()
    })
}

/// Event handler that stores a flashcard for the greeted name and raises
/// [`EmailSent`] on it
pub fn greet_by_email() -> TestHandler<SayHello> {
    Box::new(|event: Arc<SayHello>, uow: Arc<InMemoryUnitOfWork>| {
        async move {
            let mut tx = uow.begin().await?;
            let flashcard = tx
                .flashcards()
                .create_flashcard(Flashcard::bare(event.name.clone()))
                .await?;
            flashcard.lock().unwrap().raise(EmailSent {
                to: event.name.clone(),
            });
            tx.commit().await?;
            Ok::<_, HandlerError>(())
        }
        .boxed()
    })
}

// ============================================================================
// Online dictionary
// ============================================================================

type Sections = HashMap<String, Vec<String>>;

/// Scraper serving canned dictionary pages keyed by word
#[derive(Clone, Default)]
pub struct FakeScraper {
    pages: Arc<HashMap<String, Sections>>,
    lookups: Arc<AtomicUsize>,
}

impl FakeScraper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page for `word` with definitions and translations
    pub fn with_word(mut self, word: &str, definitions: &[&str], translations: &[&str]) -> Self {
        let mut sections = Sections::new();
        sections.insert("button".to_string(), vec!["more".to_string()]);
        sections.insert("definition".to_string(), to_strings(definitions));
        sections.insert("translation".to_string(), to_strings(translations));

        let mut pages = (*self.pages).clone();
        pages.insert(word.to_string(), sections);
        self.pages = Arc::new(pages);
        self
    }

    /// Number of pages loaded so far
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

pub struct FakeSession {
    pages: Arc<HashMap<String, Sections>>,
    lookups: Arc<AtomicUsize>,
    current: Option<Sections>,
}

impl WebScraper for FakeScraper {
    type Session = FakeSession;

    fn open(&self, _timeout: Duration) -> ScraperResult<FakeSession> {
        Ok(FakeSession {
            pages: Arc::clone(&self.pages),
            lookups: Arc::clone(&self.lookups),
            current: None,
        })
    }
}

impl ScraperSession for FakeSession {
    type Element = String;

    fn load_web_page(&mut self, url: &str) -> ScraperResult<()> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let word = url.strip_prefix(DICTIONARY_URL).unwrap_or(url);
        self.current = self.pages.get(word).cloned();
        Ok(())
    }

    fn check_dictionary_availability(&mut self, _selector: &str) -> bool {
        self.current.is_some()
    }

    fn find_all_elements_by_css_selector(&mut self, selector: &str) -> ScraperResult<Vec<String>> {
        self.current
            .as_ref()
            .and_then(|sections| sections.get(selector).cloned())
            .ok_or_else(|| ScraperError::ElementsNotFound(selector.to_string()))
    }

    fn press_a_button(&mut self, _button: &String) -> ScraperResult<()> {
        Ok(())
    }

    fn element_text(&self, element: &String) -> String {
        element.clone()
    }
}

fn to_strings(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|text| text.to_string()).collect()
}

pub fn settings() -> Settings {
    Settings {
        google_translator_url: DICTIONARY_URL.to_string(),
        button_css_selector: "button".to_string(),
        definition_css_selector: "definition".to_string(),
        synonym_css_selector: "synonym".to_string(),
        translation_css_selector: "translation".to_string(),
        example_css_selector: "example".to_string(),
        ..Settings::default()
    }
}

// ============================================================================
// Unit of work
// ============================================================================

pub fn uow_with_dictionary(scraper: FakeScraper) -> Arc<InMemoryUnitOfWork> {
    let remote = GoogleFlashcardRepository::new(scraper, settings());
    Arc::new(InMemoryUnitOfWork::new(Arc::new(remote)))
}

pub fn uow() -> Arc<InMemoryUnitOfWork> {
    uow_with_dictionary(FakeScraper::new())
}

/// Commit flashcards directly, bypassing the bus
pub async fn seed(uow: &InMemoryUnitOfWork, flashcards: Vec<Flashcard>) {
    let mut tx = uow.begin().await.unwrap();
    for flashcard in flashcards {
        tx.flashcards().create_flashcard(flashcard).await.unwrap();
    }
    tx.commit().await.unwrap();
}

pub fn detailed(word: &str) -> Flashcard {
    Flashcard::new(
        word,
        vec![format!("definition of {word}")],
        vec![format!("synonym of {word}")],
        vec![format!("translation of {word}")],
        vec![format!("example with {word}")],
    )
}
