// Copyright (c) 2025 - Cowboy AI, Inc.
//! Flashcard commands

use serde::{Deserialize, Serialize};

use super::message::Command;

/// Remove a flashcard from local storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteFlashcard {
    pub word: String,
}

impl DeleteFlashcard {
    pub fn new(word: impl Into<String>) -> Self {
        Self { word: word.into() }
    }
}

impl Command for DeleteFlashcard {}
