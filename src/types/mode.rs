// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::fmt::Formatter;

use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Deserialize;

use crate::error::ErrorReport;
use crate::error::fail;

/// How a deck is studied.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyMode {
    /// Flip through cards at your own pace, unscored.
    Flashcards,
    /// Timed multiple choice, scored.
    Quiz,
}

impl StudyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudyMode::Flashcards => "flashcards",
            StudyMode::Quiz => "quiz",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StudyMode::Flashcards => "Flashcards",
            StudyMode::Quiz => "Quiz",
        }
    }
}

impl Display for StudyMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for StudyMode {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "flashcards" => Ok(StudyMode::Flashcards),
            "quiz" => Ok(StudyMode::Quiz),
            _ => fail(format!("Invalid study mode: {}", value)),
        }
    }
}

impl ToSql for StudyMode {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for StudyMode {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let string: String = FromSql::column_result(value)?;
        StudyMode::try_from(string).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// Why a session ended.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FinishReason {
    /// The user clicked Finish.
    Manual,
    /// The quiz countdown reached zero.
    TimeUp,
    /// The last card was answered.
    CardsExhausted,
    /// There was nothing to study.
    NoCards,
}

impl FinishReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinishReason::Manual => "manual",
            FinishReason::TimeUp => "time_up",
            FinishReason::CardsExhausted => "cards_exhausted",
            FinishReason::NoCards => "no_cards",
        }
    }
}

impl Display for FinishReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for FinishReason {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "manual" => Ok(FinishReason::Manual),
            "time_up" => Ok(FinishReason::TimeUp),
            "cards_exhausted" => Ok(FinishReason::CardsExhausted),
            "no_cards" => Ok(FinishReason::NoCards),
            _ => fail(format!("Invalid finish reason: {}", value)),
        }
    }
}

impl ToSql for FinishReason {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for FinishReason {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let string: String = FromSql::column_result(value)?;
        FinishReason::try_from(string).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}
