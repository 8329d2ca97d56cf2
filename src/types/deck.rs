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

use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::Card;
use crate::types::share_code::ShareCode;
use crate::types::timestamp::Timestamp;

pub type DeckId = i64;

/// The shortest quiz timer a deck or session may use, in seconds.
pub const MIN_TIMER_SECONDS: u32 = 10;

/// The timer new decks get unless told otherwise.
pub const DEFAULT_TIMER_SECONDS: u32 = 60;

#[derive(Clone, Debug)]
pub struct Deck {
    pub id: DeckId,
    pub name: String,
    pub default_timer_seconds: u32,
    pub owner_id: String,
    pub owner_display_name: String,
    pub cards: Vec<Card>,
    pub share_code: Option<ShareCode>,
    pub is_shared: bool,
    /// The code of the shared deck this one was copied from, if any.
    pub imported_from: Option<ShareCode>,
    pub created_at: Timestamp,
}

impl Deck {
    pub fn visibility(&self) -> &'static str {
        if self.is_shared { "Shared" } else { "Private" }
    }
}

/// The fields needed to create a deck.
pub struct NewDeck {
    pub name: String,
    pub default_timer_seconds: u32,
    pub owner_id: String,
    pub owner_display_name: String,
    pub cards: Vec<Card>,
}

impl NewDeck {
    /// Validate user input for a new, empty deck.
    pub fn new(
        name: &str,
        default_timer_seconds: u32,
        owner_id: impl Into<String>,
        owner_display_name: impl Into<String>,
    ) -> Fallible<Self> {
        Ok(Self {
            name: validate_name(name)?,
            default_timer_seconds: validate_timer(default_timer_seconds)?,
            owner_id: owner_id.into(),
            owner_display_name: owner_display_name.into(),
            cards: Vec::new(),
        })
    }
}

/// A partial update to a deck. Fields left as `None` are unchanged.
#[derive(Default)]
pub struct DeckPatch {
    pub name: Option<String>,
    pub default_timer_seconds: Option<u32>,
    pub cards: Option<Vec<Card>>,
}

impl DeckPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.default_timer_seconds.is_none() && self.cards.is_none()
    }
}

pub fn validate_name(name: &str) -> Fallible<String> {
    let name = name.trim();
    if name.is_empty() {
        return fail("Deck name cannot be empty.");
    }
    Ok(name.to_string())
}

pub fn validate_timer(seconds: u32) -> Fallible<u32> {
    if seconds < MIN_TIMER_SECONDS {
        return fail("Please enter a valid quiz timer (minimum 10 seconds).");
    }
    Ok(seconds)
}
