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

//! Storage interfaces. The session engine and the presentation layers only
//! see these traits; [`crate::db::Database`] implements all three.

use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::Card;
use crate::types::deck::Deck;
use crate::types::deck::DeckId;
use crate::types::deck::DeckPatch;
use crate::types::deck::NewDeck;
use crate::types::deck::validate_name;
use crate::types::deck::validate_timer;
use crate::types::history::SessionHistoryRecord;
use crate::types::share_code::ShareCode;
use crate::types::user::Identity;
use crate::types::user::UserProfile;

pub trait DeckRepository: Send + Sync {
    fn get_deck(&self, deck_id: DeckId) -> Fallible<Option<Deck>>;

    /// Decks owned by a user, oldest first.
    fn list_decks_by_owner(&self, owner_id: &str) -> Fallible<Vec<Deck>>;

    fn create_deck(&self, deck: NewDeck) -> Fallible<DeckId>;

    fn update_deck(&self, deck_id: DeckId, patch: DeckPatch) -> Fallible<()>;

    fn delete_deck(&self, deck_id: DeckId) -> Fallible<()>;

    fn list_shared_decks(&self) -> Fallible<Vec<Deck>>;

    /// Offer a deck for import. Sharing an already shared deck returns the
    /// code it already has.
    fn share_deck(&self, deck_id: DeckId) -> Fallible<ShareCode>;

    fn unshare_deck(&self, deck_id: DeckId) -> Fallible<()>;

    /// Copy a shared deck into the importer's collection.
    fn import_deck(&self, code: &ShareCode, importer: &Identity) -> Fallible<DeckId>;

    /// Load a deck, failing unless it exists and `owner_id` owns it.
    fn owned_deck(&self, deck_id: DeckId, owner_id: &str) -> Fallible<Deck> {
        match self.get_deck(deck_id)? {
            Some(deck) if deck.owner_id == owner_id => Ok(deck),
            _ => fail("Deck not found or you do not have permission to modify it."),
        }
    }

    /// Rename and/or retime a deck.
    fn edit_deck(
        &self,
        deck_id: DeckId,
        owner_id: &str,
        name: Option<&str>,
        default_timer_seconds: Option<u32>,
    ) -> Fallible<()> {
        self.owned_deck(deck_id, owner_id)?;
        let patch = DeckPatch {
            name: name.map(validate_name).transpose()?,
            default_timer_seconds: default_timer_seconds.map(validate_timer).transpose()?,
            cards: None,
        };
        if patch.is_empty() {
            return Ok(());
        }
        self.update_deck(deck_id, patch)
    }

    fn add_card(&self, deck_id: DeckId, owner_id: &str, card: Card) -> Fallible<()> {
        let mut deck = self.owned_deck(deck_id, owner_id)?;
        deck.cards.push(card);
        self.replace_cards(deck_id, deck.cards)
    }

    /// Replace the card at a zero-based index.
    fn replace_card(
        &self,
        deck_id: DeckId,
        owner_id: &str,
        index: usize,
        card: Card,
    ) -> Fallible<()> {
        let mut deck = self.owned_deck(deck_id, owner_id)?;
        match deck.cards.get_mut(index) {
            Some(slot) => *slot = card,
            None => return fail(format!("Deck has no card number {}.", index + 1)),
        }
        self.replace_cards(deck_id, deck.cards)
    }

    /// Remove the card at a zero-based index, returning it.
    fn remove_card(&self, deck_id: DeckId, owner_id: &str, index: usize) -> Fallible<Card> {
        let mut deck = self.owned_deck(deck_id, owner_id)?;
        if index >= deck.cards.len() {
            return fail(format!("Deck has no card number {}.", index + 1));
        }
        let card = deck.cards.remove(index);
        self.replace_cards(deck_id, deck.cards)?;
        Ok(card)
    }

    fn replace_cards(&self, deck_id: DeckId, cards: Vec<Card>) -> Fallible<()> {
        self.update_deck(
            deck_id,
            DeckPatch {
                cards: Some(cards),
                ..DeckPatch::default()
            },
        )
    }
}

pub trait HistoryRepository: Send + Sync {
    fn append_record(&self, record: &SessionHistoryRecord) -> Fallible<()>;

    /// A user's history, newest first.
    fn list_by_user(&self, user_id: &str) -> Fallible<Vec<SessionHistoryRecord>>;

    /// Delete a user's whole history. Returns the number of records removed.
    fn clear_all_for_user(&self, user_id: &str) -> Fallible<usize>;
}

pub trait ProfileRepository: Send + Sync {
    /// Record a user, keeping any bio they already have.
    fn upsert_user(&self, identity: &Identity) -> Fallible<()>;

    fn get_user(&self, user_id: &str) -> Fallible<Option<UserProfile>>;

    fn set_bio(&self, user_id: &str, bio: &str) -> Fallible<()>;
}
