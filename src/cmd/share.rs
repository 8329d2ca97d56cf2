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
use crate::library::Library;
use crate::repo::DeckRepository;
use crate::types::deck::DeckId;
use crate::types::share_code::ShareCode;

pub fn share_deck(library: &Library, deck_id: DeckId) -> Fallible<ShareCode> {
    library.db.owned_deck(deck_id, &library.identity.user_id)?;
    let code = library.db.share_deck(deck_id)?;
    println!("Deck shared. Share code: {code}");
    Ok(code)
}

pub fn unshare_deck(library: &Library, deck_id: DeckId) -> Fallible<()> {
    library.db.owned_deck(deck_id, &library.identity.user_id)?;
    library.db.unshare_deck(deck_id)?;
    println!("Deck is now private.");
    Ok(())
}

pub fn list_shared_decks(library: &Library) -> Fallible<()> {
    let decks = library.db.list_shared_decks()?;
    if decks.is_empty() {
        println!("No shared decks.");
        return Ok(());
    }
    for deck in decks {
        let code = deck
            .share_code
            .as_ref()
            .map(|code| code.to_string())
            .unwrap_or_default();
        println!(
            "{code}\t{}\tby {}\t{} cards",
            deck.name,
            deck.owner_display_name,
            deck.cards.len()
        );
    }
    Ok(())
}

pub fn import_deck(library: &Library, code: &str) -> Fallible<DeckId> {
    let code = ShareCode::parse(code)?;
    let deck_id = library.db.import_deck(&code, &library.identity)?;
    println!("Imported as deck {deck_id}.");
    Ok(deck_id)
}
