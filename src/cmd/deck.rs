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
use crate::prompt::Prompter;
use crate::prompt::confirm;
use crate::repo::DeckRepository;
use crate::types::deck::DeckId;
use crate::types::deck::NewDeck;

pub fn create_deck(library: &Library, name: &str, timer: u32) -> Fallible<DeckId> {
    let identity = &library.identity;
    let deck = NewDeck::new(name, timer, &identity.user_id, identity.attribution())?;
    let name = deck.name.clone();
    let deck_id = library.db.create_deck(deck)?;
    println!("Created deck {deck_id}: {name}.");
    Ok(deck_id)
}

pub fn list_decks(library: &Library) -> Fallible<()> {
    let decks = library.db.list_decks_by_owner(&library.identity.user_id)?;
    if decks.is_empty() {
        println!("No decks yet.");
        return Ok(());
    }
    for deck in decks {
        println!(
            "{}\t{}\t{} cards\t{}s\t{}",
            deck.id,
            deck.name,
            deck.cards.len(),
            deck.default_timer_seconds,
            deck.visibility()
        );
    }
    Ok(())
}

pub fn show_deck(library: &Library, deck_id: DeckId) -> Fallible<()> {
    let deck = library.db.owned_deck(deck_id, &library.identity.user_id)?;
    println!("{} ({})", deck.name, deck.visibility());
    println!("Quiz timer: {} seconds", deck.default_timer_seconds);
    if let Some(code) = &deck.share_code {
        println!("Share code: {code}");
    }
    if let Some(code) = &deck.imported_from {
        println!("Imported from: {code}");
    }
    if deck.cards.is_empty() {
        println!("No cards.");
    }
    for (index, card) in deck.cards.iter().enumerate() {
        println!("{}", card.summary(index));
    }
    Ok(())
}

pub fn edit_deck(
    library: &Library,
    deck_id: DeckId,
    name: Option<&str>,
    timer: Option<u32>,
) -> Fallible<()> {
    library
        .db
        .edit_deck(deck_id, &library.identity.user_id, name, timer)?;
    println!("Deck updated.");
    Ok(())
}

/// Returns whether the deck was deleted.
pub fn delete_deck(
    library: &Library,
    deck_id: DeckId,
    prompter: &mut dyn Prompter,
) -> Fallible<bool> {
    let deck = library.db.owned_deck(deck_id, &library.identity.user_id)?;
    let message = format!(
        "Are you sure you want to delete \"{}\"? This cannot be undone.",
        deck.name
    );
    if !confirm(prompter, "Delete Deck", &message)? {
        println!("Cancelled.");
        return Ok(false);
    }
    library.db.delete_deck(deck_id)?;
    println!("Deleted \"{}\".", deck.name);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::create_tmp_directory;
    use crate::prompt::AssumeYes;
    use crate::prompt::Prompt;
    use crate::prompt::Reply;

    struct AlwaysNo;

    impl Prompter for AlwaysNo {
        fn ask(&mut self, _: &Prompt) -> Fallible<Reply> {
            Ok(Reply::Cancelled)
        }
    }

    #[test]
    fn test_deck_lifecycle() -> Fallible<()> {
        let library = Library::new(Some(create_tmp_directory()?))?;
        let deck_id = create_deck(&library, " Capitals ", 30)?;
        list_decks(&library)?;
        show_deck(&library, deck_id)?;
        edit_deck(&library, deck_id, Some("World Capitals"), Some(45))?;
        let deck = library.db.get_deck(deck_id)?.unwrap();
        assert_eq!(deck.name, "World Capitals");
        assert_eq!(deck.default_timer_seconds, 45);

        assert!(!delete_deck(&library, deck_id, &mut AlwaysNo)?);
        assert!(library.db.get_deck(deck_id)?.is_some());
        assert!(delete_deck(&library, deck_id, &mut AssumeYes)?);
        assert!(library.db.get_deck(deck_id)?.is_none());
        Ok(())
    }

    #[test]
    fn test_create_validation() -> Fallible<()> {
        let library = Library::new(Some(create_tmp_directory()?))?;
        let err = create_deck(&library, "   ", 60).unwrap_err();
        assert_eq!(err.message(), "Deck name cannot be empty.");
        let err = create_deck(&library, "Deck", 9).unwrap_err();
        assert_eq!(
            err.message(),
            "Please enter a valid quiz timer (minimum 10 seconds)."
        );
        Ok(())
    }
}
