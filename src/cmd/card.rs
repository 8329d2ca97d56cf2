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
use crate::library::Library;
use crate::prompt::Prompter;
use crate::prompt::confirm;
use crate::repo::DeckRepository;
use crate::types::card::Card;
use crate::types::deck::DeckId;

/// Card numbers on the command line start at 1.
fn to_index(number: usize) -> Fallible<usize> {
    match number.checked_sub(1) {
        Some(index) => Ok(index),
        None => fail("Card numbers start at 1."),
    }
}

pub fn add_card(
    library: &Library,
    deck_id: DeckId,
    question: &str,
    answer: &str,
    image_url: Option<String>,
) -> Fallible<()> {
    let card = Card::new(question, answer, image_url)?;
    library
        .db
        .add_card(deck_id, &library.identity.user_id, card)?;
    println!("Card added.");
    Ok(())
}

/// Replace a card. Fields left out keep their current value.
pub fn edit_card(
    library: &Library,
    deck_id: DeckId,
    number: usize,
    question: Option<&str>,
    answer: Option<&str>,
    image_url: Option<String>,
) -> Fallible<()> {
    let index = to_index(number)?;
    let deck = library.db.owned_deck(deck_id, &library.identity.user_id)?;
    let Some(current) = deck.cards.get(index) else {
        return fail(format!("Deck has no card number {number}."));
    };
    let card = Card::new(
        question.unwrap_or(&current.question),
        answer.unwrap_or(&current.answer),
        image_url.or_else(|| current.image_url.clone()),
    )?;
    library
        .db
        .replace_card(deck_id, &library.identity.user_id, index, card)?;
    println!("Card {number} updated.");
    Ok(())
}

/// Returns whether the card was deleted.
pub fn delete_card(
    library: &Library,
    deck_id: DeckId,
    number: usize,
    prompter: &mut dyn Prompter,
) -> Fallible<bool> {
    let index = to_index(number)?;
    let deck = library.db.owned_deck(deck_id, &library.identity.user_id)?;
    if index >= deck.cards.len() {
        return fail(format!("Deck has no card number {number}."));
    }
    let message = format!("Are you sure you want to delete card {number}?");
    if !confirm(prompter, "Delete Card", &message)? {
        println!("Cancelled.");
        return Ok(false);
    }
    library
        .db
        .remove_card(deck_id, &library.identity.user_id, index)?;
    println!("Card {number} deleted.");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::deck::create_deck;
    use crate::helper::create_tmp_directory;
    use crate::prompt::AssumeYes;

    #[test]
    fn test_card_commands() -> Fallible<()> {
        let library = Library::new(Some(create_tmp_directory()?))?;
        let deck_id = create_deck(&library, "Arithmetic", 60)?;
        add_card(&library, deck_id, "2+2", "4", None)?;
        add_card(
            &library,
            deck_id,
            "3+3",
            "6",
            Some("https://example.com/six.png".to_string()),
        )?;
        edit_card(&library, deck_id, 1, None, Some("four"), None)?;
        let deck = library.db.get_deck(deck_id)?.unwrap();
        assert_eq!(deck.cards[0].question, "2+2");
        assert_eq!(deck.cards[0].answer, "four");
        assert_eq!(deck.cards[1].summary(1), "Card 2: 3+3 [image]");

        assert!(delete_card(&library, deck_id, 1, &mut AssumeYes)?);
        let deck = library.db.get_deck(deck_id)?.unwrap();
        assert_eq!(deck.cards.len(), 1);
        assert_eq!(deck.cards[0].question, "3+3");
        Ok(())
    }

    #[test]
    fn test_card_validation() -> Fallible<()> {
        let library = Library::new(Some(create_tmp_directory()?))?;
        let deck_id = create_deck(&library, "Arithmetic", 60)?;
        let err = add_card(&library, deck_id, "  ", "4", None).unwrap_err();
        assert_eq!(
            err.message(),
            "Question and Answer fields cannot be empty."
        );
        assert!(edit_card(&library, deck_id, 0, Some("q"), None, None).is_err());
        assert!(delete_card(&library, deck_id, 1, &mut AssumeYes).is_err());
        assert!(add_card(&library, deck_id + 1, "q", "a", None).is_err());
        Ok(())
    }
}
