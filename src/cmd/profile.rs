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

use crate::cmd::history::format_record;
use crate::error::Fallible;
use crate::error::fail;
use crate::library::Library;
use crate::repo::DeckRepository;
use crate::repo::HistoryRepository;
use crate::repo::ProfileRepository;

pub fn print_profile(library: &Library) -> Fallible<()> {
    let user_id = &library.identity.user_id;
    let Some(profile) = library.db.get_user(user_id)? else {
        return fail("User not found.");
    };
    println!("{}", profile.display_name);
    if !profile.email.is_empty() {
        println!("{}", profile.email);
    }
    println!("{}", profile.bio_or_placeholder());

    println!();
    println!("Decks:");
    let decks = library.db.list_decks_by_owner(user_id)?;
    if decks.is_empty() {
        println!("  No decks yet.");
    }
    for deck in decks {
        println!(
            "  {}\t{} cards\t{}\t{}",
            deck.name,
            deck.cards.len(),
            deck.visibility(),
            deck.created_at.local_date()
        );
    }

    println!();
    println!("History:");
    let records = library.db.list_by_user(user_id)?;
    if records.is_empty() {
        println!("  No sessions yet.");
    }
    for record in &records {
        println!("  {}", format_record(record));
    }
    Ok(())
}

pub fn set_bio(library: &Library, bio: &str) -> Fallible<()> {
    library.db.set_bio(&library.identity.user_id, bio)?;
    println!("Bio updated.");
    Ok(())
}
