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
use crate::repo::HistoryRepository;
use crate::types::history::SessionHistoryRecord;

pub fn format_record(record: &SessionHistoryRecord) -> String {
    let mut line = format!(
        "{}\t{}\t{}\t{}",
        record.timestamp.local_datetime(),
        record.deck_name,
        record.session_type.label(),
        record.finish_reason
    );
    if let Some(score) = record.score_label() {
        line.push('\t');
        line.push_str(&score);
    }
    line
}

pub fn print_history(library: &Library) -> Fallible<()> {
    let records = library.db.list_by_user(&library.identity.user_id)?;
    if records.is_empty() {
        println!("No sessions yet.");
    }
    for record in &records {
        println!("{}", format_record(record));
    }
    Ok(())
}

/// Returns the number of records removed.
pub fn clear_history(library: &Library, prompter: &mut dyn Prompter) -> Fallible<usize> {
    let user_id = &library.identity.user_id;
    if library.db.list_by_user(user_id)?.is_empty() {
        println!("No session history to clear.");
        return Ok(0);
    }
    let message = "Are you sure you want to clear all session history? This cannot be undone.";
    if !confirm(prompter, "Clear History", message)? {
        println!("Cancelled.");
        return Ok(0);
    }
    let count = library.db.clear_all_for_user(user_id)?;
    println!("Cleared {count} sessions.");
    Ok(count)
}
