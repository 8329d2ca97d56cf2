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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::Transaction;
use rusqlite::config::DbConfig;
use rusqlite::params;

use crate::error::Fallible;
use crate::error::fail;
use crate::repo::DeckRepository;
use crate::repo::HistoryRepository;
use crate::repo::ProfileRepository;
use crate::types::card::Card;
use crate::types::deck::Deck;
use crate::types::deck::DeckId;
use crate::types::deck::DeckPatch;
use crate::types::deck::NewDeck;
use crate::types::history::SessionHistoryRecord;
use crate::types::share_code::ShareCode;
use crate::types::timestamp::Timestamp;
use crate::types::user::Identity;
use crate::types::user::UserProfile;

const DECK_COLUMNS: &str = "deck_id, name, default_timer, owner_id, owner_display_name, cards, share_code, is_shared, imported_from, created_at";

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                log::debug!("Creating database schema.");
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        let conn = Arc::new(Mutex::new(conn));
        Ok(Self { conn })
    }

    fn acquire(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    fn query_decks(&self, sql: &str, param: &dyn rusqlite::ToSql) -> Fallible<Vec<Deck>> {
        let conn = self.acquire();
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([param])?;
        let mut decks = Vec::new();
        while let Some(row) = rows.next()? {
            decks.push(read_deck(row)?);
        }
        Ok(decks)
    }
}

impl DeckRepository for Database {
    fn get_deck(&self, deck_id: DeckId) -> Fallible<Option<Deck>> {
        let sql = format!("select {DECK_COLUMNS} from decks where deck_id = ?;");
        let mut decks = self.query_decks(&sql, &deck_id)?;
        Ok(decks.pop())
    }

    fn list_decks_by_owner(&self, owner_id: &str) -> Fallible<Vec<Deck>> {
        let sql = format!(
            "select {DECK_COLUMNS} from decks where owner_id = ? order by created_at, deck_id;"
        );
        self.query_decks(&sql, &owner_id)
    }

    fn create_deck(&self, deck: NewDeck) -> Fallible<DeckId> {
        let cards = serde_json::to_string(&deck.cards)?;
        let mut conn = self.acquire();
        let tx = conn.transaction()?;
        let deck_id = insert_deck(
            &tx,
            &InsertDeck {
                name: &deck.name,
                default_timer: deck.default_timer_seconds,
                owner_id: &deck.owner_id,
                owner_display_name: &deck.owner_display_name,
                cards: &cards,
                imported_from: None,
            },
        )?;
        tx.commit()?;
        log::debug!("Created deck {deck_id} ({}).", deck.name);
        Ok(deck_id)
    }

    fn update_deck(&self, deck_id: DeckId, patch: DeckPatch) -> Fallible<()> {
        let mut conn = self.acquire();
        let tx = conn.transaction()?;
        if !deck_exists(&tx, deck_id)? {
            return fail("Deck not found.");
        }
        if let Some(name) = &patch.name {
            tx.execute(
                "update decks set name = ? where deck_id = ?;",
                params![name, deck_id],
            )?;
        }
        if let Some(timer) = patch.default_timer_seconds {
            tx.execute(
                "update decks set default_timer = ? where deck_id = ?;",
                params![timer, deck_id],
            )?;
        }
        if let Some(cards) = &patch.cards {
            let cards = serde_json::to_string(cards)?;
            tx.execute(
                "update decks set cards = ? where deck_id = ?;",
                params![cards, deck_id],
            )?;
        }
        tx.commit()?;
        log::debug!("Updated deck {deck_id}.");
        Ok(())
    }

    fn delete_deck(&self, deck_id: DeckId) -> Fallible<()> {
        let conn = self.acquire();
        let deleted = conn.execute("delete from decks where deck_id = ?;", [deck_id])?;
        if deleted == 0 {
            return fail("Deck not found.");
        }
        log::debug!("Deleted deck {deck_id}.");
        Ok(())
    }

    fn list_shared_decks(&self) -> Fallible<Vec<Deck>> {
        let sql = format!(
            "select {DECK_COLUMNS} from decks where is_shared = ? order by created_at, deck_id;"
        );
        self.query_decks(&sql, &true)
    }

    fn share_deck(&self, deck_id: DeckId) -> Fallible<ShareCode> {
        let mut conn = self.acquire();
        let tx = conn.transaction()?;
        let existing: Option<(String, Option<ShareCode>)> = tx
            .query_row(
                "select owner_id, share_code from decks where deck_id = ?;",
                [deck_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let code = match existing {
            None => return fail("Deck not found."),
            Some((_, Some(code))) => code,
            Some((owner_id, None)) => ShareCode::generate(deck_id, &owner_id, Timestamp::now()),
        };
        tx.execute(
            "update decks set share_code = ?, is_shared = 1 where deck_id = ?;",
            params![code, deck_id],
        )?;
        tx.commit()?;
        log::debug!("Shared deck {deck_id} as {code}.");
        Ok(code)
    }

    fn unshare_deck(&self, deck_id: DeckId) -> Fallible<()> {
        let conn = self.acquire();
        let updated = conn.execute(
            "update decks set is_shared = 0 where deck_id = ?;",
            [deck_id],
        )?;
        if updated == 0 {
            return fail("Deck not found.");
        }
        log::debug!("Unshared deck {deck_id}.");
        Ok(())
    }

    fn import_deck(&self, code: &ShareCode, importer: &Identity) -> Fallible<DeckId> {
        let mut conn = self.acquire();
        let tx = conn.transaction()?;
        let source: Option<(String, u32, String)> = tx
            .query_row(
                "select name, default_timer, cards from decks where share_code = ? and is_shared = 1;",
                [code],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        let Some((name, default_timer, cards)) = source else {
            return fail("No shared deck found with that code.");
        };
        let duplicate: Option<String> = tx
            .query_row(
                "select name from decks where owner_id = ? and (imported_from = ? or share_code = ?) limit 1;",
                params![importer.user_id, code, code],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(existing) = duplicate {
            return fail(format!(
                "A copy of \"{existing}\" already exists in your collection."
            ));
        }
        insert_user(&tx, importer)?;
        let deck_id = insert_deck(
            &tx,
            &InsertDeck {
                name: &name,
                default_timer,
                owner_id: &importer.user_id,
                owner_display_name: importer.attribution(),
                cards: &cards,
                imported_from: Some(code),
            },
        )?;
        tx.commit()?;
        log::debug!("Imported {code} as deck {deck_id}.");
        Ok(deck_id)
    }
}

impl HistoryRepository for Database {
    fn append_record(&self, record: &SessionHistoryRecord) -> Fallible<()> {
        let conn = self.acquire();
        conn.execute(
            "insert into session_history (user_id, deck_id, deck_name, session_type, finish_reason, timestamp, score, total_questions) values (?, ?, ?, ?, ?, ?, ?, ?);",
            params![
                record.user_id,
                record.deck_id,
                record.deck_name,
                record.session_type,
                record.finish_reason,
                record.timestamp,
                record.score,
                record.total_questions,
            ],
        )?;
        log::debug!(
            "Recorded {} session on deck {}.",
            record.session_type,
            record.deck_id
        );
        Ok(())
    }

    fn list_by_user(&self, user_id: &str) -> Fallible<Vec<SessionHistoryRecord>> {
        let conn = self.acquire();
        let mut stmt = conn.prepare(
            "select user_id, deck_id, deck_name, session_type, finish_reason, timestamp, score, total_questions from session_history where user_id = ? order by timestamp desc, record_id desc;",
        )?;
        let mut rows = stmt.query([user_id])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(SessionHistoryRecord {
                user_id: row.get(0)?,
                deck_id: row.get(1)?,
                deck_name: row.get(2)?,
                session_type: row.get(3)?,
                finish_reason: row.get(4)?,
                timestamp: row.get(5)?,
                score: row.get(6)?,
                total_questions: row.get(7)?,
            });
        }
        Ok(records)
    }

    fn clear_all_for_user(&self, user_id: &str) -> Fallible<usize> {
        let conn = self.acquire();
        let deleted = conn.execute("delete from session_history where user_id = ?;", [user_id])?;
        log::debug!("Cleared {deleted} history records.");
        Ok(deleted)
    }
}

impl ProfileRepository for Database {
    fn upsert_user(&self, identity: &Identity) -> Fallible<()> {
        let conn = self.acquire();
        conn.execute(
            "insert into users (user_id, display_name, email, bio, created_at) values (?, ?, ?, null, ?) on conflict (user_id) do update set display_name = excluded.display_name, email = excluded.email;",
            params![
                identity.user_id,
                identity.display_name,
                identity.email,
                Timestamp::now()
            ],
        )?;
        Ok(())
    }

    fn get_user(&self, user_id: &str) -> Fallible<Option<UserProfile>> {
        let conn = self.acquire();
        let profile = conn
            .query_row(
                "select user_id, display_name, email, bio, created_at from users where user_id = ?;",
                [user_id],
                |row| {
                    Ok(UserProfile {
                        user_id: row.get(0)?,
                        display_name: row.get(1)?,
                        email: row.get(2)?,
                        bio: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(profile)
    }

    fn set_bio(&self, user_id: &str, bio: &str) -> Fallible<()> {
        let conn = self.acquire();
        let bio = bio.trim();
        let bio = if bio.is_empty() { None } else { Some(bio) };
        let updated = conn.execute(
            "update users set bio = ? where user_id = ?;",
            params![bio, user_id],
        )?;
        if updated == 0 {
            return fail("User not found.");
        }
        Ok(())
    }
}

struct InsertDeck<'a> {
    name: &'a str,
    default_timer: u32,
    owner_id: &'a str,
    owner_display_name: &'a str,
    /// Already serialized.
    cards: &'a str,
    imported_from: Option<&'a ShareCode>,
}

fn insert_deck(tx: &Transaction, deck: &InsertDeck) -> Fallible<DeckId> {
    let sql = "insert into decks (name, default_timer, owner_id, owner_display_name, cards, imported_from, created_at) values (?, ?, ?, ?, ?, ?, ?);";
    tx.execute(
        sql,
        params![
            deck.name,
            deck.default_timer,
            deck.owner_id,
            deck.owner_display_name,
            deck.cards,
            deck.imported_from,
            Timestamp::now(),
        ],
    )?;
    Ok(tx.last_insert_rowid())
}

/// Make sure a user row exists without touching an existing one.
fn insert_user(tx: &Transaction, identity: &Identity) -> Fallible<()> {
    tx.execute(
        "insert or ignore into users (user_id, display_name, email, bio, created_at) values (?, ?, ?, null, ?);",
        params![
            identity.user_id,
            identity.display_name,
            identity.email,
            Timestamp::now()
        ],
    )?;
    Ok(())
}

fn deck_exists(tx: &Transaction, deck_id: DeckId) -> Fallible<bool> {
    let count: i64 = tx.query_row(
        "select count(*) from decks where deck_id = ?;",
        [deck_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn read_deck(row: &Row) -> Fallible<Deck> {
    let cards: String = row.get(5)?;
    let cards: Vec<Card> = serde_json::from_str(&cards)?;
    Ok(Deck {
        id: row.get(0)?,
        name: row.get(1)?,
        default_timer_seconds: row.get(2)?,
        owner_id: row.get(3)?,
        owner_display_name: row.get(4)?,
        cards,
        share_code: row.get(6)?,
        is_shared: row.get(7)?,
        imported_from: row.get(8)?,
        created_at: row.get(9)?,
    })
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["decks"], |row| row.get(0))?;
    Ok(count > 0)
}
