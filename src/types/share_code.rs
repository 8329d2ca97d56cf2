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

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::deck::DeckId;
use crate::types::timestamp::Timestamp;

/// Number of hex digits in a share code.
const CODE_LENGTH: usize = 10;

/// An opaque token under which a deck is offered for import.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct ShareCode(String);

impl ShareCode {
    /// Derive a fresh code for a deck. The inputs include the time of
    /// sharing, so a deck that is deleted and recreated gets a new code.
    pub fn generate(deck_id: DeckId, owner_id: &str, shared_at: Timestamp) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&deck_id.to_le_bytes());
        hasher.update(owner_id.as_bytes());
        hasher.update(shared_at.to_rfc3339().as_bytes());
        let hex = hasher.finalize().to_hex();
        Self(hex[..CODE_LENGTH].to_ascii_uppercase())
    }

    /// Parse a code typed by a user. Surrounding whitespace and case are
    /// ignored.
    pub fn parse(s: &str) -> Fallible<Self> {
        let s = s.trim();
        if s.len() != CODE_LENGTH || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ErrorReport::new(format!("Invalid share code: {s:?}")));
        }
        Ok(Self(s.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ShareCode {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for ShareCode {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.as_str()))
    }
}

impl FromSql for ShareCode {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let string: String = FromSql::column_result(value)?;
        ShareCode::parse(&string).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_generate() -> Fallible<()> {
        let at = Timestamp::new(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        let a = ShareCode::generate(1, "alice", at);
        let b = ShareCode::generate(2, "alice", at);
        assert_eq!(a.as_str().len(), 10);
        assert_ne!(a, b);
        assert_eq!(a, ShareCode::generate(1, "alice", at));
        // Generated codes survive a parse.
        assert_eq!(ShareCode::parse(a.as_str())?, a);
        Ok(())
    }

    #[test]
    fn test_parse() -> Fallible<()> {
        assert_eq!(ShareCode::parse("  abcdef0123 ")?.as_str(), "ABCDEF0123");
        assert!(ShareCode::parse("xyz").is_err());
        assert!(ShareCode::parse("ghijklmnop").is_err());
        Ok(())
    }
}
