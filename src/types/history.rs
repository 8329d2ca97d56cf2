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

use crate::types::deck::DeckId;
use crate::types::mode::FinishReason;
use crate::types::mode::StudyMode;
use crate::types::timestamp::Timestamp;

/// A finished study session, as stored in the history. Records are written
/// once and never updated.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionHistoryRecord {
    pub user_id: String,
    pub deck_id: DeckId,
    pub deck_name: String,
    pub session_type: StudyMode,
    pub finish_reason: FinishReason,
    pub timestamp: Timestamp,
    /// Correct answers. Only present for quizzes.
    pub score: Option<u32>,
    /// Questions answered. Only present for quizzes.
    pub total_questions: Option<u32>,
}

impl SessionHistoryRecord {
    /// `Score: 3/4` for quizzes, `None` for flashcard sessions.
    pub fn score_label(&self) -> Option<String> {
        match (self.session_type, self.score, self.total_questions) {
            (StudyMode::Quiz, Some(score), Some(total)) => Some(format!("Score: {score}/{total}")),
            _ => None,
        }
    }
}
