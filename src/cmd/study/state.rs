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

use tokio::task::AbortHandle;

use crate::config::StudySettings;
use crate::library::Library;
use crate::repo::DeckRepository;
use crate::repo::HistoryRepository;
use crate::repo::ProfileRepository;
use crate::session::engine::Session;
use crate::types::user::Identity;

#[derive(Clone)]
pub struct ServerState {
    pub identity: Identity,
    pub settings: StudySettings,
    pub decks: Arc<dyn DeckRepository>,
    pub history: Arc<dyn HistoryRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub mutable: Arc<Mutex<MutableState>>,
}

impl ServerState {
    pub fn new(library: &Library) -> Self {
        let db = Arc::new(library.db.clone());
        Self {
            identity: library.identity.clone(),
            settings: library.config.settings(),
            decks: db.clone(),
            history: db.clone(),
            profiles: db,
            mutable: Arc::new(Mutex::new(MutableState::default())),
        }
    }
}

#[derive(Default)]
pub struct MutableState {
    /// The current session, or the last one once it has finished.
    pub session: Option<Session>,
    pub view: CardView,
    /// A message shown once on the next page load.
    pub notice: Option<String>,
    /// Bumped on every session start. Background tasks carry the value they
    /// were spawned with and stop when it no longer matches.
    pub generation: u64,
    pub timer: Option<AbortHandle>,
    pub advance: Option<AbortHandle>,
}

impl MutableState {
    pub fn cancel_tasks(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        if let Some(advance) = self.advance.take() {
            advance.abort();
        }
    }
}

/// How the current card is shown. None of this is session state.
#[derive(Default)]
pub struct CardView {
    pub revealed: bool,
    pub choices: Vec<String>,
    pub feedback: Option<Feedback>,
}

pub struct Feedback {
    pub correct: bool,
    pub chosen: String,
    pub answer: String,
}
