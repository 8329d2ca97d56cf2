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

use axum::Form;
use axum::extract::State;
use axum::response::Redirect;
use serde::Deserialize;

use crate::cmd::study::state::CardView;
use crate::cmd::study::state::Feedback;
use crate::cmd::study::state::MutableState;
use crate::cmd::study::state::ServerState;
use crate::cmd::study::timer::begin_session;
use crate::cmd::study::timer::finish_session;
use crate::cmd::study::timer::schedule_advance;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::session::engine::AnswerOutcome;
use crate::session::engine::Navigation;
use crate::session::engine::Session;
use crate::types::deck::DeckId;
use crate::types::mode::FinishReason;
use crate::types::mode::StudyMode;
use crate::types::share_code::ShareCode;

#[derive(Deserialize)]
pub struct StartForm {
    deck_id: DeckId,
    mode: StudyMode,
    #[serde(default)]
    timer: String,
}

pub async fn start_handler(
    State(state): State<ServerState>,
    Form(form): Form<StartForm>,
) -> Redirect {
    match start_session(&state, form) {
        Ok(()) => Redirect::to("/study"),
        Err(e) => {
            log::debug!("not starting session: {e}");
            state.mutable.lock().unwrap().notice = Some(e.message().to_string());
            Redirect::to("/")
        }
    }
}

fn start_session(state: &ServerState, form: StartForm) -> Fallible<()> {
    let deck = state
        .decks
        .owned_deck(form.deck_id, &state.identity.user_id)?;
    let timer = match form.mode {
        StudyMode::Quiz => form.timer.trim().parse::<u32>().map_err(|_| {
            ErrorReport::new("Please enter a valid quiz timer (minimum 10 seconds).")
        })?,
        StudyMode::Flashcards => deck.default_timer_seconds,
    };
    let session = Session::start(deck.id, deck.name, deck.cards, form.mode, timer)?;
    let mut mutable = state.mutable.lock().unwrap();
    begin_session(state, &mut mutable, session);
    Ok(())
}

#[derive(Debug, Deserialize)]
enum Action {
    Flip,
    Previous,
    Next,
    Answer,
    Finish,
}

#[derive(Deserialize)]
pub struct StudyForm {
    action: Action,
    choice: Option<String>,
}

pub async fn study_handler(
    State(state): State<ServerState>,
    Form(form): Form<StudyForm>,
) -> Redirect {
    let mut mutable = state.mutable.lock().unwrap();
    action_handler(&state, &mut mutable, form);
    Redirect::to("/study")
}

fn action_handler(state: &ServerState, mutable: &mut MutableState, form: StudyForm) {
    let Some(session) = mutable.session.as_mut() else {
        return;
    };
    if !session.is_active() {
        return;
    }
    match form.action {
        Action::Flip => {
            let revealed = !mutable.view.revealed;
            let choices = if revealed {
                session.choices(state.settings.distractors, &mut rand::rng())
            } else {
                Vec::new()
            };
            mutable.view.revealed = revealed;
            mutable.view.choices = choices;
        }
        Action::Previous | Action::Next => {
            let navigation = match form.action {
                Action::Previous => session.go_previous(),
                _ => session.go_next(),
            };
            if navigation == Navigation::Moved {
                if let Some(advance) = mutable.advance.take() {
                    advance.abort();
                }
                mutable.view = CardView::default();
            }
            mutable.notice = navigation.message().map(str::to_string);
        }
        Action::Answer => {
            let Some(chosen) = form.choice else {
                return;
            };
            match session.record_answer(&chosen) {
                AnswerOutcome::Recorded { correct, answer } => {
                    mutable.view.choices.clear();
                    mutable.view.feedback = Some(Feedback {
                        correct,
                        chosen,
                        answer,
                    });
                    schedule_advance(state, mutable);
                }
                AnswerOutcome::Ignored => {}
            }
        }
        Action::Finish => {
            finish_session(state, mutable, FinishReason::Manual);
        }
    }
}

#[derive(Deserialize)]
pub struct ImportForm {
    code: String,
}

pub async fn import_handler(
    State(state): State<ServerState>,
    Form(form): Form<ImportForm>,
) -> Redirect {
    let message = match import(&state, &form.code) {
        Ok(name) => format!("Imported \"{name}\"."),
        Err(e) => e.message().to_string(),
    };
    state.mutable.lock().unwrap().notice = Some(message);
    Redirect::to("/")
}

fn import(state: &ServerState, code: &str) -> Fallible<String> {
    let code = ShareCode::parse(code)?;
    let deck_id = state.decks.import_deck(&code, &state.identity)?;
    let name = state
        .decks
        .get_deck(deck_id)?
        .map(|deck| deck.name)
        .unwrap_or_default();
    Ok(name)
}

pub async fn clear_history_handler(State(state): State<ServerState>) -> Redirect {
    let message = match state.history.clear_all_for_user(&state.identity.user_id) {
        Ok(0) => "No session history to clear.".to_string(),
        Ok(count) => format!("Cleared {count} sessions."),
        Err(e) => {
            log::error!("failed to clear history: {e}");
            e.message().to_string()
        }
    };
    state.mutable.lock().unwrap().notice = Some(message);
    Redirect::to("/profile")
}

#[derive(Deserialize)]
pub struct BioForm {
    bio: String,
}

pub async fn bio_handler(State(state): State<ServerState>, Form(form): Form<BioForm>) -> Redirect {
    let message = match state.profiles.set_bio(&state.identity.user_id, &form.bio) {
        Ok(()) => "Bio updated.".to_string(),
        Err(e) => e.message().to_string(),
    };
    state.mutable.lock().unwrap().notice = Some(message);
    Redirect::to("/profile")
}
