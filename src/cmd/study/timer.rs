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

//! Session lifecycle and the background tasks that drive it: the quiz
//! countdown and the auto-advance that follows an answer.

use std::time::Duration;

use tokio::time::interval;
use tokio::time::sleep;

use crate::cmd::study::state::CardView;
use crate::cmd::study::state::MutableState;
use crate::cmd::study::state::ServerState;
use crate::session::engine::Advance;
use crate::session::engine::Session;
use crate::session::engine::TickOutcome;
use crate::types::mode::FinishReason;
use crate::types::mode::StudyMode;

/// Replace whatever session was running with a new one.
pub fn begin_session(state: &ServerState, mutable: &mut MutableState, session: Session) {
    mutable.cancel_tasks();
    if let Some(previous) = &mutable.session {
        if previous.is_active() {
            log::info!("Abandoning session on {}.", previous.deck_name());
        }
    }
    mutable.generation += 1;
    mutable.view = CardView::default();
    log::info!(
        "Starting {} session on {} ({} cards).",
        session.mode(),
        session.deck_name(),
        session.cards().len()
    );
    let is_quiz = session.mode() == StudyMode::Quiz;
    mutable.session = Some(session);
    if is_quiz {
        spawn_countdown(state, mutable);
    }
}

/// Finish the current session and write its history record. Does nothing if
/// there is no active session.
pub fn finish_session(state: &ServerState, mutable: &mut MutableState, reason: FinishReason) {
    let Some(session) = mutable.session.as_mut() else {
        return;
    };
    let Some(summary) = session.finish(reason) else {
        return;
    };
    mutable.cancel_tasks();
    mutable.view = CardView::default();
    log::info!("Session on {} finished: {}.", summary.deck_name, summary.reason);
    let record = summary.to_record(&state.identity.user_id);
    // The summary is shown whether or not the record could be saved.
    if let Err(e) = state.history.append_record(&record) {
        log::error!("failed to save session history: {e}");
        mutable.notice = Some(format!(
            "Could not save session history: {}",
            e.message()
        ));
    }
}

fn spawn_countdown(state: &ServerState, mutable: &mut MutableState) {
    let generation = mutable.generation;
    let task_state = state.clone();
    let handle = tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(1));
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if !on_tick(&task_state, generation) {
                break;
            }
        }
    });
    mutable.timer = Some(handle.abort_handle());
}

/// Returns whether the countdown should keep going.
fn on_tick(state: &ServerState, generation: u64) -> bool {
    let mut mutable = state.mutable.lock().unwrap();
    if mutable.generation != generation {
        return false;
    }
    let outcome = match mutable.session.as_mut() {
        Some(session) => session.tick(),
        None => TickOutcome::Idle,
    };
    match outcome {
        TickOutcome::Running(_) => true,
        TickOutcome::Expired => {
            mutable.timer = None;
            finish_session(state, &mut mutable, FinishReason::TimeUp);
            false
        }
        TickOutcome::Idle => {
            mutable.timer = None;
            false
        }
    }
}

/// Move on from an answered card once the feedback has been on screen for
/// the configured delay.
pub fn schedule_advance(state: &ServerState, mutable: &mut MutableState) {
    if let Some(advance) = mutable.advance.take() {
        advance.abort();
    }
    let delay = state.settings.feedback_delay;
    if delay.is_zero() {
        apply_advance(state, mutable);
        return;
    }
    let generation = mutable.generation;
    let task_state = state.clone();
    let handle = tokio::spawn(async move {
        sleep(delay).await;
        let mut mutable = task_state.mutable.lock().unwrap();
        if mutable.generation == generation {
            mutable.advance = None;
            apply_advance(&task_state, &mut mutable);
        }
    });
    mutable.advance = Some(handle.abort_handle());
}

fn apply_advance(state: &ServerState, mutable: &mut MutableState) {
    let advance = match mutable.session.as_mut() {
        Some(session) => session.complete_advance(),
        None => Advance::Skipped,
    };
    match advance {
        Advance::Moved => {
            mutable.view = CardView::default();
        }
        Advance::Exhausted => {
            finish_session(state, mutable, FinishReason::CardsExhausted);
        }
        Advance::Skipped => {}
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::config::StudySettings;
    use crate::db::Database;
    use crate::error::Fallible;
    use crate::error::fail;
    use crate::repo::HistoryRepository;
    use crate::repo::ProfileRepository;
    use crate::session::engine::SessionStatus;
    use crate::types::card::Card;
    use crate::types::history::SessionHistoryRecord;
    use crate::types::user::Identity;

    fn test_state(feedback_delay: Duration) -> Fallible<(ServerState, Database)> {
        let db = Database::new(":memory:")?;
        let identity = Identity {
            user_id: "alice".to_string(),
            display_name: "Alice".to_string(),
            email: String::new(),
        };
        db.upsert_user(&identity)?;
        let shared = Arc::new(db.clone());
        let state = ServerState {
            identity,
            settings: StudySettings {
                feedback_delay,
                distractors: 3,
            },
            decks: shared.clone(),
            history: shared.clone(),
            profiles: shared,
            mutable: Arc::new(Mutex::new(MutableState::default())),
        };
        Ok((state, db))
    }

    /// A history store whose writes always fail.
    #[derive(Default)]
    struct FailingHistory {
        attempts: AtomicUsize,
    }

    impl HistoryRepository for FailingHistory {
        fn append_record(&self, _record: &SessionHistoryRecord) -> Fallible<()> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            fail("disk full")
        }

        fn list_by_user(&self, _user_id: &str) -> Fallible<Vec<SessionHistoryRecord>> {
            Ok(Vec::new())
        }

        fn clear_all_for_user(&self, _user_id: &str) -> Fallible<usize> {
            Ok(0)
        }
    }

    fn quiz(timer: u32) -> Fallible<Session> {
        let cards = vec![Card::new("2+2", "4", None)?, Card::new("3+3", "6", None)?];
        Session::start(1, "Arithmetic", cards, StudyMode::Quiz, timer)
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_finishes_once() -> Fallible<()> {
        let (state, db) = test_state(Duration::ZERO)?;
        {
            let mut mutable = state.mutable.lock().unwrap();
            begin_session(&state, &mut mutable, quiz(10)?);
            assert!(mutable.timer.is_some());
        }
        sleep(Duration::from_secs(11)).await;
        {
            let mutable = state.mutable.lock().unwrap();
            assert!(mutable.timer.is_none());
            let session = mutable.session.as_ref().unwrap();
            assert_eq!(
                session.status(),
                SessionStatus::Finished(FinishReason::TimeUp)
            );
        }
        // Nothing more happens after expiry.
        sleep(Duration::from_secs(5)).await;
        let records = db.list_by_user("alice")?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].finish_reason, FinishReason::TimeUp);
        assert_eq!(records[0].score, Some(0));
        assert_eq!(records[0].total_questions, Some(0));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_cancels_previous_countdown() -> Fallible<()> {
        let (state, db) = test_state(Duration::ZERO)?;
        {
            let mut mutable = state.mutable.lock().unwrap();
            begin_session(&state, &mut mutable, quiz(10)?);
        }
        sleep(Duration::from_millis(5500)).await;
        {
            let mut mutable = state.mutable.lock().unwrap();
            begin_session(&state, &mut mutable, quiz(10)?);
        }
        sleep(Duration::from_millis(7500)).await;
        {
            let mutable = state.mutable.lock().unwrap();
            let session = mutable.session.as_ref().unwrap();
            // Only the new countdown is running: 7 of its 10 seconds are gone.
            assert!(session.is_active());
            assert_eq!(session.countdown().map(|c| c.remaining()), Some(3));
        }
        sleep(Duration::from_secs(4)).await;
        assert_eq!(db.list_by_user("alice")?.len(), 1);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_advance() -> Fallible<()> {
        let (state, db) = test_state(Duration::from_secs(2))?;
        {
            let mut mutable = state.mutable.lock().unwrap();
            begin_session(&state, &mut mutable, quiz(60)?);
            let session = mutable.session.as_mut().unwrap();
            session.record_answer("4");
            schedule_advance(&state, &mut mutable);
            assert_eq!(mutable.session.as_ref().unwrap().cursor(), 0);
        }
        sleep(Duration::from_millis(2500)).await;
        {
            let mut mutable = state.mutable.lock().unwrap();
            assert_eq!(mutable.session.as_ref().unwrap().cursor(), 1);
            let session = mutable.session.as_mut().unwrap();
            session.record_answer("6");
            schedule_advance(&state, &mut mutable);
        }
        sleep(Duration::from_millis(2500)).await;
        let records = db.list_by_user("alice")?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].finish_reason, FinishReason::CardsExhausted);
        assert_eq!(records[0].score, Some(2));
        assert_eq!(records[0].total_questions, Some(2));
        Ok(())
    }

    #[tokio::test]
    async fn test_manual_finish_records_once() -> Fallible<()> {
        let (state, db) = test_state(Duration::ZERO)?;
        let mut mutable = state.mutable.lock().unwrap();
        begin_session(&state, &mut mutable, quiz(60)?);
        finish_session(&state, &mut mutable, FinishReason::Manual);
        finish_session(&state, &mut mutable, FinishReason::Manual);
        assert!(mutable.timer.is_none());
        assert_eq!(db.list_by_user("alice")?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_history_failure_still_finishes() -> Fallible<()> {
        let (mut state, _db) = test_state(Duration::ZERO)?;
        let history = Arc::new(FailingHistory::default());
        state.history = history.clone();
        let mut mutable = state.mutable.lock().unwrap();
        begin_session(&state, &mut mutable, quiz(60)?);
        finish_session(&state, &mut mutable, FinishReason::Manual);
        let session = mutable.session.as_ref().unwrap();
        assert_eq!(
            session.status(),
            SessionStatus::Finished(FinishReason::Manual)
        );
        assert!(session.summary().is_some());
        assert!(mutable.timer.is_none());
        assert_eq!(
            mutable.notice.as_deref(),
            Some("Could not save session history: disk full")
        );
        // The write is not retried.
        finish_session(&state, &mut mutable, FinishReason::Manual);
        assert_eq!(history.attempts.load(Ordering::SeqCst), 1);
        Ok(())
    }
}
