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

use rand::Rng;

use crate::error::Fallible;
use crate::error::fail;
use crate::session::choices::generate_choices;
use crate::session::countdown::Countdown;
use crate::session::countdown::Tick;
use crate::types::card::Card;
use crate::types::deck::DeckId;
use crate::types::deck::validate_timer;
use crate::types::history::SessionHistoryRecord;
use crate::types::mode::FinishReason;
use crate::types::mode::StudyMode;
use crate::types::timestamp::Timestamp;

/// A card as seen by one session. The flags are discarded when the session
/// ends.
#[derive(Clone, Debug)]
pub struct SessionCard {
    pub card: Card,
    pub answered: bool,
    pub correct: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionStatus {
    Active,
    Finished(FinishReason),
}

/// The result of moving the cursor.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Navigation {
    Moved,
    AtFirst,
    AtLast,
    /// The session is over.
    Inactive,
}

impl Navigation {
    /// What to tell the user, if anything.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Navigation::Moved | Navigation::Inactive => None,
            Navigation::AtFirst => Some("You are at the first card. Cannot go back further."),
            Navigation::AtLast => Some("You are at the last card. Click \"Finish\" when done."),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum AnswerOutcome {
    /// Carries the card's answer so callers can show it alongside the choice.
    Recorded { correct: bool, answer: String },
    /// Not a quiz, the card was already answered, or the session is over.
    Ignored,
}

/// What the auto-advance following an answer did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Advance {
    Moved,
    /// The answered card was the last one; the caller should finish the
    /// session with [`FinishReason::CardsExhausted`].
    Exhausted,
    /// Nothing was pending, or the user navigated away in the meantime.
    Skipped,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TickOutcome {
    Running(u32),
    /// Time is up; the caller should finish the session with
    /// [`FinishReason::TimeUp`].
    Expired,
    Idle,
}

/// How a session went, for display and for the history.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSummary {
    pub deck_id: DeckId,
    pub deck_name: String,
    pub mode: StudyMode,
    pub reason: FinishReason,
    pub correct_count: u32,
    pub total_answered: u32,
    pub finished_at: Timestamp,
}

impl SessionSummary {
    pub fn message(&self) -> String {
        match self.mode {
            StudyMode::Quiz => {
                let opening = match self.reason {
                    FinishReason::TimeUp => "Time's up! Session completed.",
                    FinishReason::CardsExhausted => "All cards answered! Session completed.",
                    FinishReason::NoCards => "No cards to study. Session completed.",
                    FinishReason::Manual => "Quiz finished manually!",
                };
                let (c, t) = (self.correct_count, self.total_answered);
                format!(
                    "{opening} You answered {c} out of {t} correctly. Your final score is {c}/{t}."
                )
            }
            StudyMode::Flashcards => "Session completed! Hope you learned something.".to_string(),
        }
    }

    /// The history record for this session. Quizzes carry the score,
    /// flashcard sessions do not.
    pub fn to_record(&self, user_id: &str) -> SessionHistoryRecord {
        let (score, total_questions) = match self.mode {
            StudyMode::Quiz => (Some(self.correct_count), Some(self.total_answered)),
            StudyMode::Flashcards => (None, None),
        };
        SessionHistoryRecord {
            user_id: user_id.to_string(),
            deck_id: self.deck_id,
            deck_name: self.deck_name.clone(),
            session_type: self.mode,
            finish_reason: self.reason,
            timestamp: self.finished_at,
            score,
            total_questions,
        }
    }
}

/// One run through a deck. Holds everything a session needs and nothing
/// about how it is displayed.
#[derive(Clone, Debug)]
pub struct Session {
    deck_id: DeckId,
    deck_name: String,
    mode: StudyMode,
    cards: Vec<SessionCard>,
    cursor: usize,
    correct_count: u32,
    total_answered: u32,
    countdown: Option<Countdown>,
    /// The index of a card answered but not yet advanced past.
    pending_advance: Option<usize>,
    status: SessionStatus,
    summary: Option<SessionSummary>,
}

impl Session {
    /// Start a session. Quizzes need a timer of at least ten seconds;
    /// flashcard sessions ignore `timer_seconds`.
    pub fn start(
        deck_id: DeckId,
        deck_name: impl Into<String>,
        cards: Vec<Card>,
        mode: StudyMode,
        timer_seconds: u32,
    ) -> Fallible<Self> {
        if cards.is_empty() {
            return fail("This deck has no cards to start a mode.");
        }
        let countdown = match mode {
            StudyMode::Quiz => Some(Countdown::new(validate_timer(timer_seconds)?)),
            StudyMode::Flashcards => None,
        };
        let cards = cards
            .into_iter()
            .map(|card| SessionCard {
                card,
                answered: false,
                correct: false,
            })
            .collect();
        Ok(Self {
            deck_id,
            deck_name: deck_name.into(),
            mode,
            cards,
            cursor: 0,
            correct_count: 0,
            total_answered: 0,
            countdown,
            pending_advance: None,
            status: SessionStatus::Active,
            summary: None,
        })
    }

    pub fn deck_name(&self) -> &str {
        &self.deck_name
    }

    pub fn mode(&self) -> StudyMode {
        self.mode
    }

    pub fn cards(&self) -> &[SessionCard] {
        &self.cards
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    pub fn total_answered(&self) -> u32 {
        self.total_answered
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    pub fn countdown(&self) -> Option<&Countdown> {
        self.countdown.as_ref()
    }

    /// Present once the session has finished.
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    pub fn current_card(&self) -> Option<&SessionCard> {
        self.cards.get(self.cursor)
    }

    pub fn is_last_card(&self) -> bool {
        self.cursor + 1 >= self.cards.len()
    }

    pub fn go_previous(&mut self) -> Navigation {
        if !self.is_active() {
            return Navigation::Inactive;
        }
        if self.cursor == 0 {
            return Navigation::AtFirst;
        }
        self.cursor -= 1;
        self.pending_advance = None;
        Navigation::Moved
    }

    pub fn go_next(&mut self) -> Navigation {
        if !self.is_active() {
            return Navigation::Inactive;
        }
        if self.is_last_card() {
            return Navigation::AtLast;
        }
        self.cursor += 1;
        self.pending_advance = None;
        Navigation::Moved
    }

    /// Multiple-choice options for the current card. Empty outside quiz
    /// mode or once the card has been answered.
    pub fn choices<R>(&self, distractors: usize, rng: &mut R) -> Vec<String>
    where
        R: Rng + ?Sized,
    {
        if self.mode != StudyMode::Quiz || !self.is_active() {
            return Vec::new();
        }
        match self.current_card() {
            Some(current) if !current.answered => generate_choices(
                &current.card.answer,
                self.cards.iter().map(|c| c.card.answer.as_str()),
                distractors,
                rng,
            ),
            _ => Vec::new(),
        }
    }

    /// Score an answer to the current card. Each card can be scored once;
    /// later calls are ignored. On success the session waits for
    /// [`Session::complete_advance`].
    pub fn record_answer(&mut self, chosen: &str) -> AnswerOutcome {
        if self.mode != StudyMode::Quiz || !self.is_active() {
            return AnswerOutcome::Ignored;
        }
        let cursor = self.cursor;
        let Some(current) = self.cards.get_mut(cursor) else {
            return AnswerOutcome::Ignored;
        };
        if current.answered {
            return AnswerOutcome::Ignored;
        }
        let correct = chosen == current.card.answer;
        current.answered = true;
        current.correct = correct;
        let answer = current.card.answer.clone();
        self.total_answered += 1;
        if correct {
            self.correct_count += 1;
        }
        self.pending_advance = Some(cursor);
        AnswerOutcome::Recorded { correct, answer }
    }

    /// Run the advance scheduled by the last answer.
    pub fn complete_advance(&mut self) -> Advance {
        if !self.is_active() {
            return Advance::Skipped;
        }
        match self.pending_advance.take() {
            Some(index) if index == self.cursor => {
                if self.is_last_card() {
                    Advance::Exhausted
                } else {
                    self.cursor += 1;
                    Advance::Moved
                }
            }
            _ => Advance::Skipped,
        }
    }

    /// Count the quiz clock down by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_active() {
            return TickOutcome::Idle;
        }
        match self.countdown.as_mut().map(|c| c.tick()) {
            Some(Tick::Running(remaining)) => TickOutcome::Running(remaining),
            Some(Tick::Expired) => TickOutcome::Expired,
            Some(Tick::Stopped) | None => TickOutcome::Idle,
        }
    }

    /// End the session. Returns the summary the first time; a session that
    /// has already finished returns `None` and is left as it was.
    pub fn finish(&mut self, reason: FinishReason) -> Option<SessionSummary> {
        if !self.is_active() {
            return None;
        }
        let reason = if self.cards.is_empty() {
            FinishReason::NoCards
        } else {
            reason
        };
        if let Some(countdown) = self.countdown.as_mut() {
            countdown.stop();
        }
        self.pending_advance = None;
        self.status = SessionStatus::Finished(reason);
        let summary = SessionSummary {
            deck_id: self.deck_id,
            deck_name: self.deck_name.clone(),
            mode: self.mode,
            reason,
            correct_count: self.correct_count,
            total_answered: self.total_answered,
            finished_at: Timestamp::now(),
        };
        self.summary = Some(summary.clone());
        Some(summary)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn arithmetic() -> Vec<Card> {
        vec![
            Card::new("2+2", "4", None).unwrap(),
            Card::new("3+3", "6", None).unwrap(),
        ]
    }

    fn three_cards() -> Vec<Card> {
        vec![
            Card::new("a", "1", None).unwrap(),
            Card::new("b", "2", None).unwrap(),
            Card::new("c", "3", None).unwrap(),
        ]
    }

    fn assert_invariants(session: &Session) {
        assert!(session.cursor() < session.cards().len());
        assert!(session.correct_count() <= session.total_answered());
        assert!(session.total_answered() as usize <= session.cards().len());
    }

    #[test]
    fn test_start_rejects_empty_deck() {
        let err = Session::start(1, "Empty", vec![], StudyMode::Quiz, 60).unwrap_err();
        assert_eq!(err.message(), "This deck has no cards to start a mode.");
    }

    #[test]
    fn test_start_rejects_short_quiz_timer() {
        assert!(Session::start(1, "Deck", arithmetic(), StudyMode::Quiz, 5).is_err());
        // Flashcards have no timer, so the value does not matter.
        assert!(Session::start(1, "Deck", arithmetic(), StudyMode::Flashcards, 0).is_ok());
    }

    #[test]
    fn test_start_points_at_first_card() -> Fallible<()> {
        let session = Session::start(1, "Deck", arithmetic(), StudyMode::Quiz, 60)?;
        let current = session.current_card().unwrap();
        assert_eq!(current.card.question, "2+2");
        assert!(!current.answered);
        assert!(!current.correct);
        assert_eq!(session.countdown().map(|c| c.remaining()), Some(60));
        assert!(session.is_active());
        assert_invariants(&session);

        let session = Session::start(1, "Deck", arithmetic(), StudyMode::Flashcards, 60)?;
        assert!(session.countdown().is_none());
        Ok(())
    }

    #[test]
    fn test_navigation_is_clamped() -> Fallible<()> {
        let mut session = Session::start(1, "Deck", three_cards(), StudyMode::Flashcards, 0)?;
        assert_eq!(session.go_previous(), Navigation::AtFirst);
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.go_next(), Navigation::Moved);
        assert_eq!(session.go_next(), Navigation::Moved);
        assert_eq!(session.cursor(), 2);
        assert_eq!(session.go_next(), Navigation::AtLast);
        assert_eq!(session.cursor(), 2);
        assert_eq!(session.go_previous(), Navigation::Moved);
        assert_eq!(session.cursor(), 1);
        assert_invariants(&session);
        Ok(())
    }

    #[test]
    fn test_boundary_messages_differ() {
        assert_ne!(Navigation::AtFirst.message(), Navigation::AtLast.message());
        assert!(Navigation::AtLast.message().unwrap().contains("Finish"));
        assert_eq!(Navigation::Moved.message(), None);
    }

    #[test]
    fn test_double_answer_is_ignored() -> Fallible<()> {
        let mut session = Session::start(1, "Deck", arithmetic(), StudyMode::Quiz, 60)?;
        assert_eq!(
            session.record_answer("5"),
            AnswerOutcome::Recorded {
                correct: false,
                answer: "4".to_string()
            }
        );
        assert_eq!(session.record_answer("4"), AnswerOutcome::Ignored);
        assert_eq!(session.total_answered(), 1);
        assert_eq!(session.correct_count(), 0);
        assert!(!session.current_card().unwrap().correct);
        assert_invariants(&session);
        Ok(())
    }

    #[test]
    fn test_answers_ignored_in_flashcard_mode() -> Fallible<()> {
        let mut session = Session::start(1, "Deck", arithmetic(), StudyMode::Flashcards, 0)?;
        assert_eq!(session.record_answer("4"), AnswerOutcome::Ignored);
        assert_eq!(session.total_answered(), 0);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(session.choices(3, &mut rng).is_empty());
        Ok(())
    }

    #[test]
    fn test_choices_for_current_card() -> Fallible<()> {
        let mut session = Session::start(1, "Deck", arithmetic(), StudyMode::Quiz, 60)?;
        let mut rng = StdRng::seed_from_u64(5);
        let choices = session.choices(3, &mut rng);
        assert_eq!(choices.len(), 4);
        assert!(choices.contains(&"4".to_string()));
        session.record_answer("4");
        assert!(session.choices(3, &mut rng).is_empty());
        Ok(())
    }

    #[test]
    fn test_navigation_cancels_pending_advance() -> Fallible<()> {
        let mut session = Session::start(1, "Deck", three_cards(), StudyMode::Quiz, 60)?;
        session.record_answer("1");
        assert!(session.pending_advance.is_some());
        assert_eq!(session.go_next(), Navigation::Moved);
        assert!(session.pending_advance.is_none());
        assert_eq!(session.complete_advance(), Advance::Skipped);
        assert_eq!(session.cursor(), 1);
        Ok(())
    }

    #[test]
    fn test_tick_expires_once() -> Fallible<()> {
        let mut session = Session::start(1, "Deck", arithmetic(), StudyMode::Quiz, 10)?;
        for remaining in (1..10).rev() {
            assert_eq!(session.tick(), TickOutcome::Running(remaining));
        }
        assert_eq!(session.tick(), TickOutcome::Expired);
        assert_eq!(session.tick(), TickOutcome::Idle);
        assert!(session.finish(FinishReason::TimeUp).is_some());
        assert!(session.finish(FinishReason::TimeUp).is_none());
        assert_eq!(session.tick(), TickOutcome::Idle);
        Ok(())
    }

    #[test]
    fn test_flashcard_sessions_do_not_tick() -> Fallible<()> {
        let mut session = Session::start(1, "Deck", arithmetic(), StudyMode::Flashcards, 0)?;
        assert_eq!(session.tick(), TickOutcome::Idle);
        Ok(())
    }

    #[test]
    fn test_finish_stops_everything() -> Fallible<()> {
        let mut session = Session::start(3, "Deck", three_cards(), StudyMode::Quiz, 60)?;
        session.record_answer("1");
        let summary = session.finish(FinishReason::Manual).unwrap();
        assert_eq!(summary.correct_count, 1);
        assert_eq!(summary.total_answered, 1);
        assert_eq!(session.status(), SessionStatus::Finished(FinishReason::Manual));
        assert_eq!(session.tick(), TickOutcome::Idle);
        assert_eq!(session.complete_advance(), Advance::Skipped);
        assert_eq!(session.go_next(), Navigation::Inactive);
        assert_eq!(session.record_answer("2"), AnswerOutcome::Ignored);
        assert_eq!(session.summary(), Some(&summary));
        Ok(())
    }

    #[test]
    fn test_summary_messages() -> Fallible<()> {
        let mut quiz = Session::start(1, "Deck", arithmetic(), StudyMode::Quiz, 60)?;
        quiz.record_answer("4");
        let summary = quiz.finish(FinishReason::TimeUp).unwrap();
        assert_eq!(
            summary.message(),
            "Time's up! Session completed. You answered 1 out of 1 correctly. Your final score is 1/1."
        );
        let record = summary.to_record("u1");
        assert_eq!(record.score, Some(1));
        assert_eq!(record.total_questions, Some(1));
        assert_eq!(record.finish_reason, FinishReason::TimeUp);

        let mut cards = Session::start(1, "Deck", arithmetic(), StudyMode::Flashcards, 0)?;
        let summary = cards.finish(FinishReason::Manual).unwrap();
        assert_eq!(
            summary.message(),
            "Session completed! Hope you learned something."
        );
        let record = summary.to_record("u1");
        assert_eq!(record.score, None);
        assert_eq!(record.total_questions, None);
        assert_eq!(record.session_type, StudyMode::Flashcards);
        Ok(())
    }

    /// Two cards, both answered correctly, ending on the last card.
    #[test]
    fn test_quiz_walkthrough() -> Fallible<()> {
        let mut rng = StdRng::seed_from_u64(2);
        let mut session = Session::start(1, "Arithmetic", arithmetic(), StudyMode::Quiz, 60)?;
        assert_eq!(session.current_card().unwrap().card.question, "2+2");

        let choices = session.choices(3, &mut rng);
        assert!(choices.contains(&"4".to_string()));
        assert_eq!(
            session.record_answer("4"),
            AnswerOutcome::Recorded {
                correct: true,
                answer: "4".to_string()
            }
        );
        assert_eq!(session.correct_count(), 1);
        assert_eq!(session.total_answered(), 1);
        assert_eq!(session.complete_advance(), Advance::Moved);
        assert_eq!(session.current_card().unwrap().card.question, "3+3");
        assert_invariants(&session);

        assert_eq!(
            session.record_answer("6"),
            AnswerOutcome::Recorded {
                correct: true,
                answer: "6".to_string()
            }
        );
        assert_eq!(session.correct_count(), 2);
        assert_eq!(session.total_answered(), 2);
        assert_eq!(session.complete_advance(), Advance::Exhausted);
        let summary = session.finish(FinishReason::CardsExhausted).unwrap();
        let record = summary.to_record("u1");
        assert_eq!(record.score, Some(2));
        assert_eq!(record.total_questions, Some(2));
        assert_eq!(record.deck_name, "Arithmetic");
        assert_invariants(&session);
        Ok(())
    }
}
