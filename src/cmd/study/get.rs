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

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use maud::Markup;
use maud::html;

use crate::cmd::study::state::CardView;
use crate::cmd::study::state::ServerState;
use crate::cmd::study::template::notice;
use crate::cmd::study::template::page_template;
use crate::error::Fallible;
use crate::session::engine::Session;
use crate::session::engine::SessionStatus;
use crate::session::engine::SessionSummary;
use crate::types::deck::Deck;
use crate::types::deck::MIN_TIMER_SECONDS;
use crate::types::history::SessionHistoryRecord;
use crate::types::mode::StudyMode;

fn render(title: &str, result: Fallible<Markup>) -> (StatusCode, Html<String>) {
    match result {
        Ok(body) => (
            StatusCode::OK,
            Html(page_template(title, body).into_string()),
        ),
        Err(e) => {
            log::error!("{e}");
            let body = html! {
                div.error {
                    p { (e.message()) }
                    a href="/" { "Back to dashboard" }
                }
            };
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(page_template("Error", body).into_string()),
            )
        }
    }
}

pub async fn dashboard_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    render("Dashboard", dashboard(&state))
}

fn dashboard(state: &ServerState) -> Fallible<Markup> {
    let owned = state.decks.list_decks_by_owner(&state.identity.user_id)?;
    let shared: Vec<Deck> = state
        .decks
        .list_shared_decks()?
        .into_iter()
        .filter(|deck| deck.owner_id != state.identity.user_id)
        .collect();
    let (message, summary) = {
        let mut mutable = state.mutable.lock().unwrap();
        let summary = mutable
            .session
            .as_ref()
            .and_then(|session| session.summary())
            .cloned();
        (mutable.notice.take(), summary)
    };
    Ok(html! {
        div.dashboard {
            h1 { "Welcome, " (state.identity.attribution()) }
            (notice(message))
            @if let Some(summary) = &summary {
                div.summary {
                    h2 { "Last session" }
                    p { (summary.deck_name) ": " (summary.message()) }
                }
            }
            h2 { "Your decks" }
            @if owned.is_empty() {
                p.empty { "No decks yet. Create one with `flashwise deck create`." }
            }
            @for deck in &owned {
                (deck_row(deck))
            }
            h2 { "Shared decks" }
            @if shared.is_empty() {
                p.empty { "Nobody has shared a deck yet." }
            }
            @for deck in &shared {
                div.deck {
                    span.name { (deck.name) }
                    span.meta { "by " (deck.owner_display_name) ", " (deck.cards.len()) " cards" }
                    @if let Some(code) = &deck.share_code {
                        form action="/import" method="post" {
                            input type="hidden" name="code" value=(code.as_str());
                            input type="submit" value="Import";
                        }
                    }
                }
            }
            h2 { "Import by code" }
            form.import action="/import" method="post" {
                input type="text" name="code" placeholder="Share code" required;
                input type="submit" value="Import";
            }
        }
    })
}

fn deck_row(deck: &Deck) -> Markup {
    html! {
        div.deck {
            span.name { (deck.name) }
            span.meta { (deck.cards.len()) " cards, " (deck.visibility()) }
            form.start action="/start" method="post" {
                input type="hidden" name="deck_id" value=(deck.id);
                label {
                    input type="radio" name="mode" value="flashcards" checked;
                    "Flashcards"
                }
                label {
                    input type="radio" name="mode" value="quiz";
                    "Quiz"
                }
                label {
                    "Timer (s) "
                    input type="number" name="timer" min=(MIN_TIMER_SECONDS) value=(deck.default_timer_seconds);
                }
                input type="submit" value="Start";
            }
        }
    }
}

pub async fn study_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let mut mutable = state.mutable.lock().unwrap();
    let message = mutable.notice.take();
    let delay_ms = state.settings.feedback_delay_ms();
    let body = match &mutable.session {
        None => html! {
            div.finished {
                p { "No session in progress." }
                a href="/" { "Back to dashboard" }
            }
        },
        Some(session) => match (session.status(), session.summary()) {
            (SessionStatus::Finished(_), Some(summary)) => finished(summary, message),
            _ => card_page(session, &mutable.view, delay_ms, message),
        },
    };
    render("Study", Ok(body))
}

fn finished(summary: &SessionSummary, message: Option<String>) -> Markup {
    html! {
        div.finished {
            h1 { "Session Completed" }
            (notice(message))
            p { (summary.message()) }
            a href="/" { "Back to dashboard" }
        }
    }
}

fn card_page(
    session: &Session,
    view: &CardView,
    feedback_delay_ms: u64,
    message: Option<String>,
) -> Markup {
    let Some(current) = session.current_card() else {
        return html! {
            div.finished {
                p { "No cards to study." }
                a href="/" { "Back to dashboard" }
            }
        };
    };
    let progress = format!("{} / {}", session.cursor() + 1, session.cards().len());
    let is_quiz = session.mode() == StudyMode::Quiz;
    html! {
        div.root {
            div.card {
                div.header {
                    h1 { (session.deck_name()) }
                    div.progress { (progress) }
                    @if is_quiz {
                        div.score {
                            "Score: " (session.correct_count()) "/" (session.total_answered())
                        }
                        @if let Some(countdown) = session.countdown() {
                            div #timer data-remaining=(countdown.remaining()) { (countdown.display()) }
                        }
                    }
                }
                (notice(message))
                div.content {
                    div.question { p { (current.card.question) } }
                    @if view.revealed {
                        @if let Some(url) = &current.card.image_url {
                            img.card-image src=(url) alt="Card image";
                        }
                        div.answer { p { (current.card.answer) } }
                    }
                }
                @if let Some(feedback) = &view.feedback {
                    @if feedback.correct {
                        div.feedback.correct data-advance-ms=(feedback_delay_ms) { "Correct!" }
                    } @else {
                        div.feedback.incorrect data-advance-ms=(feedback_delay_ms) {
                            "Incorrect. You chose \"" (feedback.chosen) "\"; the answer is \"" (feedback.answer) "\"."
                        }
                    }
                } @else if is_quiz && current.answered {
                    div.feedback {
                        @if current.correct { "Answered correctly." } @else { "Answered incorrectly." }
                    }
                }
                @if !view.choices.is_empty() {
                    form.choices action="/study" method="post" {
                        input type="hidden" name="action" value="Answer";
                        @for choice in &view.choices {
                            button type="submit" name="choice" value=(choice) { (choice) }
                        }
                    }
                }
                div.controls {
                    form action="/study" method="post" {
                        input id="previous" type="submit" name="action" value="Previous";
                        input id="flip" type="submit" name="action" value="Flip";
                        input id="next" type="submit" name="action" value="Next";
                        div.spacer {}
                        input id="finish" type="submit" name="action" value="Finish";
                    }
                }
            }
        }
    }
}

pub async fn profile_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    render("Profile", profile(&state))
}

fn profile(state: &ServerState) -> Fallible<Markup> {
    let user_id = &state.identity.user_id;
    let profile = state.profiles.get_user(user_id)?;
    let decks = state.decks.list_decks_by_owner(user_id)?;
    let records = state.history.list_by_user(user_id)?;
    let message = state.mutable.lock().unwrap().notice.take();
    Ok(html! {
        div.profile {
            h1 { (state.identity.attribution()) }
            (notice(message))
            @if let Some(profile) = &profile {
                p.email { (profile.email) }
                p.bio { (profile.bio_or_placeholder()) }
                form action="/profile/bio" method="post" {
                    textarea name="bio" rows="3" { (profile.bio.clone().unwrap_or_default()) }
                    input type="submit" value="Save bio";
                }
            }
            h2 { "My decks" }
            @if decks.is_empty() {
                p.empty { "No decks yet." }
            }
            table.decks {
                @for deck in &decks {
                    tr {
                        td { (deck.name) }
                        td { (deck.cards.len()) " cards" }
                        td { (deck.visibility()) }
                        td { (deck.created_at.local_date()) }
                    }
                }
            }
            h2 { "Session history" }
            @if records.is_empty() {
                p.empty { "No sessions yet." }
            } @else {
                form action="/profile/clear" method="post" data-confirm="Are you sure you want to clear all session history? This cannot be undone." {
                    input type="submit" value="Clear history";
                }
            }
            table.history {
                @for record in &records {
                    (history_row(record))
                }
            }
        }
    })
}

fn history_row(record: &SessionHistoryRecord) -> Markup {
    html! {
        tr {
            td { (record.timestamp.local_datetime()) }
            td { (record.deck_name) }
            td { (record.session_type.label()) }
            td { (record.finish_reason.as_str()) }
            td { (record.score_label().unwrap_or_default()) }
        }
    }
}
