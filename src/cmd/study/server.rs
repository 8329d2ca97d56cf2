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

use std::time::Duration;

use axum::Router;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::time::sleep;

use crate::cmd::study::get::dashboard_handler;
use crate::cmd::study::get::profile_handler;
use crate::cmd::study::get::study_handler;
use crate::cmd::study::post::bio_handler;
use crate::cmd::study::post::clear_history_handler;
use crate::cmd::study::post::import_handler;
use crate::cmd::study::post::start_handler;
use crate::cmd::study::post::study_handler as action_handler;
use crate::cmd::study::state::ServerState;
use crate::error::Fallible;
use crate::library::Library;

pub async fn start_server(library: Library, port: u16, open_browser: bool) -> Fallible<()> {
    let host = library.config.server.host.clone();
    let state = ServerState::new(&library);
    let app = router(state);
    let bind = format!("{host}:{port}");

    if open_browser {
        // Start a separate task to open the browser.
        let url = format!("http://{bind}/");
        let target = bind.clone();
        tokio::spawn(async move {
            loop {
                if let Ok(stream) = TcpStream::connect(&target).await {
                    drop(stream);
                    break;
                }
                sleep(Duration::from_millis(1)).await;
            }
            let _ = open::that(url);
        });
    }

    log::info!("Serving {} on http://{bind}/", library.directory.display());
    let listener = TcpListener::bind(&bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn router(state: ServerState) -> Router {
    let app = Router::new();
    let app = app.route("/", get(dashboard_handler));
    let app = app.route("/start", post(start_handler));
    let app = app.route("/study", get(study_handler));
    let app = app.route("/study", post(action_handler));
    let app = app.route("/import", post(import_handler));
    let app = app.route("/profile", get(profile_handler));
    let app = app.route("/profile/bio", post(bio_handler));
    let app = app.route("/profile/clear", post(clear_history_handler));
    let app = app.route("/script.js", get(script));
    let app = app.route("/style.css", get(stylesheet));
    let app = app.fallback(not_found_handler);
    app.with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down.");
}

async fn script() -> (StatusCode, [(HeaderName, &'static str); 1], &'static [u8]) {
    let bytes = include_bytes!("script.js");
    (StatusCode::OK, [(CONTENT_TYPE, "text/javascript")], bytes)
}

async fn stylesheet() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, "public, max-age=604800, immutable"),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}
