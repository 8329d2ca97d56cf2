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

use clap::Parser;
use clap::Subcommand;

use crate::cmd::card::add_card;
use crate::cmd::card::delete_card;
use crate::cmd::card::edit_card;
use crate::cmd::deck::create_deck;
use crate::cmd::deck::delete_deck;
use crate::cmd::deck::edit_deck;
use crate::cmd::deck::list_decks;
use crate::cmd::deck::show_deck;
use crate::cmd::history::clear_history;
use crate::cmd::history::print_history;
use crate::cmd::profile::print_profile;
use crate::cmd::profile::set_bio;
use crate::cmd::share::import_deck;
use crate::cmd::share::list_shared_decks;
use crate::cmd::share::share_deck;
use crate::cmd::share::unshare_deck;
use crate::cmd::study::server::start_server;
use crate::error::Fallible;
use crate::library::Library;
use crate::prompt::AssumeYes;
use crate::prompt::Prompter;
use crate::prompt::TerminalPrompter;
use crate::types::deck::DEFAULT_TIMER_SECONDS;
use crate::types::deck::DeckId;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the data directory. Defaults to the current directory.
    #[arg(long, global = true)]
    directory: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the study server.
    Serve {
        /// Port to listen on. Overrides the config file.
        #[arg(long)]
        port: Option<u16>,
        /// Don't open the browser.
        #[arg(long)]
        no_open: bool,
    },
    /// Manage decks.
    Deck {
        #[command(subcommand)]
        command: DeckCommand,
    },
    /// Manage the cards in a deck.
    Card {
        #[command(subcommand)]
        command: CardCommand,
    },
    /// Offer a deck for import by other users.
    Share { deck_id: DeckId },
    /// Stop offering a deck for import.
    Unshare { deck_id: DeckId },
    /// List the decks offered for import.
    Shared,
    /// Copy a shared deck into your collection.
    Import { code: String },
    /// Show or clear your session history.
    History {
        /// Delete all history.
        #[arg(long)]
        clear: bool,
        /// Don't ask for confirmation.
        #[arg(long)]
        yes: bool,
    },
    /// Show your profile.
    Profile {
        /// Set your bio. An empty string removes it.
        #[arg(long)]
        bio: Option<String>,
    },
}

#[derive(Subcommand)]
enum DeckCommand {
    /// Create an empty deck.
    Create {
        name: String,
        /// Default quiz timer, in seconds.
        #[arg(long, default_value_t = DEFAULT_TIMER_SECONDS)]
        timer: u32,
    },
    /// List your decks.
    List,
    /// Show a deck and its cards.
    Show { deck_id: DeckId },
    /// Rename or retime a deck.
    Edit {
        deck_id: DeckId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        timer: Option<u32>,
    },
    /// Delete a deck.
    Delete {
        deck_id: DeckId,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum CardCommand {
    /// Add a card to the end of a deck.
    Add {
        deck_id: DeckId,
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer: String,
        #[arg(long)]
        image: Option<String>,
    },
    /// Change a card. Numbers start at 1.
    Edit {
        deck_id: DeckId,
        number: usize,
        #[arg(long)]
        question: Option<String>,
        #[arg(long)]
        answer: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },
    /// Delete a card. Numbers start at 1.
    Delete {
        deck_id: DeckId,
        number: usize,
        #[arg(long)]
        yes: bool,
    },
}

fn prompter(yes: bool) -> Box<dyn Prompter> {
    if yes {
        Box::new(AssumeYes)
    } else {
        Box::new(TerminalPrompter::stdio())
    }
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Cli = Cli::parse();
    let library = Library::new(cli.directory)?;
    match cli.command {
        Command::Serve { port, no_open } => {
            let port = port.unwrap_or(library.config.server.port);
            let open_browser = library.config.server.open_browser && !no_open;
            start_server(library, port, open_browser).await
        }
        Command::Deck { command } => match command {
            DeckCommand::Create { name, timer } => {
                create_deck(&library, &name, timer)?;
                Ok(())
            }
            DeckCommand::List => list_decks(&library),
            DeckCommand::Show { deck_id } => show_deck(&library, deck_id),
            DeckCommand::Edit {
                deck_id,
                name,
                timer,
            } => edit_deck(&library, deck_id, name.as_deref(), timer),
            DeckCommand::Delete { deck_id, yes } => {
                delete_deck(&library, deck_id, prompter(yes).as_mut())?;
                Ok(())
            }
        },
        Command::Card { command } => match command {
            CardCommand::Add {
                deck_id,
                question,
                answer,
                image,
            } => add_card(&library, deck_id, &question, &answer, image),
            CardCommand::Edit {
                deck_id,
                number,
                question,
                answer,
                image,
            } => edit_card(
                &library,
                deck_id,
                number,
                question.as_deref(),
                answer.as_deref(),
                image,
            ),
            CardCommand::Delete {
                deck_id,
                number,
                yes,
            } => {
                delete_card(&library, deck_id, number, prompter(yes).as_mut())?;
                Ok(())
            }
        },
        Command::Share { deck_id } => {
            share_deck(&library, deck_id)?;
            Ok(())
        }
        Command::Unshare { deck_id } => unshare_deck(&library, deck_id),
        Command::Shared => list_shared_decks(&library),
        Command::Import { code } => {
            import_deck(&library, &code)?;
            Ok(())
        }
        Command::History { clear, yes } => {
            if clear {
                clear_history(&library, prompter(yes).as_mut())?;
                Ok(())
            } else {
                print_history(&library)
            }
        }
        Command::Profile { bio } => match bio {
            Some(bio) => set_bio(&library, &bio),
            None => print_profile(&library),
        },
    }
}
