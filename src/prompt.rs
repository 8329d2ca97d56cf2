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

//! Asking the user something and getting an answer back as a value.
//!
//! Commands that need a confirmation describe it as a
//! [`Prompt`] and hand it to a [`Prompter`]. The reply comes back as the
//! return value, so the caller continues in straight-line code.

use std::io::BufRead;
use std::io::Write;

use crate::error::Fallible;

#[derive(Clone, Debug, PartialEq)]
pub enum Prompt {
    Confirm { title: String, message: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    Confirmed,
    Cancelled,
}

pub trait Prompter {
    fn ask(&mut self, prompt: &Prompt) -> Fallible<Reply>;
}

/// Ask for a yes/no confirmation.
pub fn confirm(prompter: &mut dyn Prompter, title: &str, message: &str) -> Fallible<bool> {
    let prompt = Prompt::Confirm {
        title: title.to_string(),
        message: message.to_string(),
    };
    Ok(prompter.ask(&prompt)? == Reply::Confirmed)
}

/// Prompts on a terminal, or anything that looks like one.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> Fallible<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl TerminalPrompter<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn ask(&mut self, prompt: &Prompt) -> Fallible<Reply> {
        match prompt {
            Prompt::Confirm { title, message } => {
                write!(self.output, "{title}: {message} [y/N] ")?;
                self.output.flush()?;
                let reply = match self.read_line()? {
                    Some(line) if matches!(line.to_lowercase().as_str(), "y" | "yes") => {
                        Reply::Confirmed
                    }
                    _ => Reply::Cancelled,
                };
                Ok(reply)
            }
        }
    }
}

/// Says yes to every confirmation. Used for `--yes`.
pub struct AssumeYes;

impl Prompter for AssumeYes {
    fn ask(&mut self, prompt: &Prompt) -> Fallible<Reply> {
        match prompt {
            Prompt::Confirm { .. } => Ok(Reply::Confirmed),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn terminal(input: &str) -> TerminalPrompter<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalPrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_confirm() -> Fallible<()> {
        assert!(confirm(&mut terminal("y\n"), "Delete", "Sure?")?);
        assert!(confirm(&mut terminal("YES\n"), "Delete", "Sure?")?);
        assert!(!confirm(&mut terminal("n\n"), "Delete", "Sure?")?);
        assert!(!confirm(&mut terminal("\n"), "Delete", "Sure?")?);
        // End of input counts as a no.
        assert!(!confirm(&mut terminal(""), "Delete", "Sure?")?);
        Ok(())
    }

    #[test]
    fn test_confirm_output() -> Fallible<()> {
        let mut prompter = terminal("y\n");
        confirm(&mut prompter, "Delete Deck", "Really?")?;
        let output = String::from_utf8(prompter.output).unwrap();
        assert_eq!(output, "Delete Deck: Really? [y/N] ");
        Ok(())
    }

    #[test]
    fn test_assume_yes() -> Fallible<()> {
        assert!(confirm(&mut AssumeYes, "Delete", "Sure?")?);
        Ok(())
    }
}
