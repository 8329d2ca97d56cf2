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

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;

/// Questions longer than this are truncated in deck listings.
const SUMMARY_LENGTH: usize = 50;

/// A question/answer pair. Cards live inside a deck's card list and have no
/// identity beyond their position in it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Card {
    /// Build a card from user input. The question and answer are trimmed and
    /// must not be empty. A blank image URL is treated as no image.
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        image_url: Option<String>,
    ) -> Fallible<Self> {
        let question = question.into().trim().to_string();
        let answer = answer.into().trim().to_string();
        if question.is_empty() || answer.is_empty() {
            return fail("Question and Answer fields cannot be empty.");
        }
        let image_url = image_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        Ok(Self {
            question,
            answer,
            image_url,
        })
    }

    /// One-line summary used when listing the cards of a deck.
    pub fn summary(&self, index: usize) -> String {
        let mut question: String = self.question.chars().take(SUMMARY_LENGTH).collect();
        if self.question.chars().count() > SUMMARY_LENGTH {
            question.push_str("...");
        }
        let mut line = format!("Card {}: {}", index + 1, question);
        if self.image_url.is_some() {
            line.push_str(" [image]");
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims() -> Fallible<()> {
        let card = Card::new("  2+2 ", " 4\n", Some("   ".to_string()))?;
        assert_eq!(card.question, "2+2");
        assert_eq!(card.answer, "4");
        assert_eq!(card.image_url, None);
        Ok(())
    }

    #[test]
    fn test_new_rejects_empty() {
        let err = Card::new("", "4", None).unwrap_err();
        assert_eq!(err.message(), "Question and Answer fields cannot be empty.");
        assert!(Card::new("2+2", "   ", None).is_err());
    }

    #[test]
    fn test_summary() -> Fallible<()> {
        let card = Card::new("a".repeat(60), "b", Some("http://x/y.png".to_string()))?;
        assert_eq!(
            card.summary(0),
            format!("Card 1: {}... [image]", "a".repeat(50))
        );
        let card = Card::new("What is 2+2?", "4", None)?;
        assert_eq!(card.summary(4), "Card 5: What is 2+2?");
        Ok(())
    }

    #[test]
    fn test_json_shape() -> Fallible<()> {
        let card = Card::new("q", "a", Some("http://img".to_string()))?;
        let json = serde_json::to_string(&card)?;
        assert_eq!(json, r#"{"question":"q","answer":"a","imageUrl":"http://img"}"#);
        let card = Card::new("q", "a", None)?;
        let json = serde_json::to_string(&card)?;
        assert_eq!(json, r#"{"question":"q","answer":"a"}"#);
        Ok(())
    }
}
