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
use rand::seq::SliceRandom;

/// Generic words used to pad the choices when a deck does not have enough
/// distinct answers of its own.
pub const FILLER_WORDS: [&str; 50] = [
    "apple", "banana", "cat", "dog", "house", "tree", "river", "mountain", "cloud", "sun",
    "moon", "star", "car", "bike", "book", "pen", "table", "chair", "water", "fire", "bird",
    "fish", "flower", "grass", "stone", "metal", "wood", "glass", "paper", "cloth", "music",
    "dance", "sport", "game", "smile", "laugh", "cry", "sleep", "dream", "walk", "run", "jump",
    "sing", "talk", "listen", "read", "write", "think", "learn", "teach",
];

/// Build the multiple-choice options for a card.
///
/// The result contains `correct` exactly once, plus up to `distractors`
/// other unique strings. Distractors are drawn from the other answers in the
/// session first, then from [`FILLER_WORDS`]. If both sources run dry the
/// result is shorter than `distractors + 1`; callers must cope with that.
/// The order is shuffled so the correct answer's position says nothing.
pub fn generate_choices<'a, R>(
    correct: &str,
    answers: impl IntoIterator<Item = &'a str>,
    distractors: usize,
    rng: &mut R,
) -> Vec<String>
where
    R: Rng + ?Sized,
{
    let mut domain: Vec<&str> = Vec::new();
    for answer in answers {
        if answer != correct && !domain.contains(&answer) {
            domain.push(answer);
        }
    }

    let fallback = FILLER_WORDS
        .iter()
        .copied()
        .filter(|word| *word != correct && !domain.contains(word));

    let mut pool: Vec<&str> = domain.iter().copied().chain(fallback).collect();
    pool.shuffle(rng);

    let wanted = distractors + 1;
    let mut choices: Vec<String> = vec![correct.to_string()];
    for entry in pool {
        if choices.len() >= wanted {
            break;
        }
        if !choices.iter().any(|c| c == entry) {
            choices.push(entry.to_string());
        }
    }

    choices.shuffle(rng);
    choices
}
