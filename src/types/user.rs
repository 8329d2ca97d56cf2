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

use crate::types::timestamp::Timestamp;

/// The signed-in user, as supplied by the identity provider. The session
/// engine only uses this to attribute history records.
#[derive(Clone, Debug, PartialEq)]
pub struct Identity {
    pub user_id: String,
    pub display_name: String,
    pub email: String,
}

impl Identity {
    /// The name shown on decks this user creates or imports.
    pub fn attribution(&self) -> &str {
        if self.display_name.is_empty() {
            &self.email
        } else {
            &self.display_name
        }
    }
}

#[derive(Clone, Debug)]
pub struct UserProfile {
    pub user_id: String,
    pub display_name: String,
    pub email: String,
    pub bio: Option<String>,
    pub created_at: Timestamp,
}

impl UserProfile {
    pub fn bio_or_placeholder(&self) -> &str {
        match &self.bio {
            Some(bio) if !bio.is_empty() => bio,
            _ => "No bio yet.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribution_falls_back_to_email() {
        let mut identity = Identity {
            user_id: "u1".to_string(),
            display_name: "".to_string(),
            email: "a@example.com".to_string(),
        };
        assert_eq!(identity.attribution(), "a@example.com");
        identity.display_name = "Alice".to_string();
        assert_eq!(identity.attribution(), "Alice");
    }
}
