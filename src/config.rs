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

use std::fs::read_to_string;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::user::Identity;

pub const CONFIG_FILE: &str = "flashwise.toml";

/// The contents of `flashwise.toml`. Every field is optional.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub study: StudyConfig,
    pub user: UserConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            open_browser: true,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StudyConfig {
    /// How long answer feedback stays up before the quiz moves on.
    pub feedback_delay_ms: u64,
    /// Wrong choices offered alongside the right one.
    pub distractors: usize,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            feedback_delay_ms: 2000,
            distractors: 3,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct UserConfig {
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

/// The study settings the web layer needs, in the units it uses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StudySettings {
    pub feedback_delay: Duration,
    pub distractors: usize,
}

impl StudySettings {
    /// The feedback delay in whole milliseconds, saturating at `u64::MAX`.
    pub fn feedback_delay_ms(&self) -> u64 {
        u64::try_from(self.feedback_delay.as_millis()).unwrap_or(u64::MAX)
    }
}

impl Config {
    /// Load the configuration from a data directory, falling back to the
    /// defaults when there is no config file.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE);
        if !path.exists() {
            log::debug!("No {CONFIG_FILE}, using defaults.");
            return Ok(Self::default());
        }
        Self::parse(&read_to_string(path)?)
    }

    pub fn parse(content: &str) -> Fallible<Self> {
        let config: Config = toml::from_str(content)?;
        if config.study.distractors == 0 {
            return fail("study.distractors must be at least 1.");
        }
        Ok(config)
    }

    pub fn settings(&self) -> StudySettings {
        StudySettings {
            feedback_delay: Duration::from_millis(self.study.feedback_delay_ms),
            distractors: self.study.distractors,
        }
    }

    /// The user everything is attributed to. Without a `[user]` table this
    /// is a local user named after `$USER`.
    pub fn identity(&self) -> Identity {
        let user_id = self.user.id.clone().unwrap_or_else(|| "local".to_string());
        let display_name = self
            .user
            .display_name
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .unwrap_or_else(|| "local".to_string());
        let email = self.user.email.clone().unwrap_or_default();
        Identity {
            user_id,
            display_name,
            email,
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_defaults() -> Fallible<()> {
        let config = Config::parse("")?;
        assert_eq!(config, Config::default());
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert!(config.server.open_browser);
        let settings = config.settings();
        assert_eq!(settings.feedback_delay, Duration::from_secs(2));
        assert_eq!(settings.feedback_delay_ms(), 2000);
        assert_eq!(settings.distractors, 3);
        assert_eq!(config.identity().user_id, "local");
        Ok(())
    }

    #[test]
    fn test_partial_config() -> Fallible<()> {
        let config = Config::parse(
            r#"
            [server]
            port = 9000

            [study]
            feedback_delay_ms = 0

            [user]
            id = "alice"
            display_name = "Alice"
            email = "alice@example.com"
            "#,
        )?;
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.settings().feedback_delay, Duration::ZERO);
        assert_eq!(config.study.distractors, 3);
        let identity = config.identity();
        assert_eq!(identity.user_id, "alice");
        assert_eq!(identity.display_name, "Alice");
        assert_eq!(identity.email, "alice@example.com");
        Ok(())
    }

    #[test]
    fn test_feedback_delay_ms_saturates() {
        let settings = StudySettings {
            feedback_delay: Duration::MAX,
            distractors: 3,
        };
        assert_eq!(settings.feedback_delay_ms(), u64::MAX);
    }

    #[test]
    fn test_invalid_config() {
        assert!(Config::parse("[server]\nport = \"eighty\"").is_err());
        assert!(Config::parse("[nonsense]").is_err());
        assert!(Config::parse("[study]\ndistractors = 0").is_err());
    }

    #[test]
    fn test_load_missing_file() -> Fallible<()> {
        let directory = tempdir()?;
        assert_eq!(Config::load(directory.path())?, Config::default());
        Ok(())
    }

    #[test]
    fn test_load_file() -> Fallible<()> {
        let directory = tempdir()?;
        std::fs::write(
            directory.path().join(CONFIG_FILE),
            "[server]\nopen_browser = false\n",
        )?;
        assert!(!Config::load(directory.path())?.server.open_browser);
        Ok(())
    }
}
