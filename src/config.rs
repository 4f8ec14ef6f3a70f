//! Runtime configuration from environment variables.
//!
//! `HOST`, `PORT`, `LEADERBOARD_PATH` and `TRIVIA_CATEGORIES` (comma separated) override the
//! defaults below.

use std::path::PathBuf;

/// Categories used when `TRIVIA_CATEGORIES` is not set.
pub const DEFAULT_CATEGORIES: [&str; 4] = ["Historia", "Ciencia", "Geografía", "Deporte"];

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub leaderboard_path: PathBuf,
    pub categories: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            leaderboard_path: default_leaderboard_path(),
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup. Unset or unparsable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid PORT '{}'", raw);
                defaults.port
            }),
            None => defaults.port,
        };
        let categories = lookup("TRIVIA_CATEGORIES")
            .map(|raw| parse_categories(&raw))
            .filter(|c| !c.is_empty())
            .unwrap_or(defaults.categories);

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            leaderboard_path: lookup("LEADERBOARD_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.leaderboard_path),
            categories,
        }
    }
}

/// Split a comma separated list, dropping blanks and repeats.
fn parse_categories(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for c in raw.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        if !out.iter().any(|seen| seen == c) {
            out.push(c.to_string());
        }
    }
    out
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_leaderboard_path() -> PathBuf {
    PathBuf::from("data").join("scoreboard.json")
}
