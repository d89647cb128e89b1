//! Configuration management for chatter-relay
//!
//! Configuration is loaded from environment variables, with a `.env` file in the
//! working directory as fallback.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Record type opened by the full composer dialog.
pub const DEFAULT_COMPOSE_MODEL: &str = "mail.compose.message";
/// Record type stamped on partner mention anchors.
pub const DEFAULT_PARTNER_MODEL: &str = "res.partner";
/// Record type stamped on channel mention anchors.
pub const DEFAULT_CHANNEL_MODEL: &str = "mail.channel";
/// Prefix of record URLs built for mention anchors.
pub const DEFAULT_RECORD_URL_BASE: &str = "/web";

/// Main configuration struct for chatter-relay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // Handoff
    pub compose_model: String,

    // Mentions
    pub partner_model: String,
    pub channel_model: String,
    pub record_url_base: String,

    // Body pipeline
    pub emoji_enabled: bool,
    /// Default link builder opens links in a new tab (`target="_blank"`).
    pub link_target_blank: bool,

    // Server-side routing
    /// Placeholder partner that direct emails are booked against.
    pub relay_contact_id: Option<i64>,
    /// Public origin used to absolutize local links in outgoing emails.
    pub public_base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            compose_model: DEFAULT_COMPOSE_MODEL.to_string(),
            partner_model: DEFAULT_PARTNER_MODEL.to_string(),
            channel_model: DEFAULT_CHANNEL_MODEL.to_string(),
            record_url_base: DEFAULT_RECORD_URL_BASE.to_string(),
            emoji_enabled: true,
            link_target_blank: true,
            relay_contact_id: None,
            public_base_url: None,
        }
    }
}

/// Module-level shared config cache (used by `Config::get` and `Config::reset_cached`).
static CONFIG_CACHE: std::sync::RwLock<Option<Config>> = std::sync::RwLock::new(None);

fn global_config_cache_get() -> Config {
    // Fast path: read lock, return clone if present
    {
        let guard = CONFIG_CACHE
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(ref c) = *guard {
            return c.clone();
        }
    }
    // Slow path: write lock, initialize from env
    let mut guard = CONFIG_CACHE
        .write()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    guard.get_or_insert_with(Config::from_env).clone()
}

fn global_config_cache_reset() {
    let mut guard = CONFIG_CACHE
        .write()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    *guard = None;
}

impl Config {
    /// Load configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(v) = env_string("CHATTER_COMPOSE_MODEL") {
            config.compose_model = v;
        }
        if let Some(v) = env_string("CHATTER_PARTNER_MODEL") {
            config.partner_model = v;
        }
        if let Some(v) = env_string("CHATTER_CHANNEL_MODEL") {
            config.channel_model = v;
        }
        if let Some(v) = env_string("CHATTER_RECORD_URL_BASE") {
            config.record_url_base = v.trim_end_matches('/').to_string();
        }

        config.emoji_enabled = env_bool("CHATTER_EMOJI_ENABLED", config.emoji_enabled);
        config.link_target_blank =
            env_bool("CHATTER_LINK_TARGET_BLANK", config.link_target_blank);
        config.relay_contact_id = env_i64_opt("CHATTER_RELAY_CONTACT_ID");
        config.public_base_url =
            env_string("CHATTER_PUBLIC_BASE_URL").map(|v| v.trim_end_matches('/').to_string());

        tracing::debug!(
            compose_model = %config.compose_model,
            emoji_enabled = config.emoji_enabled,
            "loaded chatter-relay config"
        );
        config
    }

    /// Cached config derived from the environment. Parsed once, then cloned.
    #[must_use]
    pub fn get() -> Self {
        global_config_cache_get()
    }

    /// Reset the global config cache, forcing the next [`Config::get`] call to
    /// re-parse environment variables.
    pub fn reset_cached() {
        global_config_cache_reset();
    }
}

static DOTENV_VALUES: OnceLock<HashMap<String, String>> = OnceLock::new();

#[cfg(test)]
thread_local! {
    static TEST_ENV_OVERRIDES: std::cell::RefCell<HashMap<String, String>> =
        std::cell::RefCell::new(HashMap::new());
}

#[cfg(test)]
fn test_env_override_value(key: &str) -> Option<String> {
    TEST_ENV_OVERRIDES.with(|cell| cell.borrow().get(key).cloned())
}

fn dotenv_values() -> &'static HashMap<String, String> {
    DOTENV_VALUES.get_or_init(|| load_dotenv_file(Path::new(".env")))
}

/// Read a value from the .env file (if present).
#[must_use]
pub fn dotenv_value(key: &str) -> Option<String> {
    dotenv_values().get(key).cloned()
}

/// Read a value from the real environment first, falling back to .env.
#[must_use]
pub fn env_value(key: &str) -> Option<String> {
    #[cfg(test)]
    if let Some(v) = test_env_override_value(key) {
        return Some(v);
    }
    env::var(key).ok().or_else(|| dotenv_value(key))
}

fn load_dotenv_file(path: &Path) -> HashMap<String, String> {
    let Ok(contents) = fs::read_to_string(path) else {
        return HashMap::new();
    };
    parse_dotenv_contents(&contents)
}

/// Parse `KEY=value` lines. Blank lines, `#` comments and an `export ` prefix
/// are accepted; quoted values are unquoted.
#[must_use]
pub fn parse_dotenv_contents(contents: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for raw_line in contents.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        map.insert(key.to_string(), parse_dotenv_value(value.trim()));
    }
    map
}

fn parse_dotenv_value(raw: &str) -> String {
    let trimmed = raw.trim();
    for quote in ['"', '\''] {
        if let Some(rest) = trimmed.strip_prefix(quote)
            && let Some(end) = rest.find(quote)
        {
            let remainder = rest[end + 1..].trim_start();
            if remainder.is_empty() || remainder.starts_with('#') {
                return rest[..end].to_string();
            }
        }
    }
    strip_inline_comment(trimmed).to_string()
}

fn strip_inline_comment(value: &str) -> &str {
    let bytes = value.as_bytes();
    for i in 0..bytes.len() {
        if bytes[i] == b'#' && (i == 0 || bytes[i - 1].is_ascii_whitespace()) {
            return value[..i].trim_end();
        }
    }
    value
}

fn parse_bool(value: &str, default: bool) -> bool {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" => true,
        "0" | "false" | "f" | "no" | "n" => false,
        _ => default,
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    env_value(key).map_or(default, |v| parse_bool(&v, default))
}

fn env_string(key: &str) -> Option<String> {
    env_value(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_i64_opt(key: &str) -> Option<i64> {
    env_string(key).and_then(|v| v.parse().ok())
}
