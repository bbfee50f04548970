#![forbid(unsafe_code)]

//! Ellipsis configuration.
//!
//! Built with setters, or read from the environment:
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `LINECLAMP_ROWS` | row count (unsigned integer) |
//! | `LINECLAMP_ELLIPSIS` | ellipsis glyph |
//! | `LINECLAMP_EXPANDABLE` | `1/true/yes/on` or `0/false/no/off` |
//!
//! Unparseable values are ignored and the default is kept.

/// Env var overriding the row count.
pub const ENV_ROWS: &str = "LINECLAMP_ROWS";
/// Env var overriding the ellipsis glyph.
pub const ENV_ELLIPSIS: &str = "LINECLAMP_ELLIPSIS";
/// Env var toggling the expand control.
pub const ENV_EXPANDABLE: &str = "LINECLAMP_EXPANDABLE";

pub const DEFAULT_ELLIPSIS: &str = "...";
pub const DEFAULT_EXPAND_LABEL: &str = "Expand";

/// How a clamped block truncates and what it shows after the cut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EllipsisConfig {
    /// Visible rows. `0` disables clamping.
    pub rows: u32,
    /// Show an expand control while truncated.
    pub expandable: bool,
    /// Glyph appended to a truncated prefix.
    pub ellipsis: String,
    /// Label of the expand control.
    pub expand_label: String,
    /// Text that always follows the content, truncated or not.
    pub suffix: String,
}

impl Default for EllipsisConfig {
    fn default() -> Self {
        Self {
            rows: 1,
            expandable: false,
            ellipsis: DEFAULT_ELLIPSIS.to_owned(),
            expand_label: DEFAULT_EXPAND_LABEL.to_owned(),
            suffix: String::new(),
        }
    }
}

impl EllipsisConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn rows(mut self, rows: u32) -> Self {
        self.rows = rows;
        self
    }

    #[must_use]
    pub fn expandable(mut self, expandable: bool) -> Self {
        self.expandable = expandable;
        self
    }

    #[must_use]
    pub fn ellipsis(mut self, ellipsis: impl Into<String>) -> Self {
        self.ellipsis = ellipsis.into();
        self
    }

    #[must_use]
    pub fn expand_label(mut self, label: impl Into<String>) -> Self {
        self.expand_label = label.into();
        self
    }

    #[must_use]
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Defaults overridden by the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Defaults overridden through a custom env lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(rows) = get_env(ENV_ROWS).and_then(|v| v.trim().parse().ok()) {
            config.rows = rows;
        }
        if let Some(ellipsis) = get_env(ENV_ELLIPSIS) {
            config.ellipsis = ellipsis;
        }
        if let Some(expandable) = get_env(ENV_EXPANDABLE).and_then(|v| parse_bool(&v)) {
            config.expandable = expandable;
        }
        config
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
