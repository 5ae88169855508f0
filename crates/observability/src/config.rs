use serde::{Deserialize, Serialize};

/// Env var holding the `EnvFilter` directives.
pub const FILTER_ENV: &str = "RUST_LOG";
/// Env var selecting the output format (`json` or `pretty`).
pub const FORMAT_ENV: &str = "ECOBAZAAR_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event, for log shippers.
    #[default]
    Json,
    /// Human-readable multi-line output for local runs.
    Pretty,
}

impl LogFormat {
    /// Case-insensitive; `None` for anything other than `json`/`pretty`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "pretty" => Some(LogFormat::Pretty),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObservabilityConfig {
    pub filter: String,
    pub format: LogFormat,
    pub with_target: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::Json,
            with_target: false,
        }
    }
}

impl ObservabilityConfig {
    /// Read `RUST_LOG` and `ECOBAZAAR_LOG_FORMAT`; unset or unrecognised
    /// values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let filter = lookup(FILTER_ENV)
            .filter(|f| !f.trim().is_empty())
            .unwrap_or(defaults.filter);
        let format = lookup(FORMAT_ENV)
            .and_then(|f| LogFormat::parse(&f))
            .unwrap_or(defaults.format);

        Self {
            filter,
            format,
            with_target: defaults.with_target,
        }
    }
}
