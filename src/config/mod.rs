use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

/// Hours shown on the dashboard when no project has logged any time yet.
pub const DEFAULT_HOURS_FALLBACK: f64 = 164.0;

/// Configuration for the application
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Connection URL of the key-value store
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// File that receives the tracing output while the terminal UI is running
    #[serde(default = "default_log_file")]
    pub log_file: String,
    #[serde(default = "default_hours_fallback")]
    pub hours_fallback: f64,
}

fn default_database_url() -> String {
    "sqlite://freelancer-crm.db".to_string()
}

fn default_log_file() -> String {
    "freelancer-crm.log".to_string()
}

fn default_hours_fallback() -> f64 {
    DEFAULT_HOURS_FALLBACK
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            log_file: default_log_file(),
            hours_fallback: default_hours_fallback(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Variables from a `.env` file are loaded first if the file exists.
    /// Anything left unset falls back to its default.
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Replace the database URL when one was given on the command line
    pub fn with_database_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.database_url = url;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_variables_use_defaults() {
        let vars: Vec<(String, String)> = Vec::new();
        let config = envy::from_iter::<_, Config>(vars).unwrap();

        assert_eq!(config.database_url, "sqlite://freelancer-crm.db");
        assert_eq!(config.log_file, "freelancer-crm.log");
        assert_eq!(config.hours_fallback, DEFAULT_HOURS_FALLBACK);
    }

    #[test]
    fn variables_override_defaults() {
        let vars = vec![
            ("DATABASE_URL".to_string(), "sqlite://other.db".to_string()),
            ("HOURS_FALLBACK".to_string(), "12.5".to_string()),
        ];
        let config = envy::from_iter::<_, Config>(vars).unwrap();

        assert_eq!(config.database_url(), "sqlite://other.db");
        assert_eq!(config.hours_fallback, 12.5);
    }

    #[test]
    fn command_line_url_wins() {
        let config = Config::default().with_database_url(Some("sqlite://cli.db".into()));
        assert_eq!(config.database_url(), "sqlite://cli.db");

        let config = Config::default().with_database_url(None);
        assert_eq!(config.database_url(), "sqlite://freelancer-crm.db");
    }
}
