use clap::Args;
use thiserror::Error;

use ticketbridge_db::DbConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
}

/// Settings shared by every subcommand. Each can come from a flag or
/// from the environment (including a `.env` file).
#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Address to bind the HTTP server to
    #[arg(long, env = "TICKETBRIDGE_BIND", default_value = "0.0.0.0", global = true)]
    pub bind: String,

    /// Port for the HTTP server
    #[arg(long, env = "TICKETBRIDGE_PORT", default_value = "3720", global = true)]
    pub port: u16,

    /// Discord bot token
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true, global = true)]
    pub discord_token: Option<String>,

    #[arg(
        long,
        env = "DISCORD_API_BASE",
        default_value = ticketbridge_providers::chat::discord::DEFAULT_API_BASE,
        global = true
    )]
    pub discord_api_base: String,

    /// GitHub token with permission to open issues
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    pub github_token: Option<String>,

    #[arg(long, env = "GITHUB_REPO_OWNER", global = true)]
    pub github_repo_owner: Option<String>,

    #[arg(long, env = "GITHUB_REPO_NAME", global = true)]
    pub github_repo_name: Option<String>,

    #[arg(
        long,
        env = "GITHUB_API_BASE",
        default_value = ticketbridge_providers::tracker::github::DEFAULT_API_BASE,
        global = true
    )]
    pub github_api_base: String,

    /// Repository file fetched by the health probe
    #[arg(
        long,
        env = "TICKETBRIDGE_PROBE_PATH",
        default_value = ticketbridge_service::DEFAULT_PROBE_PATH,
        global = true
    )]
    pub probe_path: String,

    /// SQLite database file (falls back to DATABASE_PATH)
    #[arg(long, env = "TICKETBRIDGE_DB_PATH", global = true)]
    pub db_path: Option<String>,

    /// Postgres connection URL; takes precedence over the SQLite file
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, global = true)]
    pub database_url: Option<String>,

    /// API key required on protected HTTP routes
    #[arg(long, env = "TICKETBRIDGE_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,
}

/// Collaborator credentials, all present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub discord_token: String,
    pub github_token: String,
    pub github_repo_owner: String,
    pub github_repo_name: String,
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl ServerConfig {
    /// Check every required collaborator setting, reporting all missing
    /// ones at once.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let required = [
            ("DISCORD_TOKEN", present(&self.discord_token)),
            ("GITHUB_TOKEN", present(&self.github_token)),
            ("GITHUB_REPO_OWNER", present(&self.github_repo_owner)),
            ("GITHUB_REPO_NAME", present(&self.github_repo_name)),
        ];
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let [discord_token, github_token, github_repo_owner, github_repo_name] =
            required.map(|(_, value)| value.unwrap_or_default());
        Ok(Credentials {
            discord_token,
            github_token,
            github_repo_owner,
            github_repo_name,
        })
    }

    pub fn db_config(&self) -> DbConfig {
        self.db_config_with_fallback(std::env::var("DATABASE_PATH").ok())
    }

    fn db_config_with_fallback(&self, database_path: Option<String>) -> DbConfig {
        DbConfig {
            sqlite_path: present(&self.db_path).or_else(|| present(&database_path)),
            database_url: present(&self.database_url),
        }
    }

    /// The API key, if one is configured.
    pub fn api_key(&self) -> Option<String> {
        present(&self.api_key)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn config() -> ServerConfig {
        ServerConfig {
            bind: "127.0.0.1".into(),
            port: 0,
            discord_token: Some("discord".into()),
            discord_api_base: "http://127.0.0.1:9".into(),
            github_token: Some("github".into()),
            github_repo_owner: Some("acme".into()),
            github_repo_name: Some("app".into()),
            github_api_base: "http://127.0.0.1:9".into(),
            probe_path: "README.md".into(),
            db_path: None,
            database_url: None,
            api_key: None,
        }
    }

    #[test]
    fn credentials_when_complete() {
        let creds = config().credentials().unwrap();
        assert_eq!(creds.github_repo_owner, "acme");
        assert_eq!(creds.github_repo_name, "app");
    }

    #[test]
    fn reports_every_missing_setting() {
        let cfg = ServerConfig {
            discord_token: None,
            github_token: Some("   ".into()),
            github_repo_name: None,
            ..config()
        };
        let err = cfg.credentials().unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing(vec!["DISCORD_TOKEN", "GITHUB_TOKEN", "GITHUB_REPO_NAME"])
        );
        assert_eq!(
            err.to_string(),
            "missing required environment variables: DISCORD_TOKEN, GITHUB_TOKEN, GITHUB_REPO_NAME"
        );
    }

    #[test]
    fn db_path_falls_back_to_database_path() {
        let cfg = config();
        let db = cfg.db_config_with_fallback(Some("/data/links.db".into()));
        assert_eq!(db.sqlite_path.as_deref(), Some("/data/links.db"));

        let cfg = ServerConfig {
            db_path: Some("/var/lib/tb.db".into()),
            ..config()
        };
        let db = cfg.db_config_with_fallback(Some("/data/links.db".into()));
        assert_eq!(db.sqlite_path.as_deref(), Some("/var/lib/tb.db"));
        assert_eq!(db.database_url, None);
    }

    #[test]
    fn blank_api_key_disables_auth() {
        let cfg = ServerConfig {
            api_key: Some("".into()),
            ..config()
        };
        assert_eq!(cfg.api_key(), None);
    }
}
