use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

const APP_DIR_NAME: &str = "jirac";
const CONFIG_FILE_NAME: &str = "config.json";

pub const ENV_SERVER: &str = "JIRAC_SERVER";
pub const ENV_USER: &str = "JIRAC_USER";
pub const ENV_PASSWORD: &str = "JIRAC_PASSWORD";
pub const ENV_PROJECT: &str = "JIRAC_PROJECT";
pub const ENV_NO_CHECK_SSL: &str = "JIRAC_NO_CHECK_SSL";

/// Settings for one invocation, merged from flags, environment and the
/// stored config file.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub server: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub project: Option<String>,
    pub no_check_ssl: bool,
    pub verbose: bool,
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub server: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub project: Option<String>,
    pub no_check_ssl: bool,
    pub verbose: bool,
}

/// Contents of the config file written by `config init`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub no_check_ssl: Option<bool>,
}

impl AppConfig {
    pub fn load(overrides: ConfigOverrides) -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        Ok(Self::resolve(
            stored,
            |name| std::env::var(name).ok(),
            overrides,
        ))
    }

    /// Flags win over the environment, which wins over the stored file.
    pub fn resolve(
        stored: StoredConfig,
        env: impl Fn(&str) -> Option<String>,
        overrides: ConfigOverrides,
    ) -> Self {
        let pick = |flag: Option<String>, var: &str, file: Option<String>| {
            flag.or_else(|| env(var))
                .or(file)
                .filter(|value| !value.trim().is_empty())
        };

        let env_no_check_ssl = env(ENV_NO_CHECK_SSL).map(|value| {
            matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes")
        });

        Self {
            server: pick(overrides.server, ENV_SERVER, stored.server),
            user: pick(overrides.user, ENV_USER, stored.user),
            password: pick(overrides.password, ENV_PASSWORD, stored.password),
            project: pick(overrides.project, ENV_PROJECT, stored.project),
            no_check_ssl: overrides.no_check_ssl
                || env_no_check_ssl.or(stored.no_check_ssl).unwrap_or(false),
            verbose: overrides.verbose,
        }
    }

    /// Base URL of the API; bare host names are served over https.
    pub fn base_url(&self) -> Option<String> {
        self.server.as_deref().map(|server| {
            let server = server.trim().trim_end_matches('/');
            if server.starts_with("http://") || server.starts_with("https://") {
                server.to_string()
            } else {
                format!("https://{server}")
            }
        })
    }
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        let path = config_file_path()?;
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        let path = config_file_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(&path, data)?;
        Ok(())
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| AppError::Configuration("no config directory on this platform".to_string()))
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}
