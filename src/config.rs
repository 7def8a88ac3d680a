// Config module: locates and parses the YAML file holding the GitHub user
// whose repositories are managed and the credentials used for Basic auth.
//
// Expected layout:
//
//   auth:
//     user: octocat
//     password: secret
//   github:
//     user: octo-org

use crate::error::{HooksError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable that points at an explicit config file.
pub const CONFIG_ENV: &str = "GITHUB_HOOKS_CONFIG";

/// File name looked up in the working directory and the user config dir.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub auth: AuthSection,
    pub github: GithubSection,
}

/// Credentials of the account that performs the requests.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AuthSection {
    pub user: String,
    pub password: String,
}

/// Owner of the repositories whose hooks are managed.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct GithubSection {
    pub user: String,
}

impl Config {
    /// Parse a config document. `path` is only used for error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| HooksError::Config {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
    }

    /// Read and parse the file at `path`. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");
        let text = std::fs::read_to_string(path).map_err(|e| HooksError::Config {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        Self::parse(&text, path)
    }

    /// Load the config from the location picked by [`resolve_path`].
    pub fn from_env() -> Result<Self> {
        Self::load(&resolve_path())
    }

    pub fn github_user(&self) -> &str {
        &self.github.user
    }
}

/// Pick the config file: `$GITHUB_HOOKS_CONFIG`, then `./config.yaml` if it
/// exists, then `<config dir>/github-hooks/config.yaml`.
pub fn resolve_path() -> PathBuf {
    let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let local = PathBuf::from(CONFIG_FILE_NAME);
    let user_dir = dirs::config_dir().map(|d| d.join("github-hooks").join(CONFIG_FILE_NAME));
    choose_path(explicit, local, user_dir)
}

fn choose_path(explicit: Option<PathBuf>, local: PathBuf, user_dir: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    if local.exists() {
        return local;
    }
    // Fall back to the local name so the error message points somewhere sensible.
    user_dir.unwrap_or(local)
}
