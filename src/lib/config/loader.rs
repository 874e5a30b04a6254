use dotenvy::from_filename;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

pub const GATEWAY_URL: &str = "GATEWAY_URL";
pub const COGNITO_SCOPE: &str = "COGNITO_SCOPE";
pub const WORKLOAD_NAME: &str = "WORKLOAD_NAME";
pub const USER_ID: &str = "USER_ID";
pub const AWS_REGION: &str = "AWS_REGION";
pub const AWS_DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";
pub const COGNITO_TOKEN_URL: &str = "COGNITO_TOKEN_URL";
pub const COGNITO_CLIENT_ID: &str = "COGNITO_CLIENT_ID";
pub const COGNITO_CLIENT_SECRET: &str = "COGNITO_CLIENT_SECRET";
pub const MODEL_ENDPOINT: &str = "MODEL_ENDPOINT";
pub const MODEL_API_KEY: &str = "MODEL_API_KEY";
pub const AWS_BEARER_TOKEN_BEDROCK: &str = "AWS_BEARER_TOKEN_BEDROCK";
pub const MODEL_MAX_CYCLES: &str = "MODEL_MAX_CYCLES";

static ENV_FILE: OnceLock<EnvFile> = OnceLock::new();

/// Source of named configuration values.
pub trait EnvSource: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;

    /// Value with surrounding whitespace removed; blank counts as unset.
    fn non_blank(&self, key: &str) -> Option<String> {
        self.var(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

/// Reads from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Outcome of loading the dotenv file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvFile {
    Loaded(PathBuf),
    Skipped { path: PathBuf, reason: String },
}

impl EnvFile {
    /// Reports the outcome; called once the subscriber is installed.
    pub fn log(&self) {
        match self {
            EnvFile::Loaded(path) => debug!(path = %path.display(), "Loaded environment file"),
            EnvFile::Skipped { path, reason } => debug!(
                path = %path.display(),
                reason = reason.as_str(),
                "No environment file loaded"
            ),
        }
    }
}

/// Loads a dotenv file into the process environment. Variables already
/// present in the environment win.
pub fn load_env_file(path: &Path) -> EnvFile {
    match from_filename(path) {
        Ok(loaded) => EnvFile::Loaded(loaded),
        Err(error) => EnvFile::Skipped {
            path: path.to_path_buf(),
            reason: error.to_string(),
        },
    }
}

/// [`load_env_file`] once per process; later calls return the first outcome.
pub fn ensure_env_loaded(path: &Path) -> &'static EnvFile {
    ENV_FILE.get_or_init(|| load_env_file(path))
}

/// Ambient region: `AWS_REGION`, then `AWS_DEFAULT_REGION`.
pub(crate) fn resolve_region(source: &dyn EnvSource) -> Option<String> {
    source
        .non_blank(AWS_REGION)
        .or_else(|| source.non_blank(AWS_DEFAULT_REGION))
}
