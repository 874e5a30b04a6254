pub mod app;
pub mod defaults;
pub mod error;
pub mod identity;
pub mod loader;
pub mod provider;

pub use app::AgentConfig;
pub use error::ConfigError;
pub use identity::IdentitySettings;
pub use loader::{EnvFile, EnvSource, ProcessEnv, ensure_env_loaded, load_env_file};
pub use provider::ModelSettings;
