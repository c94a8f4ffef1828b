use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::Path;
pub mod models;
pub use models::*;

/// Loads the application configuration.
///
/// Sources are layered: the `config/default` file, then an optional
/// `config/{RUN_ENV}` overlay, then environment variables with the
/// `PUSHRELAY` prefix (`__` as the section separator). A `.env` file is
/// loaded into the environment first.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| "PUSHRELAY".to_string());

    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{}", run_env)).required(false))
        .add_source(Environment::with_prefix(&prefix).separator("__"));

    builder.build()?.try_deserialize()
}

/// Loads configuration rooted at an explicit directory.
///
/// The `default` file is mandatory here; the `RUN_ENV` overlay stays optional.
/// Environment variables are not consulted, which keeps loads from an explicit
/// directory deterministic.
pub fn load_config_from_dir(dir: &Path) -> Result<AppConfig, ConfigError> {
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let default_path = dir.join("default");
    let env_path = dir.join(&run_env);

    let builder = Config::builder()
        .add_source(File::with_name(default_path.to_str().unwrap()).required(true))
        .add_source(File::with_name(env_path.to_str().unwrap()).required(false));

    builder.build()?.try_deserialize()
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// Guarded by a `OnceCell` so repeated config loads do not re-read the file.
/// The path defaults to `.env` and can be overridden with `DOTENV_OVERRIDE`.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
