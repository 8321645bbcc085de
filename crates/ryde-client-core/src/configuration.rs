use std::path::{Path, PathBuf};

use ryde_shared::const_config::client::{CLIENT_DEFAULT_API_URL, CLIENT_PRODUCTION_API_URL};

#[derive(serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ClientConfiguration {
    pub api: ApiSettings,
}

#[derive(serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ApiSettings {
    /// Prefix for every endpoint path, without a trailing slash
    pub base_url: String,
}

/// Loads the configuration for the environment named by `APP_ENVIRONMENT`
/// (default `development`) from the `configuration` folder in the current
/// directory.
pub fn get_configuration() -> Result<ClientConfiguration, config::ConfigError> {
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "development".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("failed to determine the current directory: {e}"))
    })?;
    get_configuration_from(environment, &base_path.join("configuration"))
}

/// Layers, lowest precedence first: built in defaults for `environment`,
/// `base.toml`, `<environment>.toml` and finally environment variables.
///
/// Both files are optional.
pub fn get_configuration_from(
    environment: Environment,
    configuration_directory: &Path,
) -> Result<ClientConfiguration, config::ConfigError> {
    let environment_filename = format!("{}.toml", environment.as_str());
    let settings = config::Config::builder()
        .set_default("api.base_url", environment.default_api_url())?
        .add_source(config_file(configuration_directory.join("base.toml")))
        .add_source(config_file(
            configuration_directory.join(environment_filename),
        ))
        // Add in settings from environment variables (with a prefix of APP and '__' as separator)
        // E.g. `APP_API__BASE_URL=http://127.0.0.1:9000/api` would set `api.base_url`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let mut result = settings.try_deserialize::<ClientConfiguration>()?;
    result.api.base_url = result.api.base_url.trim_end_matches('/').to_string();
    Ok(result)
}

fn config_file(path: PathBuf) -> config::File<config::FileSourceFile, config::FileFormat> {
    config::File::from(path)
        .format(config::FileFormat::Toml)
        .required(false)
}

/// The possible runtime environment for the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn default_api_url(&self) -> &'static str {
        match self {
            Environment::Development => CLIENT_DEFAULT_API_URL,
            Environment::Production => CLIENT_PRODUCTION_API_URL,
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not a supported environment. Use either `development` or `production`."
            )),
        }
    }
}
