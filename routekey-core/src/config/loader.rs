use serde::de::DeserializeOwned;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
    Auto,
}

#[derive(Debug, Clone)]
pub struct LoadedConfig<T> {
    pub config: T,
    pub format: ConfigFormat,
}

pub fn load_config_str<T: DeserializeOwned>(
    input: &str,
    format: ConfigFormat,
) -> Result<LoadedConfig<T>, ConfigError> {
    match format {
        ConfigFormat::Json => Ok(LoadedConfig {
            config: serde_json::from_str::<T>(input)?,
            format,
        }),
        ConfigFormat::Yaml => Ok(LoadedConfig {
            config: serde_yaml::from_str::<T>(input)?,
            format,
        }),
        ConfigFormat::Auto => load_config_auto(input),
    }
}

fn load_config_auto<T: DeserializeOwned>(input: &str) -> Result<LoadedConfig<T>, ConfigError> {
    // JSON documents start with `{` after trimming; everything else is tried as YAML first.
    let trimmed = input.trim_start();
    if trimmed.starts_with('{') {
        return match serde_json::from_str::<T>(input) {
            Ok(config) => Ok(LoadedConfig {
                config,
                format: ConfigFormat::Json,
            }),
            Err(e) => match serde_yaml::from_str::<T>(input) {
                Ok(config) => Ok(LoadedConfig {
                    config,
                    format: ConfigFormat::Yaml,
                }),
                Err(_) => Err(ConfigError::Json(e)),
            },
        };
    }

    match serde_yaml::from_str::<T>(input) {
        Ok(config) => Ok(LoadedConfig {
            config,
            format: ConfigFormat::Yaml,
        }),
        Err(e) => {
            if let Ok(config) = serde_json::from_str::<T>(input) {
                return Ok(LoadedConfig {
                    config,
                    format: ConfigFormat::Json,
                });
            }
            Err(ConfigError::Yaml(e))
        }
    }
}
