//! Application configuration loaded from YAML and overridden by the environment.

use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::location::ConfiguredLocation;
use crate::model::Coordinate;
use crate::ports::PermissionStatus;

/// Default IBGE locality API.
pub const DEFAULT_LOCALITY_URL: &str = "https://servicodados.ibge.gov.br/api/v1/localidades";
/// Default application backend.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3333";

#[derive(thiserror::Error, Debug)]
/// Errors raised while loading configuration.
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// File that was read.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The file is not valid YAML for [`AppConfig`].
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// An override or field has an unusable value.
    #[error("Invalid config value for {key}: {reason}")]
    Invalid {
        /// Offending key.
        key: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Top-level configuration.
pub struct AppConfig {
    /// Base URL of the locality API.
    pub locality_api_url: String,
    /// Base URL of the application backend.
    pub backend_api_url: String,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Simulated device location.
    pub location: LocationConfig,
    /// Log output.
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Answers of the configured location source.
pub struct LocationConfig {
    /// Answer to the permission dialog.
    pub permission: PermissionStatus,
    /// Latitude of the fix, if any.
    pub latitude: Option<f64>,
    /// Longitude of the fix, if any.
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Log level and destination.
pub struct LogConfig {
    /// Level filter (`error`, `warn`, `info`, `debug`, `trace`).
    pub level: String,
    /// File the log is appended to.
    pub file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            locality_api_url: DEFAULT_LOCALITY_URL.to_owned(),
            backend_api_url: DEFAULT_BACKEND_URL.to_owned(),
            user_agent: "coleta/0.1".to_owned(),
            request_timeout_secs: 10,
            location: LocationConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            permission: PermissionStatus::Granted,
            latitude: None,
            longitude: None,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            file: "coleta.log".to_owned(),
        }
    }
}

impl LocationConfig {
    /// Coordinate of the configured fix, when both parts are present.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinate::new(latitude, longitude)),
            _ => None,
        }
    }

    /// Build the location source described by this section.
    #[must_use]
    pub fn source(&self) -> ConfiguredLocation {
        ConfiguredLocation::new(self.permission, self.coordinate())
    }
}

impl AppConfig {
    /// Parse configuration from YAML text. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed YAML or unknown fields.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Read configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, or
    /// [`ConfigError::Parse`] when it is not valid.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load from an optional file, apply `COLETA_*` environment overrides, and validate.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when reading, parsing, an override, or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(coleta_vars(std::env::vars_os())?)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `COLETA_*` overrides from `vars`. Unrelated variables are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when an override cannot be parsed.
    pub fn apply_overrides<I, K, V>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in vars {
            let value: String = value.into();
            match key.as_ref() {
                "COLETA_LOCALITY_URL" => self.locality_api_url = value,
                "COLETA_BACKEND_URL" => self.backend_api_url = value,
                "COLETA_USER_AGENT" => self.user_agent = value,
                "COLETA_TIMEOUT_SECS" => {
                    self.request_timeout_secs =
                        value.trim().parse().map_err(|err| ConfigError::Invalid {
                            key: "COLETA_TIMEOUT_SECS",
                            reason: format!("{err}"),
                        })?;
                }
                "COLETA_LOCATION_PERMISSION" => {
                    self.location.permission = parse_permission(&value)?;
                }
                "COLETA_LATITUDE" => {
                    self.location.latitude = Some(parse_degrees("COLETA_LATITUDE", &value)?);
                }
                "COLETA_LONGITUDE" => {
                    self.location.longitude = Some(parse_degrees("COLETA_LONGITUDE", &value)?);
                }
                "COLETA_LOG_LEVEL" => self.log.level = value,
                "COLETA_LOG_FILE" => self.log.file = value,
                _ => {}
            }
        }
        Ok(())
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_url("locality_api_url", &self.locality_api_url)?;
        validate_url("backend_api_url", &self.backend_api_url)?;
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "request_timeout_secs",
                reason: "must be greater than zero".to_owned(),
            });
        }
        if self.location.latitude.is_some() != self.location.longitude.is_some() {
            return Err(ConfigError::Invalid {
                key: "location",
                reason: "latitude and longitude must be set together".to_owned(),
            });
        }
        if let Some(coordinate) = self.location.coordinate()
            && (!(-90.0..=90.0).contains(&coordinate.latitude)
                || !(-180.0..=180.0).contains(&coordinate.longitude))
        {
            return Err(ConfigError::Invalid {
                key: "location",
                reason: "coordinate out of range".to_owned(),
            });
        }
        if !matches!(
            self.log.level.to_ascii_lowercase().as_str(),
            "error" | "warn" | "info" | "debug" | "trace" | "off"
        ) {
            return Err(ConfigError::Invalid {
                key: "log.level",
                reason: format!("unsupported level `{}`", self.log.level),
            });
        }
        Ok(())
    }

    /// Per-request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Keep the `COLETA_*` entries of an environment listing.
///
/// Other variables are skipped without being decoded, so a non-UTF-8 value elsewhere
/// in the environment is harmless. A `COLETA_*` value that is not UTF-8 is an error.
fn coleta_vars<I>(vars: I) -> Result<Vec<(String, String)>, ConfigError>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut found = Vec::new();
    for (key, value) in vars {
        let Some(key) = key.to_str().filter(|key| key.starts_with("COLETA_")) else {
            continue;
        };
        let value = value.into_string().map_err(|raw| ConfigError::Invalid {
            key: "environment",
            reason: format!("{key} is not valid UTF-8: {}", raw.to_string_lossy()),
        })?;
        found.push((key.to_owned(), value));
    }
    Ok(found)
}

fn parse_permission(value: &str) -> Result<PermissionStatus, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "granted" => Ok(PermissionStatus::Granted),
        "denied" => Ok(PermissionStatus::Denied),
        other => Err(ConfigError::Invalid {
            key: "COLETA_LOCATION_PERMISSION",
            reason: format!("expected granted|denied, got `{other}`"),
        }),
    }
}

fn parse_degrees(key: &'static str, value: &str) -> Result<f64, ConfigError> {
    value.trim().parse().map_err(|err| ConfigError::Invalid {
        key,
        reason: format!("{err}"),
    })
}

fn validate_url(key: &'static str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            key,
            reason: format!("expected an http(s) URL, got `{trimmed}`"),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = AppConfig::from_yaml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "backend_api_url: http://10.0.2.2:3333\nlocation:\n  latitude: -20.94\n  longitude: -48.47\n"
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.backend_api_url, "http://10.0.2.2:3333");
        assert_eq!(config.locality_api_url, DEFAULT_LOCALITY_URL);
        assert_eq!(
            config.location.coordinate(),
            Some(Coordinate::new(-20.94, -48.47))
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = AppConfig::from_yaml_str("backend: http://x").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = AppConfig::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.yaml"));
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut config = AppConfig::default();
        config
            .apply_overrides([
                ("COLETA_BACKEND_URL", "http://backend:3333"),
                ("COLETA_LOCATION_PERMISSION", "Denied"),
                ("COLETA_TIMEOUT_SECS", "3"),
                ("HOME", "/root"),
            ])
            .unwrap();

        assert_eq!(config.backend_api_url, "http://backend:3333");
        assert_eq!(config.location.permission, PermissionStatus::Denied);
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn bad_override_is_reported() {
        let mut config = AppConfig::default();
        let err = config
            .apply_overrides([("COLETA_LATITUDE", "north")])
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "COLETA_LATITUDE",
                ..
            }
        ));
    }

    #[test]
    fn validation_rejects_half_a_coordinate_and_bad_urls() {
        let mut config = AppConfig::default();
        config.location.latitude = Some(1.0);
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.backend_api_url = "localhost:3333".to_owned();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn environment_listing_skips_undecodable_foreign_variables() {
        use std::os::unix::ffi::OsStringExt;

        let vars = vec![
            (
                OsString::from("UNRELATED_PATH"),
                OsString::from_vec(b"/tmp/caf\xe9".to_vec()),
            ),
            (
                OsString::from_vec(b"ODD_\xff_KEY".to_vec()),
                OsString::from("x"),
            ),
            (OsString::from("COLETA_LOG_LEVEL"), OsString::from("debug")),
        ];
        let found = coleta_vars(vars).unwrap();
        assert_eq!(
            found,
            vec![("COLETA_LOG_LEVEL".to_owned(), "debug".to_owned())]
        );
    }

    #[cfg(unix)]
    #[test]
    fn undecodable_coleta_variable_is_reported() {
        use std::os::unix::ffi::OsStringExt;

        let vars = vec![(
            OsString::from("COLETA_LOG_FILE"),
            OsString::from_vec(b"/tmp/caf\xe9.log".to_vec()),
        )];
        assert!(matches!(
            coleta_vars(vars).unwrap_err(),
            ConfigError::Invalid {
                key: "environment",
                ..
            }
        ));
    }
}
