use std::fmt;
use std::fs::File;
use std::io::{self, prelude::*};
use std::path::{Path, PathBuf};

use yaml_rust::{ScanError, YamlLoader};

use crate::ui::UiName;

pub const DEFAULT_CONFIG_FILE: &'static str = ".harrier.yml";

/// Runner configuration. Test cases themselves are configured solely through
/// their constructors; this covers only how the runner presents results.
#[derive(Debug)]
pub struct Config {
    pub ui: UiName,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ui: UiName::default(),
            log_file: None,
        }
    }
}

#[derive(Debug)]
pub enum LoadConfigError {
    Io(io::Error),
    Yaml(ScanError),
    Invalid(String),
    UnknownOption(String),
    NotFound,
}

impl fmt::Display for LoadConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadConfigError::Io(err) => write!(f, "cannot read config file: {}", err),
            LoadConfigError::Yaml(err) => write!(f, "malformed config file: {}", err),
            LoadConfigError::Invalid(what) => write!(f, "invalid config: {}", what),
            LoadConfigError::UnknownOption(option) => {
                write!(f, "unknown config option: {}", option)
            }
            LoadConfigError::NotFound => write!(f, "config file not found"),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(filepath: P) -> Result<Self, LoadConfigError> {
        let mut file = File::open(filepath).map_err(LoadConfigError::Io)?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(LoadConfigError::Io)?;

        Self::load_from_str(&content)
    }

    pub fn load_from_str(content: &str) -> Result<Self, LoadConfigError> {
        let yaml = YamlLoader::load_from_str(content).map_err(LoadConfigError::Yaml)?;

        let config = yaml
            .get(0)
            .ok_or_else(|| LoadConfigError::Invalid("empty file".to_string()))
            .and_then(|item| {
                item.as_hash()
                    .ok_or_else(|| LoadConfigError::Invalid("invalid format".to_string()))
            })?;

        let mut result = Config::default();

        for (key, value) in config {
            match key
                .as_str()
                .ok_or_else(|| LoadConfigError::Invalid("invalid format".to_string()))?
            {
                "ui" => {
                    result.ui = match value.as_str() {
                        Some("cli") => UiName::Cli,
                        Some("json") => UiName::Json,
                        _ => {
                            return Err(LoadConfigError::Invalid(
                                "ui must be \"cli\" or \"json\"".to_string(),
                            ))
                        }
                    };
                }
                "log" => {
                    result.log_file = Some(
                        value
                            .as_str()
                            .ok_or_else(|| {
                                LoadConfigError::Invalid("log must be a file path".to_string())
                            })?
                            .into(),
                    );
                }
                option => return Err(LoadConfigError::UnknownOption(option.to_string())),
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_options_are_parsed() {
        let config = Config::load_from_str("ui: json\nlog: harrier.log").unwrap();

        assert!(matches!(config.ui, UiName::Json));
        assert_eq!(config.log_file, Some(PathBuf::from("harrier.log")));
    }

    #[test]
    fn missing_options_keep_defaults() {
        let config = Config::load_from_str("ui: cli").unwrap();

        assert!(matches!(config.ui, UiName::Cli));
        assert!(config.log_file.is_none());
    }

    #[test]
    fn unknown_option_is_rejected() {
        match Config::load_from_str("jobs: 4") {
            Err(LoadConfigError::UnknownOption(option)) => assert_eq!(option, "jobs"),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn invalid_ui_is_rejected() {
        assert!(matches!(
            Config::load_from_str("ui: fancy"),
            Err(LoadConfigError::Invalid(_))
        ));
    }

    #[test]
    fn empty_file_is_invalid() {
        assert!(matches!(
            Config::load_from_str(""),
            Err(LoadConfigError::Invalid(_))
        ));
    }
}
