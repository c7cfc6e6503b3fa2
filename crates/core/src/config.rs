use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use toml_edit::{value, Array, DocumentMut};
use tracing::{info, warn};
use welcometale_text::strip_color_codes;

pub const DEFAULT_CONFIG_FILE: &str = "Config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not access config file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not valid TOML: {}", .path.display(), .source)]
    Syntax {
        path: PathBuf,
        #[source]
        source: toml_edit::TomlError,
    },
    #[error("{} has an invalid value: {}", .path.display(), .source)]
    Invalid {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Stands in for a file name when a config is parsed from a string.
const INLINE_SOURCE: &str = "<inline config>";

/// A chat message template. In the config file it is either a single string
/// or an array of lines.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "MessageLines", into = "MessageLines")]
pub struct MessageText(String);

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum MessageLines {
    Single(String),
    Lines(Vec<String>),
}

impl From<MessageLines> for MessageText {
    fn from(lines: MessageLines) -> Self {
        match lines {
            MessageLines::Single(text) => MessageText(text),
            MessageLines::Lines(lines) => MessageText(lines.join("\n")),
        }
    }
}

impl From<MessageText> for MessageLines {
    fn from(text: MessageText) -> Self {
        if text.0.contains('\n') {
            MessageLines::Lines(text.0.split('\n').map(str::to_owned).collect())
        } else {
            MessageLines::Single(text.0)
        }
    }
}

impl From<&str> for MessageText {
    fn from(text: &str) -> Self {
        MessageText(text.to_owned())
    }
}

impl MessageText {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

trait ConfigSerializeDefault {
    fn fix_config(self, name: &str, doc: &mut DocumentMut);
}

macro_rules! impl_simple_default {
    ( $( $type:ty ),* ) => {
        $(
            impl ConfigSerializeDefault for $type {
                fn fix_config(self, name: &str, doc: &mut DocumentMut) {
                    doc.entry(name).or_insert_with(|| value(self));
                }
            }
        )*
    }
}

impl_simple_default!(String, bool);

impl ConfigSerializeDefault for MessageText {
    fn fix_config(self, name: &str, doc: &mut DocumentMut) {
        if self.0.contains('\n') {
            let lines: Array = self.0.split('\n').collect();
            doc.entry(name).or_insert_with(|| value(lines));
        } else {
            self.0.fix_config(name, doc);
        }
    }
}

macro_rules! gen_config {
    (
        $( $(#[$meta:meta])* $name:ident: $type:ty = $default:expr ),* $(,)?
    ) => {
        #[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
        pub struct WelcomeConfig {
            $(
                $(#[$meta])*
                pub $name: $type,
            )*
        }

        impl Default for WelcomeConfig {
            fn default() -> Self {
                WelcomeConfig {
                    $( $name: $default.into(), )*
                }
            }
        }

        impl WelcomeConfig {
            fn fix_config(doc: &mut DocumentMut) {
                $(
                    <$type as ConfigSerializeDefault>::fix_config($default.into(), stringify!($name), doc);
                )*
            }
        }
    };
}

gen_config! {
    /// Broadcast to everyone when a player is ready. Supports `{player}`.
    join_message: MessageText = "&3&l > &3{player} &bjoined",
    /// Sent only to the player who joined. Supports `{player}`.
    welcome_player_message: MessageText = "&7Welcome &a{player} &7to the server!",
    /// Broadcast to everyone when a player leaves. Supports `{player}`.
    leave_message: MessageText = "&4&l > &4{player} &cleft",
    disable_default_join_message: bool = true,
    message_reloaded: String = "&aConfiguration reloaded successfully!",
    no_permission: String = "&cYou don't have permission to use this command!",
    check_for_updates: bool = true,
}

impl WelcomeConfig {
    /// Reads the config at `path`, writing back any keys that are missing
    /// with their default value. A missing file is created.
    pub fn load(path: &Path) -> Result<WelcomeConfig, ConfigError> {
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_owned(),
                    source,
                });
            }
        };

        let patched = Self::with_defaults(&source, path)?;
        if source != patched {
            fs::write(path, &patched).map_err(|source| ConfigError::Io {
                path: path.to_owned(),
                source,
            })?;
            info!("Wrote default config values to {}", path.display());
        }

        Self::parse(&patched, path)
    }

    /// Parses a config document, using defaults for any missing key.
    pub fn from_toml(source: &str) -> Result<WelcomeConfig, ConfigError> {
        let path = Path::new(INLINE_SOURCE);
        Self::parse(&Self::with_defaults(source, path)?, path)
    }

    fn parse(patched: &str, path: &Path) -> Result<WelcomeConfig, ConfigError> {
        toml::from_str(patched).map_err(|source| ConfigError::Invalid {
            path: path.to_owned(),
            source,
        })
    }

    fn with_defaults(source: &str, path: &Path) -> Result<String, ConfigError> {
        let mut doc = source
            .parse::<DocumentMut>()
            .map_err(|source| ConfigError::Syntax {
                path: path.to_owned(),
                source,
            })?;
        Self::fix_config(&mut doc);
        Ok(doc.to_string())
    }
}

/// Shared handle to the live config. Readers get a snapshot that stays valid
/// across a reload.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    current: RwLock<Arc<WelcomeConfig>>,
}

impl ConfigStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<ConfigStore, ConfigError> {
        let path = path.into();
        let config = WelcomeConfig::load(&path)?;
        Ok(ConfigStore::new(path, config))
    }

    pub fn new(path: impl Into<PathBuf>, config: WelcomeConfig) -> ConfigStore {
        ConfigStore {
            path: path.into(),
            current: RwLock::new(Arc::new(config)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> Arc<WelcomeConfig> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Re-reads the config file. If it can't be loaded the previous config
    /// stays active.
    pub fn reload(&self) -> Result<Arc<WelcomeConfig>, ConfigError> {
        let config = match WelcomeConfig::load(&self.path) {
            Ok(config) => Arc::new(config),
            Err(err) => {
                warn!("Keeping previous config, reload failed: {}", err);
                return Err(err);
            }
        };
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = config.clone();
        info!("{}", strip_color_codes(&config.message_reloaded));
        Ok(config)
    }
}
