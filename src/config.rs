// SPDX-FileCopyrightText: 2026 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Persisted tool settings.
//!
//! Specify the layout for the settings file that gitig keeps at
//! `$XDG_CONFIG_HOME/gitig/config.toml`. The only durable setting today is
//! the local template directory: when set, template content and the catalog
//! both come from that directory instead of the upstream repository.
//!
//! Settings survive across runs, so `gitig local set` in one invocation
//! changes where every later invocation fetches from, until `gitig local
//! reset` clears it again.

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Error as FmtError, Formatter, Result as FmtResult},
    fs::{read_to_string, write},
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::debug;

/// Settings file layout.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Local template directory to fetch from instead of upstream.
    pub local_templates: Option<PathBuf>,
}

impl Settings {
    /// Load settings from given path.
    ///
    /// A missing settings file is not an error; it simply means nothing has
    /// been persisted yet, so defaults apply.
    ///
    /// # Errors
    ///
    /// - Return [`ConfigError::ReadSettings`] if the file exists but cannot
    ///   be read.
    /// - Return [`ConfigError::Deserialize`] if the file fails to parse.
    /// - Return [`ConfigError::ShellExpansion`] if path expansion fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = match read_to_string(path.as_ref()) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("no settings file at {}, using defaults", path.as_ref().display());
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(ConfigError::ReadSettings {
                    source: err,
                    path: path.as_ref().to_path_buf(),
                })
            }
        };

        data.parse()
    }

    /// Persist settings to given path, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// - Return [`ConfigError::WriteSettings`] if the file or its parent
    ///   directories cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            mkdirp::mkdirp(parent).map_err(|err| ConfigError::WriteSettings {
                source: err,
                path: path.as_ref().to_path_buf(),
            })?;
        }

        write(path.as_ref(), self.to_string().as_bytes()).map_err(|err| {
            ConfigError::WriteSettings {
                source: err,
                path: path.as_ref().to_path_buf(),
            }
        })?;

        Ok(())
    }
}

impl FromStr for Settings {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let mut settings: Settings = toml::de::from_str(data).map_err(ConfigError::Deserialize)?;

        // INVARIANT: Perform shell expansion on local template directory.
        if let Some(path) = settings.local_templates {
            let expanded = shellexpand::full(path.to_string_lossy().as_ref())
                .map_err(ConfigError::ShellExpansion)?
                .into_owned();
            settings.local_templates = Some(PathBuf::from(expanded));
        }

        Ok(settings)
    }
}

impl Display for Settings {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(
            toml::ser::to_string_pretty(self)
                .map_err(ConfigError::Serialize)?
                .as_str(),
        )
    }
}

/// Settings error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to deserialize settings.
    #[error(transparent)]
    Deserialize(#[from] toml::de::Error),

    /// Failed to serialize settings.
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),

    /// Failed to perform shell expansion on settings.
    #[error(transparent)]
    ShellExpansion(#[from] shellexpand::LookupError<std::env::VarError>),

    /// Settings file cannot be read from.
    #[error("failed to read settings file at {:?}", path.display())]
    ReadSettings {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Settings file cannot be written to.
    #[error("failed to write settings file at {:?}", path.display())]
    WriteSettings {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
}

impl From<ConfigError> for FmtError {
    fn from(_: ConfigError) -> Self {
        FmtError
    }
}

/// Friendly result alias :3
type Result<T, E = ConfigError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;

    #[sealed_test(env = [("TEMPLATES", "/home/blah/gitignore")])]
    fn deserialize_settings() -> anyhow::Result<()> {
        let result: Settings = r#"
            local_templates = "$TEMPLATES"
        "#
        .parse()?;

        let expect = Settings {
            local_templates: Some(PathBuf::from("/home/blah/gitignore")),
        };

        assert_eq!(result, expect);

        Ok(())
    }

    #[test]
    fn serialize_settings() {
        let result = Settings {
            local_templates: Some(PathBuf::from("/home/blah/gitignore")),
        }
        .to_string();

        let expect = indoc! {r#"
            local_templates = "/home/blah/gitignore"
        "#};

        assert_eq!(result, expect);
    }

    #[test]
    fn unset_local_templates_round_trips() -> anyhow::Result<()> {
        let settings: Settings = Settings::default().to_string().parse()?;

        assert_eq!(settings, Settings::default());

        Ok(())
    }

    #[test]
    fn load_missing_file_uses_defaults() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;

        let settings = Settings::load(dir.path().join("config.toml"))?;

        assert_eq!(settings, Settings::default());

        Ok(())
    }

    #[test]
    fn save_then_load_round_trips() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("gitig").join("config.toml");
        let settings = Settings {
            local_templates: Some(PathBuf::from("/home/blah/gitignore")),
        };

        settings.save(&path)?;
        let loaded = Settings::load(&path)?;

        assert_eq!(loaded, settings);

        Ok(())
    }
}
