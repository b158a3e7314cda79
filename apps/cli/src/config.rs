//! Layered configuration: built-in defaults, overridden by a TOML file,
//! overridden by `NEBULA_`-prefixed environment variables. CLI flags win
//! over all three by being applied after [`Settings::load`] returns.

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Config-file-resident settings. Currently just the server bind address —
/// everything else the CLI needs is either a required positional argument
/// or has a sensible built-in default already expressed on the `clap` side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub bind: Option<String>,
}

impl Settings {
    /// Load settings from (in ascending priority) built-in defaults, the
    /// given file (or the default search path if none given), and
    /// `NEBULA_*` environment variables.
    pub fn load(explicit_path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Settings::default()));

        match explicit_path {
            Some(path) => {
                figment = figment.merge(Toml::file(path));
            }
            None => {
                if let Some(path) = default_config_path() {
                    figment = figment.merge(Toml::file(path));
                }
                figment = figment.merge(Toml::file("nebula.toml"));
            }
        }

        figment = figment.merge(Env::prefixed("NEBULA_"));
        Ok(figment.extract()?)
    }
}

fn default_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|dir| dir.join("nebula").join("config.toml"))
}
