use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::*;

use crate::error::*;
use crate::params::{Backend, Params};
use crate::real::Precision;

/// Environment variable pointing to an alternative config file
pub const CONFIG_ENV: &str = "SCAL_CONFIG";

/// Defaults file, e.g.
///
/// ```toml
/// [scal]
/// alpha = 2.5
/// incx = 2
/// n = 8
/// precision = "double"
/// backend = "emulated"
/// ```
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalTOML {
    #[serde(default)]
    pub scal: ScalSection,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalSection {
    pub alpha: Option<f64>,
    pub incx: Option<i64>,
    pub n: Option<i64>,
    pub precision: Option<Precision>,
    pub backend: Option<Backend>,
}

impl ScalTOML {
    pub fn from_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).log(Step::Config, "Invalid config TOML")
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).log(
            Step::Config,
            &format!("Cannot read config file {}", path.display()),
        )?;
        Self::from_str(&contents)
    }

    /// Resolve the config file: explicit path, then `$SCAL_CONFIG`, then the
    /// user config directory. Only the last one may be absent.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!("Load config from --config {}", path.display());
            return Self::load(path);
        }
        if let Some(path) = env::var_os(CONFIG_ENV) {
            debug!("Load config from ${}", CONFIG_ENV);
            return Self::load(PathBuf::from(path));
        }
        match default_path() {
            Some(ref path) if path.exists() => {
                debug!("Load config from {}", path.display());
                Self::load(path)
            }
            _ => {
                debug!("No config file, use built-in defaults");
                Ok(ScalTOML::default())
            }
        }
    }

    /// Apply the file on top of the built-in defaults
    pub fn params(&self) -> Params {
        let s = &self.scal;
        let d = Params::default();
        Params {
            alpha: s.alpha.unwrap_or(d.alpha),
            incx: s.incx.unwrap_or(d.incx),
            n: s.n.unwrap_or(d.n),
            precision: s.precision.unwrap_or(d.precision),
            backend: s.backend.unwrap_or(d.backend),
        }
    }

    pub fn as_toml(&self) -> Result<String> {
        toml::to_string(&self).log(Step::Config, "Cannot serialize config")
    }
}

/// `$XDG_CONFIG_HOME/accel-scal/config.toml` or the platform equivalent
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("accel-scal").join("config.toml"))
}
