use std::collections::BTreeSet;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use hla3d_epitope::{AlleleField, CoverOptions, DEFAULT_MAX_ITERATIONS};

use crate::styles::StyleOptions;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CoverConfig {
    pub max_iterations: usize,
    pub restrict_to_known_structures: bool,
    pub exclude: Vec<String>,
    pub prefer: Option<Vec<String>>,
}

impl Default for CoverConfig {
    fn default() -> Self {
        CoverConfig {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            restrict_to_known_structures: true,
            exclude: Vec::new(),
            prefer: None,
        }
    }
}

impl CoverConfig {
    pub fn to_options(&self) -> CoverOptions {
        CoverOptions {
            exclude: self.exclude.iter().cloned().collect(),
            restrict_to_known_structures: self.restrict_to_known_structures,
            preference: self
                .prefer
                .as_ref()
                .map(|p| p.iter().cloned().collect::<BTreeSet<String>>()),
            max_iterations: self.max_iterations,
            allele_field: AlleleField::Luminex,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Hla3dConfig {
    /// JSON epitope table
    pub epitope_db: PathBuf,
    /// JSON donor profiles, needed only to visualise transplants
    #[serde(default)]
    pub desa_db: Option<PathBuf>,
    /// Root of the structural inventory
    pub structure_dir: PathBuf,
    #[serde(default)]
    pub cover: CoverConfig,
    #[serde(default)]
    pub style: StyleOptions,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No DESA table configured, set `desa_db` to visualise transplants")]
    MissingDesaTable,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

impl Hla3dConfig {
    ///
    /// Make every relative path of the configuration relative to `base`.
    ///
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        self.epitope_db = resolve(self.epitope_db);
        self.desa_db = self.desa_db.map(resolve);
        self.structure_dir = resolve(self.structure_dir);
        self
    }
}

impl TryFrom<&Path> for Hla3dConfig {
    type Error = ConfigError;

    ///
    /// Read a TOML configuration. Relative paths inside it are taken relative
    /// to the directory of the configuration file.
    ///
    fn try_from(path: &Path) -> ConfigResult<Self> {
        let toml_str = read_to_string(path)?;
        let config: Hla3dConfig = toml::from_str(&toml_str)?;
        Ok(match path.parent() {
            Some(parent) => config.resolve_paths(parent),
            None => config,
        })
    }
}
