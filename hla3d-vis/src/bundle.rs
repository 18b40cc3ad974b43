use hla3d_epitope::{DesaRepository, EpitopeRepository};
use hla3d_structure::StructureFileLocator;

use crate::config::Hla3dConfig;
use crate::error::Result;

///
/// Reference data shared read-only by every visualization request: the
/// epitope table, the optional donor profiles and the structural inventory.
///
#[derive(Debug, Clone)]
pub struct ReferenceBundle {
    pub epitopes: EpitopeRepository,
    pub desa: Option<DesaRepository>,
    pub locator: StructureFileLocator,
}

impl ReferenceBundle {
    pub fn new(
        epitopes: EpitopeRepository,
        desa: Option<DesaRepository>,
        locator: StructureFileLocator,
    ) -> Self {
        ReferenceBundle {
            epitopes,
            desa,
            locator,
        }
    }

    ///
    /// Load every table named by a configuration. Meant to run once at startup.
    ///
    pub fn load(config: &Hla3dConfig) -> Result<Self> {
        let epitopes = EpitopeRepository::from_json(&config.epitope_db)?;
        let desa = match &config.desa_db {
            Some(path) => Some(DesaRepository::from_json(path)?),
            None => None,
        };
        if !config.structure_dir.is_dir() {
            log::warn!(
                "Structure directory {} does not exist, no structure will be found",
                config.structure_dir.display()
            );
        }
        let locator = StructureFileLocator::new(&config.structure_dir);

        Ok(ReferenceBundle::new(epitopes, desa, locator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::error::VisError;

    #[rstest]
    fn test_load() {
        let config = Hla3dConfig::try_from(Path::new("../tests/data/hla3d.toml")).unwrap();
        let bundle = ReferenceBundle::load(&config).unwrap();

        assert_eq!(bundle.epitopes.len(), 25);
        assert_eq!(bundle.desa.map(|d| d.len()), Some(3));
    }

    #[rstest]
    fn test_load_without_desa() {
        let config = Hla3dConfig::try_from(Path::new("../tests/data/hla3d_minimal.toml")).unwrap();
        let bundle = ReferenceBundle::load(&config).unwrap();
        assert!(bundle.desa.is_none());
    }

    #[rstest]
    fn test_load_missing_epitope_table() {
        let mut config =
            Hla3dConfig::try_from(Path::new("../tests/data/hla3d_minimal.toml")).unwrap();
        config.epitope_db = "../tests/data/nope.json".into();
        assert!(matches!(
            ReferenceBundle::load(&config),
            Err(VisError::Epitope(_))
        ));
    }
}
