use std::{fs, path::Path};

use crate::{DomainsError, TigerShield, TigerShieldSpec};

/// Load a tiger shield spec from YAML on disk.
pub fn load_shield_yaml(path: impl AsRef<Path>) -> Result<TigerShieldSpec, DomainsError> {
    let yaml = fs::read_to_string(path)?;
    let spec: TigerShieldSpec = serde_yaml::from_str(&yaml)?;
    Ok(spec)
}

/// Parse a tiger shield spec from a YAML string and build it.
pub fn shield_from_yaml_str(yaml: &str) -> Result<TigerShield, DomainsError> {
    let spec: TigerShieldSpec = serde_yaml::from_str(yaml)?;
    spec.build()
}

/// Load and build a tiger shield from a YAML file.
pub fn build_shield_yaml(path: impl AsRef<Path>) -> Result<TigerShield, DomainsError> {
    load_shield_yaml(path)?.build()
}

/// Serialize and write a tiger shield spec to YAML.
pub fn save_shield_yaml(path: impl AsRef<Path>, spec: &TigerShieldSpec) -> Result<(), DomainsError> {
    let yaml = serde_yaml::to_string(spec)?;
    fs::write(path, yaml)?;
    Ok(())
}
