use std::path::Path;

use anyhow::Context;
use branchstore_kernel::RegistryConfig;

/// Load registry settings from a YAML file, or defaults when no path is given.
pub fn load(path: Option<&Path>) -> anyhow::Result<RegistryConfig> {
    let Some(path) = path else {
        return Ok(RegistryConfig::default());
    };
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening config {}", path.display()))?;
    let config: RegistryConfig = serde_yaml::from_reader(file)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("validating config {}", path.display()))?;
    Ok(config)
}
