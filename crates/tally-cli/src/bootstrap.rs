use std::path::Path;

use anyhow::Context;
use tally_config::TallyConfig;

/// Load layered settings for the workspace at `root`, honoring `<root>/.env`.
pub fn load_config(root: &Path) -> anyhow::Result<TallyConfig> {
    TallyConfig::load_with_dotenv(root)
        .with_context(|| format!("failed to load settings under {}", root.display()))
}

/// Database file name to look for while searching for the workspace root.
/// Settings files are not read yet, so only defaults and `TALLY_*` apply.
pub fn database_marker() -> anyhow::Result<String> {
    let config = TallyConfig::from_env().context("failed to read TALLY_* settings")?;
    Ok(config.paths.database_file)
}
