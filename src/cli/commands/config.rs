//! Show the effective configuration.

use anyhow::Result;

use crate::domain::models::Config;

/// Print the configuration with credentials masked.
pub fn execute(config: &Config, json: bool) -> Result<()> {
    let redacted = config.redacted();
    if json {
        println!("{}", serde_json::to_string_pretty(&redacted)?);
    } else {
        print!("{}", serde_yaml::to_string(&redacted)?);
    }
    Ok(())
}
