//! `qaflow config` -- display resolved configuration.
//!
//! Shows the full resolved configuration as formatted JSON, or a single
//! section by name.
//!
//! # Examples
//!
//! ```text
//! qaflow config
//! qaflow config --section services
//! ```

use qaflow_types::QaflowConfig;

/// Display the resolved configuration as formatted JSON.
pub fn config_show(config: &QaflowConfig) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

/// Display one configuration section.
pub fn config_section(config: &QaflowConfig, section: &str) -> anyhow::Result<()> {
    let value = serde_json::to_value(config)?;
    match value.get(section) {
        Some(v) => {
            println!("{}", serde_json::to_string_pretty(v)?);
            Ok(())
        }
        None => {
            let available: Vec<&str> = value
                .as_object()
                .map(|m| m.keys().map(|k| k.as_str()).collect())
                .unwrap_or_default();
            anyhow::bail!(
                "unknown section '{section}' (available: {})",
                available.join(", ")
            )
        }
    }
}
