pub mod cli;
pub mod toml_config;

use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

/// What the rewrite engine renders after the rules ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum EmitFormat {
    /// CRLF-terminated `key: value` lines
    #[default]
    Wire,
    /// Pretty JSON snapshot
    State,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "odict")]
#[command(about = "Apply ordered header rewrite rules to a snapshot")]
pub struct CliConfig {
    #[arg(long, help = "Snapshot file: JSON array of [key, value] pairs")]
    pub input: String,

    #[arg(long, help = "TOML rules file")]
    pub rules: Option<String>,

    #[arg(long, help = "Write output here instead of stdout")]
    pub output: Option<String>,

    #[arg(long, help = "Compare keys case-insensitively")]
    pub caseless: bool,

    #[arg(long, value_enum, default_value = "wire")]
    pub emit: EmitFormat,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input)?;
        if let Some(rules) = &self.rules {
            validate_path("rules", rules)?;
        }
        if let Some(output) = &self.output {
            validate_path("output", output)?;
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cli_args() {
        let config = CliConfig::try_parse_from([
            "odict",
            "--input",
            "headers.json",
            "--rules",
            "rules.toml",
            "--caseless",
            "--emit",
            "state",
        ])
        .unwrap();

        assert_eq!(config.input, "headers.json");
        assert_eq!(config.rules.as_deref(), Some("rules.toml"));
        assert!(config.caseless);
        assert_eq!(config.emit, EmitFormat::State);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_emit_defaults_to_wire() {
        let config = CliConfig::try_parse_from(["odict", "--input", "h.json"]).unwrap();
        assert_eq!(config.emit, EmitFormat::Wire);
        assert!(config.output.is_none());
    }

    #[test]
    fn test_input_is_required() {
        assert!(CliConfig::try_parse_from(["odict"]).is_err());
    }
}
