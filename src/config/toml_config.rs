use crate::domain::model::ValueList;
use crate::utils::error::{OdictError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_pattern, validate_replacement, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RewriteConfig {
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub assertions: Vec<Assertion>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapConfig {
    /// Compare keys case-insensitively.
    pub caseless: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Rule {
    Add { key: String, value: String },
    Set { key: String, values: ValueList },
    Delete { key: String },
    Replace { pattern: String, replacement: String },
    Extend { entries: Vec<(String, String)> },
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Add { .. } => "add",
            Rule::Set { .. } => "set",
            Rule::Delete { .. } => "delete",
            Rule::Replace { .. } => "replace",
            Rule::Extend { .. } => "extend",
        }
    }
}

/// A regex checked against the rewritten map with `match_regex`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assertion {
    pub pattern: String,
    /// Whether the pattern must match (default) or must not.
    #[serde(default = "default_expect")]
    pub expect: bool,
}

fn default_expect() -> bool {
    true
}

impl RewriteConfig {
    /// Loads rules from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(OdictError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// Expands `${VAR}` from the environment. Unset variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn is_caseless(&self) -> bool {
        self.map.caseless.unwrap_or(false)
    }

    pub fn validate_config(&self) -> Result<()> {
        for (index, rule) in self.rules.iter().enumerate() {
            let field = format!("rules[{}]", index);
            match rule {
                Rule::Add { key, .. } | Rule::Delete { key } => {
                    validate_non_empty_string(&format!("{}.key", field), key)?;
                }
                Rule::Set { key, values } => {
                    validate_non_empty_string(&format!("{}.key", field), key)?;
                    if let ValueList::Scalar(value) = values {
                        return Err(OdictError::InvalidConfigValueError {
                            field: format!("{}.values", field),
                            value: value.clone(),
                            reason: "Expected a list of values instead of a string".to_string(),
                        });
                    }
                }
                Rule::Replace {
                    pattern,
                    replacement,
                } => {
                    validate_pattern(&format!("{}.pattern", field), pattern)?;
                    validate_replacement(&format!("{}.replacement", field), pattern, replacement)?;
                }
                Rule::Extend { entries } => {
                    for (position, (key, _)) in entries.iter().enumerate() {
                        validate_non_empty_string(
                            &format!("{}.entries[{}]", field, position),
                            key,
                        )?;
                    }
                }
            }
        }

        for (index, assertion) in self.assertions.iter().enumerate() {
            validate_pattern(&format!("assertions[{}].pattern", index), &assertion.pattern)?;
        }

        Ok(())
    }
}

impl Validate for RewriteConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
