use crate::config::toml_config::{Assertion, RewriteConfig, Rule};
use crate::config::EmitFormat;
use crate::core::normalize::{CaseFold, Identity, KeyNormalizer};
use crate::core::odict::OrderedMultiMap;
use crate::domain::model::State;
use crate::domain::ports::Storage;
use crate::utils::error::{OdictError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteReport {
    pub rules_applied: usize,
    pub substitutions: usize,
    pub entries: usize,
}

#[derive(Debug, Clone)]
pub struct RewriteOutput {
    pub bytes: Vec<u8>,
    pub report: RewriteReport,
}

/// Loads a snapshot, runs the configured rules over it and renders the result.
pub struct RewriteEngine<S: Storage> {
    storage: S,
    config: RewriteConfig,
    emit: EmitFormat,
}

impl<S: Storage> RewriteEngine<S> {
    pub fn new(storage: S, config: RewriteConfig, emit: EmitFormat) -> Self {
        Self {
            storage,
            config,
            emit,
        }
    }

    pub fn run(&self, input: &str) -> Result<RewriteOutput> {
        tracing::info!("Loading snapshot from {}", input);
        let raw = self.storage.read_file(input)?;
        let state: State = serde_json::from_slice(&raw)?;
        tracing::debug!("Snapshot holds {} entries", state.len());

        if self.config.is_caseless() {
            self.process::<CaseFold>(state)
        } else {
            self.process::<Identity>(state)
        }
    }

    pub fn write_output(&self, path: &str, bytes: &[u8]) -> Result<()> {
        tracing::debug!("Writing {} bytes to {}", bytes.len(), path);
        self.storage.write_file(path, bytes)
    }

    fn process<N: KeyNormalizer>(&self, state: State) -> Result<RewriteOutput> {
        let mut map = OrderedMultiMap::<N>::from_state(state);

        let report = apply_rules(&mut map, &self.config.rules)?;
        check_assertions(&map, &self.config.assertions)?;

        let bytes = match self.emit {
            EmitFormat::Wire => map.format(),
            EmitFormat::State => serde_json::to_vec_pretty(&map.get_state(false))?,
        };

        tracing::info!(
            "Applied {} rules ({} substitutions), {} entries remain",
            report.rules_applied,
            report.substitutions,
            report.entries
        );

        Ok(RewriteOutput { bytes, report })
    }
}

pub fn apply_rules<N: KeyNormalizer>(
    map: &mut OrderedMultiMap<N>,
    rules: &[Rule],
) -> Result<RewriteReport> {
    let mut report = RewriteReport::default();

    for (index, rule) in rules.iter().enumerate() {
        tracing::debug!("Applying rule {} ({})", index, rule.name());
        match rule {
            Rule::Add { key, value } => map.add(key.as_str(), value.as_str()),
            Rule::Set { key, values } => map.set_values(key, values.clone())?,
            Rule::Delete { key } => map.delete(key),
            Rule::Replace {
                pattern,
                replacement,
            } => report.substitutions += map.replace(pattern, replacement)?,
            Rule::Extend { entries } => map.extend(entries.iter().cloned()),
        }
        report.rules_applied += 1;
    }

    report.entries = map.len();
    Ok(report)
}

pub fn check_assertions<N: KeyNormalizer>(
    map: &OrderedMultiMap<N>,
    assertions: &[Assertion],
) -> Result<()> {
    for assertion in assertions {
        let matched = map.match_regex(&assertion.pattern)?;
        if matched != assertion.expect {
            return Err(OdictError::ProcessingError {
                message: format!(
                    "assertion failed: pattern '{}' was expected {}to match",
                    assertion.pattern,
                    if assertion.expect { "" } else { "not " }
                ),
            });
        }
    }
    Ok(())
}
