use anyhow::Context;
use clap::Parser;
use odict::utils::error::OdictError;
use odict::utils::{logger, validation::Validate};
use odict::{CliConfig, LocalStorage, RewriteConfig, RewriteEngine};
use std::io::Write;

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        fail("Configuration validation failed", &e);
    }

    let mut rules = match &config.rules {
        Some(path) => load_rules(path).unwrap_or_else(|e| fail("Loading rules failed", &e)),
        None => RewriteConfig::default(),
    };
    if config.caseless {
        rules.map.caseless = Some(true);
    }

    let engine = RewriteEngine::new(LocalStorage::new(".".to_string()), rules, config.emit);

    let output = engine
        .run(&config.input)
        .unwrap_or_else(|e| fail("Rewrite failed", &e));

    match &config.output {
        Some(path) => {
            if let Err(e) = engine.write_output(path, &output.bytes) {
                fail("Writing output failed", &e);
            }
            tracing::info!("Output saved to: {}", path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&output.bytes)
                .and_then(|_| stdout.flush())
                .context("failed to write to stdout")?;
        }
    }

    Ok(())
}

fn load_rules(path: &str) -> odict::Result<RewriteConfig> {
    let rules = RewriteConfig::from_file(path)?;
    rules.validate()?;
    tracing::debug!("Loaded {} rules from {}", rules.rules.len(), path);
    Ok(rules)
}

fn fail(stage: &str, e: &OdictError) -> ! {
    tracing::error!("{}: {} (category: {:?})", stage, e, e.category());
    eprintln!("{}: {}", stage, e);
    eprintln!("Hint: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}
