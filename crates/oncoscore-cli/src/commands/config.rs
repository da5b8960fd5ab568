//! JSON configuration loading and command-line overrides.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ArgMatches;

use oncoscore_classifiers::config::DiagnosisConfig;

/// Load a diagnosis configuration from a JSON file. Missing fields take their
/// default values.
pub fn load_diagnosis_config<P: AsRef<Path>>(path: P) -> Result<DiagnosisConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: DiagnosisConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

/// Resolve the configuration of a subcommand: the optional `config` file (or
/// the defaults), then `--test-fraction`, `--seed` and `--no-standardize`
/// overrides where the subcommand defines them.
pub fn from_arguments(matches: &ArgMatches) -> Result<DiagnosisConfig> {
    let config_path = matches.get_one::<PathBuf>("config");

    let mut config = match config_path {
        Some(path) => {
            eprintln!("[oncoscore] Using config: {:?}", path);
            load_diagnosis_config(path)?
        }
        None => {
            eprintln!("[oncoscore] No config provided; using defaults.");
            DiagnosisConfig::default()
        }
    };

    if let Ok(Some(&fraction)) = matches.try_get_one::<f64>("test_fraction") {
        config.test_fraction = fraction;
    }
    if let Ok(Some(&seed)) = matches.try_get_one::<u64>("seed") {
        config.seed = seed;
    }
    if let Ok(Some(&true)) = matches.try_get_one::<bool>("no_standardize") {
        config.standardize = false;
    }

    if config_path.is_none() {
        let default_json = serde_json::to_string_pretty(&config).unwrap_or_default();
        eprintln!("[oncoscore] Effective config:\n{}", default_json);
    }

    Ok(config)
}
