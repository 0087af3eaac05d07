pub mod retry;

use anyhow::{Context, Result};
use std::{fs, path::Path, path::PathBuf};
use tracing::{info, warn};

use crate::models::common::{Config, ContractAddresses};

const ENV_PREFIX: &str = "NFT_INDEXER";

/// Shortens a hex address or hash for log output, e.g. `0x5FbDB2…0aa3`.
///
/// Values without a `0x` prefix or already short enough are returned untouched.
pub fn short_hex(value: impl AsRef<str>) -> String {
    short_hex_with(value, 6, 4)
}

pub fn short_hex_with(value: impl AsRef<str>, head: usize, tail: usize) -> String {
    let value = value.as_ref();
    if value.is_empty() {
        return "0x0000…0000".to_string();
    }
    if !value.starts_with("0x") || !value.is_ascii() || value.len() <= 2 + head + tail {
        return value.to_string();
    }

    format!("{}…{}", &value[..2 + head], &value[value.len() - tail..])
}

fn resolve_config_path(file_name: &Path) -> PathBuf {
    if file_name.is_absolute() || file_name.exists() {
        return file_name.to_path_buf();
    }
    // Fall back to the crate root so `cargo run` works from anywhere in the workspace
    Path::new(env!("CARGO_MANIFEST_DIR")).join(file_name)
}

pub fn load_config<P: AsRef<Path>>(file_name: P) -> Result<Config> {
    let config_path = resolve_config_path(file_name.as_ref());
    info!("Config path: {}", config_path.to_string_lossy());

    // YAML file first, then NFT_INDEXER__* environment overrides
    let settings = config::Config::builder()
        .add_source(config::File::from(config_path.as_path()))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("failed to read config file")?;

    let mut config: Config = settings
        .try_deserialize()
        .context("failed to parse config")?;

    // Normalize chain name for metric labels
    config.chain_name = config.chain_name.replace('-', "_");

    if let Some(deployments_file) = &config.deployments_file {
        let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
        let deployments = load_deployments(base_dir.join(deployments_file))?;
        info!(
            "Loaded deployments for chain {}: token {}, nft {}",
            deployments.chain_id,
            short_hex(deployments.token_address.to_string()),
            short_hex(deployments.nft_address.to_string())
        );
        config.networks.upsert(deployments);
    }

    if config.networks.is_empty() {
        warn!("No contract addresses configured; every chain will be rejected as unsupported");
    }

    Ok(config)
}

pub fn load_deployments<P: AsRef<Path>>(path: P) -> Result<ContractAddresses> {
    let path = path.as_ref();
    let label = path.to_string_lossy().to_string();

    let contents = fs::read_to_string(path).map_err(|source| {
        crate::models::errors::ConfigError::DeploymentsUnreadable {
            path: label.clone(),
            source,
        }
    })?;

    Ok(ContractAddresses::from_deployment_json(&contents, &label)?)
}

fn strip_html(error: &str) -> String {
    // If the error contains HTML tags, extract just the text content
    if error.contains("<!doctype html>") || error.contains("<html>") {
        // Remove all HTML tags and return the first non-empty line of text
        error
            .lines()
            .map(|line| line.trim())
            .find(|line| {
                !line.starts_with('<')
                    && !line.ends_with('>')
                    && !line.is_empty()
                    && *line != "html"
                    && *line != "body"
            })
            .unwrap_or(error)
            .to_string()
    } else {
        error.to_string()
    }
}
