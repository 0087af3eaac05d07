use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("Unsupported chain ID: {chain_id} (no contract addresses configured)")]
    UnsupportedChainId { chain_id: u64 },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read deployments file {path}: {source}")]
    DeploymentsUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse deployments file {path}: {source}")]
    DeploymentsInvalid {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Missing {field} address in deployments file {path}")]
    MissingDeploymentAddress { field: &'static str, path: String },
    #[error("Invalid {field} address {value} in deployments file {path}")]
    InvalidDeploymentAddress {
        field: &'static str,
        path: String,
        value: String,
    },
}

#[derive(Error, Debug)]
pub enum ReceiptError {
    #[error("No receipt found for transaction {tx_hash}")]
    NotFound { tx_hash: String },
}
