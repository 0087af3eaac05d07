use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use axum::{Router, http::StatusCode, routing::get};
use opentelemetry::KeyValue;
use opentelemetry::metrics::{Counter, Gauge, Histogram, MeterProvider};
use opentelemetry_sdk::metrics::{MetricError, SdkMeterProvider};
use prometheus::{Encoder, TextEncoder};
use std::net::SocketAddr;

use crate::models::datasets::transfers::MintMatchKind;

pub struct Metrics {
    registry: Arc<prometheus::Registry>,
    _provider: SdkMeterProvider,
    pub chain_name: String,

    // Ownership metrics
    pub transfer_logs_scanned: Counter<u64>,
    pub latest_scanned_block: Gauge<u64>,
    pub owned_tokens: Gauge<u64>,
    pub reconstruction_time: Gauge<f64>,

    // Mint metrics
    pub mints_resolved: Counter<u64>,
    pub mints_unresolved: Counter<u64>,

    // RPC metrics
    pub rpc_requests: Counter<u64>,
    pub rpc_errors: Counter<u64>,
    pub rpc_latency: Histogram<f64>,
}

impl Metrics {
    pub fn new(chain_name: String) -> Result<Self, MetricError> {
        // Create a new prometheus registry
        let registry = prometheus::Registry::new();

        // Configure OpenTelemetry to use this registry
        let exporter = opentelemetry_prometheus::exporter()
            .with_registry(registry.clone())
            .build()?;

        let provider = SdkMeterProvider::builder().with_reader(exporter).build();
        let meter = provider.meter("nft_indexer_metrics");

        let transfer_logs_scanned = meter
            .u64_counter("nft_indexer_transfer_logs_scanned")
            .with_description("Total number of Transfer logs replayed")
            .build();

        let latest_scanned_block = meter
            .u64_gauge("nft_indexer_latest_scanned_block_number")
            .with_description("Block number the ownership table was last rebuilt at")
            .build();

        let owned_tokens = meter
            .u64_gauge("nft_indexer_owned_tokens")
            .with_description("Number of tokens held by the watched account")
            .build();

        let reconstruction_time = meter
            .f64_gauge("nft_indexer_reconstruction_time")
            .with_description("Time spent fetching and replaying the transfer history")
            .with_unit("s")
            .build();

        let mints_resolved = meter
            .u64_counter("nft_indexer_mints_resolved")
            .with_description("Receipts whose minted token id was found")
            .build();

        let mints_unresolved = meter
            .u64_counter("nft_indexer_mints_unresolved")
            .with_description("Receipts with no minted token")
            .build();

        let rpc_requests = meter
            .u64_counter("nft_indexer_rpc_requests")
            .with_description("Number of RPC requests made")
            .build();

        let rpc_errors = meter
            .u64_counter("nft_indexer_rpc_errors")
            .with_description("Number of RPC errors encountered")
            .build();

        let rpc_latency = meter
            .f64_histogram("nft_indexer_rpc_latency")
            .with_description("RPC request latency")
            .with_boundaries(vec![
                0.025, 0.05, 0.075, 0.1, 0.15, 0.2, 0.3, 0.5, 1.0, 5.0, 10.0,
            ])
            .with_unit("s")
            .build();

        Ok(Self {
            registry: Arc::new(registry),
            _provider: provider,
            chain_name,
            transfer_logs_scanned,
            latest_scanned_block,
            owned_tokens,
            reconstruction_time,
            mints_resolved,
            mints_unresolved,
            rpc_requests,
            rpc_errors,
            rpc_latency,
        })
    }

    fn chain_label(&self) -> KeyValue {
        KeyValue::new("chain", self.chain_name.clone())
    }

    fn rpc_labels(&self, method: &'static str) -> [KeyValue; 2] {
        [self.chain_label(), KeyValue::new("method", method)]
    }

    pub fn record_rpc_request(&self, method: &'static str) {
        self.rpc_requests.add(1, &self.rpc_labels(method));
    }

    pub fn record_rpc_result(&self, method: &'static str, start: Instant, is_error: bool) {
        let labels = self.rpc_labels(method);
        self.rpc_latency
            .record(start.elapsed().as_secs_f64(), &labels);
        if is_error {
            self.rpc_errors.add(1, &labels);
        }
    }

    pub fn record_scan(&self, block_number: u64, logs_scanned: usize, owned: usize, elapsed_secs: f64) {
        let labels = [self.chain_label()];
        self.transfer_logs_scanned.add(logs_scanned as u64, &labels);
        self.latest_scanned_block.record(block_number, &labels);
        self.owned_tokens.record(owned as u64, &labels);
        self.reconstruction_time.record(elapsed_secs, &labels);
    }

    pub fn record_mint(&self, kind: Option<MintMatchKind>) {
        match kind {
            Some(kind) => self.mints_resolved.add(
                1,
                &[self.chain_label(), KeyValue::new("match", kind.as_str())],
            ),
            None => self.mints_unresolved.add(1, &[self.chain_label()]),
        }
    }

    pub async fn start_metrics_server(&self, addr: &str, port: u16) -> Result<()> {
        let addr = format!("{addr}:{port}")
            .parse::<SocketAddr>()
            .context("invalid metrics address")?;
        let registry = self.registry.clone();

        let app = Router::new().route("/metrics", get(move || metrics_handler(registry.clone())));

        // Determine the access URL based on the binding address. Only used for logging.
        let access_url = if addr.ip().is_unspecified() {
            format!("http://localhost:{port}/metrics")
        } else {
            format!("http://{}:{port}/metrics", addr.ip())
        };

        info!(
            "Starting metrics server - binding to {} (accessible at {})",
            addr, access_url
        );

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind metrics server to {addr}"))?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!("Metrics server stopped: {}", e);
            }
        });

        Ok(())
    }
}

async fn metrics_handler(registry: Arc<prometheus::Registry>) -> Result<String, StatusCode> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = vec![];
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    String::from_utf8(buffer).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}
