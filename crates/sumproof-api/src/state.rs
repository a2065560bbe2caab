//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor, and the server configuration it is built
//! from.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use metrics_exporter_prometheus::PrometheusHandle;
use sumproof_zkp::{Groth16Backend, MockBackend, ProofOperations, ProofService};

/// Which proof backend serves requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// arkworks Groth16 over BN254.
    Groth16,
    /// Transparent keyed-hash backend. Provides no zero-knowledge privacy.
    Mock,
}

/// Server configuration from flags and environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "sumproof-api", version, about = "Zero-knowledge proof-of-sum service")]
pub struct AppConfig {
    /// Address to bind.
    #[arg(long, env = "SUMPROOF_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to bind.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Proof backend.
    #[arg(long, env = "SUMPROOF_BACKEND", value_enum, default_value_t = BackendKind::Groth16)]
    pub backend: BackendKind,

    /// Run key setup before accepting connections instead of on first request.
    #[arg(long, env = "SUMPROOF_EAGER_SETUP", default_value_t = false)]
    pub eager_setup: bool,

    /// Disable the Prometheus `/metrics` endpoint.
    #[arg(
        long = "no-metrics",
        env = "SUMPROOF_METRICS_ENABLED",
        action = clap::ArgAction::SetFalse,
    )]
    pub metrics_enabled: bool,

    /// Emit logs as JSON lines.
    #[arg(long, env = "SUMPROOF_LOG_JSON", default_value_t = false)]
    pub log_json: bool,
}

impl AppConfig {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            backend: BackendKind::Groth16,
            eager_setup: false,
            metrics_enabled: true,
            log_json: false,
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn ProofOperations>,
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// State over an existing service, without a metrics endpoint.
    pub fn new(service: Arc<dyn ProofOperations>) -> Self {
        Self {
            service,
            prometheus: None,
        }
    }

    /// State for the configured backend.
    pub fn from_config(config: &AppConfig) -> Self {
        let service: Arc<dyn ProofOperations> = match config.backend {
            BackendKind::Groth16 => Arc::new(ProofService::new(Groth16Backend::new())),
            BackendKind::Mock => {
                tracing::warn!("mock backend selected; proofs are NOT zero-knowledge");
                Arc::new(ProofService::new(MockBackend::new()))
            }
        };
        Self::new(service)
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("backend", &self.service.backend_name())
            .field("setup", &self.service.setup_status())
            .field("prometheus", &self.prometheus.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AppConfig::try_parse_from(["sumproof-api"]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.backend, BackendKind::Groth16);
        assert!(config.metrics_enabled);
        assert!(!config.eager_setup);
        assert_eq!(config.listen_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn flags_override_defaults() {
        let config = AppConfig::try_parse_from([
            "sumproof-api",
            "--backend",
            "mock",
            "--port",
            "9000",
            "--host",
            "127.0.0.1",
            "--eager-setup",
            "--no-metrics",
        ])
        .unwrap();
        assert_eq!(config.backend, BackendKind::Mock);
        assert_eq!(config.listen_addr().to_string(), "127.0.0.1:9000");
        assert!(config.eager_setup);
        assert!(!config.metrics_enabled);
    }

    #[test]
    fn state_reports_selected_backend() {
        let config = AppConfig {
            backend: BackendKind::Mock,
            ..AppConfig::default()
        };
        let state = AppState::from_config(&config);
        assert_eq!(state.service.backend_name(), "mock");
        assert!(state.prometheus.is_none());
    }
}
