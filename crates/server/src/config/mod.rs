mod ratelimit;
mod shed;
mod state;
mod tls;

pub use ratelimit::RateLimitConfig;
pub use shed::ShedConfig;
pub use state::{StateBackend, StateConfig};
pub use tls::{ClientAuth, TlsConfig};

use serde::Deserialize;

/// Top-level configuration, loaded once at startup from a TOML file.
///
/// Every field has a sensible default; only `store.store_addr` is required
/// when `store.backend = "redis"`, and only the TLS material is required
/// when `tls.enabled`.
#[derive(Debug, Deserialize, Default)]
pub struct AdmissionConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StateConfig,
    #[serde(default)]
    pub shed: ShedConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub tls: TlsConfig,
}

/// Listener configuration for the three TCP ports this service binds.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_grpc_port")]
    pub grpc_port: u16,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            grpc_port: default_grpc_port(),
            http_port: default_http_port(),
            metrics_port: default_metrics_port(),
            host: default_host(),
        }
    }
}

fn default_grpc_port() -> u16 {
    9090
}

fn default_http_port() -> u16 {
    8081
}

fn default_metrics_port() -> u16 {
    9091
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

impl AdmissionConfig {
    /// Validate cross-field requirements that `serde` defaults can't
    /// express on their own. Called once at startup; failure is a fatal
    /// startup error.
    pub fn validate(&self) -> Result<(), String> {
        if self.store.backend == StateBackend::Redis && self.store.store_addr.is_none() {
            return Err("store.store_addr is required when store.backend = \"redis\"".to_owned());
        }
        if self.tls.enabled {
            if self.tls.server_cert.is_none() || self.tls.server_key.is_none() {
                return Err("tls.server_cert and tls.server_key are required when tls.enabled".to_owned());
            }
            if self.tls.client_auth == ClientAuth::RequireAndVerifyClientCert && self.tls.ca_cert.is_none() {
                return Err(
                    "tls.ca_cert is required when tls.client_auth = \"require_and_verify_client_cert\""
                        .to_owned(),
                );
            }
        }
        Ok(())
    }
}
