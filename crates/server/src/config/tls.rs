use serde::Deserialize;

/// Client certificate policy for the inbound gRPC channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuth {
    RequireAndVerifyClientCert,
    NoClientCert,
}

impl Default for ClientAuth {
    fn default() -> Self {
        Self::RequireAndVerifyClientCert
    }
}

/// mTLS configuration for the gRPC listener.
///
/// A standalone `[tls]` table keeping server-side TLS settings together,
/// simplified to the one inbound channel this service terminates (no
/// separate outbound client-TLS table — this service makes no outbound
/// TLS calls of its own).
///
/// # Example
///
/// ```toml
/// [tls]
/// enabled = true
/// server_cert = "/etc/admission/tls/server.crt"
/// server_key = "/etc/admission/tls/server.key"
/// ca_cert = "/etc/admission/tls/ca-bundle.crt"
/// client_auth = "require_and_verify_client_cert"
/// ```
#[derive(Debug, Deserialize)]
pub struct TlsConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub server_cert: Option<String>,
    pub server_key: Option<String>,
    /// CA bundle used to verify client certificates when `client_auth`
    /// requires one.
    pub ca_cert: Option<String>,
    #[serde(default)]
    pub client_auth: ClientAuth,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            server_cert: None,
            server_key: None,
            ca_cert: None,
            client_auth: ClientAuth::default(),
        }
    }
}

fn default_enabled() -> bool {
    true
}
