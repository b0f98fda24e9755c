use tonic::transport::{Certificate, Identity, ServerTlsConfig};

use admission_core::AdmissionError;

use crate::config::{ClientAuth, TlsConfig};

/// Build a `tonic` server TLS config from the validated [`TlsConfig`].
///
/// Returns `Ok(None)` when TLS is disabled (dev/test only).
/// `AdmissionConfig::validate` has already confirmed the required paths
/// are present when TLS is enabled; this only has to read and parse them.
pub fn load_server_tls(cfg: &TlsConfig) -> Result<Option<ServerTlsConfig>, AdmissionError> {
    if !cfg.enabled {
        return Ok(None);
    }

    let cert_path = cfg
        .server_cert
        .as_deref()
        .ok_or_else(|| AdmissionError::Configuration("tls.server_cert missing".into()))?;
    let key_path = cfg
        .server_key
        .as_deref()
        .ok_or_else(|| AdmissionError::Configuration("tls.server_key missing".into()))?;

    let cert = read_file(cert_path)?;
    let key = read_file(key_path)?;
    let identity = Identity::from_pem(cert, key);

    let mut tls = ServerTlsConfig::new().identity(identity);

    if cfg.client_auth == ClientAuth::RequireAndVerifyClientCert {
        let ca_path = cfg
            .ca_cert
            .as_deref()
            .ok_or_else(|| AdmissionError::Configuration("tls.ca_cert missing".into()))?;
        let ca = read_file(ca_path)?;
        tls = tls.client_ca_root(Certificate::from_pem(ca));
    }

    Ok(Some(tls))
}

fn read_file(path: &str) -> Result<Vec<u8>, AdmissionError> {
    std::fs::read(path)
        .map_err(|e| AdmissionError::Configuration(format!("failed to read {path}: {e}")))
}
