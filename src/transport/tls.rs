//! TLS client implementation
//!
//! Provides TLS-encrypted client connections using rustls (pure Rust, easy
//! static linking). The resolver uses this to reach DNS-over-TLS servers.

use crate::error::FatalError;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_rustls::rustls::pki_types::{CertificateDer, ServerName};
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;

/// TLS stream type alias
pub type TlsStream = tokio_rustls::client::TlsStream<TcpStream>;

/// Builder for the rustls client connector
#[derive(Debug, Clone)]
pub struct TlsConnectorBuilder {
    /// Load the platform trust store
    native_roots: bool,
    /// Extra trust anchors
    extra_roots: Vec<CertificateDer<'static>>,
}

impl Default for TlsConnectorBuilder {
    fn default() -> Self {
        TlsConnectorBuilder {
            native_roots: true,
            extra_roots: Vec::new(),
        }
    }
}

impl TlsConnectorBuilder {
    /// Create a builder trusting the platform roots
    pub fn new() -> Self {
        Self::default()
    }

    /// Do not load the platform trust store
    pub fn without_native_roots(mut self) -> Self {
        self.native_roots = false;
        self
    }

    /// Trust an additional root certificate
    pub fn add_root(mut self, cert: CertificateDer<'static>) -> Self {
        self.extra_roots.push(cert);
        self
    }

    /// Build the connector
    pub fn build(self) -> Result<TlsConnector, FatalError> {
        let mut root_store = RootCertStore::empty();

        if self.native_roots {
            let native_certs = rustls_native_certs::load_native_certs();
            for err in &native_certs.errors {
                tracing::debug!("Skipping native certificate source: {}", err);
            }
            for cert in native_certs.certs {
                root_store.add(cert).ok();
            }
        }

        for cert in self.extra_roots {
            root_store
                .add(cert)
                .map_err(|e| FatalError::Tls(format!("Failed to add certificate: {}", e)))?;
        }

        if root_store.is_empty() {
            tracing::warn!("TLS trust store is empty, DNS-over-TLS handshakes will fail");
        }

        let provider = Arc::new(tokio_rustls::rustls::crypto::ring::default_provider());
        let tls_config = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| FatalError::Tls(e.to_string()))?
            .with_root_certificates(root_store)
            .with_no_client_auth();

        Ok(TlsConnector::from(Arc::new(tls_config)))
    }
}

/// Run a TLS handshake over an established TCP stream
pub(crate) async fn tls_handshake(
    connector: &TlsConnector,
    tcp_stream: TcpStream,
    hostname: &str,
) -> std::io::Result<TlsStream> {
    let server_name = ServerName::try_from(hostname.to_string()).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Invalid hostname {}: {}", hostname, e),
        )
    })?;

    let tls_stream = connector.connect(server_name, tcp_stream).await?;

    tracing::debug!("TLS connection established to {}", hostname);

    Ok(tls_stream)
}
