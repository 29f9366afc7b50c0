//! Exporter transport configuration: collector endpoint and security mode.

use opentelemetry_otlp::{TonicExporterBuilder, WithExportConfig};

/// Transport security intent for the exporter channel.
///
/// Derived from the `INSECURE_MODE` token: only the case-insensitive values
/// `"false"`, `"0"`, and `"f"` select [`TransportSecurity::Secure`]; any other
/// value, including the empty string, selects plaintext export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportSecurity {
    /// TLS intended. Known gap carried over from the original deployment: no
    /// client TLS credentials are installed on this branch, so the channel
    /// still uses the exporter's default for the endpoint scheme. Treat the
    /// transport as insecure unless the collector endpoint enforces TLS.
    Secure,
    /// Plaintext export, explicitly requested.
    Insecure,
}

impl TransportSecurity {
    /// Resolve the security mode from the raw `INSECURE_MODE` token.
    pub fn from_token(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "false" | "0" | "f" => TransportSecurity::Secure,
            _ => TransportSecurity::Insecure,
        }
    }

    /// Whether the transport is explicitly plaintext.
    pub fn is_insecure(self) -> bool {
        self == TransportSecurity::Insecure
    }
}

/// Collector endpoint and security mode shared by all signal exporters.
///
/// Resolved once at startup and treated as immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub endpoint: String,
    pub security: TransportSecurity,
}

impl TransportConfig {
    /// Build the transport config from the collector endpoint and the raw
    /// `INSECURE_MODE` token.
    pub fn new(endpoint: impl Into<String>, insecure_token: &str) -> Self {
        Self {
            endpoint: endpoint.into(),
            security: TransportSecurity::from_token(insecure_token),
        }
    }

    /// Start an OTLP/gRPC exporter builder pointed at the collector.
    ///
    /// Both security branches currently configure the channel identically;
    /// see [`TransportSecurity::Secure`] for the documented gap.
    pub(crate) fn exporter_builder(&self) -> TonicExporterBuilder {
        opentelemetry_otlp::new_exporter()
            .tonic()
            .with_endpoint(self.endpoint.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secure_tokens_match_case_insensitively() {
        for token in ["false", "FALSE", "False", "0", "f", "F"] {
            assert_eq!(
                TransportSecurity::from_token(token),
                TransportSecurity::Secure,
                "token {token:?} must select the secure branch"
            );
        }
    }

    #[test]
    fn every_other_token_is_insecure() {
        for token in ["", "true", "1", "t", "yes", "no", "off", "00", "ff"] {
            assert_eq!(
                TransportSecurity::from_token(token),
                TransportSecurity::Insecure,
                "token {token:?} must select the insecure branch"
            );
        }
    }

    #[test]
    fn config_resolves_endpoint_and_mode() {
        let cfg = TransportConfig::new("http://collector:4317", "true");
        assert_eq!(cfg.endpoint, "http://collector:4317");
        assert!(cfg.security.is_insecure());
    }

    #[test]
    fn secure_mode_is_not_insecure() {
        assert!(!TransportSecurity::Secure.is_insecure());
    }
}
