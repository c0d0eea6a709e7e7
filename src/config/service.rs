use super::Defaults;
use crate::RawEnvironment;

/// Hostname that switches the service to plain-HTTP local development.
pub const LOCALHOST: &str = "localhost";

/// Where and as whom the service is reachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub port: u16,
    pub hostname: String,
    /// `http://localhost:<port>` locally, otherwise `https://<hostname>`.
    pub public_url: String,
    pub did: String,
    pub version: Option<String>,
    pub privacy_policy_url: Option<String>,
    pub terms_of_service_url: Option<String>,
}

pub(super) fn build(raw: &RawEnvironment, defaults: &Defaults) -> ServiceConfig {
    let port = raw.port.unwrap_or(defaults.port);
    let hostname = raw
        .hostname
        .clone()
        .unwrap_or_else(|| defaults.hostname.clone());

    let public_url = if hostname == LOCALHOST {
        format!("http://{LOCALHOST}:{port}")
    } else {
        format!("https://{hostname}")
    };
    let did = raw
        .service_did
        .clone()
        .unwrap_or_else(|| format!("did:web:{hostname}"));

    ServiceConfig {
        port,
        hostname,
        public_url,
        did,
        version: raw.version.clone(),
        privacy_policy_url: raw.privacy_policy_url.clone(),
        terms_of_service_url: raw.terms_of_service_url.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localhost_gets_insecure_url_with_port() {
        let raw = RawEnvironment {
            port: Some(3000),
            ..Default::default()
        };
        let service = build(&raw, &Defaults::default());

        assert_eq!(service.hostname, "localhost");
        assert_eq!(service.public_url, "http://localhost:3000");
        assert_eq!(service.did, "did:web:localhost");
    }

    #[test]
    fn test_public_hostname_gets_https_without_port() {
        let raw = RawEnvironment {
            port: Some(3000),
            hostname: Some("pds.example.com".into()),
            ..Default::default()
        };
        let service = build(&raw, &Defaults::default());

        assert_eq!(service.port, 3000);
        assert_eq!(service.public_url, "https://pds.example.com");
        assert_eq!(service.did, "did:web:pds.example.com");
    }

    #[test]
    fn test_explicit_did_and_default_port() {
        let raw = RawEnvironment {
            service_did: Some("did:plc:abc123".into()),
            version: Some("0.4.0".into()),
            ..Default::default()
        };
        let service = build(&raw, &Defaults::default());

        assert_eq!(service.port, 2583);
        assert_eq!(service.public_url, "http://localhost:2583");
        assert_eq!(service.did, "did:plc:abc123");
        assert_eq!(service.version.as_deref(), Some("0.4.0"));
    }
}
