//! Alias resolution: discovery, signed resolve, verification, expiry.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use cryptalias_core::constants::{
    MEDIA_TYPE_JOSE, MEDIA_TYPE_JSON, RESOLVE_PATH_PREFIX, WELL_KNOWN_CONFIGURATION_PATH,
};
use cryptalias_core::error::{CryptaliasError, Result};
use cryptalias_core::traits::{AddressResolver, Clock, HttpFetcher};
use cryptalias_core::types::{
    is_valid_domain, normalize_ticker, DomainConfiguration, Jwk, ParsedAlias, Resolution,
};

use crate::clock::SystemClock;
use crate::config::ClientConfig;
use crate::expiry::ExpiryGuard;
use crate::http::ReqwestFetcher;

/// What a domain's well-known configuration says about resolving its aliases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredDomain {
    /// Resolver base URL, trailing `/` removed
    pub resolver_endpoint: String,
    /// Key that signs the resolver's responses
    pub key: Jwk,
    /// The full document as served
    pub configuration: DomainConfiguration,
}

/// Resolves `[ticker:]alias$domain` into a verified wallet address.
///
/// Each call:
/// 1. Validates the inputs and parses the alias
/// 2. Checks an embedded ticker prefix against the requested ticker
/// 3. Fetches `{scheme}://{domain}/.well-known/cryptalias/configuration`
/// 4. Fetches `{resolver}/_cryptalias/resolve/{ticker}/{alias}` as a compact JWS
/// 5. Verifies the JWS against the configuration's Ed25519 key
/// 6. Requires a non-empty address and an `expires` strictly in the future
///
/// Nothing is cached between calls.
pub struct CryptaliasResolver {
    http: Arc<dyn HttpFetcher>,
    expiry: ExpiryGuard,
    config: ClientConfig,
}

impl CryptaliasResolver {
    /// Creates a resolver with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a resolver over reqwest and the system clock.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = ReqwestFetcher::with_config(&config)?;
        Ok(Self::with_collaborators(config, Arc::new(http), Arc::new(SystemClock)))
    }

    /// Creates a resolver over caller-supplied transport and clock.
    pub fn with_collaborators(
        config: ClientConfig,
        http: Arc<dyn HttpFetcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            http,
            expiry: ExpiryGuard::new(clock),
            config,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolves `alias` for `ticker` and returns only the address.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let resolver = CryptaliasResolver::new()?;
    /// let address = resolver.resolve_address("xmr", "donations$example.com").await?;
    /// ```
    pub async fn resolve_address(&self, ticker: &str, alias: &str) -> Result<String> {
        self.resolve(ticker, alias).await.map(|r| r.address)
    }

    /// Resolves `alias` for `ticker`, returning the address with its metadata.
    #[instrument(skip(self))]
    pub async fn resolve(&self, ticker: &str, alias: &str) -> Result<Resolution> {
        if ticker.is_empty() || alias.is_empty() {
            return Err(CryptaliasError::InvalidInput("ticker and alias are required".into()));
        }
        let ticker = normalize_ticker(ticker);
        if ticker.is_empty() {
            return Err(CryptaliasError::InvalidInput("ticker is blank".into()));
        }

        let parsed = ParsedAlias::parse(alias)?;
        parsed.check_ticker(&ticker)?;

        let discovered = self.discover(&parsed.domain).await?;

        let url = Self::resolve_url(&discovered.resolver_endpoint, &ticker, alias);
        debug!(url, "Fetching signed resolution");
        let response = self.http.get(&url, MEDIA_TYPE_JOSE).await?;
        if !response.is_success() {
            warn!(status = response.status, "Resolver rejected query");
            return Err(CryptaliasError::ResolveFetchFailed {
                status: response.status,
                body: response.body.trim().to_string(),
            });
        }

        let payload = cryptalias_crypto::verify(&response.body, &discovered.key)?;
        let address = payload.address()?.to_string();
        let expires = self.expiry.enforce(payload.expires.as_deref())?;

        info!(domain = %parsed.domain, %expires, "Resolved alias");

        Ok(Resolution {
            address,
            expires,
            ticker: payload.ticker,
            nonce: payload.nonce,
            version: payload.version,
            domain: parsed.domain,
            resolver_endpoint: discovered.resolver_endpoint,
        })
    }

    /// Fetches and checks a domain's well-known configuration.
    #[instrument(skip(self))]
    pub async fn discover(&self, domain: &str) -> Result<DiscoveredDomain> {
        if domain.is_empty() {
            return Err(CryptaliasError::InvalidInput("domain is required".into()));
        }
        if !is_valid_domain(domain) {
            return Err(CryptaliasError::InvalidInput(format!(
                "domain {domain:?} contains URL delimiters or whitespace"
            )));
        }

        let url = self.configuration_url(domain);
        debug!(url, "Fetching domain configuration");
        let response = self.http.get(&url, MEDIA_TYPE_JSON).await?;
        if !response.is_success() {
            warn!(status = response.status, "Configuration fetch failed");
            return Err(CryptaliasError::ConfigFetchFailed {
                status: response.status,
                body: response.body.trim().to_string(),
            });
        }

        let configuration = DomainConfiguration::from_json(&response.body)?;
        let resolver_endpoint = configuration.resolver_endpoint()?;
        let key = configuration.trust_key()?.clone();

        Ok(DiscoveredDomain {
            resolver_endpoint,
            key,
            configuration,
        })
    }

    /// Returns the well-known configuration URL for `domain`.
    pub fn configuration_url(&self, domain: &str) -> String {
        format!(
            "{}://{}{}",
            self.config.discovery_scheme, domain, WELL_KNOWN_CONFIGURATION_PATH
        )
    }

    /// Returns the resolve URL; `ticker` and `alias` are percent-encoded as path segments.
    pub fn resolve_url(resolver_endpoint: &str, ticker: &str, alias: &str) -> String {
        format!(
            "{}{}/{}/{}",
            resolver_endpoint.trim_end_matches('/'),
            RESOLVE_PATH_PREFIX,
            urlencoding::encode(ticker),
            urlencoding::encode(alias)
        )
    }
}

#[async_trait]
impl AddressResolver for CryptaliasResolver {
    async fn resolve_address(&self, ticker: &str, alias: &str) -> Result<String> {
        CryptaliasResolver::resolve_address(self, ticker, alias).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{DateTime, Duration, Utc};
    use cryptalias_core::traits::HttpResponse;
    use cryptalias_crypto::JwsSigner;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::collections::HashMap;

    const CONFIG_URL: &str = "https://example.com/.well-known/cryptalias/configuration";
    const RESOLVE_URL: &str = "https://resolver.example.com/_cryptalias/resolve/xmr/donations%24example.com";

    /// Serves canned responses by URL and records every request.
    #[derive(Default)]
    struct StubFetcher {
        routes: HashMap<String, HttpResponse>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl StubFetcher {
        fn route(mut self, url: &str, status: u16, body: impl Into<String>) -> Self {
            self.routes.insert(url.to_string(), HttpResponse::new(status, body));
            self
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl HttpFetcher for StubFetcher {
        async fn get(&self, url: &str, accept: &str) -> Result<HttpResponse> {
            self.calls.lock().push((url.to_string(), accept.to_string()));
            self.routes
                .get(url)
                .cloned()
                .ok_or_else(|| CryptaliasError::Transport(format!("connection refused: {url}")))
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2030-01-01T00:00:00Z").unwrap().with_timezone(&Utc)
    }

    fn signer() -> JwsSigner {
        JwsSigner::from_seed(&[7u8; 32]).with_kid("k1")
    }

    fn config_body(signer: &JwsSigner) -> String {
        json!({
            "version": 1,
            "domain": "example.com",
            "resolver_mode": "delegated",
            "resolver": {
                "resolver_endpoint": "https://resolver.example.com/",
                "keys_endpoint": "https://resolver.example.com/_cryptalias/keys"
            },
            "key": signer.public_jwk()
        })
        .to_string()
    }

    fn payload(expires: DateTime<Utc>) -> serde_json::Value {
        json!({
            "version": 1,
            "ticker": "xmr",
            "address": "4AdUndXHHZ6cfufTMvppY6JwXNouMBzSkbLYfpAV5Usx",
            "expires": expires.to_rfc3339_opts(chrono::SecondsFormat::Nanos, true),
            "nonce": "n-1"
        })
    }

    fn resolver(fetcher: Arc<StubFetcher>) -> CryptaliasResolver {
        CryptaliasResolver::with_collaborators(
            ClientConfig::default(),
            fetcher,
            Arc::new(FixedClock::new(now())),
        )
    }

    fn happy_fetcher(resolve_body: String) -> Arc<StubFetcher> {
        let signer = signer();
        Arc::new(
            StubFetcher::default()
                .route(CONFIG_URL, 200, config_body(&signer))
                .route(RESOLVE_URL, 200, resolve_body),
        )
    }

    #[tokio::test]
    async fn test_resolve_happy_path() {
        let body = signer().sign_json(&payload(now() + Duration::minutes(5)));
        let fetcher = happy_fetcher(body);
        let resolver = resolver(fetcher.clone());

        let resolution = resolver.resolve("xmr", "donations$example.com").await.unwrap();
        assert_eq!(resolution.address, "4AdUndXHHZ6cfufTMvppY6JwXNouMBzSkbLYfpAV5Usx");
        assert_eq!(resolution.expires, now() + Duration::minutes(5));
        assert_eq!(resolution.domain, "example.com");
        assert_eq!(resolution.resolver_endpoint, "https://resolver.example.com");
        assert_eq!(resolution.nonce.as_deref(), Some("n-1"));

        assert_eq!(
            fetcher.calls(),
            vec![
                (CONFIG_URL.to_string(), "application/json".to_string()),
                (RESOLVE_URL.to_string(), "application/jose".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_ticker_is_normalized_and_prefix_kept_in_path() {
        let signer = signer();
        let url = "https://resolver.example.com/_cryptalias/resolve/xmr/XMR%3Adonations%24example.com";
        let fetcher = Arc::new(
            StubFetcher::default()
                .route(CONFIG_URL, 200, config_body(&signer))
                .route(url, 200, signer.sign_json(&payload(now() + Duration::hours(1)))),
        );

        let address = resolver(fetcher)
            .resolve_address(" XMR ", "XMR:donations$example.com")
            .await
            .unwrap();
        assert_eq!(address, "4AdUndXHHZ6cfufTMvppY6JwXNouMBzSkbLYfpAV5Usx");
    }

    #[tokio::test]
    async fn test_through_trait_object() {
        let body = signer().sign_json(&payload(now() + Duration::minutes(5)));
        let resolver: Arc<dyn AddressResolver> = Arc::new(resolver(happy_fetcher(body)));
        assert!(resolver.resolve_address("xmr", "donations$example.com").await.is_ok());
    }

    #[tokio::test]
    async fn test_input_errors_make_no_requests() {
        let fetcher = Arc::new(StubFetcher::default());
        let resolver = resolver(fetcher.clone());

        for (ticker, alias) in [("", "a$example.com"), ("xmr", ""), ("  ", "a$example.com")] {
            let err = resolver.resolve(ticker, alias).await.unwrap_err();
            assert!(matches!(err, CryptaliasError::InvalidInput(_)), "{ticker:?} {alias:?}");
        }
        for alias in ["donations", "donations$", "$example.com", "btc:$example.com"] {
            let err = resolver.resolve("xmr", alias).await.unwrap_err();
            assert!(matches!(err, CryptaliasError::InvalidAlias(_)), "{alias:?}");
        }
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_domain_cannot_redirect_to_another_host() {
        let fetcher = Arc::new(StubFetcher::default());
        let resolver = resolver(fetcher.clone());

        for alias in [
            "donations$example.com@attacker.net",
            "d$attacker.net/x?",
            "d$attacker.net#example.com",
            "d$attacker.net\\example.com",
        ] {
            let err = resolver.resolve_address("xmr", alias).await.unwrap_err();
            assert!(matches!(err, CryptaliasError::InvalidAlias(_)), "{alias:?}");
        }
        for domain in ["example.com@attacker.net", "attacker.net/x?", "example.com attacker.net"] {
            let err = resolver.discover(domain).await.unwrap_err();
            assert!(matches!(err, CryptaliasError::InvalidInput(_)), "{domain:?}");
        }
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_ticker_mismatch_makes_no_requests() {
        let fetcher = Arc::new(StubFetcher::default());
        let err = resolver(fetcher.clone())
            .resolve("xmr", "btc:donations$example.com")
            .await
            .unwrap_err();

        match err {
            CryptaliasError::TickerMismatch { prefix, ticker } => {
                assert_eq!(prefix, "btc");
                assert_eq!(ticker, "xmr");
            }
            other => panic!("expected TickerMismatch, got {other:?}"),
        }
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_config_fetch_failure() {
        let fetcher = Arc::new(StubFetcher::default().route(CONFIG_URL, 404, "404 page not found\n"));
        let err = resolver(fetcher).resolve("xmr", "donations$example.com").await.unwrap_err();

        match err {
            CryptaliasError::ConfigFetchFailed { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "404 page not found");
            }
            other => panic!("expected ConfigFetchFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_configuration() {
        let fetcher = Arc::new(StubFetcher::default().route(CONFIG_URL, 200, "<html>"));
        let err = resolver(fetcher).resolve("xmr", "donations$example.com").await.unwrap_err();
        assert!(matches!(err, CryptaliasError::MalformedConfiguration(_)));
    }

    #[tokio::test]
    async fn test_missing_resolver_skips_resolve_request() {
        let body = json!({ "domain": "example.com", "key": signer().public_jwk() }).to_string();
        let fetcher = Arc::new(StubFetcher::default().route(CONFIG_URL, 200, body));
        let err = resolver(fetcher.clone())
            .resolve("xmr", "donations$example.com")
            .await
            .unwrap_err();

        assert!(matches!(err, CryptaliasError::MissingResolver));
        assert_eq!(fetcher.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_key_skips_resolve_request() {
        let body = json!({ "resolver": { "resolver_endpoint": "https://resolver.example.com" } }).to_string();
        let fetcher = Arc::new(StubFetcher::default().route(CONFIG_URL, 200, body));
        let err = resolver(fetcher.clone())
            .resolve("xmr", "donations$example.com")
            .await
            .unwrap_err();

        assert!(matches!(err, CryptaliasError::MissingKey));
        assert_eq!(fetcher.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_fetch_failure() {
        let signer = signer();
        let fetcher = Arc::new(
            StubFetcher::default()
                .route(CONFIG_URL, 200, config_body(&signer))
                .route(RESOLVE_URL, 500, "internal error"),
        );
        let err = resolver(fetcher).resolve("xmr", "donations$example.com").await.unwrap_err();

        assert!(matches!(err, CryptaliasError::ResolveFetchFailed { status: 500, .. }));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_signature_from_other_key_is_rejected() {
        let other = JwsSigner::from_seed(&[9u8; 32]);
        let body = other.sign_json(&payload(now() + Duration::minutes(5)));
        let err = resolver(happy_fetcher(body))
            .resolve("xmr", "donations$example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, CryptaliasError::SignatureInvalid));
    }

    #[tokio::test]
    async fn test_non_jws_body_is_malformed() {
        let err = resolver(happy_fetcher("{\"address\":\"x\"}".into()))
            .resolve("xmr", "donations$example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, CryptaliasError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_missing_address_checked_before_expiry() {
        let body = signer().sign_json(&json!({ "expires": "2000-01-01T00:00:00Z" }));
        let err = resolver(happy_fetcher(body))
            .resolve("xmr", "donations$example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, CryptaliasError::MissingAddress));
    }

    #[tokio::test]
    async fn test_expiry_failures() {
        let signer = signer();

        let missing = signer.sign_json(&json!({ "address": "addr" }));
        let err = resolver(happy_fetcher(missing)).resolve("xmr", "donations$example.com").await.unwrap_err();
        assert!(matches!(err, CryptaliasError::MissingExpiry));

        let invalid = signer.sign_json(&json!({ "address": "addr", "expires": "soon" }));
        let err = resolver(happy_fetcher(invalid)).resolve("xmr", "donations$example.com").await.unwrap_err();
        assert!(matches!(err, CryptaliasError::InvalidExpiry(_)));

        let at_now = signer.sign_json(&payload(now()));
        let err = resolver(happy_fetcher(at_now)).resolve("xmr", "donations$example.com").await.unwrap_err();
        assert!(matches!(err, CryptaliasError::Expired { .. }));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let fetcher = Arc::new(StubFetcher::default());
        let err = resolver(fetcher).resolve("xmr", "donations$example.com").await.unwrap_err();
        assert!(matches!(err, CryptaliasError::Transport(_)));
    }

    #[tokio::test]
    async fn test_discover() {
        let signer = signer();
        let fetcher = Arc::new(StubFetcher::default().route(CONFIG_URL, 200, config_body(&signer)));
        let discovered = resolver(fetcher).discover("example.com").await.unwrap();

        assert_eq!(discovered.resolver_endpoint, "https://resolver.example.com");
        assert_eq!(discovered.key, signer.public_jwk());
        assert_eq!(discovered.configuration.resolver_mode.as_deref(), Some("delegated"));
    }

    #[test]
    fn test_urls() {
        let resolver = CryptaliasResolver::new().unwrap();
        assert_eq!(resolver.configuration_url("example.com"), CONFIG_URL);
        assert_eq!(
            CryptaliasResolver::resolve_url("https://resolver.example.com//", "xmr", "donations$example.com"),
            RESOLVE_URL
        );
        assert_eq!(
            CryptaliasResolver::resolve_url("https://r.example", "xmr", "a b+tip$example.com"),
            "https://r.example/_cryptalias/resolve/xmr/a%20b%2Btip%24example.com"
        );
    }

    #[test]
    fn test_with_config_rejects_bad_scheme() {
        let config = ClientConfig::default().with_discovery_scheme("gopher");
        assert!(matches!(
            CryptaliasResolver::with_config(config),
            Err(CryptaliasError::InvalidInput(_))
        ));
    }
}
