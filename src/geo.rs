// Geolocation provider - one-shot async position lookup
//
// The browser-style geolocation API becomes an IP geolocation HTTP call in a
// terminal. The provider trait keeps the session testable; the production
// implementation talks to an ip-api.com compatible endpoint via reqwest.

use futures::future::BoxFuture;
use serde::Deserialize;
use std::time::Duration;

use crate::config::Config;

/// Options for a one-shot position request
#[derive(Debug, Clone, Copy)]
pub struct LookupOptions {
    /// Ask the service for its best estimate (forwarded as a query hint)
    pub high_accuracy: bool,
    /// Hard deadline for the whole lookup
    pub timeout: Duration,
    /// Maximum acceptable age of a cached fix; we never cache, so any
    /// value is honored trivially
    pub max_age: Duration,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            max_age: Duration::ZERO,
        }
    }
}

/// A resolved position fix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoFix {
    pub lat: f64,
    pub lng: f64,
    /// Radius in meters; IP-based fixes usually cannot estimate one
    pub accuracy: Option<f64>,
}

/// Why a lookup failed.
///
/// Codes follow the W3C geolocation convention the original widget used:
/// 1 = permission denied, 2 = position unavailable, 3 = timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupError {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unknown,
}

impl LookupError {
    /// Map a numeric provider error code to an error kind
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => LookupError::PermissionDenied,
            2 => LookupError::PositionUnavailable,
            3 => LookupError::Timeout,
            _ => LookupError::Unknown,
        }
    }

    /// User-facing status line for this failure
    pub fn status_message(&self) -> &'static str {
        match self {
            LookupError::PermissionDenied => {
                "[DENY] Permission denied. Click the map to set a target manually."
            }
            LookupError::PositionUnavailable => {
                "[WARN] Position unavailable. Check connectivity / GPS."
            }
            LookupError::Timeout => "[TIMEOUT] Lookup expired. Try again.",
            LookupError::Unknown => "[ERR] Unknown error while acquiring position.",
        }
    }
}

/// One-shot asynchronous position lookup.
///
/// `is_available` is the capability check: when it returns false the session
/// reports the failure immediately and never starts a scan.
pub trait GeolocationProvider: Send + Sync {
    fn is_available(&self) -> bool;

    /// Issue the lookup. The returned future resolves exactly once, within
    /// `opts.timeout`, with either a fix or a mapped error.
    fn request_position(&self, opts: LookupOptions) -> BoxFuture<'static, Result<GeoFix, LookupError>>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Production implementation: IP geolocation over HTTP
// ─────────────────────────────────────────────────────────────────────────────

/// Response shape of an ip-api.com compatible endpoint.
///
/// `status` is "success" or "fail"; `accuracy` is non-standard but some
/// self-hosted services include it, so we pick it up when present.
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    accuracy: Option<f64>,
}

/// IP geolocation provider backed by reqwest
pub struct IpGeoProvider {
    client: reqwest::Client,
    endpoint: String,
    enabled: bool,
}

impl IpGeoProvider {
    pub fn new(config: &Config) -> Self {
        // Client build only fails on TLS backend misconfiguration; fall back
        // to a default client rather than aborting startup
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.provider.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            endpoint: config.provider.url.clone(),
            enabled: config.provider.enabled,
        }
    }

    async fn lookup(client: reqwest::Client, url: String) -> Result<GeoFix, LookupError> {
        let response = client.get(&url).send().await.map_err(classify_transport_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::FORBIDDEN || status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(LookupError::PermissionDenied);
        }
        if !status.is_success() {
            tracing::warn!("Geolocation endpoint returned HTTP {}", status);
            return Err(LookupError::Unknown);
        }

        let body = response.text().await.map_err(classify_transport_error)?;
        parse_fix(&body)
    }
}

impl GeolocationProvider for IpGeoProvider {
    fn is_available(&self) -> bool {
        self.enabled && !self.endpoint.is_empty()
    }

    fn request_position(&self, opts: LookupOptions) -> BoxFuture<'static, Result<GeoFix, LookupError>> {
        let client = self.client.clone();
        let mut url = self.endpoint.clone();
        if opts.high_accuracy {
            // Query hint; compatible endpoints that don't know it ignore it
            url.push_str(if url.contains('?') { "&" } else { "?" });
            url.push_str("fields=status,message,lat,lon,accuracy");
        }

        Box::pin(async move {
            tracing::debug!(
                "Requesting position from {} (max_age {:?})",
                url,
                opts.max_age
            );
            match tokio::time::timeout(opts.timeout, Self::lookup(client, url)).await {
                Ok(result) => result,
                Err(_) => Err(LookupError::Timeout),
            }
        })
    }
}

/// Map reqwest transport failures onto the provider error codes
fn classify_transport_error(err: reqwest::Error) -> LookupError {
    if err.is_timeout() {
        LookupError::Timeout
    } else if err.is_connect() {
        LookupError::PositionUnavailable
    } else {
        tracing::debug!("Geolocation transport error: {}", err);
        LookupError::Unknown
    }
}

/// Parse an endpoint response body into a fix
fn parse_fix(body: &str) -> Result<GeoFix, LookupError> {
    let parsed: IpApiResponse = serde_json::from_str(body).map_err(|e| {
        tracing::debug!("Unparseable geolocation response: {}", e);
        LookupError::Unknown
    })?;

    if parsed.status != "success" {
        tracing::warn!(
            "Geolocation lookup failed: {}",
            parsed.message.as_deref().unwrap_or("no reason given")
        );
        return Err(LookupError::PositionUnavailable);
    }

    match (parsed.lat, parsed.lon) {
        (Some(lat), Some(lng)) => Ok(GeoFix {
            lat,
            lng,
            accuracy: parsed.accuracy,
        }),
        _ => Err(LookupError::Unknown),
    }
}
