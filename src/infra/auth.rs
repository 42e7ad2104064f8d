//! OAuth2 access tokens for Firestore requests.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::credentials::{AuthorizedUserKey, CredentialSource, ServiceAccountKey};

pub const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const REFRESH_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Lifetime requested for service-account assertions.
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens are refreshed this long before they expire.
const EXPIRY_MARGIN_SECS: i64 = 60;
/// Assumed lifetime when the token endpoint omits `expires_in`.
const DEFAULT_EXPIRES_IN_SECS: i64 = 300;
/// The emulator accepts this fixed token as an admin credential.
const EMULATOR_TOKEN: &str = "owner";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid service account key: {0}")]
    InvalidKey(#[source] jsonwebtoken::errors::Error),

    #[error("token request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("token endpoint {url} returned {status}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

impl<'a> AssertionClaims<'a> {
    fn new(key: &'a ServiceAccountKey, now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();
        Self {
            iss: &key.client_email,
            scope: DATASTORE_SCOPE,
            aud: &key.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn from_response(resp: TokenResponse, now: DateTime<Utc>) -> Self {
        let lifetime = resp.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        Self {
            value: resp.access_token,
            expires_at: now + Duration::seconds(lifetime),
        }
    }

    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

/// Produces `Authorization` header values, caching the current token.
pub struct TokenSource {
    http: reqwest::Client,
    source: CredentialSource,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenSource {
    pub fn new(http: reqwest::Client, source: CredentialSource) -> Self {
        Self {
            http,
            source,
            cached: Mutex::new(None),
        }
    }

    pub fn source(&self) -> &CredentialSource {
        &self.source
    }

    /// `Bearer <token>`, fetching a new token when the cached one is stale.
    pub async fn authorization(&self) -> Result<String, AuthError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(format!("Bearer {}", token.value));
        }

        let resp = self.fetch(now).await?;
        let token = CachedToken::from_response(resp, now);
        tracing::debug!(
            source = self.source.kind(),
            expires_at = %token.expires_at,
            "obtained access token"
        );
        let header = format!("Bearer {}", token.value);
        *cached = Some(token);
        Ok(header)
    }

    async fn fetch(&self, now: DateTime<Utc>) -> Result<TokenResponse, AuthError> {
        match &self.source {
            CredentialSource::ServiceAccount(key) => self.fetch_service_account(key, now).await,
            CredentialSource::AuthorizedUser(key) => self.fetch_authorized_user(key).await,
            CredentialSource::MetadataServer => {
                let req = self
                    .http
                    .get(METADATA_TOKEN_URL)
                    .header("Metadata-Flavor", "Google");
                send(req, METADATA_TOKEN_URL).await
            }
            CredentialSource::Emulator { .. } => Ok(TokenResponse {
                access_token: EMULATOR_TOKEN.to_string(),
                expires_in: None,
            }),
        }
    }

    async fn fetch_service_account(
        &self,
        key: &ServiceAccountKey,
        now: DateTime<Utc>,
    ) -> Result<TokenResponse, AuthError> {
        let assertion = sign_assertion(key, now)?;
        let req = self.http.post(&key.token_uri).form(&[
            ("grant_type", JWT_BEARER_GRANT),
            ("assertion", assertion.as_str()),
        ]);
        send(req, &key.token_uri).await
    }

    async fn fetch_authorized_user(
        &self,
        key: &AuthorizedUserKey,
    ) -> Result<TokenResponse, AuthError> {
        let req = self.http.post(REFRESH_TOKEN_URI).form(&[
            ("grant_type", "refresh_token"),
            ("client_id", key.client_id.as_str()),
            ("client_secret", key.client_secret.as_str()),
            ("refresh_token", key.refresh_token.as_str()),
        ]);
        send(req, REFRESH_TOKEN_URI).await
    }
}

fn sign_assertion(key: &ServiceAccountKey, now: DateTime<Utc>) -> Result<String, AuthError> {
    let encoding_key =
        EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(AuthError::InvalidKey)?;
    let claims = AssertionClaims::new(key, now);
    jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
        .map_err(AuthError::InvalidKey)
}

async fn send(req: reqwest::RequestBuilder, url: &str) -> Result<TokenResponse, AuthError> {
    let http_err = |source| AuthError::Http {
        url: url.to_string(),
        source,
    };
    let resp = req.send().await.map_err(http_err)?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(AuthError::Status {
            url: url.to_string(),
            status,
            body,
        });
    }
    resp.json::<TokenResponse>().await.map_err(http_err)
}
