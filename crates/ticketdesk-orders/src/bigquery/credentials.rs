//! Access token acquisition for the BigQuery REST API.

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::OrderSourceError;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const METADATA_TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";
const BIGQUERY_SCOPE: &str = "https://www.googleapis.com/auth/bigquery";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for service account assertions.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Tokens are refreshed this long before they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Where the source gets its credentials from.
#[derive(Clone)]
pub enum CredentialSource {
    /// Credential JSON held in memory.
    InlineJson(String),
    /// A pre-issued OAuth access token.
    AccessToken(String),
    /// Path to a credential JSON file.
    KeyFile(PathBuf),
    /// The GCE metadata server.
    MetadataServer,
}

impl CredentialSource {
    /// Short name of the credential kind, safe to log.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InlineJson(_) => "inline-json",
            Self::AccessToken(_) => "access-token",
            Self::KeyFile(_) => "key-file",
            Self::MetadataServer => "metadata-server",
        }
    }

    /// Returns true when explicit credential material was configured.
    pub fn is_explicit(&self) -> bool {
        !matches!(self, Self::MetadataServer)
    }
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyFile(path) => f.debug_tuple("KeyFile").field(path).finish(),
            other => write!(f, "CredentialSource({})", other.kind()),
        }
    }
}

/// Credential file contents, keyed on the `type` field.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum CredentialFile {
    AuthorizedUser {
        client_id: String,
        client_secret: String,
        refresh_token: String,
        #[serde(default)]
        token_uri: Option<String>,
    },
    ServiceAccount {
        client_email: String,
        private_key: String,
        #[serde(default)]
        private_key_id: Option<String>,
        #[serde(default)]
        token_uri: Option<String>,
    },
}

/// Claims of the JWT-bearer assertion exchanged for an access token.
#[derive(Debug, Serialize, Deserialize)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

enum TokenKind {
    Static(String),
    RefreshToken {
        client_id: String,
        client_secret: String,
        refresh_token: String,
        token_uri: String,
    },
    ServiceAccount {
        client_email: String,
        key_id: Option<String>,
        key: EncodingKey,
        token_uri: String,
    },
    Metadata {
        url: String,
    },
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Hands out OAuth access tokens, caching them until shortly before expiry.
pub struct TokenProvider {
    http: reqwest::Client,
    kind: TokenKind,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    /// Resolves a credential source into a token provider.
    ///
    /// Key files are read here, once.
    ///
    /// # Errors
    ///
    /// Fails if the credential JSON is unreadable, malformed, or of a kind
    /// that cannot be exchanged for a token.
    pub fn from_source(
        source: &CredentialSource,
        http: reqwest::Client,
        metadata_url: &str,
    ) -> Result<Self, OrderSourceError> {
        let kind = match source {
            CredentialSource::AccessToken(token) => {
                let token = token.trim();
                if token.is_empty() {
                    return Err(OrderSourceError::credentials("access token is empty"));
                }
                TokenKind::Static(token.to_string())
            },
            CredentialSource::InlineJson(json) => parse_credential_json(json)?,
            CredentialSource::KeyFile(path) => {
                let json = std::fs::read_to_string(path)
                    .map_err(|e| OrderSourceError::io(path, e))?;
                parse_credential_json(&json)?
            },
            CredentialSource::MetadataServer => TokenKind::Metadata {
                url: format!("{metadata_url}{METADATA_TOKEN_PATH}"),
            },
        };

        debug!(kind = source.kind(), "Resolved BigQuery credentials");

        Ok(Self {
            http,
            kind,
            cached: Mutex::new(None),
        })
    }

    /// Returns a valid access token, fetching a new one when needed.
    pub async fn access_token(&self) -> Result<String, OrderSourceError> {
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }

        let (url, request) = match &self.kind {
            TokenKind::Static(token) => return Ok(token.clone()),
            TokenKind::RefreshToken {
                client_id,
                client_secret,
                refresh_token,
                token_uri,
            } => {
                let form = [
                    ("grant_type", "refresh_token"),
                    ("client_id", client_id.as_str()),
                    ("client_secret", client_secret.as_str()),
                    ("refresh_token", refresh_token.as_str()),
                ];
                (token_uri.as_str(), self.http.post(token_uri).form(&form))
            },
            TokenKind::ServiceAccount {
                client_email,
                key_id,
                key,
                token_uri,
            } => {
                let assertion = sign_assertion(client_email, key_id.as_deref(), key, token_uri)?;
                let form = [
                    ("grant_type", JWT_BEARER_GRANT),
                    ("assertion", assertion.as_str()),
                ];
                (token_uri.as_str(), self.http.post(token_uri).form(&form))
            },
            TokenKind::Metadata { url } => (
                url.as_str(),
                self.http.get(url).header("Metadata-Flavor", "Google"),
            ),
        };

        let response = request.send().await.map_err(|e| {
            OrderSourceError::credentials(format!("token request to {url} failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(OrderSourceError::credentials(format!(
                "token endpoint returned {status}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| OrderSourceError::credentials(format!("invalid token response: {e}")))?;

        let lifetime = Duration::from_secs(token.expires_in.unwrap_or(3600));
        *self.cached.lock() = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });

        debug!(expires_in_secs = lifetime.as_secs(), "Fetched new access token");
        Ok(token.access_token)
    }

    fn cached_token(&self) -> Option<String> {
        let cached = self.cached.lock();
        cached
            .as_ref()
            .filter(|t| t.expires_at > Instant::now() + EXPIRY_MARGIN)
            .map(|t| t.value.clone())
    }
}

fn parse_credential_json(json: &str) -> Result<TokenKind, OrderSourceError> {
    let file: CredentialFile = serde_json::from_str(json)
        .map_err(|e| OrderSourceError::credentials(format!("unrecognised credential JSON: {e}")))?;

    match file {
        CredentialFile::AuthorizedUser {
            client_id,
            client_secret,
            refresh_token,
            token_uri,
        } => Ok(TokenKind::RefreshToken {
            client_id,
            client_secret,
            refresh_token,
            token_uri: token_uri.unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
        }),
        CredentialFile::ServiceAccount {
            client_email,
            private_key,
            private_key_id,
            token_uri,
        } => {
            let key = EncodingKey::from_rsa_pem(private_key.as_bytes()).map_err(|e| {
                OrderSourceError::credentials(format!(
                    "invalid private key for {client_email}: {e}"
                ))
            })?;
            Ok(TokenKind::ServiceAccount {
                client_email,
                key_id: private_key_id,
                key,
                token_uri: token_uri.unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
            })
        },
    }
}

/// Signs an RS256 assertion for the JWT-bearer grant.
fn sign_assertion(
    client_email: &str,
    key_id: Option<&str>,
    key: &EncodingKey,
    token_uri: &str,
) -> Result<String, OrderSourceError> {
    let iat = Utc::now().timestamp();
    let claims = AssertionClaims {
        iss: client_email.to_string(),
        scope: BIGQUERY_SCOPE.to_string(),
        aud: token_uri.to_string(),
        iat,
        exp: iat + ASSERTION_LIFETIME_SECS,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key_id.map(str::to_string);

    jsonwebtoken::encode(&header, &claims, key)
        .map_err(|e| OrderSourceError::credentials(format!("could not sign assertion: {e}")))
}
