//! Credential discovery.
//!
//! Resolution is an ordered list of [`CredentialStrategy`] values; the first
//! one that yields credentials wins. Every strategy reads the outside world
//! only through [`Environment`], so the chain can be exercised without touching
//! real env vars or files.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default local key file, relative to the working directory.
pub const SERVICE_ACCOUNT_FILE: &str = "service-account.json";

/// Project id env vars, in lookup order.
pub const PROJECT_ENV_VARS: [&str; 2] = ["GOOGLE_CLOUD_PROJECT", "GCLOUD_PROJECT"];

pub const CREDENTIALS_ENV_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";
pub const EMULATOR_ENV_VAR: &str = "FIRESTORE_EMULATOR_HOST";

/// gcloud's ADC file, relative to `$HOME`.
const GCLOUD_ADC_FILE: &str = ".config/gcloud/application_default_credentials.json";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("failed to read credential file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed credential file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no project id for {0}: set GOOGLE_CLOUD_PROJECT or GCLOUD_PROJECT")]
    MissingProject(CredentialOrigin),

    #[error("no credentials could be resolved")]
    Unresolved,
}

/// Read access to process state.
pub trait Environment {
    fn var(&self, key: &str) -> Option<String>;

    /// `Ok(None)` when the file does not exist.
    fn read_file(&self, path: &Path) -> std::io::Result<Option<String>>;
}

/// The real process environment and filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }

    fn read_file(&self, path: &Path) -> std::io::Result<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(default)]
    pub project_id: Option<String>,
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

#[derive(Clone, Deserialize)]
pub struct AuthorizedUserKey {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    #[serde(default)]
    pub quota_project_id: Option<String>,
}

impl fmt::Debug for AuthorizedUserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizedUserKey")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("quota_project_id", &self.quota_project_id)
            .finish()
    }
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum KeyFile {
    ServiceAccount(ServiceAccountKey),
    AuthorizedUser(AuthorizedUserKey),
}

/// Where access tokens come from.
#[derive(Debug, Clone)]
pub enum CredentialSource {
    ServiceAccount(ServiceAccountKey),
    AuthorizedUser(AuthorizedUserKey),
    /// GCE / Cloud Run metadata server.
    MetadataServer,
    /// Local Firestore emulator; no authentication.
    Emulator { host: String },
}

impl CredentialSource {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ServiceAccount(_) => "service account",
            Self::AuthorizedUser(_) => "authorized user",
            Self::MetadataServer => "metadata server",
            Self::Emulator { .. } => "emulator",
        }
    }
}

/// Which strategy produced the credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialOrigin {
    LocalKeyFile(PathBuf),
    ApplicationDefault,
}

impl fmt::Display for CredentialOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalKeyFile(path) => write!(f, "{}", path.display()),
            Self::ApplicationDefault => f.write_str("application default credentials"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedCredentials {
    pub project_id: String,
    pub source: CredentialSource,
    pub origin: CredentialOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialStrategy {
    /// A service-account key file; skipped when the file is absent.
    LocalKeyFile(PathBuf),
    /// Ambient credentials following the ADC convention.
    ApplicationDefault,
}

impl CredentialStrategy {
    /// Local key file first, then ADC.
    pub fn default_chain(key_file: impl Into<PathBuf>) -> Vec<Self> {
        vec![Self::LocalKeyFile(key_file.into()), Self::ApplicationDefault]
    }

    /// `Ok(None)` means "not applicable here, try the next one".
    pub fn try_resolve(
        &self,
        env: &impl Environment,
    ) -> Result<Option<ResolvedCredentials>, CredentialError> {
        match self {
            Self::LocalKeyFile(path) => resolve_local_key(env, path),
            Self::ApplicationDefault => resolve_application_default(env).map(Some),
        }
    }
}

/// Walks `chain` in order and returns the first resolved credentials.
///
/// When `FIRESTORE_EMULATOR_HOST` is set, every request goes to the emulator
/// whichever strategy matched. The project id still comes from that strategy.
pub fn resolve_credentials(
    env: &impl Environment,
    chain: &[CredentialStrategy],
) -> Result<ResolvedCredentials, CredentialError> {
    for strategy in chain {
        if let Some(mut resolved) = strategy.try_resolve(env)? {
            if let Some(host) = env.var(EMULATOR_ENV_VAR) {
                resolved.source = CredentialSource::Emulator { host };
            }
            return Ok(resolved);
        }
    }
    Err(CredentialError::Unresolved)
}

fn resolve_local_key(
    env: &impl Environment,
    path: &Path,
) -> Result<Option<ResolvedCredentials>, CredentialError> {
    let Some(content) = read(env, path)? else {
        return Ok(None);
    };
    let key: ServiceAccountKey =
        serde_json::from_str(&content).map_err(|source| CredentialError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    let origin = CredentialOrigin::LocalKeyFile(path.to_path_buf());
    let project_id = key
        .project_id
        .clone()
        .ok_or_else(|| CredentialError::MissingProject(origin.clone()))?;
    Ok(Some(ResolvedCredentials {
        project_id,
        source: CredentialSource::ServiceAccount(key),
        origin,
    }))
}

fn resolve_application_default(
    env: &impl Environment,
) -> Result<ResolvedCredentials, CredentialError> {
    let env_project = PROJECT_ENV_VARS.iter().find_map(|name| env.var(name));

    let (source, key_project) = if let Some(host) = env.var(EMULATOR_ENV_VAR) {
        (CredentialSource::Emulator { host }, None)
    } else if let Some(path) = env.var(CREDENTIALS_ENV_VAR) {
        let path = PathBuf::from(path);
        // An explicitly named file must exist.
        let content = read(env, &path)?.ok_or_else(|| CredentialError::Io {
            path: path.clone(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })?;
        parse_key_file(&path, &content)?
    } else if let Some(path) = gcloud_adc_path(env) {
        match read(env, &path)? {
            Some(content) => parse_key_file(&path, &content)?,
            None => (CredentialSource::MetadataServer, None),
        }
    } else {
        (CredentialSource::MetadataServer, None)
    };

    let project_id = env_project
        .or(key_project)
        .ok_or(CredentialError::MissingProject(CredentialOrigin::ApplicationDefault))?;

    Ok(ResolvedCredentials {
        project_id,
        source,
        origin: CredentialOrigin::ApplicationDefault,
    })
}

fn gcloud_adc_path(env: &impl Environment) -> Option<PathBuf> {
    env.var("HOME").map(|home| Path::new(&home).join(GCLOUD_ADC_FILE))
}

fn parse_key_file(
    path: &Path,
    content: &str,
) -> Result<(CredentialSource, Option<String>), CredentialError> {
    let key: KeyFile = serde_json::from_str(content).map_err(|source| CredentialError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(match key {
        KeyFile::ServiceAccount(key) => {
            let project = key.project_id.clone();
            (CredentialSource::ServiceAccount(key), project)
        }
        KeyFile::AuthorizedUser(key) => {
            let project = key.quota_project_id.clone();
            (CredentialSource::AuthorizedUser(key), project)
        }
    })
}

fn read(env: &impl Environment, path: &Path) -> Result<Option<String>, CredentialError> {
    env.read_file(path).map_err(|source| CredentialError::Io {
        path: path.to_path_buf(),
        source,
    })
}
