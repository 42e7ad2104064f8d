use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::codec::Fields;
use crate::infra::auth::{AuthError, TokenSource};
use crate::infra::credentials::{CredentialSource, ResolvedCredentials};

const PRODUCTION_BASE_URL: &str = "https://firestore.googleapis.com";
const DEFAULT_DATABASE: &str = "(default)";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum FirestoreError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: reqwest::Method,
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },
}

/// A stored document as returned by the REST API.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    /// Full resource name: `projects/{p}/databases/{d}/documents/{collection}/{id}`.
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RunQueryItem {
    #[serde(default)]
    document: Option<Document>,
}

#[derive(Serialize)]
struct DocumentBody<'a> {
    fields: &'a Fields,
}

/// Authenticated handle to one Firestore database.
pub struct FirestoreClient {
    http: reqwest::Client,
    tokens: TokenSource,
    base_url: String,
    project_id: String,
}

impl FirestoreClient {
    pub fn connect(credentials: ResolvedCredentials) -> Result<Self, FirestoreError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(FirestoreError::Client)?;
        let base_url = match &credentials.source {
            CredentialSource::Emulator { host } => format!("http://{host}"),
            _ => PRODUCTION_BASE_URL.to_string(),
        };
        Ok(Self {
            tokens: TokenSource::new(http.clone(), credentials.source),
            http,
            base_url,
            project_id: credentials.project_id,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/v1/projects/{p}/databases/(default)/documents`
    pub fn documents_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/{DEFAULT_DATABASE}/documents",
            self.base_url, self.project_id
        )
    }

    /// Runs a structured query against the database root.
    pub async fn run_query(
        &self,
        query: &serde_json::Value,
    ) -> Result<Vec<Document>, FirestoreError> {
        let url = format!("{}:runQuery", self.documents_url());
        let req = self.http.post(&url).json(query);
        let items: Vec<RunQueryItem> = self.send(reqwest::Method::POST, &url, req).await?;
        Ok(items.into_iter().filter_map(|item| item.document).collect())
    }

    /// Creates a document with a server-assigned id.
    pub async fn create_document(
        &self,
        collection: &str,
        fields: &Fields,
    ) -> Result<Document, FirestoreError> {
        let url = format!("{}/{collection}", self.documents_url());
        let req = self.http.post(&url).json(&DocumentBody { fields });
        self.send(reqwest::Method::POST, &url, req).await
    }

    /// Writes `mask` fields of an existing document. Fails if it was deleted.
    pub async fn patch_document(
        &self,
        name: &str,
        fields: &Fields,
        mask: &[&str],
    ) -> Result<Document, FirestoreError> {
        let (url, req) = self.patch_request(name, fields, mask);
        self.send(reqwest::Method::PATCH, &url, req).await
    }

    /// `PATCH {base}/v1/{name}?updateMask.fieldPaths=..&currentDocument.exists=true`
    fn patch_request(
        &self,
        name: &str,
        fields: &Fields,
        mask: &[&str],
    ) -> (String, reqwest::RequestBuilder) {
        let url = format!("{}/v1/{name}", self.base_url);
        let mut query: Vec<(&str, &str)> = mask
            .iter()
            .map(|path| ("updateMask.fieldPaths", *path))
            .collect();
        query.push(("currentDocument.exists", "true"));
        let req = self
            .http
            .patch(&url)
            .query(&query)
            .json(&DocumentBody { fields });
        (url, req)
    }

    async fn send<T>(
        &self,
        method: reqwest::Method,
        url: &str,
        req: reqwest::RequestBuilder,
    ) -> Result<T, FirestoreError>
    where
        T: serde::de::DeserializeOwned,
    {
        let authorization = self.tokens.authorization().await?;
        tracing::debug!(%method, url, "firestore request");

        let http_err = |source| FirestoreError::Http {
            url: url.to_string(),
            source,
        };
        let resp = req
            .header(reqwest::header::AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(http_err)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FirestoreError::Status {
                method,
                url: url.to_string(),
                status,
                body,
            });
        }
        resp.json::<T>().await.map_err(http_err)
    }
}
