//! HTTP client for the artifact metadata index.
//!
//! One collection of artifact records, filtered by bucket name:
//!   POST   /artifacts                  -> insert a batch of records
//!   DELETE /artifacts?bucket={bucket}  -> delete all records for a bucket
//!   GET    /artifacts?bucket={bucket}  -> list records for a bucket

use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::config::IndexSettings;
use crate::contract::{ArtifactIndex, ArtifactRecord};
use crate::error::Error;

pub struct HttpArtifactIndex {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    cancel: CancellationToken,
}

impl HttpArtifactIndex {
    pub fn new(settings: &IndexSettings, cancel: CancellationToken) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            cancel,
        }
    }

    fn artifacts_url(&self) -> String {
        format!("{}/artifacts", self.endpoint)
    }

    fn with_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        code: &str,
        message: &str,
    ) -> Result<reqwest::Response, Error> {
        let response = tokio::select! {
            _ = self.cancel.cancelled() => {
                return Err(Error::cancelled("index.cancelled", "Index call cancelled"))
            }
            res = self.with_auth(request).send() => res,
        };
        let response = match response {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "{message}");
                return Err(Error::failure(code, message));
            }
        };
        response.error_for_status().map_err(|e| {
            error!(error = %e, "{message}");
            Error::failure(code, message)
        })
    }
}

#[async_trait::async_trait]
impl ArtifactIndex for HttpArtifactIndex {
    async fn insert_many(&self, records: Vec<ArtifactRecord>) -> Result<(), Error> {
        let request = self.http.post(self.artifacts_url()).json(&records);
        self.execute(request, "files.upload.index", "Fail to upload files to index")
            .await?;
        Ok(())
    }

    async fn delete_by_bucket(&self, bucket: &str) -> Result<(), Error> {
        let request = self
            .http
            .delete(self.artifacts_url())
            .query(&[("bucket", bucket)]);
        self.execute(request, "delete.files.index", "Fail to delete files from index")
            .await?;
        Ok(())
    }

    async fn names_by_bucket(&self, bucket: &str) -> Result<Vec<String>, Error> {
        let request = self
            .http
            .get(self.artifacts_url())
            .query(&[("bucket", bucket)]);
        let response = self
            .execute(request, "get.files.index", "Fail to get files from index")
            .await?;
        let records: Vec<ArtifactRecord> = response.json().await.map_err(|e| {
            error!(error = %e, "Fail to decode index records");
            Error::failure("get.files.index", "Fail to get files from index")
        })?;
        Ok(records.into_iter().map(|r| r.file_path).collect())
    }
}
