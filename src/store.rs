//! HTTP client for the artifact object store.
//!
//! The store exposes a bucket/object REST surface:
//!   GET    /buckets/{bucket}                 -> 200 exists, 404 missing
//!   PUT    /buckets/{bucket}                 -> create bucket
//!   DELETE /buckets/{bucket}                 -> remove bucket
//!   PUT    /buckets/{bucket}/objects/{name}  -> upload object body
//!   POST   /buckets/{bucket}/delete-objects  -> batch delete, JSON body
//!
//! Authentication is an optional bearer key supplied via configuration.
//! Every request honors the run's cancellation token.

use reqwest::StatusCode;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::config::ObjectStoreSettings;
use crate::contract::{ArtifactStore, ARTIFACT_CONTENT_TYPE};
use crate::error::Error;

pub struct HttpArtifactStore {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    cancel: CancellationToken,
}

#[derive(Serialize)]
struct DeleteObjectsBody<'a> {
    objects: &'a [String],
}

impl HttpArtifactStore {
    pub fn new(settings: &ObjectStoreSettings, cancel: CancellationToken) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            cancel,
        }
    }

    fn bucket_url(&self, bucket: &str) -> String {
        format!("{}/buckets/{bucket}", self.endpoint)
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
                return Err(Error::cancelled("store.cancelled", "Object store call cancelled"))
            }
            res = self.with_auth(request).send() => res,
        };
        match response {
            Ok(response) => Ok(response),
            Err(e) => {
                error!(error = %e, "{message}");
                Err(Error::failure(code, message))
            }
        }
    }
}

#[async_trait::async_trait]
impl ArtifactStore for HttpArtifactStore {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, Error> {
        let request = self.http.get(self.bucket_url(bucket));
        let response = self
            .execute(request, "bucket.exists", "Fail to query bucket in store")
            .await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => {
                error!(bucket, %status, "Unexpected status querying bucket");
                Err(Error::failure("bucket.exists", "Fail to query bucket in store"))
            }
        }
    }

    async fn make_bucket(&self, bucket: &str) -> Result<(), Error> {
        let request = self.http.put(self.bucket_url(bucket));
        let response = self
            .execute(request, "make.bucket", "Fail to create bucket in store")
            .await?;
        response.error_for_status().map_err(|e| {
            error!(bucket, error = %e, "Fail to create bucket in store");
            Error::failure("make.bucket", "Fail to create bucket in store")
        })?;
        Ok(())
    }

    async fn remove_bucket(&self, bucket: &str) -> Result<(), Error> {
        let request = self.http.delete(self.bucket_url(bucket));
        let response = self
            .execute(request, "remove.bucket", "Fail to remove bucket in store")
            .await?;
        response.error_for_status().map_err(|e| {
            error!(bucket, error = %e, "Fail to remove bucket in store");
            Error::failure("remove.bucket", "Fail to remove bucket in store")
        })?;
        Ok(())
    }

    async fn put_object(&self, bucket: &str, object: &str, content: &[u8]) -> Result<(), Error> {
        let url = format!("{}/objects/{object}", self.bucket_url(bucket));
        let request = self
            .http
            .put(url)
            .header("content-type", ARTIFACT_CONTENT_TYPE)
            .body(content.to_vec());
        let response = self
            .execute(request, "file.upload.store", "Fail to upload file in store")
            .await?;
        response.error_for_status().map_err(|e| {
            error!(bucket, object, error = %e, "Fail to upload file in store");
            Error::failure("file.upload.store", "Fail to upload file in store")
        })?;
        Ok(())
    }

    async fn remove_objects(&self, bucket: &str, objects: &[String]) -> Result<(), Error> {
        let url = format!("{}/delete-objects", self.bucket_url(bucket));
        let request = self.http.post(url).json(&DeleteObjectsBody { objects });
        let response = self
            .execute(request, "remove.objects", "Fail to remove objects in store")
            .await?;
        response.error_for_status().map_err(|e| {
            error!(bucket, error = %e, "Fail to remove objects in store");
            Error::failure("remove.objects", "Fail to remove objects in store")
        })?;
        Ok(())
    }
}
