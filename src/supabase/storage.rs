//! `/storage/v1` endpoints

use async_trait::async_trait;
use serde_json::json;

use super::{error_from_response, SupabaseClient};
use crate::error::BackendError;
use crate::storage::{content_type_for, public_object_url, ObjectStorage, UploadOptions};

fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl ObjectStorage for SupabaseClient {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        options: UploadOptions,
    ) -> Result<(), BackendError> {
        let url = self.endpoint(&format!(
            "/storage/v1/object/{}/{}",
            bucket,
            encode_path(path)
        ));
        let content_type = options
            .content_type
            .unwrap_or_else(|| content_type_for(path).to_string());

        let response = self
            .http
            .post(url)
            .headers(self.auth_headers())
            .header("x-upsert", if options.upsert { "true" } else { "false" })
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(())
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), BackendError> {
        let response = self
            .http
            .delete(self.endpoint(&format!("/storage/v1/object/{}", bucket)))
            .headers(self.auth_headers())
            .json(&json!({ "prefixes": paths }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        public_object_url(&self.base_url, bucket, path)
    }
}
