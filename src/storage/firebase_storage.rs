use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use std::fs;
use tracing::info;
use url::Url;

use super::interface::{content_type_for, sanitize_filename, ImageStore, StorageError, StoredImage};
use crate::config_manager::StorageConfig;

#[derive(Debug, Deserialize)]
struct StorageCredentials {
    access_token: String,
}

impl StorageCredentials {
    fn load(path: &str) -> Result<Self, StorageError> {
        let content = fs::read_to_string(path)
            .map_err(|e| StorageError::Credentials(format!("{}: {}", path, e)))?;
        let credentials: StorageCredentials = serde_json::from_str(&content)
            .map_err(|e| StorageError::Credentials(format!("{}: {}", path, e)))?;
        if credentials.access_token.trim().is_empty() {
            return Err(StorageError::Credentials(format!("{}: empty access_token", path)));
        }
        Ok(credentials)
    }
}

/// Firebase Storage bucket reached through the Cloud Storage JSON API
pub struct FirebaseImageStore {
    client: reqwest::Client,
    bucket: String,
    base_url: String,
    public_base_url: String,
    access_token: String,
    unique_object_names: bool,
}

impl FirebaseImageStore {
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let credentials = StorageCredentials::load(&config.credentials_path)?;
        info!("Initialized FirebaseImageStore: bucket={}", config.bucket);

        Ok(Self {
            client: reqwest::Client::new(),
            bucket: config.bucket.clone(),
            base_url: config.base_url.clone(),
            public_base_url: config.public_base_url.clone(),
            access_token: credentials.access_token,
            unique_object_names: config.unique_object_names,
        })
    }

    /// `images/{filename}`. Without `unique_object_names` a repeated
    /// filename overwrites the earlier object.
    pub fn object_name(&self, filename: &str) -> String {
        let filename = sanitize_filename(filename);
        if self.unique_object_names {
            format!("images/{}-{}", uuid::Uuid::new_v4(), filename)
        } else {
            format!("images/{}", filename)
        }
    }

    pub fn public_url(&self, object_name: &str) -> Result<String, StorageError> {
        let mut segments = vec![self.bucket.as_str()];
        segments.extend(object_name.split('/'));
        Ok(url_with_segments(&self.public_base_url, &segments)?.to_string())
    }
}

fn url_with_segments(base: &str, segments: &[&str]) -> Result<Url, StorageError> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| StorageError::BaseUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[async_trait]
impl ImageStore for FirebaseImageStore {
    async fn store_image(&self, content: Vec<u8>, filename: &str) -> Result<StoredImage, StorageError> {
        let content_type = content_type_for(filename);
        let object_name = self.object_name(filename);

        let upload_url = url_with_segments(
            &self.base_url,
            &["upload", "storage", "v1", "b", &self.bucket, "o"],
        )?;

        // predefinedAcl makes the object public in the same request
        let response = self
            .client
            .post(upload_url)
            .query(&[
                ("uploadType", "media"),
                ("name", object_name.as_str()),
                ("predefinedAcl", "publicRead"),
            ])
            .bearer_auth(&self.access_token)
            .header(CONTENT_TYPE, &content_type)
            .body(content)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let public_url = self.public_url(&object_name)?;
        info!("Created image URL: {}", public_url);

        Ok(StoredImage {
            object_name,
            content_type,
            public_url,
        })
    }
}
