//! HTTP client wrapper for the Drive v2 API.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use futures_util::{StreamExt, TryFutureExt};
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;

use crate::error::{ApiError, Error, Result};
use crate::models::{FileMetadata, ListPage, ParentReference};
use crate::query::{
    self, adapt_values, CompiledQuery, FieldRegistry, FilterValidator, RawFilterInput, Record,
    RecordSet,
};
use crate::retry::{execute_create_with_retry, execute_with_retry, RetryConfig};

/// Base URL for the Drive API v2.
const BASE_URL: &str = "https://www.googleapis.com/drive/v2";

/// Base URL for Drive v2 media uploads.
const UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v2";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of records requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Client for the Drive v2 API.
///
/// The client only ever sees an access token; obtaining and refreshing it is
/// the job of [`crate::auth`].
#[derive(Clone)]
pub struct GDriveClient {
    token: String,
    http_client: reqwest::Client,
    base_url: String,
    upload_url: String,
    retry_config: RetryConfig,
    validator: FilterValidator,
    page_size: u32,
}

impl GDriveClient {
    /// Creates a client with default settings.
    ///
    /// # Errors
    ///
    /// Returns `Error::Http` if the HTTP client cannot be constructed.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::builder(token).build()
    }

    /// Creates a client with a custom base URL (for testing).
    ///
    /// Uploads go to `{base_url}/upload`.
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        Self::builder(token)
            .upload_url(format!("{base_url}/upload"))
            .base_url(base_url)
            .build()
    }

    /// Starts building a client.
    pub fn builder(token: impl Into<String>) -> GDriveClientBuilder {
        GDriveClientBuilder::new(token)
    }

    /// Returns the access token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the validator used for folder lookups and [`search`](Self::search).
    pub fn validator(&self) -> &FilterValidator {
        &self.validator
    }

    /// Validates and compiles `input`, then lists the matching files.
    pub async fn search(&self, input: &RawFilterInput) -> Result<RecordSet> {
        let query = query::compile(&self.validator, input)?;
        self.list_files(&query).await
    }

    /// Lists all files matching `query`, following pagination.
    pub async fn list_files(&self, query: &CompiledQuery) -> Result<RecordSet> {
        self.list_files_up_to(query, None).await
    }

    /// Lists files matching `query`, stopping once `limit` records are read.
    pub async fn list_files_up_to(
        &self,
        query: &CompiledQuery,
        limit: Option<usize>,
    ) -> Result<RecordSet> {
        tracing::debug!(query = %query, "listing files");
        let url = format!("{}/files", self.base_url);
        let mut params = Vec::new();
        if !query.is_empty() {
            params.push(("q", query.as_str().to_string()));
        }
        self.collect_pages(&url, params, limit).await
    }

    /// Lists the children of a folder.
    pub async fn list_children(&self, folder_id: &str) -> Result<RecordSet> {
        let url = format!("{}/files/{}/children", self.base_url, folder_id);
        self.collect_pages(&url, Vec::new(), None).await
    }

    /// Finds folders titled `title`.
    pub async fn find_folder(&self, title: &str) -> Result<RecordSet> {
        let input = RawFilterInput::new().with("title", title);
        let query = query::compile_folders(&self.validator, &input)?;
        self.list_files(&query).await
    }

    /// Returns the ID of the first folder titled `title`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Query(QueryError::EmptyResult)` if no folder matches.
    pub async fn folder_id(&self, title: &str) -> Result<String> {
        let folders = self.find_folder(title).await?;
        let folder = folders.first()?;
        folder.id().map(str::to_string).ok_or_else(|| {
            Error::Api(ApiError::NotFound {
                resource: "folder id".to_string(),
                id: title.to_string(),
            })
        })
    }

    /// Fetches a file's metadata.
    pub async fn get_file(&self, file_id: &str) -> Result<Record> {
        let url = format!("{}/files/{}", self.base_url, file_id);
        self.get_json(&url, &[]).await
    }

    /// Uploads a local file, then sets its title and parent folder.
    ///
    /// The title defaults to the file name.
    pub async fn upload_file(
        &self,
        local_path: &Path,
        title: Option<&str>,
        parent_id: Option<&str>,
    ) -> Result<Record> {
        let data = tokio::fs::read(local_path).await?;
        let url = format!("{}/files", self.upload_url);
        tracing::debug!(path = %local_path.display(), bytes = data.len(), "uploading file");

        let response = execute_create_with_retry(&self.retry_config, || {
            self.http_client
                .post(&url)
                .bearer_auth(&self.token)
                .query(&[("uploadType", "media")])
                .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
                .body(data.clone())
                .send()
                .map_err(Error::from)
        })
        .await?;
        let uploaded: Record = response.json().await?;

        let metadata = FileMetadata {
            title: title.map(str::to_string).or_else(|| {
                local_path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            }),
            parents: parent_id
                .map(|id| vec![ParentReference { id: id.to_string() }])
                .unwrap_or_default(),
        };
        if metadata.is_empty() {
            return Ok(uploaded);
        }

        let file_id = uploaded.id().ok_or_else(|| ApiError::Validation {
            field: Some("id".to_string()),
            message: "upload response has no file id".to_string(),
        })?;
        self.patch_file(file_id, &metadata).await
    }

    /// Patches a file's metadata.
    pub async fn patch_file(&self, file_id: &str, metadata: &FileMetadata) -> Result<Record> {
        let url = format!("{}/files/{}", self.base_url, file_id);
        let response = execute_with_retry(&self.retry_config, || {
            self.http_client
                .patch(&url)
                .bearer_auth(&self.token)
                .json(metadata)
                .send()
                .map_err(Error::from)
        })
        .await?;
        Ok(response.json().await?)
    }

    /// Downloads a file's content to `dest`, returning the bytes written.
    pub async fn download_file(&self, file_id: &str, dest: &Path) -> Result<u64> {
        let url = format!("{}/files/{}", self.base_url, file_id);
        let response = execute_with_retry(&self.retry_config, || {
            self.http_client
                .get(&url)
                .bearer_auth(&self.token)
                .query(&[("alt", "media")])
                .send()
                .map_err(Error::from)
        })
        .await?;

        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        tracing::debug!(file_id, bytes = written, dest = %dest.display(), "downloaded file");
        Ok(written)
    }

    /// Reads every page of a list endpoint into one record set.
    async fn collect_pages(
        &self,
        url: &str,
        base_params: Vec<(&'static str, String)>,
        limit: Option<usize>,
    ) -> Result<RecordSet> {
        let mut records = RecordSet::default();
        let mut page_token: Option<String> = None;

        loop {
            let mut params = base_params.clone();
            params.push(("maxResults", self.page_size.to_string()));
            if let Some(token) = &page_token {
                params.push(("pageToken", token.clone()));
            }

            let page: ListPage = self.get_json(url, &params).await?;
            records.extend(adapt_values(page.items));

            if let Some(limit) = limit {
                if records.len() >= limit {
                    records.truncate(limit);
                    break;
                }
            }
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(records)
    }

    /// Performs an authenticated GET with retries and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let response = execute_with_retry(&self.retry_config, || {
            self.http_client
                .get(url)
                .bearer_auth(&self.token)
                .query(params)
                .send()
                .map_err(Error::from)
        })
        .await?;
        Ok(response.json::<T>().await?)
    }
}

impl fmt::Debug for GDriveClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GDriveClient")
            .field("token", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("upload_url", &self.upload_url)
            .field("retry_config", &self.retry_config)
            .finish()
    }
}

/// Builder for [`GDriveClient`].
pub struct GDriveClientBuilder {
    token: String,
    base_url: String,
    upload_url: String,
    timeout: Duration,
    retry_config: RetryConfig,
    validator: FilterValidator,
    page_size: u32,
}

impl fmt::Debug for GDriveClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GDriveClientBuilder")
            .field("token", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("upload_url", &self.upload_url)
            .field("timeout", &self.timeout)
            .field("retry_config", &self.retry_config)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl GDriveClientBuilder {
    fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: BASE_URL.to_string(),
            upload_url: UPLOAD_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry_config: RetryConfig::default(),
            validator: FilterValidator::new(FieldRegistry::drive()),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Sets the API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the media upload base URL.
    pub fn upload_url(mut self, url: impl Into<String>) -> Self {
        self.upload_url = url.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry behaviour.
    pub fn retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    /// Sets the validator used for folder lookups and searches.
    pub fn validator(mut self, validator: FilterValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Sets the page size for list requests (clamped to 1..=1000).
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, 1000);
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<GDriveClient> {
        let http_client = reqwest::Client::builder().timeout(self.timeout).build()?;
        Ok(GDriveClient {
            token: self.token,
            http_client,
            base_url: self.base_url,
            upload_url: self.upload_url,
            retry_config: self.retry_config,
            validator: self.validator,
            page_size: self.page_size,
        })
    }
}
