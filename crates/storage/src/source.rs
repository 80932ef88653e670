use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::DataLoadError;

/// Where the question table lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Path(PathBuf),
    Url(Url),
}

impl SourceLocation {
    /// `http`/`https` URLs are remote; anything else is treated as a local path.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Url(url),
            _ => Self::Path(PathBuf::from(raw)),
        }
    }

    #[must_use]
    pub fn into_source(self) -> Box<dyn QuestionSource> {
        match self {
            Self::Path(path) => Box::new(FileSource::new(path)),
            Self::Url(url) => Box::new(HttpSource::new(url)),
        }
    }
}

/// Supplies the raw question table text.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Human-readable origin, used in logs.
    fn describe(&self) -> String;

    /// Fetch the full table text.
    ///
    /// # Errors
    ///
    /// Returns `DataLoadError` if the source is unreachable.
    async fn fetch(&self) -> Result<String, DataLoadError>;
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl QuestionSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<String, DataLoadError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| DataLoadError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: Url,
}

impl HttpSource {
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self::with_client(Client::new(), url)
    }

    /// Use a preconfigured client (timeouts, proxy settings).
    #[must_use]
    pub fn with_client(client: Client, url: Url) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl QuestionSource for HttpSource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn fetch(&self) -> Result<String, DataLoadError> {
        let http_err = |source: reqwest::Error| DataLoadError::Http {
            url: self.url.to_string(),
            source,
        };

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(http_err)?;

        if !response.status().is_success() {
            return Err(DataLoadError::HttpStatus {
                url: self.url.to_string(),
                status: response.status(),
            });
        }

        response.text().await.map_err(http_err)
    }
}

/// Fixed table text, for tests and embedding.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    text: String,
}

impl InMemorySource {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl QuestionSource for InMemorySource {
    fn describe(&self) -> String {
        "in-memory table".to_owned()
    }

    async fn fetch(&self) -> Result<String, DataLoadError> {
        Ok(self.text.clone())
    }
}
