use std::fmt;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

/// Where layer documents come from. `path` is the registry's relative source
/// path (e.g. `data/neatogeo_Tokenizables.geojson`).
#[allow(async_fn_in_trait)]
pub trait GeometrySource {
    async fn fetch(&self, path: &str) -> Result<String, SourceError>;

    /// Human-readable location for logs.
    fn describe(&self, path: &str) -> String {
        path.to_string()
    }
}

#[derive(Debug)]
pub enum SourceError {
    Io {
        path: String,
        source: std::io::Error,
    },
    /// Transport failure before a response arrived.
    Request { url: String, reason: String },
    /// Response arrived with a non-success status.
    Status { url: String, status: u16 },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Io { path, source } => write!(f, "read {path}: {source}"),
            SourceError::Request { url, reason } => write!(f, "GET {url}: {reason}"),
            SourceError::Status { url, status } => write!(f, "GET {url}: HTTP {status}"),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Joins a base URL and a relative path with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if base.is_empty() {
        path.to_string()
    } else {
        format!("{base}/{path}")
    }
}

/// Reads layer documents from a directory tree.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FilesystemSource {
    root: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FilesystemSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl GeometrySource for FilesystemSource {
    async fn fetch(&self, path: &str) -> Result<String, SourceError> {
        let full = self.root.join(path);
        tokio::fs::read_to_string(&full)
            .await
            .map_err(|source| SourceError::Io {
                path: full.display().to_string(),
                source,
            })
    }

    fn describe(&self, path: &str) -> String {
        self.root.join(path).display().to_string()
    }
}

/// Fetches layer documents over HTTP(S) relative to a base URL.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

#[cfg(not(target_arch = "wasm32"))]
impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl GeometrySource for HttpSource {
    async fn fetch(&self, path: &str) -> Result<String, SourceError> {
        let url = join_url(&self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| SourceError::Request {
                url: url.clone(),
                reason: err.to_string(),
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url,
                status: status.as_u16(),
            });
        }
        resp.text().await.map_err(|err| SourceError::Request {
            url,
            reason: err.to_string(),
        })
    }

    fn describe(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}
