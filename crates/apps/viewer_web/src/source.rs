use gloo_net::http::Request;
use streaming::{GeometrySource, SourceError, join_url};

/// Fetches layer documents with the browser's `fetch`, relative to the page's
/// data base URL.
#[derive(Debug, Clone)]
pub struct GlooSource {
    base_url: String,
}

impl GlooSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl GeometrySource for GlooSource {
    async fn fetch(&self, path: &str) -> Result<String, SourceError> {
        let url = join_url(&self.base_url, path);
        let resp = Request::get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Request {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        if !resp.ok() {
            return Err(SourceError::Status {
                url,
                status: resp.status(),
            });
        }
        resp.text().await.map_err(|e| SourceError::Request {
            url,
            reason: e.to_string(),
        })
    }

    fn describe(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}
