use crate::error::DownloadError;
use crate::manifest::AssetManifest;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use shopmig_core::CancelToken;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use url::Url;

/// Byte-level progress callback: `(url, bytes received so far)`.
pub type DownloadProgress = Arc<dyn Fn(&str, u64) + Send + Sync>;

/// What a fetch run produced. The run always completes; per-URL failures land
/// here instead of aborting sibling downloads.
#[derive(Debug, Default)]
pub struct FetchReport {
    pub downloaded: usize,
    pub failures: Vec<DownloadError>,
    /// Set when the cancel token tripped and later buckets were not attempted.
    pub cancelled: bool,
}

struct Failure {
    transient: bool,
    reason: String,
}

impl Failure {
    fn transient(reason: impl ToString) -> Self {
        Self {
            transient: true,
            reason: reason.to_string(),
        }
    }

    fn permanent(reason: impl ToString) -> Self {
        Self {
            transient: false,
            reason: reason.to_string(),
        }
    }
}

/// Downloads every URL of an asset manifest into
/// `<root>/<class>/<directory key>/<filename>`. Buckets fan out with bounded
/// parallelism and downloads inside a bucket run concurrently with their own
/// bound; each download retries transient failures a fixed number of times.
pub struct AssetFetcher {
    client: Client,
    bucket_concurrency: usize,
    download_concurrency: usize,
    max_attempts: u32,
    base_url: Option<Url>,
    progress: Option<DownloadProgress>,
    cancel: CancelToken,
}

impl AssetFetcher {
    pub fn new() -> Self {
        Self::with_timeout(30)
    }

    pub fn with_timeout(timeout_secs: u64) -> Self {
        let client = Client::builder()
            .user_agent("shopmig/0.1 (https://github.com/shopmig/shopmig)")
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs / 2))
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            bucket_concurrency: 4,
            download_concurrency: 8,
            max_attempts: 3,
            base_url: None,
            progress: None,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_bucket_concurrency(mut self, n: usize) -> Self {
        self.bucket_concurrency = n.max(1);
        self
    }

    pub fn with_download_concurrency(mut self, n: usize) -> Self {
        self.download_concurrency = n.max(1);
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Base for resolving shop-relative manifest entries like `big/shirt.jpg`.
    pub fn with_base_url(mut self, base: Url) -> Self {
        self.base_url = Some(base);
        self
    }

    pub fn with_progress_callback(mut self, callback: DownloadProgress) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub async fn fetch_all(&self, manifest: &AssetManifest, root: &Path) -> FetchReport {
        info!(
            buckets = manifest.bucket_count(),
            urls = manifest.url_count(),
            root = %root.display(),
            "starting asset fetch"
        );

        let bucket_results: Vec<(usize, Vec<DownloadError>)> = stream::iter(
            manifest
                .buckets()
                .map(|(class, key, urls)| self.fetch_bucket(class, key, urls, root)),
        )
        .buffer_unordered(self.bucket_concurrency)
        .collect()
        .await;

        let mut report = FetchReport::default();
        for (downloaded, failures) in bucket_results {
            report.downloaded += downloaded;
            report.failures.extend(failures);
        }
        report.cancelled = self.cancel.is_cancelled();

        info!(
            downloaded = report.downloaded,
            failed = report.failures.len(),
            cancelled = report.cancelled,
            "asset fetch finished"
        );
        report
    }

    async fn fetch_bucket(
        &self,
        class: &str,
        key: &str,
        urls: &BTreeSet<String>,
        root: &Path,
    ) -> (usize, Vec<DownloadError>) {
        // cooperative cancellation point: never start a new bucket once tripped
        if self.cancel.is_cancelled() {
            return (0, Vec::new());
        }

        let dir = root.join(class).join(key);
        if let Err(e) = tokio::fs::create_dir_all(&dir).await {
            let reason = format!("create {}: {}", dir.display(), e);
            return (
                0,
                urls.iter()
                    .map(|url| DownloadError {
                        url: url.clone(),
                        attempts: 0,
                        reason: reason.clone(),
                    })
                    .collect(),
            );
        }

        debug!(class, key, urls = urls.len(), "fetching bucket");
        let results: Vec<Result<(), DownloadError>> =
            stream::iter(urls.iter().map(|url| self.download_with_retry(url, &dir)))
                .buffer_unordered(self.download_concurrency)
                .collect()
                .await;

        let mut downloaded = 0;
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(()) => downloaded += 1,
                Err(e) => failures.push(e),
            }
        }
        (downloaded, failures)
    }

    async fn download_with_retry(&self, url: &str, dir: &Path) -> Result<(), DownloadError> {
        let fail = |attempts, reason| DownloadError {
            url: url.to_string(),
            attempts,
            reason,
        };

        let resolved = self.resolve(url).map_err(|reason| fail(0, reason))?;
        let filename = file_name(&resolved)
            .ok_or_else(|| fail(0, "URL has no filename segment".to_string()))?
            .to_string();
        let dest = dir.join(filename);

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.download_once(&resolved, url, &dest).await {
                Ok(bytes) => {
                    debug!(url, bytes, attempt, "downloaded");
                    return Ok(());
                }
                Err(failure) if failure.transient && attempt < self.max_attempts => {
                    warn!(url, attempt, reason = %failure.reason, "transient download failure, retrying");
                    tokio::time::sleep(Duration::from_millis(200 * u64::from(attempt))).await;
                }
                Err(failure) => return Err(fail(attempt, failure.reason)),
            }
        }
    }

    async fn download_once(&self, resolved: &Url, url: &str, dest: &Path) -> Result<u64, Failure> {
        let response = self
            .client
            .get(resolved.clone())
            .send()
            .await
            .map_err(Failure::transient)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Failure {
                transient: status.is_server_error(),
                reason: format!("HTTP {}", status),
            });
        }

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(Failure::permanent)?;
        let mut response = response;
        let mut received = 0u64;
        while let Some(chunk) = response.chunk().await.map_err(Failure::transient)? {
            file.write_all(&chunk).await.map_err(Failure::permanent)?;
            received += chunk.len() as u64;
            if let Some(callback) = &self.progress {
                callback(url, received);
            }
        }
        file.flush().await.map_err(Failure::permanent)?;
        Ok(received)
    }

    fn resolve(&self, raw: &str) -> Result<Url, String> {
        match Url::parse(raw) {
            Ok(url) => Ok(url),
            Err(_) => match &self.base_url {
                Some(base) => base
                    .join(raw)
                    .map_err(|e| format!("cannot resolve '{}' against {}: {}", raw, base, e)),
                None => Err(format!("relative URL '{}' and no base URL configured", raw)),
            },
        }
    }
}

impl Default for AssetFetcher {
    fn default() -> Self {
        Self::new()
    }
}

fn file_name(url: &Url) -> Option<&str> {
    url.path_segments()?.filter(|s| !s.is_empty()).next_back()
}
