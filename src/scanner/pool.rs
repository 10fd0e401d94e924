//! Fixed-size worker pool that fans URLs out to a prober

use super::Prober;
use crate::models::CorsResult;
use indicatif::ProgressBar;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

type UrlQueue = Arc<Mutex<UnboundedReceiver<String>>>;

/// Runs a prober over a URL list with a fixed number of workers
pub struct ProbePool {
    prober: Arc<dyn Prober>,
    workers: usize,
    progress: ProgressBar,
}

impl ProbePool {
    /// Creates a pool with `workers` concurrent probes (at least one)
    pub fn new(prober: Arc<dyn Prober>, workers: usize) -> Self {
        Self {
            prober,
            workers: workers.max(1),
            progress: ProgressBar::hidden(),
        }
    }

    /// Attaches a progress bar that advances once per probed URL
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Starts the workers and returns the result stream.
    ///
    /// The receiver yields only vulnerable results and closes once every
    /// worker has exited. Blank entries are skipped.
    pub fn spawn(&self, urls: Vec<String>) -> mpsc::Receiver<CorsResult> {
        let capacity = urls.len().max(1);
        let pending = urls.iter().filter(|u| !u.trim().is_empty()).count();
        self.progress.set_length(pending as u64);

        let (url_tx, url_rx) = mpsc::unbounded_channel();
        for url in urls {
            // receiver is alive until the workers start
            let _ = url_tx.send(url);
        }
        drop(url_tx);

        let queue: UrlQueue = Arc::new(Mutex::new(url_rx));
        let (result_tx, result_rx) = mpsc::channel(capacity);

        let mut handles = Vec::with_capacity(self.workers);
        for id in 0..self.workers {
            handles.push(tokio::spawn(run_worker(
                id,
                Arc::clone(&queue),
                Arc::clone(&self.prober),
                result_tx.clone(),
                self.progress.clone(),
            )));
        }
        drop(result_tx);

        let progress = self.progress.clone();
        tokio::spawn(async move {
            for handle in handles {
                if let Err(e) = handle.await {
                    error!("Probe worker panicked: {e}");
                }
            }
            progress.finish_with_message("Probing complete");
        });

        result_rx
    }

    /// Probes every URL and collects the vulnerable results
    pub async fn run(&self, urls: Vec<String>) -> Vec<CorsResult> {
        let mut rx = self.spawn(urls);
        let mut results = Vec::new();
        while let Some(result) = rx.recv().await {
            results.push(result);
        }
        results
    }
}

async fn run_worker(
    id: usize,
    queue: UrlQueue,
    prober: Arc<dyn Prober>,
    results: mpsc::Sender<CorsResult>,
    progress: ProgressBar,
) {
    debug!("Worker {id} started");

    loop {
        let next = {
            // queue is pre-loaded and its sender dropped, so recv never parks
            let mut rx = queue.lock().await;
            rx.recv().await
        };
        let Some(line) = next else {
            break;
        };

        let url = line.trim();
        if url.is_empty() {
            continue;
        }

        match prober.probe(url).await {
            Ok(Some(result)) => {
                if results.send(result).await.is_err() {
                    warn!("Result receiver dropped, worker {id} stopping");
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => debug!("Probe of {url} failed: {e}"),
        }
        progress.inc(1);
    }

    debug!("Worker {id} finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CorsCheckError, Result};
    use crate::models::{Category, CorsConfig};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Flags URLs containing "vuln", fails URLs containing "broken"
    #[derive(Default)]
    struct FakeProber {
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    #[async_trait]
    impl Prober for FakeProber {
        async fn probe(&self, url: &str) -> Result<Option<CorsResult>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if url.contains("broken") {
                return Err(CorsCheckError::MissingHost(url.to_string()));
            }
            Ok(url.contains("vuln").then(|| {
                CorsResult::vulnerable(url, 200, CorsConfig::default(), Category::Wildcard)
            }))
        }
    }

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_never_exceeds_worker_count() {
        let prober = Arc::new(FakeProber::default());
        let pool = ProbePool::new(prober.clone(), 3);

        let input: Vec<String> = (0..12).map(|i| format!("http://host{i}.test/")).collect();
        let results = pool.run(input).await;

        assert!(results.is_empty());
        assert_eq!(prober.calls.load(Ordering::SeqCst), 12);
        assert!(prober.max_in_flight.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_blank_lines_are_skipped() {
        let prober = Arc::new(FakeProber::default());
        let pool = ProbePool::new(prober.clone(), 2);

        let results = pool
            .run(urls(&["http://vuln.test/", "", "   ", "http://ok.test/", "\r"]))
            .await;

        assert_eq!(prober.calls.load(Ordering::SeqCst), 2);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "http://vuln.test/");
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_siblings() {
        let prober = Arc::new(FakeProber::default());
        let pool = ProbePool::new(prober.clone(), 1);

        let results = pool
            .run(urls(&[
                "http://broken.test/",
                "http://vuln-a.test/",
                "http://broken2.test/",
                "http://vuln-b.test/",
            ]))
            .await;

        assert_eq!(prober.calls.load(Ordering::SeqCst), 4);
        let mut found: Vec<_> = results.iter().map(|r| r.url.as_str()).collect();
        found.sort();
        assert_eq!(found, vec!["http://vuln-a.test/", "http://vuln-b.test/"]);
    }

    #[tokio::test]
    async fn test_zero_workers_and_empty_input() {
        let prober = Arc::new(FakeProber::default());
        let pool = ProbePool::new(prober.clone(), 0);
        assert_eq!(pool.workers(), 1);

        let results = pool.run(Vec::new()).await;
        assert!(results.is_empty());
        assert_eq!(prober.calls.load(Ordering::SeqCst), 0);
    }
}
