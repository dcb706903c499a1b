//! Discovery-backed locator with a background polling loop.
//!
//! # Responsibilities
//! - Publish the latest service snapshot for lock-free reads
//! - Poll the loader on an interval until stopped
//! - Keep the last good snapshot when a poll fails
//!
//! # Lifecycle
//! ```text
//! new() → spawn(run()) → ready() resolves after the first load attempt
//!       → ... polls every `poll_interval` ...
//!       → stop() → run() returns within one select
//! ```
//!
//! `stop()` is idempotent. Calling it before `run()` makes `run()` return
//! immediately without loading.
//!
//! Only one `run()` loop writes the snapshot at a time. A call made while
//! another loop is active logs a warning and returns immediately.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use tokio::sync::watch;

use crate::backend::{Locator, Resolution};
use crate::discovery::diff::{diff, ChangeSet};
use crate::discovery::loader::{ServiceInfo, ServiceLoader};
use crate::discovery::source::DiscoveryError;
use crate::name::ServerName;
use crate::observability::metrics;

/// Interval between polls when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Locates back-ends among dynamically discovered services.
pub struct DiscoveryLocator {
    loader: ServiceLoader,
    poll_interval: Duration,
    services: ArcSwap<Vec<ServiceInfo>>,
    stop: watch::Sender<bool>,
    ready: watch::Sender<bool>,
    running: AtomicBool,
}

/// Clears the running flag when `run()` returns or is dropped.
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl DiscoveryLocator {
    /// Create a locator with an empty snapshot. Nothing is loaded until
    /// `run()` or `refresh()` is called.
    pub fn new(loader: ServiceLoader) -> Self {
        let (stop, _) = watch::channel(false);
        let (ready, _) = watch::channel(false);
        Self {
            loader,
            poll_interval: DEFAULT_POLL_INTERVAL,
            services: ArcSwap::from_pointee(Vec::new()),
            stop,
            ready,
            running: AtomicBool::new(false),
        }
    }

    /// Set the poll interval. A zero duration selects the default.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = if interval.is_zero() {
            DEFAULT_POLL_INTERVAL
        } else {
            interval
        };
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// The currently published snapshot.
    pub fn snapshot(&self) -> Arc<Vec<ServiceInfo>> {
        self.services.load_full()
    }

    /// Load, diff against the published snapshot, and publish.
    ///
    /// On error nothing is published.
    pub async fn refresh(&self) -> Result<ChangeSet, DiscoveryError> {
        let next = self.loader.load().await?;
        let changes = diff(&self.services.load(), &next);

        metrics::record_service_count(next.len());
        self.services.store(Arc::new(next));
        Ok(changes)
    }

    async fn poll(&self) {
        match self.refresh().await {
            Ok(changes) => {
                metrics::record_poll("success");
                changes.report();
            }
            Err(e) => {
                metrics::record_poll("failure");
                tracing::error!(
                    error = %e,
                    retained = self.services.load().len(),
                    "Service discovery failed, keeping previous routes"
                );
            }
        }
    }

    /// Poll for services until `stop()` is called.
    ///
    /// The first load happens immediately; intended to be spawned as the
    /// locator's dedicated background task.
    pub async fn run(&self) {
        if self.running.swap(true, Ordering::AcqRel) {
            tracing::warn!("Service discovery is already running, ignoring second run()");
            return;
        }
        let _guard = RunGuard(&self.running);

        let mut stop = self.stop.subscribe();
        if *stop.borrow_and_update() {
            tracing::debug!("Service discovery stopped before it started");
            self.ready.send_replace(true);
            return;
        }

        tracing::info!(poll_interval = ?self.poll_interval, "Service discovery starting");

        loop {
            tokio::select! {
                _ = self.poll() => {}
                _ = stop.changed() => break,
            }
            self.ready.send_replace(true);

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                _ = stop.changed() => break,
            }
        }

        self.ready.send_replace(true);
        tracing::info!("Service discovery stopped");
    }

    /// Signal `run()` to return. Safe to call any number of times.
    pub fn stop(&self) {
        self.stop.send_replace(true);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn is_stopped(&self) -> bool {
        *self.stop.borrow()
    }

    /// Resolves once the first load attempt has finished (or the loop
    /// was stopped). Successful or not, `locate` is usable afterwards.
    pub async fn ready(&self) {
        let mut ready = self.ready.subscribe();
        let _ = ready.wait_for(|loaded| *loaded).await;
    }

    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }
}

impl Locator for DiscoveryLocator {
    fn locate(&self, name: &ServerName) -> Resolution {
        let services = self.services.load();
        services
            .iter()
            .find(|info| info.matcher.matches(name))
            .map(|info| Resolution::Found(info.endpoint.clone()))
            .unwrap_or(Resolution::NoMatch)
    }
}

impl fmt::Debug for DiscoveryLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoveryLocator")
            .field("loader", &self.loader)
            .field("poll_interval", &self.poll_interval)
            .field("services", &self.services.load().len())
            .field("running", &self.is_running())
            .field("stopped", &self.is_stopped())
            .finish()
    }
}
