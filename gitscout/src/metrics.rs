use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::results::SearchSummary;

/// Tracks repository and concurrency counters across workers
#[derive(Debug, Clone, Default)]
pub struct SearchMetrics {
    discovered: Arc<AtomicUsize>,
    searched: Arc<AtomicUsize>,
    matched: Arc<AtomicUsize>,
    failed: Arc<AtomicUsize>,
    matched_lines: Arc<AtomicUsize>,

    // Concurrency
    active: Arc<AtomicUsize>,
    peak_active: Arc<AtomicUsize>,
}

/// Marks one running task; dropping it ends the task
#[derive(Debug)]
pub struct TaskGuard {
    active: Arc<AtomicUsize>,
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SearchMetrics {
    /// Creates a new SearchMetrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the number of repositories found by discovery
    pub fn record_discovered(&self, count: usize) {
        self.discovered.store(count, Ordering::Relaxed);
    }

    /// Records that a task started and returns a guard that ends it
    pub fn start_task(&self) -> TaskGuard {
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        let mut peak = self.peak_active.load(Ordering::SeqCst);
        while active > peak {
            match self.peak_active.compare_exchange_weak(
                peak,
                active,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => break,
                Err(current) => peak = current,
            }
        }
        self.searched.fetch_add(1, Ordering::Relaxed);
        debug!("Task started, {} active", active);
        TaskGuard {
            active: Arc::clone(&self.active),
        }
    }

    /// Records a repository with `lines` matching lines
    pub fn record_match(&self, lines: usize) {
        self.matched.fetch_add(1, Ordering::Relaxed);
        self.matched_lines.fetch_add(lines, Ordering::Relaxed);
    }

    /// Records a repository whose log could not be read
    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of tasks running right now
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Snapshot of all counters
    pub fn summary(&self) -> SearchSummary {
        SearchSummary {
            repositories_discovered: self.discovered.load(Ordering::Relaxed),
            repositories_searched: self.searched.load(Ordering::Relaxed),
            repositories_matched: self.matched.load(Ordering::Relaxed),
            repositories_failed: self.failed.load(Ordering::Relaxed),
            total_matches: self.matched_lines.load(Ordering::Relaxed),
            peak_concurrency: self.peak_active.load(Ordering::SeqCst),
        }
    }

    /// Logs the counters at info level
    pub fn log_stats(&self) {
        let stats = self.summary();
        info!(
            "Search stats:\n\
             Repositories discovered/searched: {}/{}\n\
             Repositories matched/failed: {}/{}\n\
             Matching lines: {}\n\
             Peak concurrent tasks: {}",
            stats.repositories_discovered,
            stats.repositories_searched,
            stats.repositories_matched,
            stats.repositories_failed,
            stats.total_matches,
            stats.peak_concurrency
        );
    }
}
