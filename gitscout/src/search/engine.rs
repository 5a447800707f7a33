use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::log::LogReader;
use super::matcher::PatternMatcher;
use crate::config::SearchConfig;
use crate::discovery::discover_repositories;
use crate::errors::SearchResult;
use crate::filters::filter_repositories;
use crate::metrics::SearchMetrics;
use crate::results::{RepoMatch, SearchSummary};

/// Searches the commit log of every repository below `config.root_path`.
///
/// Each matching repository is handed to `sink` from the worker that searched
/// it, as soon as it is done; the order across repositories is unspecified.
/// Repositories whose log cannot be read are skipped silently. Only invocation
/// problems (bad pattern, unreadable root, pool construction) are returned as
/// errors.
pub fn search<F>(config: &SearchConfig, sink: F) -> SearchResult<SearchSummary>
where
    F: Fn(&RepoMatch) + Sync,
{
    info!("Starting search for word: {:?}", config.word);

    let matcher = PatternMatcher::new(&config.word, config.literal)?;
    debug!("Using pattern {}", matcher.as_str());

    let discovered = discover_repositories(&config.root_path)?;
    let metrics = SearchMetrics::new();
    metrics.record_discovered(discovered.len());

    let repositories = filter_repositories(discovered, &config.ignore_patterns);
    debug!("Found {} repositories to search", repositories.len());

    let reader = LogReader::from_config(config);
    run_pool(
        &repositories,
        &reader,
        &matcher,
        config.thread_count,
        &metrics,
        &sink,
    )?;

    metrics.log_stats();
    let summary = metrics.summary();
    info!(
        "Search complete. Found {} matching lines in {} repositories",
        summary.total_matches, summary.repositories_matched
    );

    Ok(summary)
}

/// Searches an explicit list of repositories on a pool of `threads` workers
pub fn search_repositories<F>(
    repositories: &[PathBuf],
    reader: &LogReader,
    matcher: &PatternMatcher,
    threads: NonZeroUsize,
    sink: F,
) -> SearchResult<SearchSummary>
where
    F: Fn(&RepoMatch) + Sync,
{
    let metrics = SearchMetrics::new();
    metrics.record_discovered(repositories.len());
    run_pool(repositories, reader, matcher, threads, &metrics, &sink)?;
    Ok(metrics.summary())
}

fn run_pool<F>(
    repositories: &[PathBuf],
    reader: &LogReader,
    matcher: &PatternMatcher,
    threads: NonZeroUsize,
    metrics: &SearchMetrics,
    sink: &F,
) -> SearchResult<()>
where
    F: Fn(&RepoMatch) + Sync,
{
    // A worker blocks on its git process, so the pool size caps running tasks
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads.get())
        .thread_name(|i| format!("gitscout-worker-{}", i))
        .build()?;

    pool.install(|| {
        repositories.par_iter().for_each(|repo| {
            if let Some(found) = search_repository(repo, reader, matcher, metrics) {
                sink(&found);
            }
        })
    });

    Ok(())
}

/// Searches one repository; `None` when nothing matched or the log was unreadable
pub fn search_repository(
    repo: &Path,
    reader: &LogReader,
    matcher: &PatternMatcher,
    metrics: &SearchMetrics,
) -> Option<RepoMatch> {
    let _task = metrics.start_task();

    let Some(log) = reader.try_read(repo) else {
        metrics.record_failure();
        return None;
    };

    let lines: Vec<String> = matcher
        .matching_lines(&log)
        .into_iter()
        .map(str::to_string)
        .collect();

    let found = RepoMatch::new(repo.to_path_buf(), lines)?;
    debug!("{} matching lines in {}", found.lines.len(), repo.display());
    metrics.record_match(found.lines.len());
    Some(found)
}
