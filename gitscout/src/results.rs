use serde::Serialize;
use std::path::PathBuf;

/// Label printed in front of the repository path after its matches
pub const REPOSITORY_LABEL: &str = "repository";

/// Matching log lines of one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoMatch {
    /// The repository working directory
    #[serde(rename = "repository")]
    pub path: PathBuf,
    /// Matching log lines, verbatim and in log order
    pub lines: Vec<String>,
}

impl RepoMatch {
    /// Returns `None` when no line matched
    pub fn new(path: PathBuf, lines: Vec<String>) -> Option<Self> {
        if lines.is_empty() {
            None
        } else {
            Some(Self { path, lines })
        }
    }

    /// The line that closes this repository's block
    pub fn marker(&self) -> String {
        format!("{} {}", REPOSITORY_LABEL, self.path.display())
    }

    /// Matching lines followed by the marker, newline terminated
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(&self.marker());
        out.push('\n');
        out
    }

    /// A single JSON object, newline terminated
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

/// Counters for a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchSummary {
    /// Repositories found by discovery before ignore patterns
    pub repositories_discovered: usize,
    /// Repositories a task ran for
    pub repositories_searched: usize,
    /// Repositories with at least one matching line
    pub repositories_matched: usize,
    /// Repositories whose log could not be read
    pub repositories_failed: usize,
    /// Matching lines across all repositories
    pub total_matches: usize,
    /// Highest number of tasks that ran at the same time
    pub peak_concurrency: usize,
}
