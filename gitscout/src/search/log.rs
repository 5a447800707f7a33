use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, trace};

use crate::config::SearchConfig;
use crate::errors::{SearchError, SearchResult};

/// Reads the commit log of a repository by running the git binary inside it
#[derive(Debug, Clone)]
pub struct LogReader {
    git_binary: PathBuf,
    args: Vec<String>,
}

impl LogReader {
    /// Creates a reader running `git_binary` with the given arguments
    pub fn new(git_binary: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            git_binary: git_binary.into(),
            args,
        }
    }

    /// Creates a reader from the log filters in `config`
    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.git_binary.clone(), config.log_args())
    }

    /// The arguments handed to git
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Runs the log command in `repo` and returns its standard output.
    ///
    /// Git is not allowed to walk above `repo`, so a broken `.git` directory
    /// fails instead of silently reading an enclosing repository.
    pub fn read(&self, repo: &Path) -> SearchResult<String> {
        trace!("Running {} {:?} in {}", self.git_binary.display(), self.args, repo.display());

        let mut command = Command::new(&self.git_binary);
        command
            .current_dir(repo)
            .args(&self.args)
            .stdin(Stdio::null())
            .env("GIT_TERMINAL_PROMPT", "0");
        if let Some(ceiling) = ceiling_for(repo) {
            command.env("GIT_CEILING_DIRECTORIES", ceiling);
        }

        let output = command
            .output()
            .map_err(|e| SearchError::git_error(repo, format!("failed to run git: {}", e)))?;

        if !output.status.success() {
            return Err(SearchError::git_error(repo, output.status.to_string()));
        }

        // Commit messages are not guaranteed to be UTF-8
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Like [`LogReader::read`], folding every failure into `None`
    pub fn try_read(&self, repo: &Path) -> Option<String> {
        match self.read(repo) {
            Ok(log) => Some(log),
            Err(err) => {
                debug!("{}", err);
                None
            }
        }
    }
}

/// Absolute parent of `repo`, used as git's discovery ceiling
fn ceiling_for(repo: &Path) -> Option<PathBuf> {
    repo.canonicalize()
        .ok()
        .and_then(|abs| abs.parent().map(Path::to_path_buf))
}
