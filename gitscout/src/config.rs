use config::{Config as ConfigBuilder, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::errors::SearchResult;

/// Configuration for one search run.
///
/// # Configuration Locations
///
/// Values are layered from the following files, later files overriding earlier ones:
/// 1. Global `$XDG_CONFIG_HOME/gitscout/config.yaml`
/// 2. Local `.gitscout.yaml` in the current directory
/// 3. Custom config file specified via `--config`
///
/// Command-line values are applied last through [`SearchConfig::merge_with_cli`].
///
/// # Configuration Format
///
/// ```yaml
/// # Directory to look for repositories under
/// root_path: "~/src"
///
/// # Worker pool size (default: logical CPUs)
/// thread_count: 8
///
/// # Escape the word instead of embedding it as a regex fragment
/// literal: false
///
/// # Repository paths to skip (glob syntax)
/// ignore_patterns:
///   - "**/vendor/**"
///
/// # Restrict the commit log
/// author: "jane@example.com"
/// after: "2019-01-01"
/// before: "2019-12-31"
/// oneline: true
///
/// # Git binary to run
/// git_binary: "git"
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "warn"
/// ```
///
/// The search word itself is never read from a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// The word to search for
    #[serde(skip)]
    pub word: String,

    /// Root directory to discover repositories under
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,

    /// Number of repositories searched concurrently
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Escape regex metacharacters in the word before building the pattern
    #[serde(default)]
    pub literal: bool,

    /// Repository paths to skip (supports glob syntax)
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Only commits whose author matches, passed as `--author`
    #[serde(default)]
    pub author: Option<String>,

    /// Only commits after this date, passed as `--after`
    #[serde(default)]
    pub after: Option<String>,

    /// Only commits before this date, passed as `--before`
    #[serde(default)]
    pub before: Option<String>,

    /// Render one line per commit (`--oneline`)
    #[serde(default)]
    pub oneline: bool,

    /// Git executable used to read commit logs
    #[serde(default = "default_git_binary")]
    pub git_binary: PathBuf,
}

fn default_root_path() -> PathBuf {
    PathBuf::from(".")
}

pub(crate) fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_git_binary() -> PathBuf {
    PathBuf::from("git")
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            word: String::new(),
            root_path: default_root_path(),
            thread_count: default_thread_count(),
            log_level: default_log_level(),
            literal: false,
            ignore_patterns: Vec::new(),
            author: None,
            after: None,
            before: None,
            oneline: false,
            git_binary: default_git_binary(),
        }
    }
}

impl SearchConfig {
    /// Creates a configuration with defaults for the given word
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            ..Default::default()
        }
    }

    /// Loads configuration from the default locations plus a specific file
    pub fn load_from(config_path: Option<&Path>) -> SearchResult<Self> {
        let mut builder = ConfigBuilder::builder();

        let config_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("gitscout/config.yaml")),
            // Local config
            Some(PathBuf::from(".gitscout.yaml")),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // An explicitly requested file must exist
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Arguments passed to `git log`, in order
    pub fn log_args(&self) -> Vec<String> {
        let mut args = vec!["log".to_string()];
        if let Some(author) = &self.author {
            args.push(format!("--author={}", author));
        }
        if let Some(after) = &self.after {
            args.push(format!("--after={}", after));
        }
        if let Some(before) = &self.before {
            args.push(format!("--before={}", before));
        }
        if self.oneline {
            args.push("--oneline".to_string());
        }
        args
    }

    /// Merges CLI arguments with configuration file values.
    ///
    /// Any flag given on the command line wins, even when it repeats the default.
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        self.word = cli.word;
        if let Some(root_path) = cli.root_path {
            self.root_path = root_path;
        }
        if let Some(thread_count) = cli.thread_count {
            self.thread_count = thread_count;
        }
        if let Some(log_level) = cli.log_level {
            self.log_level = log_level;
        }
        if cli.literal {
            self.literal = true;
        }
        if !cli.ignore_patterns.is_empty() {
            self.ignore_patterns = cli.ignore_patterns;
        }
        if cli.author.is_some() {
            self.author = cli.author;
        }
        if cli.after.is_some() {
            self.after = cli.after;
        }
        if cli.before.is_some() {
            self.before = cli.before;
        }
        if cli.oneline {
            self.oneline = true;
        }
        if let Some(git_binary) = cli.git_binary {
            self.git_binary = git_binary;
        }
        self
    }
}

/// Values taken from the command line; `None` and `false` mean "not given"
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub word: String,
    pub root_path: Option<PathBuf>,
    pub thread_count: Option<NonZeroUsize>,
    pub log_level: Option<String>,
    pub literal: bool,
    pub ignore_patterns: Vec<String>,
    pub author: Option<String>,
    pub after: Option<String>,
    pub before: Option<String>,
    pub oneline: bool,
    pub git_binary: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let config_content = r#"
            root_path: "src"
            thread_count: 4
            log_level: "debug"
            literal: true
            ignore_patterns: ["**/vendor/**"]
            author: "jane@example.com"
            after: "2019-01-01"
            before: "2019-12-31"
            oneline: true
            git_binary: "/usr/local/bin/git"
        "#;

        let mut file = File::create(&config_path).unwrap();
        file.write_all(config_content.as_bytes()).unwrap();

        let config = SearchConfig::load_from(Some(&config_path)).unwrap();
        assert_eq!(config.root_path, PathBuf::from("src"));
        assert_eq!(config.thread_count, NonZeroUsize::new(4).unwrap());
        assert_eq!(config.log_level, "debug");
        assert!(config.literal);
        assert_eq!(config.ignore_patterns, vec!["**/vendor/**".to_string()]);
        assert_eq!(config.author.as_deref(), Some("jane@example.com"));
        assert_eq!(config.after.as_deref(), Some("2019-01-01"));
        assert_eq!(config.before.as_deref(), Some("2019-12-31"));
        assert!(config.oneline);
        assert_eq!(config.git_binary, PathBuf::from("/usr/local/bin/git"));
        assert!(config.word.is_empty());
    }

    #[test]
    fn test_default_values() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let mut file = File::create(&config_path).unwrap();
        file.write_all(b"oneline: false\n").unwrap();

        let config = SearchConfig::load_from(Some(&config_path)).unwrap();
        assert_eq!(config.root_path, PathBuf::from("."));
        assert_eq!(
            config.thread_count,
            NonZeroUsize::new(num_cpus::get()).unwrap()
        );
        assert_eq!(config.log_level, "warn");
        assert!(!config.literal);
        assert!(config.ignore_patterns.is_empty());
        assert_eq!(config.author, None);
        assert_eq!(config.git_binary, PathBuf::from("git"));
    }

    #[test]
    fn test_merge_with_cli() {
        let config_file = SearchConfig {
            root_path: PathBuf::from("/srv/repos"),
            thread_count: NonZeroUsize::new(3).unwrap(),
            ignore_patterns: vec!["**/archive/**".to_string()],
            author: Some("jane@example.com".to_string()),
            after: Some("2019-01-01".to_string()),
            ..Default::default()
        };

        let cli = CliOverrides {
            word: "refactor".to_string(),
            before: Some("2019-12-31".to_string()),
            literal: true,
            ..Default::default()
        };

        let merged = config_file.merge_with_cli(cli);
        assert_eq!(merged.word, "refactor"); // CLI value
        assert_eq!(merged.root_path, PathBuf::from("/srv/repos")); // File value (not given)
        assert_eq!(merged.thread_count, NonZeroUsize::new(3).unwrap()); // File value
        assert_eq!(merged.ignore_patterns, vec!["**/archive/**".to_string()]);
        assert_eq!(merged.author.as_deref(), Some("jane@example.com"));
        assert_eq!(merged.after.as_deref(), Some("2019-01-01"));
        assert_eq!(merged.before.as_deref(), Some("2019-12-31")); // CLI value
        assert!(merged.literal); // CLI value
    }

    #[test]
    fn test_explicit_cli_values_equal_to_defaults_still_win() {
        let config_file = SearchConfig {
            root_path: PathBuf::from("/srv/repos"),
            thread_count: NonZeroUsize::new(default_thread_count().get() + 2).unwrap(),
            log_level: "debug".to_string(),
            git_binary: PathBuf::from("/opt/git/bin/git"),
            ..Default::default()
        };

        let cli = CliOverrides {
            word: "fix".to_string(),
            root_path: Some(default_root_path()),
            thread_count: Some(default_thread_count()),
            log_level: Some(default_log_level()),
            git_binary: Some(default_git_binary()),
            ..Default::default()
        };

        let merged = config_file.merge_with_cli(cli);
        assert_eq!(merged.root_path, PathBuf::from("."));
        assert_eq!(merged.thread_count, default_thread_count());
        assert_eq!(merged.log_level, "warn");
        assert_eq!(merged.git_binary, PathBuf::from("git"));
    }

    #[test]
    fn test_log_args() {
        assert_eq!(SearchConfig::new("fix").log_args(), vec!["log"]);

        let config = SearchConfig {
            author: Some("jane@example.com".to_string()),
            after: Some("2019-01-01".to_string()),
            before: Some("2019-12-31".to_string()),
            oneline: true,
            ..SearchConfig::new("fix")
        };
        assert_eq!(
            config.log_args(),
            vec![
                "log",
                "--author=jane@example.com",
                "--after=2019-01-01",
                "--before=2019-12-31",
                "--oneline",
            ]
        );
    }

    #[test]
    fn test_invalid_config() {
        let config_content = r#"
            root_path: []  # Should be string
            thread_count: "invalid"  # Should be number
        "#;

        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let mut file = File::create(&config_path).unwrap();
        file.write_all(config_content.as_bytes()).unwrap();

        let result = SearchConfig::load_from(Some(&config_path));
        assert!(result.is_err(), "Expected error loading invalid config");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = SearchConfig::load_from(Some(Path::new("nonexistent.yaml")));
        assert!(result.is_err());
    }
}
