use clap::Parser;
use colored::Colorize;
use gitscout::{search, CliOverrides, RepoMatch, SearchConfig, SearchError};
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, warn};

mod logging;

type Result<T> = std::result::Result<T, SearchError>;

/// Exit status for a malformed invocation
const USAGE_ERROR: u8 = 1;

/// Search the commit logs of every git repository below a directory for a word
/// and its common variants (plurals, verb endings, hyphenation).
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Word to search for (may start with '-')
    #[arg(allow_hyphen_values = true)]
    word: String,

    /// Directory to look for repositories under [default: .]
    #[arg(short = 'd', long)]
    root: Option<PathBuf>,

    /// Number of repositories searched at once (default: logical CPUs)
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// Additional configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip repositories whose path matches (glob format)
    #[arg(short, long)]
    ignore: Vec<String>,

    /// Match the word literally instead of as a regex fragment
    #[arg(long)]
    literal: bool,

    /// Only commits by a matching author
    #[arg(long)]
    author: Option<String>,

    /// Only commits more recent than a date
    #[arg(long)]
    after: Option<String>,

    /// Only commits older than a date
    #[arg(long)]
    before: Option<String>,

    /// Search the one-line log format
    #[arg(long)]
    oneline: bool,

    /// Print one JSON object per matching repository
    #[arg(long)]
    json: bool,

    /// Git executable to run [default: git]
    #[arg(long = "git")]
    git_binary: Option<PathBuf>,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error) [default: warn]
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            word: self.word.clone(),
            root_path: self.root.clone(),
            thread_count: self.threads,
            log_level: self.log_level.clone(),
            literal: self.literal,
            ignore_patterns: self.ignore.clone(),
            author: self.author.clone(),
            after: self.after.clone(),
            before: self.before.clone(),
            oneline: self.oneline,
            git_binary: self.git_binary.clone(),
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version go to stdout and are not failures
            let code = if err.use_stderr() { USAGE_ERROR } else { 0 };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            ExitCode::from(USAGE_ERROR)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config =
        SearchConfig::load_from(cli.config.as_deref())?.merge_with_cli(cli.overrides());
    logging::init(&config.log_level);

    let json = cli.json;
    let stdout = io::stdout();
    search(&config, |found| {
        if let Err(err) = print_repo_match(&mut stdout.lock(), found, json) {
            report_write_error(&err);
        }
    })?;

    // Matches are reported on stdout only; the status does not depend on them
    Ok(())
}

fn print_repo_match(out: &mut impl Write, found: &RepoMatch, json: bool) -> io::Result<()> {
    let rendered = if json {
        found.to_json_line().map_err(io::Error::from)?
    } else {
        found.to_text()
    };

    out.write_all(rendered.as_bytes())?;
    out.flush()
}

/// Write failures never stop the other workers; a reader that went away
/// (`| head`) is expected and stays off stderr.
fn report_write_error(err: &io::Error) {
    if is_closed_pipe(err) {
        debug!("Output closed: {}", err);
    } else {
        warn!("Failed to write results: {}", err);
    }
}

fn is_closed_pipe(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::BrokenPipe
}
