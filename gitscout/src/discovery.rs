use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::errors::SearchResult;

/// Name of the metadata directory that marks a repository working directory
pub const GIT_DIR_NAME: &str = ".git";

/// Returns true when the entry is a directory literally named `.git`
fn is_git_dir(path: &Path, is_dir: bool) -> bool {
    is_dir && path.file_name().is_some_and(|name| name == GIT_DIR_NAME)
}

/// Finds every repository working directory below `root`.
///
/// A repository is the parent of any directory named exactly `.git`, at any
/// depth. Hidden directories are walked, ignore files are not honoured and
/// symlinks are not followed. The walk never descends into a `.git` directory.
/// Paths are returned joined onto `root` as given, so the default root `.`
/// yields `./project` and `.` itself when the root is a repository.
pub fn discover_repositories(root: &Path) -> SearchResult<Vec<PathBuf>> {
    // Surface an unreadable root as an invocation error instead of an empty result
    std::fs::read_dir(root)?;

    let mut walker = WalkBuilder::new(root);
    walker
        .hidden(false)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .parents(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(|entry| {
            // Keep the .git entry itself but skip everything inside it
            entry
                .path()
                .parent()
                .and_then(Path::file_name)
                .map_or(true, |parent| parent != GIT_DIR_NAME)
        });

    let repositories: Vec<PathBuf> = walker
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                trace!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|entry| {
            is_git_dir(
                entry.path(),
                entry.file_type().is_some_and(|ft| ft.is_dir()),
            )
        })
        .filter_map(|entry| entry.path().parent().map(repository_path))
        .collect();

    debug!(
        "Discovered {} repositories under {}",
        repositories.len(),
        root.display()
    );

    Ok(repositories)
}

/// Maps the parent of a `.git` directory to the path printed for it
fn repository_path(parent: &Path) -> PathBuf {
    if parent.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        parent.to_path_buf()
    }
}
