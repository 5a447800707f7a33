use glob::Pattern;
use std::path::Path;

/// Checks if a repository should be skipped based on ignore patterns
pub fn should_ignore(path: &Path, ignore_patterns: &[String]) -> bool {
    let path_str = path.to_string_lossy().replace('\\', "/");
    // Discovery hands us "./foo" for the default root; patterns are written without it
    let trimmed = path_str.strip_prefix("./").unwrap_or(&path_str);

    ignore_patterns.iter().any(|pattern| match Pattern::new(pattern) {
        Ok(p) => p.matches(&path_str) || p.matches(trimmed),
        Err(_) => false,
    })
}

/// Returns the repositories that survive the ignore patterns
pub fn filter_repositories<P: AsRef<Path>>(
    repositories: impl IntoIterator<Item = P>,
    ignore_patterns: &[String],
) -> Vec<P> {
    repositories
        .into_iter()
        .filter(|repo| !should_ignore(repo.as_ref(), ignore_patterns))
        .collect()
}
