//! Git activity of a repository, read through the `git` binary

use std::path::Path;
use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;
use tokio::process::Command;

pub use work_note::WorkNoteOptions;
pub use work_note::generate_work_note;

mod work_note;

/// Git errors
#[derive(Debug, Error)]
pub enum Error {
    /// The `git` binary could not be run
    #[error("Could not run git: {0}")]
    Spawn(#[from] std::io::Error),

    /// The path is not inside a git repository
    #[error("{0:?} is not a git repository")]
    NotARepository(PathBuf),

    /// No commit by that name
    #[error("Unknown commit {0:?}")]
    UnknownCommit(String),

    /// The markdown of a work note could not be written
    #[error("Could not render work note: {0}")]
    Render(#[from] std::fmt::Error),

    /// Git ran but failed
    #[error("git {command} failed: {stderr}")]
    Command {
        /// The git subcommand
        command: String,

        /// What git had to say about it
        stderr: String,
    },
}

/// Result type for all git interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Output of a finished git command
struct GitOutput {
    stdout: String,
    stderr: String,
    success: bool,
}

/// A single commit from the log
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    pub author: String,
    pub email: String,
    pub date: String,
    pub message: String,
}

impl Commit {
    /// First 8 characters of the hash
    pub fn short_hash(&self) -> &str {
        self.hash.get(..8).unwrap_or(&self.hash)
    }
}

/// Changes of a single file in a commit
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileChange {
    pub file: String,
    pub changes: String,
}

/// Statistics of a single commit
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommitStats {
    pub files_changed: Vec<FileChange>,
    pub total_insertions: u64,
    pub total_deletions: u64,
}

/// Run git with the given arguments inside `repo`
async fn run_git(repo: &Path, args: &[&str]) -> Result<GitOutput> {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo)
        .kill_on_drop(true)
        .output()
        .await?;

    Ok(GitOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        success: output.status.success(),
    })
}

/// Run git and fail on a non-zero exit code
async fn run_git_checked(repo: &Path, args: &[&str]) -> Result<String> {
    let output = run_git(repo, args).await?;

    if output.success {
        Ok(output.stdout)
    } else {
        Err(Error::Command {
            command: args.first().copied().unwrap_or_default().to_string(),
            stderr: output.stderr.trim().to_string(),
        })
    }
}

/// Root directory of the repository containing `path`
pub async fn git_root(path: &Path) -> Result<PathBuf> {
    if !path.is_dir() {
        return Err(Error::NotARepository(path.to_path_buf()));
    }

    let output = run_git(path, &["rev-parse", "--show-toplevel"]).await?;

    if output.success {
        Ok(PathBuf::from(output.stdout.trim()))
    } else {
        Err(Error::NotARepository(path.to_path_buf()))
    }
}

/// Name of the repository, the name of its root directory
pub fn repo_name(repo: &Path) -> String {
    repo.file_name().map_or_else(
        || repo.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// A single commit, by (abbreviated) hash or any other revision git understands
pub async fn commit(repo: &Path, revision: &str) -> Result<Commit> {
    // anything starting with a dash would be taken as an option
    if revision.is_empty() || revision.starts_with('-') {
        return Err(Error::UnknownCommit(revision.to_string()));
    }

    let output = run_git(
        repo,
        &[
            "show",
            revision,
            "--no-patch",
            "--pretty=format:%H|%an|%ae|%ad|%s",
            "--date=iso",
        ],
    )
    .await?;

    if !output.success {
        tracing::debug!("No commit {revision:?} in {repo:?}: {}", output.stderr.trim());
        return Err(Error::UnknownCommit(revision.to_string()));
    }

    parse_commit_log(&output.stdout)
        .into_iter()
        .next()
        .ok_or_else(|| Error::UnknownCommit(revision.to_string()))
}

/// All commits since the start of `since`, optionally by a single author
pub async fn commits_since(
    repo: &Path,
    since: NaiveDate,
    author: Option<&str>,
) -> Result<Vec<Commit>> {
    let since = format!("--since={} 00:00:00", since.format("%Y-%m-%d"));
    let author = author.map(|author| format!("--author={author}"));

    let mut args = vec![
        "log",
        since.as_str(),
        "--pretty=format:%H|%an|%ae|%ad|%s",
        "--date=iso",
    ];
    if let Some(author) = &author {
        args.push(author.as_str());
    }

    let output = run_git(repo, &args).await?;

    // a repository without commits has no log at all
    if !output.success {
        tracing::debug!("No log for {repo:?}: {}", output.stderr.trim());
        return Ok(Vec::new());
    }

    Ok(parse_commit_log(&output.stdout))
}

/// Files added by a commit
pub async fn added_files(repo: &Path, hash: &str) -> Result<Vec<String>> {
    let stdout = run_git_checked(repo, &["show", hash, "--name-status", "--format="]).await?;

    Ok(parse_added_files(&stdout))
}

/// Full patch of a commit, without the sections of `skip_files`
pub async fn commit_diff(repo: &Path, hash: &str, skip_files: &[String]) -> Result<String> {
    let stdout = run_git_checked(repo, &["show", hash, "--format=", "--patch"]).await?;

    if skip_files.is_empty() {
        Ok(stdout)
    } else {
        Ok(strip_file_diffs(&stdout, skip_files))
    }
}

/// Per-file statistics of a commit
pub async fn commit_stats(repo: &Path, hash: &str) -> Result<CommitStats> {
    let stdout = run_git_checked(repo, &["show", hash, "--stat", "--format="]).await?;

    Ok(parse_commit_stats(&stdout))
}

/// Name of the checked out branch
pub async fn current_branch(repo: &Path) -> String {
    match run_git_checked(repo, &["rev-parse", "--abbrev-ref", "HEAD"]).await {
        Ok(branch) => branch.trim().to_string(),
        Err(err) => {
            tracing::debug!("Unknown branch for {repo:?}: {err}");
            "unknown".to_string()
        }
    }
}

/// Short status of uncommitted changes, empty when clean
pub async fn repo_status(repo: &Path) -> Result<String> {
    run_git_checked(repo, &["status", "--short"]).await
}

/// Parse `--pretty=format:%H|%an|%ae|%ad|%s` output
///
/// The subject is the last field and may contain `|` itself
pub fn parse_commit_log(stdout: &str) -> Vec<Commit> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let mut parts = line.splitn(5, '|');

            Some(Commit {
                hash: parts.next()?.to_string(),
                author: parts.next()?.to_string(),
                email: parts.next()?.to_string(),
                date: parts.next()?.to_string(),
                message: parts.next()?.to_string(),
            })
        })
        .collect()
}

/// Parse `--name-status` output into the list of added files
pub fn parse_added_files(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|line| line.strip_prefix("A\t"))
        .map(|file| file.trim().to_string())
        .collect()
}

/// Remove the sections of the given files from a patch
pub fn strip_file_diffs(diff: &str, skip_files: &[String]) -> String {
    let mut skip_current = false;

    diff.split('\n')
        .filter(|line| {
            if let Some(header) = line.strip_prefix("diff --git ") {
                skip_current = diff_header_file(header)
                    .is_some_and(|file| skip_files.iter().any(|skip| skip == file));
            }

            !skip_current
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// File of a `a/<file> b/<file>` diff header, file names may contain spaces
fn diff_header_file(header: &str) -> Option<&str> {
    let header = header.strip_prefix("a/")?;

    // both sides are the same file unless it was renamed, split exactly in the middle
    let middle = header.len().checked_sub(3)? / 2;
    if header.get(middle..middle + 3) == Some(" b/")
        && header.get(..middle) == header.get(middle + 3..)
    {
        return header.get(..middle);
    }

    header.split_once(" b/").map(|(file, _)| file)
}

/// Parse `--stat` output
///
/// ```text
///  src/main.rs | 10 +++++-----
///  1 file changed, 5 insertions(+), 5 deletions(-)
/// ```
pub fn parse_commit_stats(stdout: &str) -> CommitStats {
    let mut stats = CommitStats::default();

    for line in stdout.lines() {
        if let Some((file, changes)) = line.split_once('|') {
            stats.files_changed.push(FileChange {
                file: file.trim().to_string(),
                changes: changes.trim().to_string(),
            });
        } else if line.contains("changed") {
            for part in line.split(',') {
                let count = part
                    .split_whitespace()
                    .next()
                    .and_then(|count| count.parse::<u64>().ok());

                if let Some(count) = count {
                    if part.contains("insertion") {
                        stats.total_insertions = count;
                    } else if part.contains("deletion") {
                        stats.total_deletions = count;
                    }
                }
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commit_log() {
        let stdout = "\
0123456789abcdef|Jane Doe|jane@example.com|2026-10-19 09:12:00 +0200|Add recycle bin
fedcba9876543210|John Doe|john@example.com|2026-10-19 10:00:00 +0200|Fix a | b parsing

broken line";

        let commits = parse_commit_log(stdout);
        assert_eq!(commits.len(), 2);

        assert_eq!(commits[0].hash, "0123456789abcdef");
        assert_eq!(commits[0].short_hash(), "01234567");
        assert_eq!(commits[0].author, "Jane Doe");
        assert_eq!(commits[0].email, "jane@example.com");
        assert_eq!(commits[0].date, "2026-10-19 09:12:00 +0200");
        assert_eq!(commits[0].message, "Add recycle bin");

        assert_eq!(commits[1].message, "Fix a | b parsing");
    }

    #[test]
    fn test_parse_added_files() {
        let stdout = "A\tsrc/new.rs\nM\tsrc/main.rs\nD\told.rs\nA\tREADME.md\n";

        assert_eq!(
            parse_added_files(stdout),
            vec!["src/new.rs".to_string(), "README.md".to_string()]
        );
    }

    #[test]
    fn test_strip_file_diffs() {
        let diff = "\
diff --git a/src/main.rs b/src/main.rs
--- a/src/main.rs
+++ b/src/main.rs
-old
+new
diff --git a/src/new.rs b/src/new.rs
new file mode 100644
+fn main() {}
diff --git a/README.md b/README.md
+docs";

        let stripped = strip_file_diffs(diff, &["src/new.rs".to_string()]);

        assert!(stripped.contains("diff --git a/src/main.rs b/src/main.rs"));
        assert!(stripped.contains("+new"));
        assert!(!stripped.contains("src/new.rs"));
        assert!(!stripped.contains("fn main"));
        assert!(stripped.contains("+docs"));
    }

    #[test]
    fn test_strip_file_diffs_with_spaces() {
        let diff = "\
diff --git a/my file.txt b/my file.txt
new file mode 100644
+secret
diff --git a/odd b/name.txt b/odd b/name.txt
+also skipped
diff --git a/keep me.txt b/keep me.txt
+kept";

        let stripped = strip_file_diffs(
            diff,
            &["my file.txt".to_string(), "odd b/name.txt".to_string()],
        );

        assert!(!stripped.contains("+secret"));
        assert!(!stripped.contains("+also skipped"));
        assert!(stripped.contains("diff --git a/keep me.txt b/keep me.txt\n+kept"));
    }

    #[test]
    fn test_diff_header_file() {
        assert_eq!(diff_header_file("a/src/main.rs b/src/main.rs"), Some("src/main.rs"));
        assert_eq!(diff_header_file("a/my file.txt b/my file.txt"), Some("my file.txt"));
        assert_eq!(diff_header_file("a/old.rs b/new.rs"), Some("old.rs"));
        assert_eq!(diff_header_file("something else"), None);
    }

    #[test]
    fn test_parse_commit_stats() {
        let stdout = "\
 src/main.rs | 10 +++++-----
 src/lib.rs  |  2 ++
 2 files changed, 7 insertions(+), 5 deletions(-)
";

        let stats = parse_commit_stats(stdout);

        assert_eq!(
            stats.files_changed,
            vec![
                FileChange {
                    file: "src/main.rs".to_string(),
                    changes: "10 +++++-----".to_string(),
                },
                FileChange {
                    file: "src/lib.rs".to_string(),
                    changes: "2 ++".to_string(),
                },
            ]
        );
        assert_eq!(stats.total_insertions, 7);
        assert_eq!(stats.total_deletions, 5);
    }

    #[test]
    fn test_parse_commit_stats_only_deletions() {
        let stats = parse_commit_stats(" old.rs | 3 ---\n 1 file changed, 3 deletions(-)\n");

        assert_eq!(stats.total_insertions, 0);
        assert_eq!(stats.total_deletions, 3);
    }
}
