//! Markdown work notes from the git activity of a day

use std::fmt::Write;
use std::path::Path;

use chrono::NaiveDate;

use super::Commit;
use super::CommitStats;
use super::Result;
use super::added_files;
use super::commit_diff;
use super::commit_stats;
use super::commits_since;
use super::current_branch;
use super::git_root;
use super::repo_name;
use super::repo_status;

/// What to put in a work note
#[derive(Clone, Debug)]
pub struct WorkNoteOptions {
    /// Only commits of this author
    pub author: Option<String>,

    /// Include the patch of every commit
    pub include_diffs: bool,

    /// Include per-file statistics
    pub include_stats: bool,

    /// Leave out the content of added files
    pub skip_new_file_diffs: bool,
}

impl Default for WorkNoteOptions {
    fn default() -> Self {
        Self {
            author: None,
            include_diffs: true,
            include_stats: true,
            skip_new_file_diffs: true,
        }
    }
}

/// A rendered work note, ready to be stored
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkNote {
    pub title: String,
    pub content: String,
}

/// Everything known about a single commit
struct CommitDetails {
    commit: Commit,
    new_files: Vec<String>,
    stats: Option<CommitStats>,
    diff: Option<String>,
}

/// Everything known about the repository
struct Snapshot {
    name: String,
    branch: String,
    status: String,
    commits: Vec<CommitDetails>,
}

/// Generate the work note of `day` for the repository at `path`
pub async fn generate_work_note(
    path: &Path,
    options: &WorkNoteOptions,
    day: NaiveDate,
) -> Result<WorkNote> {
    let repo = git_root(path).await?;

    tracing::debug!("Generating work note for {repo:?} on {day}");

    let commits = commits_since(&repo, day, options.author.as_deref()).await?;

    let mut details = Vec::with_capacity(commits.len());
    for commit in commits {
        let new_files = added_files(&repo, &commit.hash).await?;

        let stats = if options.include_stats {
            Some(commit_stats(&repo, &commit.hash).await?)
        } else {
            None
        };

        let diff = if options.include_diffs {
            let skip_files: &[String] = if options.skip_new_file_diffs {
                &new_files
            } else {
                &[]
            };

            Some(commit_diff(&repo, &commit.hash, skip_files).await?)
        } else {
            None
        };

        details.push(CommitDetails {
            commit,
            new_files,
            stats,
            diff,
        });
    }

    let snapshot = Snapshot {
        name: repo_name(&repo),
        branch: current_branch(&repo).await,
        status: repo_status(&repo).await?,
        commits: details,
    };

    render(&snapshot, options, day)
}

/// Title of the work note of a day
fn title(day: NaiveDate) -> String {
    format!("Work Note - {}", day.format("%B %d, %Y"))
}

/// Render the snapshot as markdown
fn render(snapshot: &Snapshot, options: &WorkNoteOptions, day: NaiveDate) -> Result<WorkNote> {
    let title = title(day);
    let mut note = String::new();

    writeln!(note, "# {title}\n")?;
    writeln!(note, "**Repository:** `{}`", snapshot.name)?;
    writeln!(note, "**Branch:** `{}`", snapshot.branch)?;
    writeln!(note, "**Total Commits:** {}\n", snapshot.commits.len())?;
    writeln!(note, "---\n")?;

    if snapshot.commits.is_empty() {
        writeln!(note, "No commits made today.\n")?;
    }

    for (index, details) in snapshot.commits.iter().enumerate() {
        let commit = &details.commit;

        writeln!(note, "## Commit {}: {}\n", index + 1, commit.message)?;
        writeln!(note, "**Hash:** `{}`", commit.short_hash())?;
        writeln!(note, "**Author:** {} <{}>", commit.author, commit.email)?;
        writeln!(note, "**Date:** {}\n", commit.date)?;

        if let Some(stats) = &details.stats {
            writeln!(note, "**Changes:**")?;

            if !details.new_files.is_empty() {
                writeln!(note, "\n**New Files:**")?;
                for file in &details.new_files {
                    writeln!(note, "- `{file}` (new file)")?;
                }
            }

            let modified = stats
                .files_changed
                .iter()
                .filter(|change| !details.new_files.contains(&change.file))
                .collect::<Vec<_>>();

            if !modified.is_empty() {
                writeln!(note, "\n**Modified Files:**")?;
                for change in modified {
                    writeln!(note, "- `{}` {}", change.file, change.changes)?;
                }
            }

            writeln!(
                note,
                "\n**Total:** +{} -{}\n",
                stats.total_insertions, stats.total_deletions
            )?;
        }

        if let Some(diff) = &details.diff {
            if options.skip_new_file_diffs && !details.new_files.is_empty() {
                writeln!(note, "### New Files\n")?;
                for file in &details.new_files {
                    writeln!(note, "- `{file}`")?;
                }
                writeln!(note, "\n*Full content of new files omitted for brevity.*\n")?;
            }

            if !diff.trim().is_empty() {
                writeln!(note, "### Changes\n\n```diff\n{}\n```\n", diff.trim_end())?;
            }
        }

        writeln!(note, "---\n")?;
    }

    if !snapshot.status.trim().is_empty() {
        writeln!(
            note,
            "## Uncommitted Changes\n\n```\n{}\n```\n",
            snapshot.status.trim_end()
        )?;
    }

    Ok(WorkNote {
        title,
        content: note,
    })
}
