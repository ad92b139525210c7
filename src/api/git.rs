use std::path::PathBuf;

use chrono::Local;
use serde::Deserialize;
use serde::Serialize;

use crate::git_tracker::Commit;
use crate::git_tracker::CommitStats;
use crate::git_tracker::added_files;
use crate::git_tracker::commit;
use crate::git_tracker::commit_diff;
use crate::git_tracker::commit_stats;
use crate::git_tracker::commits_since;
use crate::git_tracker::current_branch;
use crate::git_tracker::git_root;
use crate::git_tracker::repo_name;
use crate::git_tracker::repo_status;

use super::Error;
use super::PathParameters;
use super::QueryParameters;
use super::Success;
use super::default_true;

/// Root of the repository at the requested path, the working directory by default
async fn repo_root(repo_path: Option<PathBuf>) -> Result<PathBuf, Error> {
    let repo_path = repo_path.unwrap_or_else(|| PathBuf::from("."));

    git_root(&repo_path).await.map_err(Error::from_git)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitsQuery {
    repo_path: Option<PathBuf>,
    author: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitSummaryResponse {
    hash: String,
    message: String,
    author: String,
    time: String,
}

impl CommitSummaryResponse {
    fn from_commit(commit: Commit) -> Self {
        Self {
            hash: commit.short_hash().to_string(),
            message: commit.message,
            author: commit.author,
            time: commit.date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodaysCommitsResponse {
    repository: String,
    branch: String,
    date: String,
    commit_count: usize,
    commits: Vec<CommitSummaryResponse>,
}

/// Commits of today, newest first
pub async fn todays_commits(
    QueryParameters(query): QueryParameters<CommitsQuery>,
) -> Result<Success<TodaysCommitsResponse>, Error> {
    let repo = repo_root(query.repo_path).await?;
    let today = Local::now().date_naive();
    let author = query.author.filter(|author| !author.trim().is_empty());

    let commits = commits_since(&repo, today, author.as_deref())
        .await
        .map_err(Error::from_git)?;

    Ok(Success::ok(TodaysCommitsResponse {
        repository: repo_name(&repo),
        branch: current_branch(&repo).await,
        date: today.format("%Y-%m-%d").to_string(),
        commit_count: commits.len(),
        commits: commits
            .into_iter()
            .map(CommitSummaryResponse::from_commit)
            .collect(),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitQuery {
    repo_path: Option<PathBuf>,
    #[serde(default = "default_true")]
    include_diff: bool,
    #[serde(default = "default_true")]
    skip_new_file_diffs: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChangeResponse {
    file: String,
    changes: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitStatsResponse {
    files_changed: Vec<FileChangeResponse>,
    total_insertions: u64,
    total_deletions: u64,
}

impl CommitStatsResponse {
    fn from_stats(stats: CommitStats) -> Self {
        Self {
            files_changed: stats
                .files_changed
                .into_iter()
                .map(|change| FileChangeResponse {
                    file: change.file,
                    changes: change.changes,
                })
                .collect(),
            total_insertions: stats.total_insertions,
            total_deletions: stats.total_deletions,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitDetailsResponse {
    hash: String,
    author: String,
    email: String,
    date: String,
    message: String,
    stats: CommitStatsResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    diff: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_files: Option<Vec<String>>,
}

/// Everything about a single commit
///
/// The diff leaves out the content of added files, unless asked for
pub async fn commit_details(
    PathParameters(revision): PathParameters<String>,
    QueryParameters(query): QueryParameters<CommitQuery>,
) -> Result<Success<CommitDetailsResponse>, Error> {
    let repo = repo_root(query.repo_path).await?;

    let commit = commit(&repo, &revision).await.map_err(Error::from_git)?;

    let stats = commit_stats(&repo, &commit.hash)
        .await
        .map_err(Error::from_git)?;

    let (diff, new_files) = if query.include_diff {
        let new_files = added_files(&repo, &commit.hash)
            .await
            .map_err(Error::from_git)?;

        let skip_files: &[String] = if query.skip_new_file_diffs {
            &new_files
        } else {
            &[]
        };

        let diff = commit_diff(&repo, &commit.hash, skip_files)
            .await
            .map_err(Error::from_git)?;

        (Some(diff), Some(new_files))
    } else {
        (None, None)
    };

    Ok(Success::ok(CommitDetailsResponse {
        hash: commit.hash,
        author: commit.author,
        email: commit.email,
        date: commit.date,
        message: commit.message,
        stats: CommitStatsResponse::from_stats(stats),
        diff,
        new_files,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusQuery {
    repo_path: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    repository: String,
    path: String,
    branch: String,
    status: String,
    has_uncommitted_changes: bool,
}

pub async fn status(
    QueryParameters(query): QueryParameters<StatusQuery>,
) -> Result<Success<StatusResponse>, Error> {
    let repo = repo_root(query.repo_path).await?;

    let status = repo_status(&repo).await.map_err(Error::from_git)?;

    Ok(Success::ok(StatusResponse {
        repository: repo_name(&repo),
        path: repo.display().to_string(),
        branch: current_branch(&repo).await,
        has_uncommitted_changes: !status.trim().is_empty(),
        status,
    }))
}
