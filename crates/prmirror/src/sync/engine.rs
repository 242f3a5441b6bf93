//! The scan engine: repository enumeration and the incremental scan loop.
//!
//! One repository is scanned at a time, one issue at a time, strictly in the
//! order the remote API yields them. The issue stream is the only suspension
//! point; batches commit at checkpoints so interruption loses at most the
//! in-flight batch.

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::github::{ActivitySource, IssueStream};
use crate::store::observations::RepositoryObservation;
use crate::store::{queries, resolve_or_create, StoreError};

use super::assembler;
use super::batch::BatchCheckpointer;
use super::error::{classify, AssembleError, ItemDisposition, SyncError};
use super::identity::IdentityCache;
use super::progress::{emit, ProgressCallback, SyncProgress};
use super::types::{RepositoryScan, ScanOptions, ScanOutcome, SkippedPullRequest};

/// Scan every repository owned by an account.
///
/// The owner is validated before any scanning begins; a missing owner
/// produces no partial state. Run-fatal failures (authentication, rate
/// limit, persistence) abort the remaining repositories; anything else
/// aborts only the repository it occurred in and is reported per-repository.
#[tracing::instrument(skip(db, source, options, on_progress), fields(owner = %owner))]
pub async fn scan_owner<S: ActivitySource>(
    db: &DatabaseConnection,
    source: &S,
    owner: &str,
    options: &ScanOptions,
    on_progress: Option<&ProgressCallback>,
) -> Result<Vec<RepositoryScan>, SyncError> {
    let account = source
        .find_account(owner)
        .await
        .map_err(SyncError::from_remote)?
        .ok_or_else(|| SyncError::UnknownOwner {
            owner: owner.to_string(),
        })?;
    tracing::debug!(login = %account.login, account_type = ?account.account_type, "Resolved owner");

    let repositories = source
        .list_repositories(owner)
        .await
        .map_err(SyncError::from_remote)?;

    emit(
        on_progress,
        SyncProgress::EnumeratingRepositories {
            owner: owner.to_string(),
            count: repositories.len(),
        },
    );

    let mut scans = Vec::with_capacity(repositories.len());
    for repository in repositories {
        let result = scan_repository(db, source, owner, &repository.name, options, on_progress).await;

        match result {
            Err(err) if err.aborts_run() => return Err(err),
            result => {
                if let Err(err) = &result {
                    tracing::warn!(
                        repo = %format!("{}/{}", owner, repository.name),
                        error = %err,
                        "Repository scan aborted"
                    );
                }
                scans.push(RepositoryScan {
                    owner: owner.to_string(),
                    name: repository.name,
                    result,
                });
            }
        }
    }

    Ok(scans)
}

/// Incrementally scan one repository's pull-request activity.
///
/// The `since` cursor is the caller's override or the update instant of the
/// most recently synchronized pull request; only issues updated at or after
/// it are fetched. Each assembled pull request runs inside a savepoint, so a
/// transient server-side failure drops that pull request alone; the
/// surrounding batch and all previously flushed batches survive.
#[tracing::instrument(skip(db, source, options, on_progress), fields(repo = %format!("{owner}/{name}")))]
pub async fn scan_repository<S: ActivitySource>(
    db: &DatabaseConnection,
    source: &S,
    owner: &str,
    name: &str,
    options: &ScanOptions,
    on_progress: Option<&ProgressCallback>,
) -> Result<ScanOutcome, SyncError> {
    let repo_record = source
        .get_repository(owner, name)
        .await
        .map_err(SyncError::from_remote)?
        .ok_or_else(|| SyncError::UnknownRepository {
            owner: owner.to_string(),
            name: name.to_string(),
        })?;

    let repository = resolve_or_create(
        db,
        RepositoryObservation {
            owner: owner.to_string(),
            name: name.to_string(),
            display_name: Some(repo_record.name.clone()),
            url: repo_record.html_url.clone(),
        },
    )
    .await?;
    let repository_id = repository.model.id;

    let since = match options.since {
        Some(cursor) => Some(cursor),
        None => queries::latest_synced_timestamp(db, repository_id).await?,
    };

    emit(
        on_progress,
        SyncProgress::ScanningRepository {
            owner: owner.to_string(),
            name: name.to_string(),
            since,
            newest_first: options.newest_first,
        },
    );

    let mut identities = IdentityCache::new();
    let mut stream = IssueStream::new(source, owner, name, since, options.newest_first);
    let mut checkpointer = BatchCheckpointer::new(db, options.batch_size);
    let mut outcome = ScanOutcome::starting_from(since);

    loop {
        let issue = match stream.next().await {
            Ok(Some(issue)) => issue,
            Ok(None) => break,
            Err(err) => {
                checkpointer.abort().await?;
                return Err(SyncError::from_remote(err));
            }
        };

        // Plain issues have no pull-request sub-resource; the assembler
        // would skip them anyway, but skipping here saves the savepoint.
        if !issue.is_pull_request() {
            continue;
        }

        let unit = checkpointer.unit().await?;
        let savepoint = unit.begin().await.map_err(StoreError::from)?;
        let assembled = assembler::assemble(
            &savepoint,
            source,
            &mut identities,
            repository_id,
            owner,
            name,
            &issue,
        )
        .await;

        match assembled {
            Ok(maybe_pr) => {
                savepoint.commit().await.map_err(StoreError::from)?;
                identities.commit_item();

                if let Some(pr) = maybe_pr {
                    emit(
                        on_progress,
                        SyncProgress::PullRequestAssembled {
                            number: pr.number,
                            outcome: pr.outcome,
                        },
                    );
                    outcome.record(&pr);

                    if let Some(flush) = checkpointer.record().await? {
                        outcome.batches += 1;
                        emit(
                            on_progress,
                            SyncProgress::BatchFlushed {
                                index: flush.index,
                                pull_requests: flush.pull_requests,
                            },
                        );
                    }
                }
            }
            Err(err) => {
                savepoint.rollback().await.map_err(StoreError::from)?;
                identities.rollback_item();

                match err {
                    AssembleError::Store(store_err) => {
                        checkpointer.abort().await?;
                        return Err(SyncError::Store(store_err));
                    }
                    AssembleError::Remote(remote_err) => match classify(&remote_err) {
                        ItemDisposition::Skip => {
                            tracing::warn!(
                                repo = %format!("{owner}/{name}"),
                                number = issue.number,
                                error = %remote_err,
                                "Skipping pull request after server-side failure"
                            );
                            emit(
                                on_progress,
                                SyncProgress::PullRequestSkipped {
                                    number: issue.number,
                                    error: remote_err.to_string(),
                                },
                            );
                            outcome.skipped.push(SkippedPullRequest {
                                number: issue.number,
                                error: remote_err.to_string(),
                            });
                        }
                        ItemDisposition::AbortRun => {
                            checkpointer.abort().await?;
                            return Err(SyncError::from_remote(remote_err));
                        }
                    },
                }
            }
        }
    }

    if let Some(flush) = checkpointer.finish().await? {
        outcome.batches += 1;
        emit(
            on_progress,
            SyncProgress::BatchFlushed {
                index: flush.index,
                pull_requests: flush.pull_requests,
            },
        );
    }

    emit(
        on_progress,
        SyncProgress::ScanComplete {
            owner: owner.to_string(),
            name: name.to_string(),
            processed: outcome.processed,
            batches: outcome.batches,
            skipped: outcome.skipped.len(),
        },
    );

    Ok(outcome)
}
