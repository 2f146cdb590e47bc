use crate::adapters::mastodon::MastodonSession;
use crate::core::following::FollowingSet;
use crate::domain::model::{FollowOutcome, MigrationSummary};
use crate::utils::error::Result;

/// Drives one candidate handle to a terminal outcome.
///
/// A failed follow call is an outcome, not an error: it is logged and the
/// caller moves on to the next candidate. Re-running the whole batch is the
/// retry mechanism, which is safe because already-followed candidates are
/// skipped before any API call.
pub async fn follow_candidate(
    api: &MastodonSession,
    following: &FollowingSet,
    handle: &str,
) -> Result<FollowOutcome> {
    if following.is_following(handle) {
        tracing::debug!("Already following Mastodon user {}", handle);
        return Ok(FollowOutcome::AlreadyFollowing);
    }

    tracing::debug!("Looking for Mastodon user {}", handle);
    let accounts = api.search_accounts(handle).await?;
    let Some(mut account) = accounts.into_iter().next() else {
        tracing::error!("Mastodon user {} not found", handle);
        return Ok(FollowOutcome::NotFound);
    };

    if let Some(moved) = account.moved.take() {
        tracing::debug!("Mastodon user {} has moved to {}", handle, moved.acct);
        account = *moved;
        if following.is_following(&format!("@{}", account.acct)) {
            tracing::info!(
                "Already following Mastodon user {} (was {})",
                account.acct,
                handle
            );
            return Ok(FollowOutcome::AlreadyFollowing);
        }
    }

    if account.locked {
        tracing::info!("Mastodon user {} is locked, please follow manually", handle);
        return Ok(FollowOutcome::Locked);
    }

    tracing::info!("Following Mastodon user @{} ...", account.acct);
    match api.follow(&account.id).await {
        Ok(()) => Ok(FollowOutcome::Followed),
        Err(e) => {
            tracing::error!("Error while following Mastodon user {}: {}", handle, e);
            tracing::debug!("{:?}", account);
            Ok(FollowOutcome::Failed)
        }
    }
}

pub async fn follow_all(
    api: &MastodonSession,
    following: &FollowingSet,
    handles: &[String],
) -> Result<MigrationSummary> {
    let mut summary = MigrationSummary::default();
    for handle in handles {
        let outcome = follow_candidate(api, following, handle).await?;
        summary.record(&outcome);
    }
    Ok(summary)
}
