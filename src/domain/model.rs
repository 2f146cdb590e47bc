use serde::{Deserialize, Serialize};

/// A user record from the Twitter following list, as cached on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceUser {
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A Mastodon account as returned by search / following endpoints.
///
/// `moved` points to the successor account when the user has migrated
/// instances; following should target the successor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub acct: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub moved: Option<Box<Account>>,
}

/// Terminal state of one candidate handle in the follow loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowOutcome {
    AlreadyFollowing,
    NotFound,
    Locked,
    Followed,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationSummary {
    pub followed: usize,
    pub already_following: usize,
    pub not_found: usize,
    pub locked: usize,
    pub failed: usize,
}

impl MigrationSummary {
    pub fn record(&mut self, outcome: &FollowOutcome) {
        match outcome {
            FollowOutcome::AlreadyFollowing => self.already_following += 1,
            FollowOutcome::NotFound => self.not_found += 1,
            FollowOutcome::Locked => self.locked += 1,
            FollowOutcome::Followed => self.followed += 1,
            FollowOutcome::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.followed + self.already_following + self.not_found + self.locked + self.failed
    }
}

impl std::fmt::Display for MigrationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} followed, {} already following, {} not found, {} locked, {} failed",
            self.followed, self.already_following, self.not_found, self.locked, self.failed
        )
    }
}
