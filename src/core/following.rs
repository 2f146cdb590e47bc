use std::collections::HashSet;

/// The set of handles the authenticated user currently follows on Mastodon.
///
/// The API reports same-instance accounts in bare form (`@user`) and remote
/// accounts fully qualified (`@user@domain`), so membership checks have to
/// treat `@user` and `@user@<local instance>` as the same account.
#[derive(Debug, Clone)]
pub struct FollowingSet {
    instance: String,
    handles: HashSet<String>,
}

impl FollowingSet {
    pub fn new<I>(instance: impl Into<String>, handles: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            instance: instance.into(),
            handles: handles.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn is_following(&self, candidate: &str) -> bool {
        if self.handles.contains(candidate) {
            return true;
        }

        let local_suffix = format!("@{}", self.instance);
        if let Some(bare) = candidate.strip_suffix(&local_suffix) {
            if self.handles.contains(bare) {
                return true;
            }
        }

        // A bare candidate may be stored fully qualified.
        let is_bare = candidate
            .strip_prefix('@')
            .is_some_and(|rest| !rest.contains('@'));
        if is_bare {
            let qualified = format!("{}{}", candidate, local_suffix);
            if self.handles.contains(&qualified) {
                return true;
            }
        }

        false
    }
}
