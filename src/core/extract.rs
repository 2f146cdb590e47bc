use crate::domain::model::SourceUser;
use regex::Regex;
use std::sync::OnceLock;

// Matches an embedded fediverse handle like @user@mastodon.social.
const HANDLE_PATTERN: &str = "@[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+";

fn handle_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(HANDLE_PATTERN).unwrap())
}

/// Scans a Twitter user's text fields for an embedded Mastodon handle.
///
/// Fields are checked in a fixed order (username, name, description); the
/// first match wins. A trailing `.` is trimmed since it is usually
/// sentence-ending punctuation rather than part of the domain.
pub fn extract_handle(user: &SourceUser) -> Option<String> {
    let fields = [
        user.username.as_str(),
        user.name.as_str(),
        user.description.as_str(),
    ];

    for field in fields {
        if let Some(m) = handle_regex().find(field) {
            let handle = m.as_str().trim_end_matches('.').to_string();
            tracing::debug!("@{} is {}", user.username, handle);
            return Some(handle);
        }
    }

    None
}
