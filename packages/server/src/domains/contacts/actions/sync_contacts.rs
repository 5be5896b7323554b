//! Contact sync action

use std::collections::HashSet;

use anyhow::Result;
use tracing::debug;

use crate::domains::users::models::User;
use crate::kernel::ServerDeps;

/// Most users returned by a single sync
pub const SYNC_LIMIT: usize = 100;

/// Find registered users among the caller's address-book numbers.
///
/// Numbers are trimmed; blanks and duplicates are dropped before the lookup.
pub async fn sync_contacts(numbers: &[String], deps: &ServerDeps) -> Result<Vec<User>> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(numbers.len());
    let wanted: Vec<String> = numbers
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty() && seen.insert(*n))
        .map(str::to_string)
        .collect();

    if wanted.is_empty() {
        return Ok(Vec::new());
    }

    let users = deps.users.find_by_ids(&wanted, SYNC_LIMIT).await?;
    debug!(requested = wanted.len(), matched = users.len(), "Contacts synced");
    Ok(users)
}
