//! Editor helpers - build replacement collections for `DocumentStore::update`
//!
//! Every helper reads the current document and returns a `BackupPatch`; none
//! of them validate. New records get ids derived from the current time in
//! milliseconds, prefixed per kind.

pub mod body;
pub mod exercises;
pub mod history;
pub mod sessions;

use chrono::{DateTime, Utc};

fn millis(now: DateTime<Utc>) -> i64 {
    now.timestamp_millis()
}
