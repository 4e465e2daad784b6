//! Orders [`PostRecord`]s newest-first and writes them out as the JSON post
//! index.

use crate::date::parse_instant;
use crate::post::PostRecord;
use std::cmp::Reverse;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The file name of the post index inside the posts output directory.
pub const INDEX_FILE: &str = "index.json";

/// Sorts `records` by date, latest first. The sort is stable: records with
/// equal dates keep the order in which they were processed. Records whose date
/// is missing or unparseable go after every dated record.
pub fn sort_records(records: Vec<PostRecord>) -> Vec<PostRecord> {
    let mut keyed: Vec<_> = records
        .into_iter()
        .map(|record| {
            let instant = record.date.as_ref().and_then(parse_instant);
            // Reverse(None) orders after every Reverse(Some(_)).
            (Reverse(instant), record)
        })
        .collect();
    keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
    keyed.into_iter().map(|(_, record)| record).collect()
}

/// Serializes `records` as a JSON array indented with two spaces.
pub fn to_json(records: &[PostRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Writes `records` to `path` as JSON, replacing any existing file. The
/// records are written in the order given; see [`sort_records`].
pub fn write_index(path: &Path, records: &[PostRecord]) -> Result<()> {
    std::fs::write(path, to_json(records)?).map_err(|err| Error::Write {
        path: path.to_owned(),
        err,
    })?;
    debug!(path = %path.display(), entries = records.len(), "wrote post index");
    Ok(())
}

/// The result of a fallible index operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error producing the post index.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the records can't be serialized.
    #[error("serializing post index")]
    Serialize(#[from] serde_json::Error),

    /// Returned when the index file can't be written.
    #[error("writing post index `{}`", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },
}
