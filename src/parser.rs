//! Discovers post source files on disk ([`source_files`]) and splits their
//! contents into [`FrontMatter`] and a markdown body ([`FrontMatterParser`]).

use crate::post::{FrontMatter, RawDate, SourceFile};
use serde::Deserialize;
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// The suffix a file name must end with to be treated as a post.
pub const MARKDOWN_EXTENSION: &str = ".md";

/// Lists the markdown files directly inside `dir` (no recursion). Only
/// regular files (or symlinks to them) whose name ends with exactly
/// [`MARKDOWN_EXTENSION`] are returned, ordered by file name.
///
/// The order doesn't decide where a post lands in the index, but it does
/// decide the order of posts sharing a date, so it's kept stable across runs.
pub fn source_files(dir: &Path) -> Result<Vec<SourceFile>> {
    let metadata = std::fs::metadata(dir).map_err(|err| Error::ReadDirectory {
        path: dir.to_owned(),
        err,
    })?;
    if !metadata.is_dir() {
        return Err(Error::NotADirectory(dir.to_owned()));
    }

    let mut files = Vec::new();
    for result in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = result?;
        if !entry.file_type().is_file() {
            continue;
        }
        if !entry
            .file_name()
            .to_string_lossy()
            .ends_with(MARKDOWN_EXTENSION)
        {
            continue;
        }
        let file_name = entry
            .file_name()
            .to_str()
            .ok_or_else(|| Error::InvalidFileName(entry.path().to_owned()))?;
        // ends_with() above guarantees the suffix is there
        let slug = &file_name[..file_name.len() - MARKDOWN_EXTENSION.len()];
        files.push(SourceFile {
            slug: slug.to_owned(),
            path: entry.path().to_owned(),
        });
    }

    debug!(count = files.len(), directory = %dir.display(), "found post sources");
    Ok(files)
}

/// A post's contents split into its metadata and markdown body.
#[derive(Debug, PartialEq)]
pub struct Split<'a> {
    pub front_matter: FrontMatter,
    pub body: &'a str,
}

/// Splits raw post contents into front-matter and body. Implementations never
/// fail: missing or malformed metadata yields an empty [`FrontMatter`] so one
/// bad post can't abort the build.
pub trait FrontMatterParser {
    fn parse<'a>(&self, input: &'a str) -> Split<'a>;
}

/// Parses a YAML front-matter block fenced by `---` lines:
///
/// ```text
/// ---
/// title: Hello, world!
/// date: 2024-01-01
/// ---
/// # Hello
/// ```
///
/// Only `title` and `date` are read; other keys are ignored.
#[derive(Clone, Copy, Debug, Default)]
pub struct YamlFrontMatter;

impl FrontMatterParser for YamlFrontMatter {
    fn parse<'a>(&self, input: &'a str) -> Split<'a> {
        let (yaml, body) = match fences(input) {
            Some(parts) => parts,
            None => {
                warn!("post has no front-matter block");
                return Split {
                    front_matter: FrontMatter::default(),
                    body: input,
                };
            }
        };

        if yaml.trim().is_empty() {
            return Split {
                front_matter: FrontMatter::default(),
                body,
            };
        }

        let front_matter = match serde_yaml::from_str::<Fields>(yaml) {
            Ok(fields) => FrontMatter {
                title: scalar_text(fields.title),
                date: raw_date(fields.date),
            },
            Err(err) => {
                warn!(error = %err, "ignoring malformed front-matter");
                FrontMatter::default()
            }
        };
        Split { front_matter, body }
    }
}

// Returns the YAML between the opening and closing `---` lines and everything
// after the closing line. `None` if either fence is missing.
fn fences(input: &str) -> Option<(&str, &str)> {
    const FENCE: &str = "---";
    let rest = input.strip_prefix(FENCE)?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

#[derive(Deserialize)]
struct Fields {
    #[serde(default)]
    title: Value,

    #[serde(default)]
    date: Value,
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn raw_date(value: Value) -> Option<RawDate> {
    match value {
        Value::String(s) => Some(RawDate::Text(s)),
        Value::Number(n) => n
            .as_i64()
            .map(RawDate::Integer)
            .or_else(|| n.as_f64().map(RawDate::Float)),
        _ => None,
    }
}

/// Represents the result of discovering post sources.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error discovering or reading post sources.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the posts directory is missing or unreadable.
    #[error("reading posts directory `{}`", .path.display())]
    ReadDirectory {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// Returned when the posts path exists but isn't a directory.
    #[error("`{}` is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// Returned when a post source file can't be read.
    #[error("reading post `{}`", .path.display())]
    ReadPost {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// Returned when a markdown file name isn't valid UTF-8.
    #[error("invalid file name: {0:?}")]
    InvalidFileName(PathBuf),

    /// Returned for errors while listing the posts directory.
    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),
}
