//! Defines the [`PostSource`], [`FrontMatter`], [`RawDate`], and
//! [`PostRecord`] types which carry a post from its source file on disk to its
//! entry in the JSON index.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A markdown source file discovered by [`crate::parser::source_files`].
#[derive(Clone, Debug, PartialEq)]
pub struct SourceFile {
    /// The file name less its `.md` suffix (e.g., `hello` for `hello.md`).
    pub slug: String,

    /// The full path to the file.
    pub path: PathBuf,
}

/// The raw contents of a post source file along with its slug. Read once and
/// never mutated.
#[derive(Clone, Debug)]
pub struct PostSource {
    pub slug: String,
    pub content: String,
}

impl PostSource {
    /// Reads the contents of `file` from disk.
    pub fn read(file: &SourceFile) -> std::io::Result<PostSource> {
        Ok(PostSource {
            slug: file.slug.clone(),
            content: std::fs::read_to_string(&file.path)?,
        })
    }

    /// Builds a [`PostSource`] from in-memory content.
    pub fn new(slug: impl Into<String>, content: impl Into<String>) -> PostSource {
        PostSource {
            slug: slug.into(),
            content: content.into(),
        }
    }

    /// The path of the rendered page for this post inside `posts_directory`.
    pub fn output_path(&self, posts_directory: &Path) -> PathBuf {
        posts_directory.join(format!("{}.html", self.slug))
    }
}

/// The metadata block at the top of a post. Either field may be absent when
/// the front-matter is missing or malformed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<RawDate>,
}

/// A post date exactly as it was written in the front-matter. It is written
/// back into the index verbatim; see [`crate::date::parse_instant`] for how
/// it's interpreted for sorting and display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    Text(String),
    Integer(i64),
    Float(f64),
}

/// The projection of a post that ends up in `posts/index.json`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PostRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<RawDate>,

    pub slug: String,
}
