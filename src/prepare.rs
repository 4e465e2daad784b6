//! Sets up the output directory before any post is rendered: creates the
//! directory tree and copies the static assets into it.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Creates `output_directory` and `posts_output_directory` (with any missing
/// parents) and copies each of `static_files` from `root_directory` to the
/// same relative location under `output_directory`, replacing existing copies.
/// Calling it again on a prepared directory is harmless.
///
/// Every static file path must pass [`is_contained`]; an absolute path or one
/// climbing out with `..` would copy a file onto itself or write outside the
/// output root.
pub fn prepare_output(
    root_directory: &Path,
    output_directory: &Path,
    posts_output_directory: &Path,
    static_files: &[PathBuf],
) -> Result<()> {
    mkdir(output_directory)?;
    mkdir(posts_output_directory)?;

    for relative in static_files {
        if !is_contained(relative) {
            return Err(Error::UncontainedAsset(relative.clone()));
        }
        let src = root_directory.join(relative);
        let dst = output_directory.join(relative);
        if let Some(parent) = dst.parent() {
            mkdir(parent)?;
        }
        match std::fs::copy(&src, &dst) {
            Ok(_) => debug!(from = %src.display(), to = %dst.display(), "copied static file"),
            Err(e) if e.kind() == ErrorKind::NotFound && !src.exists() => {
                return Err(Error::MissingAsset(src));
            }
            Err(err) => return Err(Error::Copy { src, dst, err }),
        }
    }
    Ok(())
}

/// Whether `relative` is a non-empty relative path that stays beneath the
/// directory it is joined onto.
pub fn is_contained(relative: &Path) -> bool {
    relative.components().any(|c| matches!(c, Component::Normal(_)))
        && relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn mkdir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|err| Error::CreateDirectory {
        path: dir.to_owned(),
        err,
    })
}

/// The result of preparing the output directory.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error preparing the output directory.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when an output directory can't be created.
    #[error("creating directory `{}`", .path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// Returned when a static asset doesn't exist in the project.
    #[error("missing static file `{}`", .0.display())]
    MissingAsset(PathBuf),

    /// Returned when a static file path is absolute or escapes its directory.
    #[error("static file `{}` must be a relative path inside the project", .0.display())]
    UncontainedAsset(PathBuf),

    /// Returned for other I/O errors while copying a static asset.
    #[error("copying `{}` to `{}`", .src.display(), .dst.display())]
    Copy {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        err: std::io::Error,
    },
}
