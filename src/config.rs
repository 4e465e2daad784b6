//! Defines the build [`Config`] and how it's loaded from a project directory
//! and its optional `scriv.yaml` project file.

use crate::date::{validate_format, DEFAULT_DATE_FORMAT};
use crate::prepare::is_contained;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The name of the optional project file in the project root.
pub const PROJECT_FILE: &str = "scriv.yaml";

/// Overrides read from [`PROJECT_FILE`]. Every key is optional and relative
/// paths are resolved against the project root.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Project {
    posts_directory: Option<PathBuf>,
    output_directory: Option<PathBuf>,
    static_files: Option<Vec<PathBuf>>,
    date_format: Option<String>,
}

/// Everything [`crate::build::build_site`] needs to know about where to read
/// from and where to write to.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// The project root. Static files are resolved against it.
    pub root_directory: PathBuf,

    /// The directory holding the markdown post sources.
    pub posts_source_directory: PathBuf,

    /// The root of the generated site.
    pub output_directory: PathBuf,

    /// Where rendered posts and `index.json` are written.
    pub posts_output_directory: PathBuf,

    /// Files copied verbatim from the project root to the output root.
    pub static_files: Vec<PathBuf>,

    /// The strftime pattern for dates shown on post pages.
    pub date_format: String,
}

impl Config {
    /// The default layout for a project rooted at `root`: posts in
    /// `{root}/posts`, output in `{root}/dist`, and `styles.css` plus
    /// `index.html` copied across.
    pub fn new(root: &Path) -> Config {
        let output_directory = root.join("dist");
        Config {
            root_directory: root.to_owned(),
            posts_source_directory: root.join("posts"),
            posts_output_directory: output_directory.join("posts"),
            output_directory,
            static_files: vec![PathBuf::from("styles.css"), PathBuf::from("index.html")],
            date_format: DEFAULT_DATE_FORMAT.to_owned(),
        }
    }

    /// Loads the configuration for the project rooted at `dir`, applying
    /// `{dir}/scriv.yaml` on top of the defaults when it exists.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.is_file() {
            Config::from_project_file(&path)
        } else {
            Ok(Config::new(dir))
        }
    }

    /// Loads the configuration from a project file. The project root is the
    /// file's parent directory.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let root = path
            .parent()
            .ok_or_else(|| Error::NoParent(path.to_owned()))?;
        let contents = std::fs::read_to_string(path).map_err(|err| Error::Open {
            path: path.to_owned(),
            err,
        })?;
        let project: Project = if contents.trim().is_empty() {
            Project::default()
        } else {
            serde_yaml::from_str(&contents).map_err(|err| Error::Parse {
                path: path.to_owned(),
                err,
            })?
        };

        let mut config = Config::new(root);
        if let Some(posts) = project.posts_directory {
            config.posts_source_directory = root.join(posts);
        }
        if let Some(output) = project.output_directory {
            config = config.with_output_directory(root.join(output));
        }
        if let Some(static_files) = project.static_files {
            if let Some(bad) = static_files.iter().find(|p| !is_contained(p)) {
                return Err(Error::InvalidStaticFile(bad.clone()));
            }
            config.static_files = static_files;
        }
        if let Some(date_format) = project.date_format {
            if !validate_format(&date_format) {
                return Err(Error::InvalidDateFormat(date_format));
            }
            config.date_format = date_format;
        }
        Ok(config)
    }

    /// Points the output (and the posts output beneath it) at `dir`.
    pub fn with_output_directory(mut self, dir: PathBuf) -> Config {
        self.posts_output_directory = dir.join("posts");
        self.output_directory = dir;
        self
    }
}

/// The result of loading a [`Config`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading a [`Config`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the project file can't be read.
    #[error("opening project file `{}`", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// Returned when the project file isn't valid.
    #[error("parsing project file `{}`", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        err: serde_yaml::Error,
    },

    /// Returned when the project file path has no parent directory.
    #[error("can't get parent directory for project file `{}`", .0.display())]
    NoParent(PathBuf),

    /// Returned when a `static_files` entry is absolute or leaves the project
    /// root.
    #[error("static file `{}` must be a relative path inside the project", .0.display())]
    InvalidStaticFile(PathBuf),

    /// Returned when `date_format` isn't a valid strftime pattern.
    #[error("invalid date format `{0}`")]
    InvalidDateFormat(String),
}
