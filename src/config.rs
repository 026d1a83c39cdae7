//! Loads the [`Config`] for a run. The path to the configuration file is taken
//! from the `CONFIG` environment variable (or passed explicitly, see
//! [`Config::from_file`]), and the file itself is JSON.

use serde::Deserialize;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The environment variable which holds the path to the configuration file.
pub const ENVIRONMENT_VARIABLE: &str = "CONFIG";

/// The on-disk shape of the configuration file.
#[derive(Deserialize)]
struct Project {
    #[serde(rename = "Input", alias = "input")]
    input: PathBuf,

    #[serde(rename = "Output", alias = "output")]
    output: PathBuf,

    #[serde(rename = "TemplatePage", alias = "templatePage")]
    template_page: PathBuf,

    #[serde(rename = "TemplateIndex", alias = "templateIndex")]
    template_index: PathBuf,

    #[serde(default = "fail_fast_default", rename = "FailFast", alias = "failFast")]
    fail_fast: bool,

    #[serde(default, rename = "SortByName", alias = "sortByName")]
    sort_by_name: bool,
}

fn fail_fast_default() -> bool {
    true
}

/// The settings for a single run.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// The directory scanned for `.md` documents. Only its direct children
    /// are considered.
    pub input: PathBuf,

    /// The directory receiving one `.html` file per document plus
    /// `index.html`.
    pub output: PathBuf,

    /// The template applied to every document.
    pub template_page: PathBuf,

    /// The template applied once to the collected links.
    pub template_index: PathBuf,

    /// Abort the run on the first failing document. When unset, failures
    /// are collected and the remaining documents are still processed.
    pub fail_fast: bool,

    /// Process documents in file name order instead of directory listing
    /// order.
    pub sort_by_name: bool,
}

impl Config {
    /// Loads the configuration from the file named by [`ENVIRONMENT_VARIABLE`].
    pub fn from_env() -> Result<Config> {
        Config::from_env_value(std::env::var_os(ENVIRONMENT_VARIABLE))
    }

    fn from_env_value(value: Option<OsString>) -> Result<Config> {
        match value {
            Some(path) if !path.is_empty() => Config::from_file(Path::new(&path)),
            _ => Err(Error::MissingEnvironmentVariable(ENVIRONMENT_VARIABLE)),
        }
    }

    /// Loads the configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path).map_err(|err| Error::Read {
            path: path.to_owned(),
            err,
        })?;
        contents.parse::<Config>().map_err(|err| match err {
            Error::Parse { path: _, err } => Error::Parse {
                path: Some(path.to_owned()),
                err,
            },
            err => err,
        })
    }

    /// Verifies that the input directory exists.
    pub fn check_input(&self) -> Result<()> {
        check_directory(&self.input).map_err(|err| Error::InputDirectory {
            path: self.input.clone(),
            err,
        })
    }

    /// Verifies that the output directory exists. It is never created.
    pub fn check_output(&self) -> Result<()> {
        check_directory(&self.output).map_err(|err| Error::OutputDirectory {
            path: self.output.clone(),
            err,
        })
    }
}

impl FromStr for Config {
    type Err = Error;

    /// Parses the configuration from JSON text.
    fn from_str(contents: &str) -> Result<Config> {
        let project: Project =
            serde_json::from_str(contents).map_err(|err| Error::Parse { path: None, err })?;
        Ok(Config {
            input: project.input,
            output: project.output,
            template_page: project.template_page,
            template_index: project.template_index,
            fail_fast: project.fail_fast,
            sort_by_name: project.sort_by_name,
        })
    }
}

fn check_directory(path: &Path) -> std::io::Result<()> {
    let metadata = std::fs::metadata(path)?;
    if metadata.is_dir() {
        Ok(())
    } else {
        Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            "not a directory",
        ))
    }
}

/// The result of a configuration operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading or validating the [`Config`].
#[derive(Debug)]
pub enum Error {
    /// Returned when the environment variable naming the configuration file
    /// is unset or empty.
    MissingEnvironmentVariable(&'static str),

    /// Returned when the configuration file can't be read.
    Read { path: PathBuf, err: std::io::Error },

    /// Returned when the configuration isn't valid JSON of the expected
    /// shape.
    Parse {
        path: Option<PathBuf>,
        err: serde_json::Error,
    },

    /// Returned when the input directory is absent.
    InputDirectory { path: PathBuf, err: std::io::Error },

    /// Returned when the output directory is absent.
    OutputDirectory { path: PathBuf, err: std::io::Error },
}

impl Error {
    /// The process exit code for this error: `2` for a missing input
    /// directory, `3` for a missing output directory and `1` otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InputDirectory { .. } => 2,
            Error::OutputDirectory { .. } => 3,
            _ => 1,
        }
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingEnvironmentVariable(name) => {
                write!(f, "missing environmental variable '{}'", name)
            }
            Error::Read { path, err } => {
                write!(f, "reading configuration file '{}': {}", path.display(), err)
            }
            Error::Parse { path: Some(path), err } => {
                write!(f, "parsing configuration file '{}': {}", path.display(), err)
            }
            Error::Parse { path: None, err } => write!(f, "parsing configuration: {}", err),
            Error::InputDirectory { path, err } => {
                write!(f, "input directory error '{}': {}", path.display(), err)
            }
            Error::OutputDirectory { path, err } => {
                write!(f, "output directory error '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MissingEnvironmentVariable(_) => None,
            Error::Read { path: _, err } => Some(err),
            Error::Parse { path: _, err } => Some(err),
            Error::InputDirectory { path: _, err } => Some(err),
            Error::OutputDirectory { path: _, err } => Some(err),
        }
    }
}
