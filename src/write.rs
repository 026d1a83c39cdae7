//! Applies templates to [`Value`]s and writes the results to disk. Templates
//! use the Go `text/template` syntax as implemented by [`gtmpl`].

use gtmpl::{Context, Template};
use gtmpl_value::Value;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// Renders `value` through the template at `template_path` into a file at
/// `output_path`.
///
/// The output file is created (or truncated) before the template is read, so
/// a template error leaves an empty or partially written file behind. The
/// file is closed on every return path.
pub fn render<V: Into<Value>>(output_path: &Path, template_path: &Path, value: V) -> Result<()> {
    let mut file = File::create(output_path).map_err(|err| Error::CreateOutputFile {
        path: output_path.to_owned(),
        err,
    })?;
    let template = parse_template(template_path)?;
    let context = Context::from(value).map_err(Error::Execute)?;
    template
        .execute(&mut file, &context)
        .map_err(Error::Execute)
}

/// Loads the template file contents and parses them into a template.
fn parse_template(template_path: &Path) -> Result<Template> {
    let contents =
        std::fs::read_to_string(template_path).map_err(|err| Error::OpenTemplateFile {
            path: template_path.to_owned(),
            err,
        })?;
    let mut template = Template::default();
    template
        .parse(&contents)
        .map_err(|err| Error::ParseTemplate {
            path: template_path.to_owned(),
            err,
        })?;
    Ok(template)
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// Returned when the output file can't be created.
    CreateOutputFile { path: PathBuf, err: io::Error },

    /// Returned when the template file can't be read.
    OpenTemplateFile { path: PathBuf, err: io::Error },

    /// Returned when the template file isn't a valid template.
    ParseTemplate { path: PathBuf, err: String },

    /// Returned when executing the template fails, e.g. because it refers
    /// to a field the value doesn't have.
    Execute(String),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::CreateOutputFile { path, err } => {
                write!(f, "Creating output file '{}': {}", path.display(), err)
            }
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate { path, err } => {
                write!(f, "Parsing template file '{}': {}", path.display(), err)
            }
            Error::Execute(err) => write!(f, "Executing template: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::CreateOutputFile { path: _, err } => Some(err),
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate { .. } => None,
            Error::Execute(_) => None,
        }
    }
}
