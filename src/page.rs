//! Defines the [`Page`], [`Link`] and [`Index`] types and assembles pages
//! from source documents. See [`crate::value`] for how these types are
//! exposed to templates.

use crate::markdown;
use crate::meta::{self, Author, MetaBlock};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// A rendered document, ready to be applied to the page template.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    pub title: String,

    /// The document's date as `YYYY-MM-DD`.
    pub date: String,

    pub authors: Vec<Author>,

    /// The document body as HTML.
    pub content: String,
}

impl Page {
    /// Reads a document from disk and assembles it into a [`Page`]. Bytes
    /// that aren't valid UTF-8 are replaced with `U+FFFD`.
    pub fn from_file(path: &Path) -> Result<Page> {
        let bytes = std::fs::read(path)?;
        String::from_utf8_lossy(&bytes).parse()
    }

    /// Builds the index entry for this page once it has been written as
    /// `html_file_name` at the root of the output directory.
    pub fn link(&self, html_file_name: &str) -> Link {
        Link {
            title: self.title.clone(),
            date: self.date.clone(),
            url: format!("/{}", html_file_name),
        }
    }
}

impl FromStr for Page {
    type Err = Error;

    /// Assembles a [`Page`] from the full text of a document: the meta block
    /// followed by a markdown body.
    fn from_str(text: &str) -> Result<Page> {
        if text.is_empty() {
            return Err(Error::EmptyFile);
        }
        let (meta_block, content_start) = MetaBlock::extract(text)?;
        Ok(Page {
            date: meta_block.formatted_date(),
            title: meta_block.title,
            authors: meta_block.authors,
            content: markdown::to_html(&text[content_start..]),
        })
    }
}

/// The index entry for a written [`Page`].
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
    pub title: String,
    pub date: String,

    /// The site-root-relative URL of the page, e.g. `/hello.html`.
    pub url: String,
}

/// The links of every written page, in processing order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Index {
    pub links: Vec<Link>,
}

/// Represents the result of assembling a [`Page`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error assembling a [`Page`].
#[derive(Debug)]
pub enum Error {
    /// Returned when the document has no contents at all.
    EmptyFile,

    /// Returned when the document's meta block can't be extracted.
    MetaBlock(meta::Error),

    /// Returned when the document can't be read.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::EmptyFile => write!(f, "file is empty"),
            Error::MetaBlock(err) => write!(f, "meta block error: {}", err),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::EmptyFile => None,
            Error::MetaBlock(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<meta::Error> for Error {
    fn from(err: meta::Error) -> Error {
        Error::MetaBlock(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
