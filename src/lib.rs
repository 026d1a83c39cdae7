//! The library code for the `pagesmith` page generator. A run is a single
//! pass over a directory of markdown documents:
//!
//! 1. Loading the configuration ([`crate::config`])
//! 2. Converting each document into an HTML page ([`crate::page`])
//! 3. Rendering pages and the index through templates ([`crate::write`])
//!
//! Every document begins with a fenced JSON meta block ([`crate::meta`])
//! holding its title, date and authors. The rest of the document is markdown
//! ([`crate::markdown`]). Each page is rendered through the page template and
//! contributes one [`page::Link`] to the index, which is rendered through the
//! index template once all documents have been written. [`build::build_site`]
//! stitches these steps together.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod markdown;
pub mod meta;
pub mod page;
pub mod value;
pub mod write;
