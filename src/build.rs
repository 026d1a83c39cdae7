//! Exports the [`build_site`] function which stitches together the steps of a
//! run: enumerating the source documents, assembling each into a
//! [`Page`] ([`crate::page`]), rendering it through the page template
//! ([`crate::write`]), and finally rendering the collected [`Link`]s through
//! the index template.

use crate::config::Config;
use crate::page::{Error as PageError, Index, Link, Page};
use crate::write::{self, Error as WriteError};
use log::{error, info};
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const MARKDOWN_EXTENSION: &str = ".md";
const HTML_EXTENSION: &str = ".html";

/// The name of the index file written at the root of the output directory.
pub const INDEX_FILE_NAME: &str = "index.html";

/// The outcome of a completed run.
#[derive(Debug)]
pub struct Report {
    /// The index as rendered, one link per written page.
    pub index: Index,

    /// The documents that failed. Always empty when [`Config::fail_fast`] is
    /// set, since the first failure aborts the run instead.
    pub failures: Vec<Error>,
}

/// Builds the site from a [`Config`]. Every `.md` file directly inside
/// [`Config::input`] is rendered to `{output}/{name}.html`, after which
/// `{output}/index.html` is rendered from the links of all written pages.
///
/// With [`Config::fail_fast`] set, the first failing document aborts the run
/// and the index isn't written. Otherwise failures are collected in the
/// returned [`Report`] and the index holds the remaining pages.
pub fn build_site(config: &Config) -> Result<Report> {
    let mut report = Report {
        index: Index::default(),
        failures: Vec::new(),
    };

    for source in source_files(&config.input, config.sort_by_name)? {
        info!("processing: {}", source.path.display());
        match render_source(config, &source) {
            Ok(link) => report.index.links.push(link),
            Err(err) if !config.fail_fast => {
                error!("{}", err);
                report.failures.push(err);
            }
            Err(err) => return Err(err),
        }
    }

    write::render(
        &config.output.join(INDEX_FILE_NAME),
        &config.template_index,
        &report.index,
    )
    .map_err(Error::Index)?;
    Ok(report)
}

/// A document selected for processing.
struct SourceFile {
    path: PathBuf,
    file_name: String,
}

/// Lists the regular `.md` files directly inside `dir`. Directories,
/// symlinks and other files are skipped. The order is the directory listing
/// order unless `sort_by_name` is set.
fn source_files(dir: &Path, sort_by_name: bool) -> Result<Vec<SourceFile>> {
    let mut walker = WalkDir::new(dir).min_depth(1).max_depth(1);
    if sort_by_name {
        walker = walker.sort_by(|a, b| a.file_name().cmp(b.file_name()));
    }

    let mut sources = Vec::new();
    for result in walker {
        let entry = result.map_err(|err| Error::ReadDirectory {
            path: dir.to_owned(),
            err,
        })?;
        let file_name = entry.file_name().to_string_lossy();
        if entry.file_type().is_file() && file_name.ends_with(MARKDOWN_EXTENSION) {
            sources.push(SourceFile {
                file_name: file_name.into_owned(),
                path: entry.into_path(),
            });
        }
    }
    Ok(sources)
}

/// Runs a single document through the pipeline and returns its index entry.
fn render_source(config: &Config, source: &SourceFile) -> Result<Link> {
    let page = Page::from_file(&source.path).map_err(|err| Error::Page {
        path: source.path.clone(),
        err,
    })?;
    let output_name = html_file_name(&source.file_name);
    write::render(
        &config.output.join(&output_name),
        &config.template_page,
        &page,
    )
    .map_err(|err| Error::Write {
        path: source.path.clone(),
        err,
    })?;
    Ok(page.link(&output_name))
}

/// `hello.md` becomes `hello.html`.
fn html_file_name(file_name: &str) -> String {
    let base_name = file_name
        .strip_suffix(MARKDOWN_EXTENSION)
        .unwrap_or(file_name);
    format!("{}{}", base_name, HTML_EXTENSION)
}

/// The result of a fallible build operation.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Page errors are annotated with the
/// source document that produced them.
#[derive(Debug)]
pub enum Error {
    /// Returned when the input directory can't be listed.
    ReadDirectory { path: PathBuf, err: walkdir::Error },

    /// Returned when a document can't be assembled into a page.
    Page { path: PathBuf, err: PageError },

    /// Returned when a page can't be rendered through the page template.
    Write { path: PathBuf, err: WriteError },

    /// Returned when the index can't be rendered.
    Index(WriteError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ReadDirectory { path, err } => {
                write!(f, "Reading input directory '{}': {}", path.display(), err)
            }
            Error::Page { path, err } => {
                write!(f, "page render error '{}': {}", path.display(), err)
            }
            Error::Write { path, err } => {
                write!(f, "page render error '{}': {}", path.display(), err)
            }
            Error::Index(err) => write!(f, "index render error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ReadDirectory { path: _, err } => Some(err),
            Error::Page { path: _, err } => Some(err),
            Error::Write { path: _, err } => Some(err),
            Error::Index(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const PAGE_TEMPLATE: &str = "<h1 class=\"title\">{{.Title}}</h1>\
        <time>{{.Date}}</time>\
        {{range .Authors}}<address>{{.Name}}</address>{{end}}\
        <main>{{.Content}}</main>";

    const INDEX_TEMPLATE: &str = "{{range .Links}}<a href=\"{{.Url}}\">{{.Title}} ({{.Date}})</a>\n{{end}}";

    /// A scratch site with `in/`, `out/` and both templates.
    struct Site {
        _dir: TempDir,
        config: Config,
    }

    impl Site {
        fn new() -> Site {
            let dir = tempfile::tempdir().unwrap();
            fs::create_dir(dir.path().join("in")).unwrap();
            fs::create_dir(dir.path().join("out")).unwrap();
            fs::write(dir.path().join("page.tmpl"), PAGE_TEMPLATE).unwrap();
            fs::write(dir.path().join("index.tmpl"), INDEX_TEMPLATE).unwrap();
            let config = Config {
                input: dir.path().join("in"),
                output: dir.path().join("out"),
                template_page: dir.path().join("page.tmpl"),
                template_index: dir.path().join("index.tmpl"),
                fail_fast: true,
                sort_by_name: false,
            };
            Site { _dir: dir, config }
        }

        fn source(&self, name: &str, contents: &str) {
            fs::write(self.config.input.join(name), contents).unwrap();
        }

        fn document(&self, name: &str, title: &str, date: &str, body: &str) {
            self.source(
                name,
                &format!(
                    "```json\n{{\"Title\":\"{}\",\"Date\":\"{}\",\"Authors\":[]}}\n```\n{}",
                    title, date, body
                ),
            );
        }

        fn output(&self, name: &str) -> Option<String> {
            fs::read_to_string(self.config.output.join(name)).ok()
        }
    }

    #[test]
    fn test_single_document() -> Result<()> {
        let site = Site::new();
        site.document("a.md", "Hi", "2020-01-02T00:00:00Z", "# Hello");

        let report = build_site(&site.config)?;
        assert!(report.failures.is_empty());
        assert_eq!(
            vec![Link {
                title: String::from("Hi"),
                date: String::from("2020-01-02"),
                url: String::from("/a.html"),
            }],
            report.index.links
        );
        assert_eq!(
            Some(String::from(
                "<h1 class=\"title\">Hi</h1><time>2020-01-02</time><main><h1>Hello</h1>\n</main>"
            )),
            site.output("a.html")
        );
        assert_eq!(
            Some(String::from("<a href=\"/a.html\">Hi (2020-01-02)</a>\n")),
            site.output(INDEX_FILE_NAME)
        );
        Ok(())
    }

    #[test]
    fn test_authors() -> Result<()> {
        let site = Site::new();
        site.source(
            "a.md",
            "```json\n{\"Title\":\"T\",\"Date\":\"2020-01-02\",\
             \"Authors\":[{\"Name\":\"Ada\"},{\"Name\":\"Grace\"}]}\n```\nbody\n",
        );
        build_site(&site.config)?;
        let html = site.output("a.html").unwrap();
        assert!(html.contains("<address>Ada</address><address>Grace</address>"));
        Ok(())
    }

    #[test]
    fn test_missing_start_fence_aborts() {
        let site = Site::new();
        site.source("bad.md", "# No meta block\n");

        match build_site(&site.config) {
            Err(Error::Page { path, err }) => {
                assert_eq!(site.config.input.join("bad.md"), path);
                assert_eq!(
                    "meta block error: missing meta code block start",
                    err.to_string()
                );
            }
            other => panic!("wanted page error, got {:?}", other),
        }
        assert_eq!(None, site.output("bad.html"));
        assert_eq!(None, site.output(INDEX_FILE_NAME));
    }

    #[test]
    fn test_empty_file_aborts() {
        let site = Site::new();
        site.source("empty.md", "");

        match build_site(&site.config) {
            Err(Error::Page {
                err: PageError::EmptyFile,
                ..
            }) => {}
            other => panic!("wanted empty file error, got {:?}", other),
        }
        assert_eq!(None, site.output("empty.html"));
        assert_eq!(None, site.output(INDEX_FILE_NAME));
    }

    #[test]
    fn test_skips_other_entries() -> Result<()> {
        let site = Site::new();
        site.document("a.md", "A", "2020-01-02", "a");
        site.source("notes.txt", "not markdown");
        site.source("a.md.bak", "not markdown either");
        fs::create_dir(site.config.input.join("sub.md")).unwrap();
        fs::write(site.config.input.join("sub.md").join("b.md"), "").unwrap();

        let report = build_site(&site.config)?;
        let urls: Vec<&str> = report.index.links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(vec!["/a.html"], urls);
        assert_eq!(None, site.output("notes.html"));
        assert_eq!(None, site.output("b.html"));
        Ok(())
    }

    #[test]
    fn test_listing_order() -> Result<()> {
        let site = Site::new();
        for name in &["c", "a", "d", "b"] {
            site.document(&format!("{}.md", name), name, "2020-01-02", "");
        }

        let report = build_site(&site.config)?;
        let listed: Vec<String> = fs::read_dir(&site.config.input)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .map(|name| format!("/{}", html_file_name(&name)))
            .collect();
        let urls: Vec<String> = report.index.links.iter().map(|l| l.url.clone()).collect();
        assert_eq!(listed, urls);
        Ok(())
    }

    #[test]
    fn test_sort_by_name() -> Result<()> {
        let mut site = Site::new();
        site.config.sort_by_name = true;
        for name in &["c", "a", "d", "b"] {
            site.document(&format!("{}.md", name), name, "2020-01-02", "");
        }

        let report = build_site(&site.config)?;
        let titles: Vec<&str> = report.index.links.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(vec!["a", "b", "c", "d"], titles);
        assert_eq!(
            Some(String::from(
                "<a href=\"/a.html\">a (2020-01-02)</a>\n\
                 <a href=\"/b.html\">b (2020-01-02)</a>\n\
                 <a href=\"/c.html\">c (2020-01-02)</a>\n\
                 <a href=\"/d.html\">d (2020-01-02)</a>\n"
            )),
            site.output(INDEX_FILE_NAME)
        );
        Ok(())
    }

    #[test]
    fn test_keep_going() -> Result<()> {
        let mut site = Site::new();
        site.config.fail_fast = false;
        site.config.sort_by_name = true;
        site.document("a.md", "A", "2020-01-02", "");
        site.source("b.md", "");
        site.source("c.md", "```json\n{\"Title\":[\"C\"]}\n```\n");
        site.document("d.md", "D", "2020-01-03", "");

        let report = build_site(&site.config)?;
        let urls: Vec<&str> = report.index.links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(vec!["/a.html", "/d.html"], urls);
        assert_eq!(2, report.failures.len());
        assert!(site.output(INDEX_FILE_NAME).is_some());
        assert_eq!(None, site.output("b.html"));
        Ok(())
    }

    #[test]
    fn test_minimal_header() -> Result<()> {
        let site = Site::new();
        site.source("a.md", "```json\n{\"title\":\"C\"}\n```\nbody\n");

        let report = build_site(&site.config)?;
        assert_eq!(
            vec![Link {
                title: String::from("C"),
                date: String::from("0001-01-01"),
                url: String::from("/a.html"),
            }],
            report.index.links
        );
        Ok(())
    }

    #[test]
    fn test_missing_template_field() {
        let site = Site::new();
        site.document("a.md", "A", "2020-01-02", "");
        fs::write(&site.config.template_page, "{{.Title}}|{{.Nope}}").unwrap();

        match build_site(&site.config) {
            Err(Error::Write {
                err: WriteError::Execute(_),
                ..
            }) => {}
            other => panic!("wanted execute error, got {:?}", other),
        }
        assert_eq!(None, site.output(INDEX_FILE_NAME));
    }

    #[test]
    fn test_broken_page_template() {
        let site = Site::new();
        site.document("a.md", "A", "2020-01-02", "");
        fs::write(&site.config.template_page, "{{.Title").unwrap();

        match build_site(&site.config) {
            Err(Error::Write {
                err: WriteError::ParseTemplate { .. },
                ..
            }) => {}
            other => panic!("wanted template error, got {:?}", other),
        }
        // The output file was already created when the template failed.
        assert_eq!(Some(String::new()), site.output("a.html"));
        assert_eq!(None, site.output(INDEX_FILE_NAME));
    }

    #[test]
    fn test_missing_index_template() {
        let site = Site::new();
        site.document("a.md", "A", "2020-01-02", "");
        fs::remove_file(&site.config.template_index).unwrap();

        match build_site(&site.config) {
            Err(Error::Index(WriteError::OpenTemplateFile { .. })) => {}
            other => panic!("wanted index error, got {:?}", other),
        }
        assert!(site.output("a.html").is_some());
    }

    #[test]
    fn test_empty_input_directory() -> Result<()> {
        let site = Site::new();
        let report = build_site(&site.config)?;
        assert!(report.index.links.is_empty());
        assert_eq!(Some(String::new()), site.output(INDEX_FILE_NAME));
        Ok(())
    }

    #[test]
    fn test_html_file_name() {
        assert_eq!("hello.html", html_file_name("hello.md"));
        assert_eq!("a.md.html", html_file_name("a.md.md"));
        assert_eq!(".html", html_file_name(".md"));
    }
}
