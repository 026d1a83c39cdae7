//! Converts the page types into template [`Value`]s. Field names follow the
//! template-facing spelling (`Title`, `Date`, `Authors`, `Content`, `Links`,
//! `Url`, ...), so a page template reads e.g. `{{.Title}}` and an index
//! template `{{range .Links}}{{.Url}}{{end}}`.

use crate::meta::Author;
use crate::page::{Index, Link, Page};
use gtmpl_value::Value;
use std::collections::HashMap;

fn string(s: &str) -> Value {
    Value::String(s.to_owned())
}

impl From<&Author> for Value {
    fn from(a: &Author) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("Name".to_owned(), string(&a.name));
        m.insert("Mail".to_owned(), string(&a.mail));
        m.insert("Organization".to_owned(), string(&a.organization));
        m.insert("ORCID".to_owned(), string(&a.orcid));
        Value::Object(m)
    }
}

impl From<&Page> for Value {
    /// Exposes `Title`, `Date`, `Authors` and `Content`.
    fn from(p: &Page) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("Title".to_owned(), string(&p.title));
        m.insert("Date".to_owned(), string(&p.date));
        m.insert(
            "Authors".to_owned(),
            Value::Array(p.authors.iter().map(Value::from).collect()),
        );
        m.insert("Content".to_owned(), string(&p.content));
        Value::Object(m)
    }
}

impl From<&Link> for Value {
    fn from(l: &Link) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("Title".to_owned(), string(&l.title));
        m.insert("Date".to_owned(), string(&l.date));
        m.insert("Url".to_owned(), string(&l.url));
        Value::Object(m)
    }
}

impl From<&Index> for Value {
    /// Exposes `Links`.
    fn from(i: &Index) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert(
            "Links".to_owned(),
            Value::Array(i.links.iter().map(Value::from).collect()),
        );
        Value::Object(m)
    }
}
