use std::fmt;

use chrono::{DateTime, Utc};

/// A single filter of the search API, e.g. `at(document.type, "posts")`.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    At { path: String, value: String },
    DateBefore { path: String, date: DateTime<Utc> },
    DateAfter { path: String, date: DateTime<Utc> },
}

impl Predicate {
    pub fn at(path: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::At {
            path: path.into(),
            value: value.into(),
        }
    }

    pub fn date_before(path: impl Into<String>, date: DateTime<Utc>) -> Self {
        Predicate::DateBefore {
            path: path.into(),
            date,
        }
    }

    pub fn date_after(path: impl Into<String>, date: DateTime<Utc>) -> Self {
        Predicate::DateAfter {
            path: path.into(),
            date,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::At { path, value } => {
                write!(f, "[at({}, {})]", path, quote(value))
            }
            // dates are sent as epoch milliseconds
            Predicate::DateBefore { path, date } => {
                let millis = date.timestamp_millis();
                write!(f, "[date.before({}, {})]", path, millis)
            }
            Predicate::DateAfter { path, date } => {
                write!(f, "[date.after({}, {})]", path, date.timestamp_millis())
            }
        }
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ordering {
    pub field: String,
    pub descending: bool,
}

impl Ordering {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }
}

impl fmt::Display for Ordering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "{} desc", self.field)
        } else {
            write!(f, "{}", self.field)
        }
    }
}

/// Parameters of a `documents/search` request.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Query {
    pub predicates: Vec<Predicate>,
    pub fetch: Vec<String>,
    pub page_size: Option<u32>,
    pub orderings: Vec<Ordering>,
    pub reference: Option<String>,
}

impl Query {
    pub fn new(predicate: Predicate) -> Self {
        Self {
            predicates: vec![predicate],
            ..Default::default()
        }
    }

    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Restricts the returned data to the given `type.field` paths.
    pub fn fetch<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fetch.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn order_by(mut self, ordering: Ordering) -> Self {
        self.orderings.push(ordering);
        self
    }

    pub fn with_ref(mut self, reference: Option<impl Into<String>>) -> Self {
        self.reference = reference.map(Into::into);
        self
    }

    /// The `q` parameter: every predicate inside one outer bracket.
    pub fn q(&self) -> String {
        let predicates: String =
            self.predicates.iter().map(ToString::to_string).collect();
        format!("[{}]", predicates)
    }

    pub fn orderings_param(&self) -> Option<String> {
        if self.orderings.is_empty() {
            return None;
        }
        let orderings: Vec<String> =
            self.orderings.iter().map(ToString::to_string).collect();
        Some(format!("[{}]", orderings.join(",")))
    }

    pub fn fetch_param(&self) -> Option<String> {
        (!self.fetch.is_empty()).then(|| self.fetch.join(","))
    }
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_q_wraps_every_predicate() {
        // Arrange
        let date = Utc.with_ymd_and_hms(2021, 3, 25, 19, 25, 28).unwrap();
        let query = Query::new(Predicate::at("document.type", "posts")).and(
            Predicate::date_before("document.first_publication_date", date),
        );

        // Act
        let q = query.q();

        // Assert
        assert_eq!(
            q,
            "[[at(document.type, \"posts\")]\
             [date.before(document.first_publication_date, 1616700328000)]]"
        );
    }

    #[test]
    fn test_at_escapes_quotes() {
        let predicate = Predicate::at("my.posts.uid", "a\"b");

        assert_eq!(predicate.to_string(), "[at(my.posts.uid, \"a\\\"b\")]");
    }

    #[test]
    fn test_optional_params() {
        // Arrange
        let bare = Query::new(Predicate::at("document.type", "posts"));
        let full = bare
            .clone()
            .fetch(["posts.title", "posts.author"])
            .order_by(Ordering::desc("document.first_publication_date"))
            .order_by(Ordering::asc("my.posts.title"));

        // Act & Assert
        assert_eq!(bare.fetch_param(), None);
        assert_eq!(bare.orderings_param(), None);
        assert_eq!(
            full.fetch_param().as_deref(),
            Some("posts.title,posts.author")
        );
        assert_eq!(
            full.orderings_param().as_deref(),
            Some("[document.first_publication_date desc,my.posts.title]")
        );
    }
}
