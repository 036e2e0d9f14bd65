//! Declarative list filters.
//!
//! Each listing declares its filterable fields as a static slice of
//! [`FilterField`]s. Request values are collected into a [`FilterSet`] and
//! turned into one [`WhereClause`] by [`build_where`]; the same clause feeds the
//! page query, the count query and exports, so they cannot disagree.
//!
//! Clause SQL uses `?` placeholders. Database adapters rebind them in order.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use time::Date;
use time::macros::format_description;

/// A single filter value taken from a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Int(i64),
    Bool(bool),
    Date(Date),
    Tags(Vec<String>),
}

impl FilterValue {
    fn as_text(&self) -> String {
        match self {
            FilterValue::Text(value) => value.clone(),
            FilterValue::Int(value) => value.to_string(),
            FilterValue::Bool(value) => value.to_string(),
            FilterValue::Date(value) => format_date(*value),
            FilterValue::Tags(tags) => tags.join(","),
        }
    }
}

impl Serialize for FilterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FilterValue::Text(value) => serializer.serialize_str(value),
            FilterValue::Int(value) => serializer.serialize_i64(*value),
            FilterValue::Bool(value) => serializer.serialize_bool(*value),
            FilterValue::Date(value) => serializer.serialize_str(&format_date(*value)),
            FilterValue::Tags(tags) => tags.serialize(serializer),
        }
    }
}

fn format_date(date: Date) -> String {
    let format = format_description!("[year]-[month]-[day]");
    date.format(&format).unwrap_or_else(|_| date.to_string())
}

/// Present filters keyed by request field name.
///
/// Backed by a `BTreeMap`, so serialization is key-sorted and two equal sets
/// always produce the same cache key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilterSet(BTreeMap<&'static str, FilterValue>);

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blank or whitespace-only text counts as absent.
    pub fn text(mut self, key: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) {
            self.0.insert(key, FilterValue::Text(value.to_string()));
        }
        self
    }

    /// Zero is a real value and produces a predicate.
    pub fn int(mut self, key: &'static str, value: Option<i64>) -> Self {
        if let Some(value) = value {
            self.0.insert(key, FilterValue::Int(value));
        }
        self
    }

    pub fn flag(mut self, key: &'static str, value: Option<bool>) -> Self {
        if let Some(value) = value {
            self.0.insert(key, FilterValue::Bool(value));
        }
        self
    }

    pub fn date(mut self, key: &'static str, value: Option<Date>) -> Self {
        if let Some(value) = value {
            self.0.insert(key, FilterValue::Date(value));
        }
        self
    }

    /// Blank tags are dropped; an empty list counts as absent.
    pub fn tags(mut self, key: &'static str, value: Option<&[String]>) -> Self {
        let tags: Vec<String> = value
            .unwrap_or_default()
            .iter()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect();
        if !tags.is_empty() {
            self.0.insert(key, FilterValue::Tags(tags));
        }
        self
    }

    /// Replace or add a value regardless of the builder rules.
    pub fn set(&mut self, key: &'static str, value: FilterValue) {
        self.0.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FilterValue)> {
        self.0.iter().map(|(key, value)| (*key, value))
    }
}

/// How a present filter value constrains rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateKind {
    /// `column = ?`
    Exact(&'static str),
    /// `column ILIKE ?` with `%value%`.
    Substring(&'static str),
    /// `(c1 ILIKE ? OR c2 ILIKE ? ...)`, one bind per column.
    AnySubstring(&'static [&'static str]),
    /// `DATE(column) >= ?`
    DateFrom(&'static str),
    /// `DATE(column) <= ?`
    DateTo(&'static str),
    /// `column >= ?`
    AtLeast(&'static str),
    /// `column <= ?`
    AtMost(&'static str),
    /// One `column @> jsonb_build_array(?::text)` per tag.
    ContainsTags(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    pub key: &'static str,
    pub kind: PredicateKind,
}

impl FilterField {
    pub const fn new(key: &'static str, kind: PredicateKind) -> Self {
        Self { key, kind }
    }
}

/// A value bound to a clause placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
    Bool(bool),
    Date(Date),
}

impl From<&FilterValue> for SqlParam {
    fn from(value: &FilterValue) -> Self {
        match value {
            FilterValue::Text(value) => SqlParam::Text(value.clone()),
            FilterValue::Int(value) => SqlParam::Int(*value),
            FilterValue::Bool(value) => SqlParam::Bool(*value),
            FilterValue::Date(value) => SqlParam::Date(*value),
            FilterValue::Tags(tags) => SqlParam::Text(tags.join(",")),
        }
    }
}

/// `WHERE 1=1 AND ...` with positional `?` parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhereClause {
    sql: String,
    params: Vec<SqlParam>,
}

impl WhereClause {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    fn push(&mut self, predicate: &str, params: impl IntoIterator<Item = SqlParam>) {
        self.sql.push_str(" AND ");
        self.sql.push_str(predicate);
        self.params.extend(params);
    }
}

impl Default for WhereClause {
    fn default() -> Self {
        Self {
            sql: "WHERE 1=1".to_string(),
            params: Vec::new(),
        }
    }
}

/// Build the clause for `filters`, visiting fields in declaration order.
///
/// Keys in `filters` that `fields` does not declare are ignored.
pub fn build_where(fields: &[FilterField], filters: &FilterSet) -> WhereClause {
    let mut clause = WhereClause::default();

    for field in fields {
        let Some(value) = filters.get(field.key) else {
            continue;
        };

        match field.kind {
            PredicateKind::Exact(column) => {
                clause.push(&format!("{column} = ?"), [SqlParam::from(value)]);
            }
            PredicateKind::Substring(column) => {
                clause.push(&format!("{column} ILIKE ?"), [like_term(value)]);
            }
            PredicateKind::AnySubstring(columns) => {
                let predicate = columns
                    .iter()
                    .map(|column| format!("{column} ILIKE ?"))
                    .collect::<Vec<_>>()
                    .join(" OR ");
                let term = like_term(value);
                clause.push(
                    &format!("({predicate})"),
                    columns.iter().map(|_| term.clone()),
                );
            }
            PredicateKind::DateFrom(column) => {
                clause.push(&format!("DATE({column}) >= ?"), [SqlParam::from(value)]);
            }
            PredicateKind::DateTo(column) => {
                clause.push(&format!("DATE({column}) <= ?"), [SqlParam::from(value)]);
            }
            PredicateKind::AtLeast(column) => {
                clause.push(&format!("{column} >= ?"), [SqlParam::from(value)]);
            }
            PredicateKind::AtMost(column) => {
                clause.push(&format!("{column} <= ?"), [SqlParam::from(value)]);
            }
            PredicateKind::ContainsTags(column) => {
                let tags = match value {
                    FilterValue::Tags(tags) => tags.clone(),
                    other => vec![other.as_text()],
                };
                for tag in tags {
                    clause.push(
                        &format!("{column} @> jsonb_build_array(?::text)"),
                        [SqlParam::Text(tag)],
                    );
                }
            }
        }
    }

    clause
}

fn like_term(value: &FilterValue) -> SqlParam {
    SqlParam::Text(format!("%{}%", value.as_text()))
}

/// A typed per-listing filter struct.
pub trait FilterSource {
    const FIELDS: &'static [FilterField];

    fn filter_set(&self) -> FilterSet;
}

/// Filters plus the clause derived from them, built once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    filters: FilterSet,
    clause: WhereClause,
}

impl ListQuery {
    pub fn new(fields: &[FilterField], filters: FilterSet) -> Self {
        let clause = build_where(fields, &filters);
        Self { filters, clause }
    }

    pub fn from_source<F: FilterSource>(source: &F) -> Self {
        Self::new(F::FIELDS, source.filter_set())
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn clause(&self) -> &WhereClause {
        &self.clause
    }
}
