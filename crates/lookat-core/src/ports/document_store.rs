//! Document store port - keyed collections with filtered, ordered queries.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::DateTime;
use serde_json::Value;

/// Document store trait - abstraction over document databases (Redis, in-memory).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert or overwrite the document stored under `id`.
    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        document: Value,
    ) -> Result<(), StoreError>;

    /// Delete the document stored under `id`. Deleting a missing document succeeds.
    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Fetch every document of `collection` that satisfies `query`, in query order.
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Value>, StoreError>;
}

/// A single predicate on a (possibly dotted) field path.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Equal { field: String, value: Value },
    In { field: String, values: Vec<Value> },
}

impl Filter {
    fn matches(&self, document: &Value) -> bool {
        match self {
            Filter::Equal { field, value } => lookup(document, field) == Some(value),
            Filter::In { field, values } => {
                lookup(document, field).is_some_and(|found| values.contains(found))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub descending: bool,
}

/// Query description shared by all store backends.
///
/// Backends may push filters down to the database, but must return the same
/// documents in the same order as [`Query::apply`] would.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order_by: Option<OrderBy>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_equal(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Equal {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Field value must be one of `values`. An empty set matches nothing.
    pub fn where_in<V>(mut self, field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self
    where
        V: Into<Value>,
    {
        self.filters.push(Filter::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, descending: bool) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            descending,
        });
        self
    }

    pub fn matches(&self, document: &Value) -> bool {
        self.filters.iter().all(|filter| filter.matches(document))
    }

    /// Filter and order an unordered set of documents.
    pub fn apply(&self, documents: impl IntoIterator<Item = Value>) -> Vec<Value> {
        let mut matched: Vec<Value> = documents
            .into_iter()
            .filter(|document| self.matches(document))
            .collect();

        if let Some(order) = &self.order_by {
            matched.sort_by(|a, b| {
                match (lookup(a, &order.field), lookup(b, &order.field)) {
                    (Some(x), Some(y)) if order.descending => compare_values(x, y).reverse(),
                    (Some(x), Some(y)) => compare_values(x, y),
                    // Documents without the field sort last either way
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            });
        }

        matched
    }
}

fn lookup<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |value, key| value.get(key))
}

/// RFC 3339 strings compare chronologically, numbers numerically.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => {
            match (DateTime::parse_from_rfc3339(x), DateTime::parse_from_rfc3339(y)) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

/// Document store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Backend error: {0}")]
    Backend(String),
}
