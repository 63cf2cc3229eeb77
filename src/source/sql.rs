//! DuckDB-backed keyset source
//!
//! Pages through a table or query ordered by one or more sort fields, using
//! a keyset predicate built from the current bookmark instead of OFFSET.
//! Rows come back as JSON objects.

use crate::bookmark::Bookmark;
use crate::bookmarker::{CompositeBookmarker, SimpleBookmarker, SortField};
use crate::collection::{Fetch, Proxy};
use crate::error::{Error, Result};
use crate::pager::Pager;
use crate::types::{JsonValue, SortDirection};
use duckdb::types::{TimeUnit, Value};
use duckdb::Connection;
use std::fmt;
use std::sync::Mutex;

/// What the source selects from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlBase {
    /// A table name, optionally schema-qualified (`main.users`)
    Table(String),
    /// A full SELECT statement
    Query(String),
}

impl SqlBase {
    fn to_sql(&self) -> String {
        match self {
            Self::Table(table) => format!(
                "SELECT * FROM {}",
                table
                    .split('.')
                    .map(quote_ident)
                    .collect::<Vec<_>>()
                    .join(".")
            ),
            Self::Query(query) => query.trim().trim_end_matches(';').to_string(),
        }
    }
}

/// Keyset-paginated DuckDB query
pub struct SqlSource {
    conn: Mutex<Connection>,
    base: SqlBase,
    fields: Vec<SortField>,
}

impl SqlSource {
    /// Create a source over an open connection
    pub fn new(conn: Connection, base: SqlBase, fields: Vec<SortField>) -> Result<Self> {
        if fields.is_empty() {
            return Err(Error::config("SQL source needs at least one sort field"));
        }
        if let Some(field) = fields.iter().find(|f| f.name.is_empty() || f.name.contains('.')) {
            return Err(Error::config(format!(
                "SQL sort field '{}' must be a plain column name",
                field.name
            )));
        }
        Ok(Self {
            conn: Mutex::new(conn),
            base,
            fields,
        })
    }

    /// Open a database file, or an in-memory database for `:memory:`
    pub fn open(database: &str, base: SqlBase, fields: Vec<SortField>) -> Result<Self> {
        let conn = if database == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(database)?
        };
        Self::new(conn, base, fields)
    }

    /// Run setup statements (DDL, inserts) on the connection
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.lock()?.execute_batch(sql)?;
        Ok(())
    }

    /// Sort fields, most significant first
    pub fn fields(&self) -> &[SortField] {
        &self.fields
    }

    /// Wrap into a collection with the matching bookmarker
    pub fn into_collection(self) -> Proxy<JsonValue> {
        match self.fields.as_slice() {
            [field] => Proxy::new(SimpleBookmarker::with_field(field.clone()), self),
            fields => Proxy::new(CompositeBookmarker::new(fields.to_vec()), self),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::source_failed("DuckDB connection lock poisoned"))
    }

    /// Build the page query and its parameters
    pub(crate) fn build_query(
        &self,
        current: Option<&Bookmark>,
        limit: usize,
    ) -> Result<(String, Vec<Value>)> {
        let mut query = format!(
            "SELECT CAST(to_json(q) AS VARCHAR) FROM ({}) AS q",
            self.base.to_sql()
        );
        let mut params = Vec::new();

        if let Some(bookmark) = current {
            let values = match bookmark {
                Bookmark::Tuple(parts) => parts.as_slice(),
                scalar => std::slice::from_ref(scalar),
            };
            if values.len() != self.fields.len() {
                return Err(Error::config(format!(
                    "bookmark has {} parts but the source sorts by {} fields",
                    values.len(),
                    self.fields.len()
                )));
            }
            let predicate = self.keyset_predicate(values, &mut params)?;
            query = format!("{query} WHERE {predicate}");
        }

        let order = self
            .fields
            .iter()
            .map(|field| {
                let nulls = if field.direction.is_descending() {
                    "NULLS LAST"
                } else {
                    "NULLS FIRST"
                };
                format!(
                    "q.{} {} {nulls}",
                    quote_ident(&field.name),
                    field.direction.as_sql()
                )
            })
            .collect::<Vec<_>>()
            .join(", ");

        // DuckDB takes a signed 64-bit LIMIT
        let limit = limit.min(usize::try_from(i64::MAX).unwrap_or(usize::MAX));
        query = format!("{query} ORDER BY {order} LIMIT {limit}");
        Ok((query, params))
    }

    /// `(a after v1) OR (a = v1 AND b after v2) OR ...`
    fn keyset_predicate(&self, values: &[Bookmark], params: &mut Vec<Value>) -> Result<String> {
        let mut branches = Vec::with_capacity(self.fields.len());

        for (depth, (field, value)) in self.fields.iter().zip(values).enumerate() {
            let mut terms = Vec::with_capacity(depth + 1);
            for (prefix_field, prefix_value) in self.fields.iter().zip(values).take(depth) {
                terms.push(format!(
                    "q.{} IS NOT DISTINCT FROM ?",
                    quote_ident(&prefix_field.name)
                ));
                params.push(bookmark_to_sql(&prefix_field.name, prefix_value)?);
            }

            let column = format!("q.{}", quote_ident(&field.name));
            let after = match (field.direction, value.is_null()) {
                (SortDirection::Ascending, true) => format!("{column} IS NOT NULL"),
                (SortDirection::Descending, true) => "FALSE".to_string(),
                (SortDirection::Ascending, false) => {
                    params.push(bookmark_to_sql(&field.name, value)?);
                    format!("{column} > ?")
                }
                (SortDirection::Descending, false) => {
                    params.push(bookmark_to_sql(&field.name, value)?);
                    format!("({column} < ? OR {column} IS NULL)")
                }
            };
            terms.push(after);
            branches.push(format!("({})", terms.join(" AND ")));
        }

        Ok(format!("({})", branches.join(" OR ")))
    }
}

impl fmt::Debug for SqlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlSource")
            .field("base", &self.base)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl Fetch<JsonValue> for SqlSource {
    fn fetch(&self, pager: &mut Pager<JsonValue>) -> Result<()> {
        // One extra row tells the proxy whether more remain
        let limit = pager.per_page().saturating_add(1);
        let (query, params) = self.build_query(pager.current_bookmark(), limit)?;
        tracing::debug!(%query, params = params.len(), "Executing keyset query");

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map(duckdb::params_from_iter(params), |row| {
            row.get::<_, String>(0)
        })?;

        for row in rows {
            pager.push(serde_json::from_str(&row?)?);
        }
        Ok(())
    }
}

/// Quote an SQL identifier
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Bind a bookmark component as a DuckDB value
fn bookmark_to_sql(field: &str, bookmark: &Bookmark) -> Result<Value> {
    match bookmark {
        Bookmark::Null => Ok(Value::Null),
        Bookmark::Bool(b) => Ok(Value::Boolean(*b)),
        Bookmark::Int(i) => Ok(Value::BigInt(*i)),
        Bookmark::Text(s) => Ok(Value::Text(s.clone())),
        Bookmark::Time(t) => Ok(Value::Timestamp(TimeUnit::Microsecond, t.timestamp_micros())),
        other => Err(Error::invalid_value(
            field,
            format!("{} bookmark cannot be bound as an SQL value", other.kind_name()),
        )),
    }
}
