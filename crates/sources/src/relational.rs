//! Relational adapters over a SQLite database.
//!
//! Both adapters open the database read-only for the duration of one call.
//! `LIKE` is case-insensitive for ASCII in SQLite, so `%term%` behaves as a
//! case-insensitive substring match on each searched column.

use crate::adapter::{clamp_limit, SourceAdapter};
use crate::error::SourceError;
use crate::result::SourceResult;
use chrono::{NaiveDate, NaiveDateTime};
use datagate_core::SourceKey;
use rusqlite::types::Value;
use rusqlite::{params, Connection, OpenFlags};
use std::path::{Path, PathBuf};

const USER_QUERY: &str = "SELECT username, role, department FROM users \
     WHERE username LIKE ?1 OR role LIKE ?1 OR department LIKE ?1 \
     LIMIT ?2";

const ORDER_QUERY: &str = "SELECT order_id, product_name, amount, order_date FROM orders \
     WHERE product_name LIKE ?1 \
     LIMIT ?2";

/// Open the database for reading. A missing file is a connection failure.
fn open_read_only(path: &Path) -> Result<Connection, SourceError> {
    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|e| SourceError::Connection(format!("{:?}: {}", path, e)))
}

fn query_err(e: rusqlite::Error) -> SourceError {
    SourceError::Query(e.to_string())
}

fn like_pattern(term: &str) -> String {
    format!("%{}%", term)
}

fn or_na(value: Option<String>) -> String {
    value.unwrap_or_else(|| "N/A".to_string())
}

fn format_amount(amount: Option<f64>) -> String {
    amount.map_or_else(|| "N/A".to_string(), |a| format!("{:.2}", a))
}

/// Render an order date whether stored as a date, a timestamp or anything else.
///
/// Text that parses as a timestamp or a date is normalized; other values are
/// printed as stored.
fn format_order_date(value: Value) -> String {
    match value {
        Value::Null => "N/A".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(r) => r.to_string(),
        Value::Text(text) => {
            if let Ok(ts) = NaiveDateTime::parse_from_str(&text, "%Y-%m-%d %H:%M:%S%.f") {
                ts.to_string()
            } else if let Ok(ts) = NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S%.f") {
                ts.to_string()
            } else if let Ok(date) = NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
                date.to_string()
            } else {
                text
            }
        }
        Value::Blob(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
    }
}

/// Run a blocking lookup off the async runtime.
async fn run_blocking<F>(key: SourceKey, lookup: F) -> SourceResult
where
    F: FnOnce() -> Result<Vec<String>, SourceError> + Send + 'static,
{
    let outcome = tokio::task::spawn_blocking(lookup)
        .await
        .unwrap_or_else(|e| Err(SourceError::Query(format!("lookup task failed: {}", e))));

    match &outcome {
        Ok(lines) => tracing::debug!("{} returned {} rows", key, lines.len()),
        Err(e) => tracing::warn!("{} lookup failed: {}", key, e),
    }

    SourceResult::from_outcome(outcome)
}

/// Users matched on username, role or department.
#[derive(Debug, Clone)]
pub struct UserSource {
    database: PathBuf,
}

impl UserSource {
    pub fn new(database: impl Into<PathBuf>) -> Self {
        Self {
            database: database.into(),
        }
    }
}

fn query_users(database: &Path, term: &str, limit: usize) -> Result<Vec<String>, SourceError> {
    let conn = open_read_only(database)?;
    let tag = SourceKey::RelationalUser.tag().record;

    let mut stmt = conn.prepare(USER_QUERY).map_err(query_err)?;
    let rows = stmt
        .query_map(params![like_pattern(term), limit as i64], |row| {
            Ok(format!(
                "{}: Username: {}, Role: {}, Department: {}",
                tag,
                or_na(row.get(0)?),
                or_na(row.get(1)?),
                or_na(row.get(2)?)
            ))
        })
        .map_err(query_err)?;

    let lines = rows.collect::<Result<Vec<_>, _>>().map_err(query_err)?;
    Ok(lines)
}

#[async_trait::async_trait]
impl SourceAdapter for UserSource {
    fn key(&self) -> SourceKey {
        SourceKey::RelationalUser
    }

    async fn fetch(&self, term: &str, limit: usize) -> SourceResult {
        let database = self.database.clone();
        let term = term.to_string();
        let limit = clamp_limit(limit);
        run_blocking(self.key(), move || query_users(&database, &term, limit)).await
    }
}

/// Orders matched on product name.
#[derive(Debug, Clone)]
pub struct OrderSource {
    database: PathBuf,
}

impl OrderSource {
    pub fn new(database: impl Into<PathBuf>) -> Self {
        Self {
            database: database.into(),
        }
    }
}

fn query_orders(database: &Path, term: &str, limit: usize) -> Result<Vec<String>, SourceError> {
    let conn = open_read_only(database)?;
    let tag = SourceKey::RelationalOrder.tag().record;

    let mut stmt = conn.prepare(ORDER_QUERY).map_err(query_err)?;
    let rows = stmt
        .query_map(params![like_pattern(term), limit as i64], |row| {
            let id: i64 = row.get(0)?;
            let product: Option<String> = row.get(1)?;
            let amount: Option<f64> = row.get(2)?;
            let date: Value = row.get(3)?;
            Ok(format!(
                "{}: ID: {}, Product: {}, Amount: {}, Date: {}",
                tag,
                id,
                or_na(product),
                format_amount(amount),
                format_order_date(date)
            ))
        })
        .map_err(query_err)?;

    let lines = rows.collect::<Result<Vec<_>, _>>().map_err(query_err)?;
    Ok(lines)
}

#[async_trait::async_trait]
impl SourceAdapter for OrderSource {
    fn key(&self) -> SourceKey {
        SourceKey::RelationalOrder
    }

    async fn fetch(&self, term: &str, limit: usize) -> SourceResult {
        let database = self.database.clone();
        let term = term.to_string();
        let limit = clamp_limit(limit);
        run_blocking(self.key(), move || query_orders(&database, &term, limit)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("relational.sqlite");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE users (
                user_id INTEGER PRIMARY KEY,
                username TEXT,
                role TEXT,
                department TEXT
            );
            CREATE TABLE orders (
                order_id INTEGER PRIMARY KEY,
                product_name TEXT,
                amount REAL,
                order_date TIMESTAMP
            );
            INSERT INTO users (username, role, department) VALUES
                ('alice', 'Manager', 'Engineering'),
                ('bob', 'Engineer', 'Engineering'),
                ('carol', 'Manager', 'Sales'),
                ('dave', 'Manager', 'Support'),
                ('erin', 'Analyst', 'Finance');
            INSERT INTO orders (order_id, product_name, amount, order_date) VALUES
                (101, 'Laptop', 1299.5, '2024-02-10'),
                (102, 'Laptop Stand', 45, '2024-02-11'),
                (103, 'Monitor', 310.25, '2024-03-01'),
                (104, 'Desk Lamp', NULL, '2024-02-10 13:45:00'),
                (105, 'Desk Chair', 189, NULL);
            "#,
        )
        .unwrap();
        (temp, path)
    }

    #[tokio::test]
    async fn test_user_lines_in_field_order() {
        let (_temp, path) = fixture();
        let source = UserSource::new(&path);

        let result = source.fetch("finance", 3).await;
        assert_eq!(
            result,
            SourceResult::Records(vec![
                "PG_USER: Username: erin, Role: Analyst, Department: Finance".to_string()
            ])
        );
    }

    #[tokio::test]
    async fn test_user_limit_bounds_rows() {
        let (_temp, path) = fixture();
        let source = UserSource::new(&path);

        // "a" matches alice, carol, dave and erin
        let result = source.fetch("a", 3).await;
        assert_eq!(result.record_count(), 3);

        let result = source.fetch_default("MANAGER").await;
        assert_eq!(result.record_count(), 3);
    }

    #[tokio::test]
    async fn test_user_no_match_sentinel() {
        let (_temp, path) = fixture();
        let source = UserSource::new(&path);

        let result = source.fetch("astronaut", 3).await;
        assert_eq!(result, SourceResult::Empty);
        assert_eq!(
            result.render(source.key()),
            "PG_USER: No relevant user data found."
        );
    }

    #[tokio::test]
    async fn test_order_lines() {
        let (_temp, path) = fixture();
        let source = OrderSource::new(&path);

        let result = source.fetch("laptop", 3).await;
        assert_eq!(
            result,
            SourceResult::Records(vec![
                "PG_ORDER: ID: 101, Product: Laptop, Amount: 1299.50, Date: 2024-02-10"
                    .to_string(),
                "PG_ORDER: ID: 102, Product: Laptop Stand, Amount: 45.00, Date: 2024-02-11"
                    .to_string(),
            ])
        );
    }

    #[tokio::test]
    async fn test_order_timestamp_and_missing_values() {
        let (_temp, path) = fixture();
        let source = OrderSource::new(&path);

        let result = source.fetch("desk", 3).await;
        assert_eq!(
            result,
            SourceResult::Records(vec![
                "PG_ORDER: ID: 104, Product: Desk Lamp, Amount: N/A, Date: 2024-02-10 13:45:00"
                    .to_string(),
                "PG_ORDER: ID: 105, Product: Desk Chair, Amount: 189.00, Date: N/A".to_string(),
            ])
        );
    }

    #[test]
    fn test_format_order_date() {
        assert_eq!(
            format_order_date(Value::Text("2024-02-10T08:00:00.250".to_string())),
            "2024-02-10 08:00:00.250"
        );
        assert_eq!(
            format_order_date(Value::Text("2024-02-10".to_string())),
            "2024-02-10"
        );
        assert_eq!(
            format_order_date(Value::Text("last tuesday".to_string())),
            "last tuesday"
        );
        assert_eq!(format_order_date(Value::Null), "N/A");
    }

    #[tokio::test]
    async fn test_zero_limit_is_raised_to_one() {
        let (_temp, path) = fixture();
        let result = OrderSource::new(&path).fetch("laptop", 0).await;
        assert_eq!(result.record_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_database_is_connection_failure() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.sqlite");
        let source = UserSource::new(&path);

        let result = source.fetch("alice", 3).await;
        match &result {
            SourceResult::Failure(cause) => assert!(cause.starts_with("connection failed")),
            other => panic!("Expected failure, got {:?}", other),
        }
        assert!(result
            .render(source.key())
            .starts_with("PG_ERROR: Could not retrieve user data. Error: "));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_missing_table_is_query_failure() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.sqlite");
        Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE unrelated (id INTEGER);")
            .unwrap();

        let result = OrderSource::new(&path).fetch("laptop", 3).await;
        match result {
            SourceResult::Failure(cause) => assert!(cause.starts_with("query failed")),
            other => panic!("Expected failure, got {:?}", other),
        }
    }
}
