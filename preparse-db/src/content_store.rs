//! Content table storage for field values.
//!
//! The `content` table holds one row per element. Each field adds a
//! `field_<handle>` column declared with its SQL type; the `field_columns`
//! table remembers which columns exist and the type they were created with.

use preparse_model::{ColumnType, Element, FieldConfiguration};
use preparse_types::{ElementId, FieldValue};
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::error::{StorageError, StorageResult};

/// Name of the content column holding a field's value.
pub fn field_column_name(handle: &str) -> String {
    format!("field_{handle}")
}

/// Persistent store for element field values backed by SQLite.
#[derive(Clone)]
pub struct ContentStore {
    conn: Arc<Mutex<Connection>>,
}

impl ContentStore {
    /// Opens (or creates) a content store at the given path.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let store = Self::from_connection(Connection::open(path)?)?;
        info!("Opened content store at {:?}", path);
        Ok(store)
    }

    /// Opens an in-memory content store.
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StorageResult<()> {
        let conn = self.conn()?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS content (
                element_id TEXT PRIMARY KEY
            );

            CREATE TABLE IF NOT EXISTS field_columns (
                handle TEXT PRIMARY KEY,
                column_type TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    // ── Columns ──────────────────────────────────────────────────

    /// Adds the content column for a field if it does not exist yet.
    ///
    /// Returns `true` when a column was added. SQLite cannot change the type
    /// of an existing column, so a differing `column` is logged and ignored.
    pub fn ensure_field_column(
        &self,
        config: &FieldConfiguration,
        column: ColumnType,
    ) -> StorageResult<bool> {
        config.validate()?;
        let mut conn = self.conn()?;
        let sql_type = column.sql_type();

        if let Some(existing) = column_type_of(&conn, &config.handle)? {
            if existing != sql_type {
                warn!(
                    handle = %config.handle,
                    existing = %existing,
                    requested = %sql_type,
                    "Field column already exists with a different type; keeping it"
                );
            }
            return Ok(false);
        }

        let tx = conn.transaction()?;
        tx.execute(
            &format!(
                "ALTER TABLE content ADD COLUMN \"{}\" {}",
                field_column_name(&config.handle),
                sql_type
            ),
            [],
        )?;
        tx.execute(
            "INSERT INTO field_columns (handle, column_type) VALUES (?1, ?2)",
            params![config.handle, sql_type],
        )?;
        tx.commit()?;

        info!(handle = %config.handle, column = %sql_type, "Added field column");
        Ok(true)
    }

    /// SQL type the field's column was created with.
    pub fn column_type(&self, handle: &str) -> StorageResult<Option<String>> {
        let conn = self.conn()?;
        column_type_of(&conn, handle)
    }

    /// Handles of every field with a content column, sorted.
    pub fn field_handles(&self) -> StorageResult<Vec<String>> {
        let conn = self.conn()?;
        field_handles_of(&conn)
    }

    // ── Values ───────────────────────────────────────────────────

    /// Writes one field value for an element, creating the row if needed.
    pub fn save_value(&self, element_id: ElementId, handle: &str, value: &Value) -> StorageResult<()> {
        let conn = self.conn()?;
        require_column(&conn, handle)?;
        upsert(&conn, element_id, handle, to_sql_value(value)?)?;
        debug!(element = %element_id, handle, "Saved field value");
        Ok(())
    }

    /// Writes every field of the element that has a content column.
    ///
    /// Returns the handles that were written. Keys of the element's data
    /// without a column are left alone.
    pub fn save_element(&self, element: &Element) -> StorageResult<Vec<String>> {
        let mut conn = self.conn()?;
        let handles = field_handles_of(&conn)?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT OR IGNORE INTO content (element_id) VALUES (?1)",
            params![element.id.to_string()],
        )?;

        let mut written = Vec::new();
        for handle in handles {
            if let Some(value) = element.field(&handle) {
                upsert(&tx, element.id, &handle, to_sql_value(value)?)?;
                written.push(handle);
            }
        }
        tx.commit()?;

        debug!(element = %element.id, fields = written.len(), "Saved element content");
        Ok(written)
    }

    /// Reads one field value. `None` when the element has no content row.
    pub fn load_value(&self, element_id: ElementId, handle: &str) -> StorageResult<Option<Value>> {
        let conn = self.conn()?;
        require_column(&conn, handle)?;
        let sql = format!(
            "SELECT \"{}\" FROM content WHERE element_id = ?1",
            field_column_name(handle)
        );
        let stored = conn
            .query_row(&sql, params![element_id.to_string()], |row| row.get::<_, SqlValue>(0))
            .optional()?;
        stored.map(from_sql_value).transpose()
    }

    /// Reads every field value of an element, keyed by handle.
    pub fn load_values(&self, element_id: ElementId) -> StorageResult<Option<Map<String, Value>>> {
        let conn = self.conn()?;
        let handles = field_handles_of(&conn)?;
        let mut columns = vec!["element_id".to_string()];
        columns.extend(handles.iter().map(|h| format!("\"{}\"", field_column_name(h))));
        let sql = format!("SELECT {} FROM content WHERE element_id = ?1", columns.join(", "));

        let row = conn
            .query_row(&sql, params![element_id.to_string()], |row| {
                (1..=handles.len())
                    .map(|i| row.get::<_, SqlValue>(i))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })
            .optional()?;

        let Some(stored) = row else {
            return Ok(None);
        };
        let mut values = Map::new();
        for (handle, value) in handles.into_iter().zip(stored) {
            values.insert(handle, from_sql_value(value)?);
        }
        Ok(Some(values))
    }

    /// Reads a datetime column back as a typed value.
    ///
    /// `None` when the element has no content row; SQL null reads as
    /// `FieldValue::Null`. Anything other than the storage datetime format is
    /// an error.
    pub fn load_datetime(&self, element_id: ElementId, handle: &str) -> StorageResult<Option<FieldValue>> {
        let Some(stored) = self.load_value(element_id, handle)? else {
            return Ok(None);
        };
        match stored {
            Value::Null => Ok(Some(FieldValue::Null)),
            Value::String(s) => Ok(Some(FieldValue::from_storage_datetime(&s)?)),
            other => Err(StorageError::InvalidData(format!(
                "field '{handle}' holds {other}, not a stored datetime"
            ))),
        }
    }

    /// Ids of every element with a content row, oldest first.
    pub fn element_ids(&self) -> StorageResult<Vec<ElementId>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT element_id FROM content ORDER BY element_id")?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.iter()
            .map(|id| ElementId::parse(id).map_err(StorageError::from))
            .collect()
    }

    /// Removes an element's content row. Returns whether a row existed.
    pub fn delete_element(&self, element_id: ElementId) -> StorageResult<bool> {
        let conn = self.conn()?;
        let removed = conn.execute(
            "DELETE FROM content WHERE element_id = ?1",
            params![element_id.to_string()],
        )?;
        Ok(removed > 0)
    }
}

fn column_type_of(conn: &Connection, handle: &str) -> StorageResult<Option<String>> {
    Ok(conn
        .query_row(
            "SELECT column_type FROM field_columns WHERE handle = ?1",
            params![handle],
            |row| row.get(0),
        )
        .optional()?)
}

fn field_handles_of(conn: &Connection) -> StorageResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT handle FROM field_columns ORDER BY handle")?;
    let handles = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(handles)
}

// Column names are interpolated into SQL, so only registered handles pass.
fn require_column(conn: &Connection, handle: &str) -> StorageResult<()> {
    match column_type_of(conn, handle)? {
        Some(_) => Ok(()),
        None => Err(StorageError::UnknownField(handle.to_string())),
    }
}

fn upsert(conn: &Connection, element_id: ElementId, handle: &str, value: SqlValue) -> StorageResult<()> {
    let column = field_column_name(handle);
    let sql = format!(
        "INSERT INTO content (element_id, \"{column}\") VALUES (?1, ?2)
         ON CONFLICT(element_id) DO UPDATE SET \"{column}\" = excluded.\"{column}\""
    );
    conn.execute(&sql, params![element_id.to_string(), value])?;
    Ok(())
}

fn to_sql_value(value: &Value) -> StorageResult<SqlValue> {
    Ok(match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => SqlValue::Text(serde_json::to_string(value)?),
    })
}

fn from_sql_value(value: SqlValue) -> StorageResult<Value> {
    match value {
        SqlValue::Null => Ok(Value::Null),
        SqlValue::Integer(i) => Ok(Value::from(i)),
        SqlValue::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .ok_or_else(|| StorageError::InvalidData(format!("non-finite number {f}"))),
        SqlValue::Text(s) => Ok(Value::String(s)),
        SqlValue::Blob(b) => Err(StorageError::InvalidData(format!(
            "unexpected {} byte blob in content column",
            b.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_scalars_map_to_sqlite_values() {
        assert_eq!(to_sql_value(&json!(null)).unwrap(), SqlValue::Null);
        assert_eq!(to_sql_value(&json!(true)).unwrap(), SqlValue::Integer(1));
        assert_eq!(to_sql_value(&json!(7)).unwrap(), SqlValue::Integer(7));
        assert_eq!(to_sql_value(&json!(2.5)).unwrap(), SqlValue::Real(2.5));
        assert_eq!(to_sql_value(&json!("x")).unwrap(), SqlValue::Text("x".into()));
        assert_eq!(
            to_sql_value(&json!(["a", 1])).unwrap(),
            SqlValue::Text(r#"["a",1]"#.into())
        );
    }

    #[test]
    fn blobs_are_rejected() {
        assert!(matches!(
            from_sql_value(SqlValue::Blob(vec![1, 2])),
            Err(StorageError::InvalidData(_))
        ));
    }

    #[test]
    fn column_names_are_prefixed() {
        assert_eq!(field_column_name("summary"), "field_summary");
    }
}
