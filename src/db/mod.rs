use crate::errors::{AppError, AppResult};
use crate::lunch::{LunchRow, LunchSuggestionSource};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};
use std::fs;
use std::path::Path;
use std::sync::Mutex;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Read side of the hosted lunch-suggestions collection.
#[derive(Debug)]
pub struct LunchStore {
    conn: Mutex<Connection>,
}

impl LunchStore {
    pub fn open(path: &Path) -> AppResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| AppError::Store(err.to_string()))?;
        }
        let conn = Connection::open(path).map_err(AppError::from)?;
        Self::with_connection(conn)
    }

    pub fn in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory().map_err(AppError::from)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> AppResult<Self> {
        conn.execute_batch(SCHEMA_SQL).map_err(AppError::from)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Internal("database mutex poisoned".to_string()))
    }

    /// Seeds rows. The app itself never writes to this collection.
    pub fn insert(&self, row: &LunchRow) -> AppResult<()> {
        let ingredients_json = serde_json::to_string(&row.ingredients)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO lunch_suggestions (
               id, type, title, description, image_url, price, delivery_time,
               restaurant, ingredients_json, instructions, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                row.id,
                row.kind,
                row.title,
                row.description,
                row.image_url,
                row.price,
                row.delivery_time,
                row.restaurant,
                ingredients_json,
                row.instructions,
                format_timestamp(row.created_at),
            ],
        )?;
        Ok(())
    }

    pub fn seed(&self, rows: &[LunchRow]) -> AppResult<usize> {
        for row in rows {
            self.insert(row)?;
        }
        Ok(rows.len())
    }

    pub fn recent(&self, limit: usize) -> AppResult<Vec<LunchRow>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, type, title, description, image_url, price, delivery_time,
                    restaurant, ingredients_json, instructions, created_at
             FROM lunch_suggestions
             ORDER BY created_at DESC
             LIMIT ?1",
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(params![limit], map_lunch_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

impl LunchSuggestionSource for LunchStore {
    fn recent(&self, limit: usize) -> AppResult<Vec<LunchRow>> {
        LunchStore::recent(self, limit)
    }
}

fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .unwrap_or_else(|error| {
            tracing::warn!(value = %value, error = %error, "unparseable lunch row timestamp");
            DateTime::<Utc>::default()
        })
}

fn map_lunch_row(row: &Row<'_>) -> rusqlite::Result<LunchRow> {
    let ingredients_json: Option<String> = row.get(8)?;
    let created_at: String = row.get(10)?;
    let ingredients = ingredients_json
        .as_deref()
        .and_then(|raw| serde_json::from_str::<Vec<String>>(raw).ok())
        .unwrap_or_default();

    Ok(LunchRow {
        id: row.get(0)?,
        kind: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        image_url: row.get(4)?,
        price: row.get(5)?,
        delivery_time: row.get(6)?,
        restaurant: row.get(7)?,
        ingredients,
        instructions: row.get(9)?,
        created_at: parse_timestamp(&created_at),
    })
}

#[cfg(test)]
mod tests {
    use super::LunchStore;
    use crate::lunch::LunchRow;
    use chrono::{Duration, Utc};

    fn row(id: &str, minutes_ago: i64) -> LunchRow {
        LunchRow {
            id: id.to_string(),
            kind: None,
            title: Some(format!("Row {}", id)),
            description: None,
            image_url: None,
            price: Some("$9.99".to_string()),
            delivery_time: None,
            restaurant: None,
            ingredients: vec!["bread".to_string()],
            instructions: None,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[test]
    fn recent_orders_newest_first_and_limits() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LunchStore::open(&dir.path().join("lunch.db")).expect("open store");
        store
            .seed(&[row("old", 90), row("newest", 1), row("mid", 30), row("older", 60)])
            .expect("seed rows");

        let rows = store.recent(3).expect("query");
        let ids = rows.iter().map(|row| row.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["newest", "mid", "older"]);
        assert_eq!(rows[0].ingredients, vec!["bread".to_string()]);
        assert!(rows[0].kind.is_none());
    }

    #[test]
    fn empty_store_returns_no_rows() {
        let store = LunchStore::in_memory().expect("memory store");
        assert!(store.recent(3).expect("query").is_empty());
    }
}
