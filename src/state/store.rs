use rusqlite::{params, Connection};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::data::Restaurant;
use crate::error::StoreError;

type Result<T> = std::result::Result<T, StoreError>;

/// The SavedStore manages the SQLite database of saved restaurants.
///
/// One instance is opened at startup and handed by reference to whatever
/// needs it (the deck when a card is saved, the saved list view).
pub struct SavedStore {
    conn: Connection,
    db_path: Option<PathBuf>,
    initialized: bool,
}

impl SavedStore {
    /// Open (or create) the database at `path` and make sure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();

        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(StoreError::CreateDir)?;
            }
        }

        let conn = Connection::open(&db_path)?;
        info!("Database opened at {}", db_path.display());

        let mut store = SavedStore {
            conn,
            db_path: Some(db_path),
            initialized: false,
        };
        store.init()?;

        Ok(store)
    }

    /// A throwaway store, used when the database file cannot be opened.
    pub fn open_in_memory() -> Result<Self> {
        let mut store = SavedStore {
            conn: Connection::open_in_memory()?,
            db_path: None,
            initialized: false,
        };
        store.init()?;
        Ok(store)
    }

    /// Where the database lives when nothing else is configured:
    /// - Linux: ~/.local/share/eats-near-you/restaurants.db
    /// - macOS: ~/Library/Application Support/eats-near-you/restaurants.db
    /// - Windows: %APPDATA%\eats-near-you\restaurants.db
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::data_dir().or_else(dirs::home_dir)?;
        path.push("eats-near-you");
        path.push("restaurants.db");
        Some(path)
    }

    /// Create the table if it doesn't exist. Calling it again is a no-op.
    pub fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS saved_restaurants (
                id      TEXT PRIMARY KEY,
                title   TEXT,
                details TEXT,
                image   TEXT
            )",
            [],
        )?;

        self.initialized = true;
        debug!("Database schema initialized");
        Ok(())
    }

    /// Path to the database file, `None` for an in-memory store
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Insert a restaurant, or overwrite the saved one with the same id.
    ///
    /// An overwritten row keeps its original position in [`list_all`](Self::list_all).
    pub fn upsert(&self, restaurant: &Restaurant) -> Result<()> {
        self.conn.execute(
            "INSERT INTO saved_restaurants (id, title, details, image) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                details = excluded.details,
                image = excluded.image",
            params![
                restaurant.id,
                restaurant.title,
                restaurant.details,
                restaurant.image
            ],
        )?;
        debug!(id = %restaurant.id, "Saved restaurant {}", restaurant.title);
        Ok(())
    }

    /// All saved restaurants in the order they were first saved
    pub fn list_all(&self) -> Result<Vec<Restaurant>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, COALESCE(title, ''), COALESCE(details, ''), COALESCE(image, '')
             FROM saved_restaurants ORDER BY rowid",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Restaurant {
                id: row.get(0)?,
                title: row.get(1)?,
                details: row.get(2)?,
                image: row.get(3)?,
            })
        })?;

        let mut restaurants = Vec::new();
        for restaurant in rows {
            restaurants.push(restaurant?);
        }

        Ok(restaurants)
    }

    /// Remove a saved restaurant. Returns whether anything was deleted.
    pub fn delete_by_id(&self, id: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM saved_restaurants WHERE id = ?1", params![id])?;
        debug!(id, removed, "Deleted saved restaurant");
        Ok(removed > 0)
    }

    /// Identifiers of every saved restaurant
    pub fn saved_ids(&self) -> Result<HashSet<String>> {
        let mut stmt = self.conn.prepare("SELECT id FROM saved_restaurants")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<HashSet<_>, _>>()?;
        Ok(ids)
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM saved_restaurants", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Close the connection, reporting anything SQLite complains about.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, err)| StoreError::Sqlite(err))
    }

    /// Break the schema so every later statement fails
    #[cfg(test)]
    pub(crate) fn drop_table(&self) {
        self.conn
            .execute_batch("DROP TABLE saved_restaurants")
            .expect("drop saved_restaurants");
    }
}

impl std::fmt::Debug for SavedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SavedStore")
            .field("db_path", &self.db_path)
            .field("initialized", &self.initialized)
            .finish()
    }
}
