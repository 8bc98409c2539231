use tracing::{debug, warn};

use super::data::Restaurant;
use super::store::SavedStore;
use crate::error::Notice;

/// The saved restaurants as last read from the store
#[derive(Debug, Default)]
pub struct SavedList {
    items: Vec<Restaurant>,
}

impl SavedList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Restaurant] {
        &self.items
    }

    /// Re-read everything from the store. On failure the previous items stay.
    pub fn reload(&mut self, store: &SavedStore) -> Result<usize, Notice> {
        match store.list_all() {
            Ok(items) => {
                self.items = items;
                debug!("Loaded {} saved restaurants", self.items.len());
                Ok(self.items.len())
            }
            Err(err) => {
                warn!("Error loading saved restaurants: {err}");
                Err(Notice::storage("load saved restaurants", &err))
            }
        }
    }

    /// Delete one restaurant, then reload the list
    pub fn remove(&mut self, store: &SavedStore, id: &str) -> Result<(), Notice> {
        if let Err(err) = store.delete_by_id(id) {
            warn!("Error removing restaurant {id}: {err}");
            return Err(Notice::storage("remove the restaurant", &err));
        }
        self.reload(store).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reload_and_remove() {
        let store = SavedStore::open_in_memory().unwrap();
        store
            .upsert(&Restaurant::new("a", "A", "1 St", "img"))
            .unwrap();
        store
            .upsert(&Restaurant::new("b", "B", "2 St", "img"))
            .unwrap();

        let mut list = SavedList::new();
        assert_eq!(list.reload(&store).unwrap(), 2);

        list.remove(&store, "a").unwrap();
        let ids: Vec<_> = list.items().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);

        // Removing something already gone is fine
        list.remove(&store, "a").unwrap();
        assert_eq!(list.items().len(), 1);
    }

    #[test]
    fn test_sees_restaurants_saved_elsewhere() {
        let store = SavedStore::open_in_memory().unwrap();
        let mut list = SavedList::new();
        list.reload(&store).unwrap();
        assert!(list.items().is_empty());

        store
            .upsert(&Restaurant::new("c", "C", "3 St", "img"))
            .unwrap();
        list.reload(&store).unwrap();
        assert_eq!(list.items().len(), 1);
    }

    #[test]
    fn test_failed_reload_keeps_previous_items() {
        let store = SavedStore::open_in_memory().unwrap();
        store
            .upsert(&Restaurant::new("a", "A", "1 St", "img"))
            .unwrap();
        let mut list = SavedList::new();
        list.reload(&store).unwrap();

        store.drop_table();
        let notice = list.reload(&store).unwrap_err();
        assert!(notice.is_error());
        assert_eq!(list.items(), &[Restaurant::new("a", "A", "1 St", "img")]);
    }

    #[test]
    fn test_failed_remove_reports_error() {
        let store = SavedStore::open_in_memory().unwrap();
        store
            .upsert(&Restaurant::new("a", "A", "1 St", "img"))
            .unwrap();
        let mut list = SavedList::new();
        list.reload(&store).unwrap();

        store.drop_table();
        let notice = list.remove(&store, "a").unwrap_err();
        assert!(notice.is_error());
        assert_eq!(list.items().len(), 1);
    }
}
