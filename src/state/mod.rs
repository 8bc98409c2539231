/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The saved restaurants database (store.rs)
/// - The queue of undecided candidates (queue.rs)
/// - The card stack tying the queue to swipe outcomes (deck.rs)
/// - The saved list view's data (favorites.rs)

pub mod data;
pub mod deck;
pub mod favorites;
pub mod queue;
pub mod store;
