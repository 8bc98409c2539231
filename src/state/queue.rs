use std::collections::{HashSet, VecDeque};

use super::data::Restaurant;

/// Identity of a card on screen.
///
/// The ordinal keeps counting up as cards are popped, so two different
/// candidates never share a key even if one replaces the other in the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardKey {
    pub id: String,
    pub ordinal: u64,
}

/// Undecided candidates, front first.
///
/// Only ever shrinks from the front; a refresh replaces the whole sequence.
#[derive(Debug, Default)]
pub struct CardQueue {
    cards: VecDeque<Restaurant>,
    popped: u64,
}

impl CardQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the queue with `candidates`, skipping anything already saved.
    /// Returns how many candidates were kept.
    pub fn replace(&mut self, candidates: Vec<Restaurant>, saved: &HashSet<String>) -> usize {
        self.cards = candidates
            .into_iter()
            .filter(|candidate| !saved.contains(&candidate.id))
            .collect();
        self.cards.len()
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn front(&self) -> Option<&Restaurant> {
        self.cards.front()
    }

    pub fn pop_front(&mut self) -> Option<Restaurant> {
        let card = self.cards.pop_front()?;
        self.popped += 1;
        Some(card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Restaurant> {
        self.cards.iter()
    }

    /// Key of the front card, if any
    pub fn front_key(&self) -> Option<CardKey> {
        self.front().map(|card| CardKey {
            id: card.id.clone(),
            ordinal: self.popped,
        })
    }

    /// The first `limit` cards with their render keys
    pub fn visible(&self, limit: usize) -> impl Iterator<Item = (CardKey, &Restaurant)> {
        let popped = self.popped;
        self.cards
            .iter()
            .take(limit)
            .enumerate()
            .map(move |(index, card)| {
                (
                    CardKey {
                        id: card.id.clone(),
                        ordinal: popped + index as u64,
                    },
                    card,
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str) -> Restaurant {
        Restaurant::new(id, id.to_uppercase(), "", "")
    }

    fn ids(queue: &CardQueue) -> Vec<&str> {
        queue.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_pop_front_keeps_order() {
        let mut queue = CardQueue::new();
        queue.replace(vec![card("a"), card("b"), card("c")], &HashSet::new());

        assert_eq!(queue.pop_front().map(|r| r.id), Some("a".to_string()));
        assert_eq!(ids(&queue), vec!["b", "c"]);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_pop_empty_is_noop() {
        let mut queue = CardQueue::new();
        assert!(queue.pop_front().is_none());
        assert_eq!(queue.front_key(), None);
    }

    #[test]
    fn test_replace_filters_saved() {
        let mut queue = CardQueue::new();
        let saved: HashSet<String> = ["b".to_string()].into_iter().collect();
        let kept = queue.replace(vec![card("a"), card("b"), card("c")], &saved);

        assert_eq!(kept, 2);
        assert_eq!(ids(&queue), vec!["a", "c"]);
    }

    #[test]
    fn test_keys_stay_unique_across_pops_and_refresh() {
        let mut queue = CardQueue::new();
        queue.replace(vec![card("a"), card("b")], &HashSet::new());
        let first = queue.front_key().unwrap();
        queue.pop_front();

        // Same id comes back after a refresh: still a new key
        queue.replace(vec![card("a")], &HashSet::new());
        let again = queue.front_key().unwrap();
        assert_eq!(again.id, first.id);
        assert_ne!(again, first);
    }

    #[test]
    fn test_visible_is_capped() {
        let mut queue = CardQueue::new();
        queue.replace(
            vec![card("a"), card("b"), card("c"), card("d")],
            &HashSet::new(),
        );
        queue.pop_front();

        let keys: Vec<_> = queue.visible(2).map(|(key, _)| key).collect();
        assert_eq!(
            keys,
            vec![
                CardKey { id: "b".into(), ordinal: 1 },
                CardKey { id: "c".into(), ordinal: 2 },
            ]
        );
    }
}
