use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::data::Restaurant;
use super::queue::{CardKey, CardQueue};
use super::store::SavedStore;
use crate::error::{FetchError, Notice};
use crate::swipe::{Presentation, SwipeCard, SwipeOutcome, Viewport};

/// How many cards are drawn at once
pub const VISIBLE_CARDS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Ready,
    /// First population, nothing to show yet
    Loading,
    /// Manual refresh; the old cards stay up until the result arrives
    Refreshing,
}

/// What finishing the front card did to the application state
#[derive(Debug, Clone, PartialEq)]
pub enum DeckEvent {
    Dismissed(Restaurant),
    Saved(Restaurant),
    /// The card was kept because it couldn't be stored
    SaveFailed(Notice),
}

/// The card stack: the queue of undecided restaurants plus the swipe state of
/// the front card.
///
/// Animations only talk to the queue and the store through the outcome that
/// [`Deck::tick`] collects.
#[derive(Debug)]
pub struct Deck {
    queue: CardQueue,
    front: Option<(CardKey, SwipeCard)>,
    viewport: Viewport,
    load: LoadState,
    generation: u64,
}

impl Deck {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            queue: CardQueue::new(),
            front: None,
            viewport,
            load: LoadState::Ready,
            generation: 0,
        }
    }

    pub fn load_state(&self) -> LoadState {
        self.load
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn queue(&self) -> &CardQueue {
        &self.queue
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if let Some((_, card)) = self.front.as_mut() {
            card.set_viewport(viewport);
        }
    }

    /// Start the first load, or a user refresh when `refresh` is set. The
    /// returned token must accompany the result; anything older than the
    /// latest token is ignored.
    pub fn begin_populate(&mut self, refresh: bool) -> u64 {
        self.generation += 1;
        self.load = if refresh {
            LoadState::Refreshing
        } else {
            LoadState::Loading
        };
        debug!(generation = self.generation, load = ?self.load, "Populating deck");
        self.generation
    }

    /// Apply a fetch result, filtered against what is already saved.
    ///
    /// Returns a notice for the user when there is something to say.
    pub fn finish_populate(
        &mut self,
        token: u64,
        result: Result<Vec<Restaurant>, FetchError>,
        store: &SavedStore,
    ) -> Option<Notice> {
        if token != self.generation {
            debug!(token, current = self.generation, "Dropping stale fetch result");
            return None;
        }
        self.load = LoadState::Ready;
        self.drop_front();

        let candidates = match result {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!("Fetching restaurants failed: {err}");
                self.queue.clear();
                return Some(Notice::from(&err));
            }
        };

        let saved = match store.saved_ids() {
            Ok(saved) => saved,
            Err(err) => {
                warn!("Reading saved restaurants failed: {err}");
                self.queue.clear();
                return Some(Notice::storage("load saved restaurants", &err));
            }
        };

        let fetched = candidates.len();
        let kept = self.queue.replace(candidates, &saved);
        info!("Deck populated with {kept} of {fetched} restaurants");

        if kept == 0 {
            Some(Notice::no_results())
        } else {
            None
        }
    }

    /// Cards to draw, front first, with the front card's live presentation
    pub fn visible(&self) -> Vec<(CardKey, &Restaurant, Presentation)> {
        self.queue
            .visible(VISIBLE_CARDS)
            .map(|(key, restaurant)| {
                let presentation = match &self.front {
                    Some((front_key, card)) if *front_key == key => card.presentation(),
                    _ => Presentation::resting(),
                };
                (key, restaurant, presentation)
            })
            .collect()
    }

    pub fn is_animating(&self) -> bool {
        self.front
            .as_ref()
            .is_some_and(|(_, card)| card.is_animating())
    }

    pub fn drag_started(&mut self) -> bool {
        self.front_card().is_some_and(|card| card.begin_drag())
    }

    pub fn dragged(&mut self, translation_x: f32, at: Instant) {
        if let Some(card) = self.front_card() {
            card.drag_to(translation_x, at);
        }
    }

    pub fn drag_ended(&mut self, at: Instant) {
        if let Some(card) = self.front_card() {
            card.end_drag(at);
        }
    }

    /// Save tapped on the front card
    pub fn save_front(&mut self) -> bool {
        self.front_card().is_some_and(|card| card.save())
    }

    /// Advance the front card's animations and apply its outcome, if any.
    pub fn tick(&mut self, dt: Duration, store: &SavedStore) -> Option<DeckEvent> {
        let outcome = self.front.as_mut()?.1.tick(dt)?;
        self.apply_outcome(outcome, store)
    }

    /// Stop the front card's animations, e.g. when the stack is torn down
    pub fn cancel_animations(&mut self) {
        self.drop_front();
    }

    fn apply_outcome(&mut self, outcome: SwipeOutcome, store: &SavedStore) -> Option<DeckEvent> {
        self.front = None;

        match outcome {
            SwipeOutcome::Dismissed => {
                let restaurant = self.queue.pop_front()?;
                debug!(id = %restaurant.id, "Dismissed {}", restaurant.title);
                Some(DeckEvent::Dismissed(restaurant))
            }
            SwipeOutcome::Saved => {
                if let Err(err) = store.upsert(self.queue.front()?) {
                    warn!("Saving restaurant failed: {err}");
                    // Queue untouched; the front card comes back as a fresh one
                    return Some(DeckEvent::SaveFailed(Notice::storage(
                        "save the restaurant",
                        &err,
                    )));
                }
                let restaurant = self.queue.pop_front()?;
                info!(id = %restaurant.id, "Saved {}", restaurant.title);
                Some(DeckEvent::Saved(restaurant))
            }
        }
    }

    /// The swipe state for the current front card, created on first use and
    /// replaced whenever the front changes.
    fn front_card(&mut self) -> Option<&mut SwipeCard> {
        let key = self.queue.front_key()?;
        let stale = self
            .front
            .as_ref()
            .map_or(true, |(front_key, _)| *front_key != key);
        if stale {
            self.drop_front();
            self.front = Some((key, SwipeCard::new(self.viewport)));
        }
        self.front.as_mut().map(|(_, card)| card)
    }

    fn drop_front(&mut self) {
        if let Some((_, mut card)) = self.front.take() {
            card.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn restaurant(id: &str) -> Restaurant {
        Restaurant::new(id, format!("Restaurant {id}"), "somewhere", "img")
    }

    fn deck_with(ids: &[&str], store: &SavedStore) -> Deck {
        let mut deck = Deck::new(Viewport::new(400.0, 800.0));
        let token = deck.begin_populate(false);
        let notice = deck.finish_populate(
            token,
            Ok(ids.iter().map(|id| restaurant(id)).collect()),
            store,
        );
        assert!(notice.is_none());
        deck
    }

    fn queued(deck: &Deck) -> Vec<String> {
        deck.queue().iter().map(|r| r.id.clone()).collect()
    }

    fn run(deck: &mut Deck, store: &SavedStore) -> Vec<DeckEvent> {
        let mut events = Vec::new();
        for _ in 0..2000 {
            events.extend(deck.tick(FRAME, store));
        }
        events
    }

    #[test]
    fn test_swipe_past_threshold_dismisses_front() {
        let store = SavedStore::open_in_memory().unwrap();
        let mut deck = deck_with(&["a", "b", "c"], &store);

        assert!(deck.drag_started());
        deck.dragged(-200.0, Instant::now());
        deck.drag_ended(Instant::now());

        let events = run(&mut deck, &store);
        assert_eq!(events, vec![DeckEvent::Dismissed(restaurant("a"))]);
        assert_eq!(queued(&deck), vec!["b", "c"]);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_save_stores_and_pops() {
        let store = SavedStore::open_in_memory().unwrap();
        let mut deck = deck_with(&["a", "b"], &store);

        assert!(deck.save_front());
        let events = run(&mut deck, &store);

        assert_eq!(events, vec![DeckEvent::Saved(restaurant("a"))]);
        assert_eq!(queued(&deck), vec!["b"]);
        assert_eq!(store.list_all().unwrap(), vec![restaurant("a")]);
    }

    #[test]
    fn test_failed_save_keeps_card() {
        let store = SavedStore::open_in_memory().unwrap();
        let mut deck = deck_with(&["a", "b"], &store);
        store.drop_table();

        assert!(deck.save_front());
        let events = run(&mut deck, &store);

        assert_eq!(events.len(), 1);
        match &events[0] {
            DeckEvent::SaveFailed(notice) => assert!(notice.is_error()),
            other => panic!("expected a failed save, got {other:?}"),
        }
        assert_eq!(deck.len(), 2);
        assert_eq!(queued(&deck), vec!["a", "b"]);
        assert!(!deck.is_animating());
        assert!(deck.save_front(), "the same card can be saved again");
    }

    #[test]
    fn test_snap_back_changes_nothing() {
        let store = SavedStore::open_in_memory().unwrap();
        let mut deck = deck_with(&["a", "b"], &store);

        deck.drag_started();
        deck.dragged(-20.0, Instant::now());
        deck.drag_ended(Instant::now() + Duration::from_secs(1));

        assert!(run(&mut deck, &store).is_empty());
        assert_eq!(queued(&deck), vec!["a", "b"]);
        assert!(!deck.is_animating());
    }

    #[test]
    fn test_populate_skips_saved() {
        let store = SavedStore::open_in_memory().unwrap();
        store.upsert(&restaurant("b")).unwrap();

        let deck = deck_with(&["a", "b", "c"], &store);
        assert_eq!(queued(&deck), vec!["a", "c"]);
    }

    #[test]
    fn test_empty_result_is_informational() {
        let store = SavedStore::open_in_memory().unwrap();
        let mut deck = Deck::new(Viewport::new(400.0, 800.0));
        let token = deck.begin_populate(false);
        assert_eq!(deck.load_state(), LoadState::Loading);

        let notice = deck.finish_populate(token, Ok(Vec::new()), &store).unwrap();
        assert!(!notice.is_error());
        assert!(deck.is_empty());
        assert_eq!(deck.load_state(), LoadState::Ready);
    }

    #[test]
    fn test_fetch_failure_empties_queue() {
        let store = SavedStore::open_in_memory().unwrap();
        let mut deck = deck_with(&["a"], &store);

        let token = deck.begin_populate(true);
        assert_eq!(deck.load_state(), LoadState::Refreshing);
        let notice = deck
            .finish_populate(token, Err(FetchError::Network("offline".into())), &store)
            .unwrap();

        assert!(notice.is_error());
        assert!(deck.is_empty());
        assert_eq!(deck.load_state(), LoadState::Ready);
    }

    #[test]
    fn test_refresh_of_empty_deck_reports_refreshing() {
        let store = SavedStore::open_in_memory().unwrap();
        let mut deck = Deck::new(Viewport::new(400.0, 800.0));
        let token = deck.begin_populate(false);
        deck.finish_populate(token, Err(FetchError::Timeout), &store);
        assert!(deck.is_empty());

        // Nothing on screen, but the user asked for it
        let token = deck.begin_populate(true);
        assert_eq!(deck.load_state(), LoadState::Refreshing);

        deck.finish_populate(token, Ok(vec![restaurant("a")]), &store);
        assert_eq!(deck.load_state(), LoadState::Ready);
        assert_eq!(queued(&deck), vec!["a"]);
    }

    #[test]
    fn test_stale_result_is_ignored() {
        let store = SavedStore::open_in_memory().unwrap();
        let mut deck = Deck::new(Viewport::new(400.0, 800.0));

        let old = deck.begin_populate(false);
        let new = deck.begin_populate(true);
        assert!(deck
            .finish_populate(new, Ok(vec![restaurant("fresh")]), &store)
            .is_none());
        assert!(deck
            .finish_populate(old, Ok(vec![restaurant("stale")]), &store)
            .is_none());

        assert_eq!(queued(&deck), vec!["fresh"]);
    }

    #[test]
    fn test_refresh_cancels_card_in_flight() {
        let store = SavedStore::open_in_memory().unwrap();
        let mut deck = deck_with(&["a", "b"], &store);

        deck.save_front();
        deck.tick(FRAME, &store);

        let token = deck.begin_populate(true);
        deck.finish_populate(token, Ok(vec![restaurant("a"), restaurant("c")]), &store);

        assert!(run(&mut deck, &store).is_empty());
        assert_eq!(store.count().unwrap(), 0);
        assert_eq!(queued(&deck), vec!["a", "c"]);
    }

    #[test]
    fn test_visible_uses_front_presentation() {
        let store = SavedStore::open_in_memory().unwrap();
        let mut deck = deck_with(&["a", "b", "c", "d"], &store);

        deck.drag_started();
        deck.dragged(-50.0, Instant::now());

        let visible = deck.visible();
        assert_eq!(visible.len(), VISIBLE_CARDS);
        assert_eq!(visible[0].2.translate_x(), -50.0);
        assert_eq!(visible[1].2, Presentation::resting());
    }

    #[test]
    fn test_nothing_to_swipe_on_empty_deck() {
        let store = SavedStore::open_in_memory().unwrap();
        let mut deck = Deck::new(Viewport::new(400.0, 800.0));
        assert!(!deck.drag_started());
        assert!(!deck.save_front());
        assert!(deck.tick(FRAME, &store).is_none());
    }
}
