use iced::widget::{button, canvas, column, container, row, text, Column};
use iced::{Alignment, Element, Length, Subscription, Task, Theme};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

mod config;
mod error;
mod places;
mod state;
mod swipe;
mod ui;

use config::Config;
use error::{FetchError, Notice};
use places::{FixedLocation, GooglePlaces};
use state::data::Restaurant;
use state::deck::{Deck, DeckEvent, LoadState};
use state::favorites::SavedList;
use state::store::SavedStore;
use swipe::Viewport;
use ui::card::{CardFace, CardStack, DragEvent};

/// Longest time step a single animation frame may take
const MAX_FRAME_STEP: Duration = Duration::from_millis(64);

/// Size the card area starts with, before the first drag reports real bounds
const INITIAL_VIEWPORT: Viewport = Viewport {
    width: 420.0,
    height: 600.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Explore,
    Saved,
}

/// Main application state
struct EatsNearYou {
    config: Config,
    /// The saved restaurants database, shared by both tabs
    store: SavedStore,
    places: GooglePlaces,
    location: FixedLocation,
    deck: Deck,
    saved: SavedList,
    tab: Tab,
    /// Latest message for the user
    notice: Option<Notice>,
    /// Timestamp of the previous animation frame while animating
    last_frame: Option<Instant>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    TabSelected(Tab),
    /// User asked for a fresh set of cards
    Refresh,
    /// Background fetch finished for the given populate token
    Fetched(u64, Result<Vec<Restaurant>, FetchError>),
    Drag(DragEvent),
    SaveTapped,
    /// Animation clock
    Frame(Instant),
    DeleteSaved(String),
    DismissNotice,
}

impl EatsNearYou {
    /// Create a new instance of the application and start the first fetch
    fn new() -> (Self, Task<Message>) {
        let config = Config::load();

        let mut notice = None;
        let store = match open_store(&config) {
            Ok(store) => store,
            Err(err) => {
                error!("Could not open the saved restaurants database: {err}");
                notice = Some(Notice::storage("open the saved restaurants database", &err));
                // Keep going without persistence; the app cannot run without any store
                SavedStore::open_in_memory()
                    .expect("Failed to initialize in-memory database. SQLite is unavailable.")
            }
        };

        let saved_count = store.count().unwrap_or(0);
        info!("Eats Near You started with {saved_count} saved restaurants");
        match store.path() {
            Some(path) => info!("Saved restaurants live in {}", path.display()),
            None => warn!("Saved restaurants are kept in memory for this session only"),
        }

        let mut app = EatsNearYou {
            places: GooglePlaces::new(&config),
            location: FixedLocation(config.location),
            config,
            store,
            deck: Deck::new(INITIAL_VIEWPORT),
            saved: SavedList::new(),
            tab: Tab::Explore,
            notice,
            last_frame: None,
        };

        let task = app.populate(false);
        (app, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TabSelected(tab) => {
                if tab == self.tab {
                    return Task::none();
                }
                self.tab = tab;
                match tab {
                    Tab::Saved => {
                        // The card stack is off screen now
                        self.deck.cancel_animations();
                        self.last_frame = None;
                        if let Err(notice) = self.saved.reload(&self.store) {
                            self.notice = Some(notice);
                        }
                    }
                    Tab::Explore => {}
                }
                Task::none()
            }
            Message::Refresh => {
                if self.deck.load_state() != LoadState::Ready {
                    return Task::none();
                }
                self.populate(true)
            }
            Message::Fetched(token, result) => {
                if let Some(notice) = self.deck.finish_populate(token, result, &self.store) {
                    self.notice = Some(notice);
                }
                self.last_frame = None;
                Task::none()
            }
            Message::Drag(event) => {
                let now = Instant::now();
                match event {
                    DragEvent::Started(viewport) => {
                        self.deck.set_viewport(viewport);
                        self.deck.drag_started();
                    }
                    DragEvent::Moved(translation_x) => self.deck.dragged(translation_x, now),
                    DragEvent::Ended => self.deck.drag_ended(now),
                }
                Task::none()
            }
            Message::SaveTapped => {
                self.deck.save_front();
                Task::none()
            }
            Message::Frame(now) => {
                let dt = self
                    .last_frame
                    .map(|last| now.saturating_duration_since(last).min(MAX_FRAME_STEP))
                    .unwrap_or(Duration::ZERO);
                self.last_frame = Some(now);

                if let Some(event) = self.deck.tick(dt, &self.store) {
                    self.on_deck_event(event);
                }
                if !self.deck.is_animating() {
                    self.last_frame = None;
                }
                Task::none()
            }
            Message::DeleteSaved(id) => {
                if let Err(notice) = self.saved.remove(&self.store, &id) {
                    self.notice = Some(notice);
                }
                Task::none()
            }
            Message::DismissNotice => {
                self.notice = None;
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let tabs = row![
            tab_button("Explore", Tab::Explore, self.tab),
            tab_button("Saved", Tab::Saved, self.tab),
        ]
        .spacing(10);

        let body = match self.tab {
            Tab::Explore => self.explore_view(),
            Tab::Saved => column![
                text("Your Saved Restaurants").size(24),
                ui::saved::view(self.saved.items()),
            ]
            .spacing(12)
            .height(Length::Fill)
            .into(),
        };

        let mut content: Column<Message> = column![tabs].spacing(16).padding(16);
        if let Some(notice) = &self.notice {
            content = content.push(notice_banner(notice));
        }
        content = content.push(body);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn explore_view(&self) -> Element<Message> {
        let load = self.deck.load_state();

        let refresh_label = if load == LoadState::Refreshing {
            "Refreshing..."
        } else {
            "Refresh"
        };
        let header = row![
            text("Eats Near You!").size(32).width(Length::Fill),
            button(refresh_label)
                .on_press_maybe((load == LoadState::Ready).then_some(Message::Refresh))
                .padding(10),
        ]
        .align_y(Alignment::Center);

        let stack: Element<Message> = if load == LoadState::Loading {
            container(text("Finding restaurants near you...").size(18))
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into()
        } else if self.deck.is_empty() {
            container(text("No more restaurants. Pull a fresh batch with Refresh.").size(18))
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into()
        } else {
            let cards = self
                .deck
                .visible()
                .into_iter()
                .map(|(_, restaurant, presentation)| CardFace::new(restaurant, presentation))
                .collect();
            canvas(CardStack { cards })
                .width(Length::Fill)
                .height(Length::Fill)
                .into()
        };

        let actions = row![
            button("★ Save")
                .on_press_maybe((!self.deck.is_empty()).then_some(Message::SaveTapped))
                .padding(10),
            text(format!("{} left", self.deck.len())).size(14),
        ]
        .spacing(16)
        .align_y(Alignment::Center);

        column![header, stack, actions]
            .spacing(12)
            .height(Length::Fill)
            .into()
    }

    /// Frames only tick while the front card is animating
    fn subscription(&self) -> Subscription<Message> {
        if self.tab == Tab::Explore && self.deck.is_animating() {
            iced::window::frames().map(Message::Frame)
        } else {
            Subscription::none()
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// Kick off a population of the deck in the background; `refresh` is a
    /// user-requested reload rather than the first load
    fn populate(&mut self, refresh: bool) -> Task<Message> {
        let token = self.deck.begin_populate(refresh);
        let source = self.places.clone();
        let location = self.location;
        let timeout = self.config.fetch_timeout;

        Task::perform(
            async move { places::discover(&location, &source, timeout).await },
            move |result| Message::Fetched(token, result),
        )
    }

    fn on_deck_event(&mut self, event: DeckEvent) {
        match event {
            DeckEvent::Dismissed(restaurant) => {
                info!("Passed on {}", restaurant.title);
            }
            DeckEvent::Saved(restaurant) => {
                info!("Saved restaurant: {}", restaurant.title);
            }
            DeckEvent::SaveFailed(notice) => {
                self.notice = Some(notice);
            }
        }
    }
}

fn open_store(config: &Config) -> Result<SavedStore, error::StoreError> {
    match config.db_path.clone().or_else(SavedStore::default_path) {
        Some(path) => SavedStore::open(path),
        None => SavedStore::open_in_memory(),
    }
}

fn tab_button(label: &str, tab: Tab, current: Tab) -> Element<'_, Message> {
    let base = button(text(label)).padding(8);
    if tab == current {
        base.style(button::primary).into()
    } else {
        base.style(button::secondary)
            .on_press(Message::TabSelected(tab))
            .into()
    }
}

fn notice_banner(notice: &Notice) -> Element<'_, Message> {
    let title = if notice.is_error() {
        format!("⚠ {}", notice.title)
    } else {
        notice.title.clone()
    };

    row![
        column![text(title).size(16), text(&notice.message).size(14)]
            .spacing(4)
            .width(Length::Fill),
        button("OK").on_press(Message::DismissNotice).padding(6),
    ]
    .spacing(12)
    .align_y(Alignment::Center)
    .into()
}

fn main() -> iced::Result {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    iced::application("Eats Near You", EatsNearYou::update, EatsNearYou::view)
        .subscription(EatsNearYou::subscription)
        .theme(EatsNearYou::theme)
        .window_size((440.0, 820.0))
        .centered()
        .run_with(EatsNearYou::new)
}
