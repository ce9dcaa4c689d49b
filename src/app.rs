use crate::models::{CardViewModel, DetailViewModel, ListPage, ViewState};
use crossterm::event::KeyCode;

/// Work the event loop must start on behalf of the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Page { url: String },
    Card { index: usize, url: String },
    Detail { key: String },
}

/// A finished load coming back from a background task.
#[derive(Debug)]
pub enum Update {
    Page(ViewState<ListPage>),
    Card {
        index: usize,
        state: ViewState<CardViewModel>,
    },
    Detail {
        key: String,
        state: ViewState<DetailViewModel>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Listing,
    Detail,
}

pub struct CardSlot {
    pub name: String,
    pub url: String,
    pub state: ViewState<CardViewModel>,
}

pub struct App {
    pub cards: Vec<CardSlot>,
    pub visible: Vec<usize>, // indices into cards
    pub selected_visible: usize,
    pub search_mode: bool,
    pub search_query: String,
    /// Status of the most recent listing page request.
    pub listing: ViewState<()>,
    pub next_page: Option<String>,
    pub screen: Screen,
    pub detail_key: Option<String>,
    pub detail: ViewState<DetailViewModel>,
    pub show_help: bool,
    pub should_quit: bool,
    pub tick: usize,
}

impl App {
    pub fn new() -> Self {
        Self {
            cards: Vec::new(),
            visible: Vec::new(),
            selected_visible: 0,
            search_mode: false,
            search_query: String::new(),
            listing: ViewState::Pending,
            next_page: None,
            screen: Screen::Listing,
            detail_key: None,
            detail: ViewState::Pending,
            show_help: false,
            should_quit: false,
            tick: 0,
        }
    }

    pub fn selected_card(&self) -> Option<&CardSlot> {
        self.visible
            .get(self.selected_visible)
            .and_then(|&i| self.cards.get(i))
    }

    pub fn next(&mut self) {
        if !self.visible.is_empty() {
            self.selected_visible = (self.selected_visible + 1) % self.visible.len();
        }
    }

    pub fn previous(&mut self) {
        if !self.visible.is_empty() {
            if self.selected_visible == 0 {
                self.selected_visible = self.visible.len() - 1;
            } else {
                self.selected_visible -= 1;
            }
        }
    }

    pub fn apply_filter(&mut self) {
        let q = self.search_query.to_lowercase();
        if q.is_empty() {
            self.visible = (0..self.cards.len()).collect();
        } else {
            self.visible = self
                .cards
                .iter()
                .enumerate()
                .filter_map(|(i, c)| {
                    let type_hit = c
                        .state
                        .ready()
                        .map(|card| card.primary_type.contains(&q))
                        .unwrap_or(false);
                    if c.name.to_lowercase().contains(&q) || type_hit {
                        Some(i)
                    } else {
                        None
                    }
                })
                .collect();
        }

        if self.visible.is_empty() {
            self.selected_visible = 0;
        } else if self.selected_visible >= self.visible.len() {
            self.selected_visible = self.visible.len() - 1;
        }
    }

    /// Switch to the detail screen for `key`. Any result still in flight for a
    /// previous key is dropped when it arrives.
    pub fn open_detail(&mut self, key: String) -> Request {
        self.screen = Screen::Detail;
        self.detail = ViewState::Pending;
        self.detail_key = Some(key.clone());
        Request::Detail { key }
    }

    pub fn close_detail(&mut self) {
        self.screen = Screen::Listing;
        self.detail_key = None;
        self.detail = ViewState::Pending;
    }

    /// Request the next listing page unless one is already loading.
    pub fn load_more(&mut self) -> Option<Request> {
        if self.listing.is_pending() {
            return None;
        }
        // Kept until a page arrives so a failed load can be retried.
        let url = self.next_page.clone()?;
        self.listing = ViewState::Pending;
        Some(Request::Page { url })
    }

    pub fn apply(&mut self, update: Update) -> Vec<Request> {
        match update {
            Update::Page(ViewState::Ready(page)) => {
                self.listing = ViewState::Ready(());
                self.next_page = page.next;
                let start = self.cards.len();
                self.cards.extend(page.results.into_iter().map(|r| CardSlot {
                    name: r.name,
                    url: r.url,
                    state: ViewState::Pending,
                }));
                self.apply_filter();
                self.cards[start..]
                    .iter()
                    .enumerate()
                    .map(|(i, c)| Request::Card {
                        index: start + i,
                        url: c.url.clone(),
                    })
                    .collect()
            }
            Update::Page(ViewState::Pending) => Vec::new(),
            Update::Page(ViewState::NotFound) => {
                self.listing = ViewState::NotFound;
                Vec::new()
            }
            Update::Page(ViewState::Failed(reason)) => {
                self.listing = ViewState::Failed(reason);
                Vec::new()
            }
            Update::Card { index, state } => {
                if let Some(slot) = self.cards.get_mut(index) {
                    slot.state = state;
                    if !self.search_query.is_empty() {
                        self.apply_filter();
                    }
                }
                Vec::new()
            }
            Update::Detail { key, state } => {
                if self.screen == Screen::Detail && self.detail_key.as_deref() == Some(&key) {
                    self.detail = state;
                }
                Vec::new()
            }
        }
    }

    pub fn on_key(&mut self, code: KeyCode) -> Option<Request> {
        if self.search_mode {
            match code {
                KeyCode::Enter | KeyCode::Esc => self.search_mode = false,
                KeyCode::Backspace => {
                    self.search_query.pop();
                    self.apply_filter();
                }
                KeyCode::Char(c) => {
                    self.search_query.push(c);
                    self.apply_filter();
                }
                _ => {}
            }
            return None;
        }

        match code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::F(1) | KeyCode::Char('h') | KeyCode::Char('?') => {
                self.show_help = !self.show_help;
                None
            }
            _ => match self.screen {
                Screen::Listing => self.on_listing_key(code),
                Screen::Detail => self.on_detail_key(code),
            },
        }
    }

    fn on_listing_key(&mut self, code: KeyCode) -> Option<Request> {
        match code {
            KeyCode::Char('/') => {
                self.search_mode = true;
                self.search_query.clear();
                self.apply_filter();
                None
            }
            KeyCode::Down => {
                self.next();
                None
            }
            KeyCode::Up => {
                self.previous();
                None
            }
            KeyCode::Char('n') => self.load_more(),
            KeyCode::Enter => {
                let name = self.selected_card()?.name.clone();
                Some(self.open_detail(name))
            }
            _ => None,
        }
    }

    fn on_detail_key(&mut self, code: KeyCode) -> Option<Request> {
        match code {
            KeyCode::Esc | KeyCode::Backspace => {
                self.close_detail();
                None
            }
            KeyCode::Left => {
                let prev = self.detail.ready()?.previous.clone()?;
                Some(self.open_detail(prev))
            }
            KeyCode::Right => {
                let next = self.detail.ready()?.next.clone()?;
                Some(self.open_detail(next))
            }
            _ => None,
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
