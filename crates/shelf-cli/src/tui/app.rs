//! TUI state and key handling, independent of the terminal.

use super::form::{Focus, SearchForm};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::TableState;
use rusqlite::Connection;
use shelf_core::api::{BookRow, VolumeSource};
use shelf_core::db::{BookFilter, BookSort, books};
use shelf_core::model::{Book, NewBook};

pub const SEARCHING: &str = "Searching…";
pub const NO_RESULTS: &str = "No results";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Search,
    Library,
}

/// What the event loop should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    /// Redraw with [`App::begin_search`] applied, then call [`App::run_search`].
    Search,
    Quit,
}

pub struct App {
    source: Box<dyn VolumeSource>,
    conn: Connection,
    pub view: View,
    pub focus: Focus,
    pub form: SearchForm,
    pub results: Vec<BookRow>,
    pub results_state: TableState,
    pub library: Vec<Book>,
    pub library_state: TableState,
    pub status: String,
}

impl App {
    pub fn new(source: Box<dyn VolumeSource>, conn: Connection) -> Self {
        let mut app = Self {
            source,
            conn,
            view: View::Search,
            focus: Focus::default(),
            form: SearchForm::default(),
            results: Vec::new(),
            results_state: TableState::default(),
            library: Vec::new(),
            library_state: TableState::default(),
            status: String::new(),
        };
        app.refresh_library();
        app.status = match books::count_books(&app.conn) {
            Ok(n) => format!("{n} books in catalog"),
            Err(err) => err.status_label(),
        };
        app
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if key.code == KeyCode::Esc || (ctrl && key.code == KeyCode::Char('c')) {
            return Action::Quit;
        }
        if key.code == KeyCode::F(2) || (ctrl && key.code == KeyCode::Char('l')) {
            self.toggle_view();
            return Action::None;
        }

        match self.view {
            View::Search => self.handle_search_key(key),
            View::Library => self.handle_library_key(key),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return Action::None;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return Action::None;
            }
            _ => {}
        }

        match self.focus {
            Focus::Field(field) => {
                if key.code == KeyCode::Enter {
                    Action::Search
                } else {
                    self.form.edit(field, key);
                    Action::None
                }
            }
            Focus::Results => match key.code {
                KeyCode::Char('q') => Action::Quit,
                KeyCode::Down | KeyCode::Char('j') => {
                    step(&mut self.results_state, self.results.len(), 1);
                    Action::None
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    step(&mut self.results_state, self.results.len(), -1);
                    Action::None
                }
                KeyCode::Enter | KeyCode::Char('s') => {
                    self.save_selected();
                    Action::None
                }
                _ => Action::None,
            },
        }
    }

    fn handle_library_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Down | KeyCode::Char('j') => {
                step(&mut self.library_state, self.library.len(), 1);
                Action::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                step(&mut self.library_state, self.library.len(), -1);
                Action::None
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                self.delete_selected();
                Action::None
            }
            _ => Action::None,
        }
    }

    fn toggle_view(&mut self) {
        self.view = match self.view {
            View::Search => {
                self.refresh_library();
                self.status = format!("{} books in catalog", self.library.len());
                View::Library
            }
            View::Library => View::Search,
        };
    }

    pub fn begin_search(&mut self) {
        self.status = SEARCHING.to_string();
    }

    /// Blocking fetch for the current form contents.
    pub fn run_search(&mut self) {
        let query = self.form.to_query();
        match self.source.search_rows(&query) {
            Ok(rows) if rows.is_empty() => {
                self.results.clear();
                self.results_state.select(None);
                self.status = NO_RESULTS.to_string();
            }
            Ok(rows) => {
                self.status = format!("{} results. Tab to the table, s to save", rows.len());
                self.results = rows;
                self.results_state.select(Some(0));
            }
            Err(err) => {
                tracing::warn!(error = %err, code = %err.error_code(), "tui search failed");
                self.results.clear();
                self.results_state.select(None);
                self.status = err.status_label();
            }
        }
    }

    fn save_selected(&mut self) {
        let Some(row) = self.results_state.selected().and_then(|i| self.results.get(i)) else {
            return;
        };
        match books::insert_book(&self.conn, NewBook::from_row(row)) {
            Ok(book) => {
                self.status = format!("Saved #{} {}", book.id, book.title);
                self.refresh_library();
            }
            Err(err) => self.status = err.status_label(),
        }
    }

    fn delete_selected(&mut self) {
        let Some(id) = self
            .library_state
            .selected()
            .and_then(|i| self.library.get(i))
            .map(|b| b.id)
        else {
            return;
        };
        match books::delete_book(&self.conn, id) {
            Ok(book) => {
                self.status = format!("Removed #{} {}", book.id, book.title);
                self.refresh_library();
            }
            Err(err) => self.status = err.status_label(),
        }
    }

    fn refresh_library(&mut self) {
        let filter = BookFilter {
            sort: BookSort::Added,
            ..BookFilter::default()
        };
        match books::list_books(&self.conn, &filter) {
            Ok(list) => {
                self.library = list;
                let selected = self
                    .library_state
                    .selected()
                    .map(|i| i.min(self.library.len().saturating_sub(1)));
                self.library_state
                    .select(if self.library.is_empty() { None } else { selected.or(Some(0)) });
            }
            Err(err) => self.status = err.status_label(),
        }
    }
}

/// Move a table selection by `delta`, clamped to `len`.
fn step(state: &mut TableState, len: usize, delta: isize) {
    if len == 0 {
        state.select(None);
        return;
    }
    let current = state.selected().unwrap_or(0);
    let next = current.saturating_add_signed(delta).min(len - 1);
    state.select(Some(next));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::form::Field;
    use shelf_core::ShelfError;
    use shelf_core::api::{SearchQuery, Volume, VolumeInfo, VolumesResponse};
    use shelf_core::db::open_catalog_in_memory;

    /// Answers every search with the same volumes, or the same HTTP status.
    struct Canned(Result<Vec<Volume>, u16>);

    impl VolumeSource for Canned {
        fn search(&self, query: &SearchQuery) -> Result<VolumesResponse, ShelfError> {
            if query.is_empty() {
                return Err(ShelfError::EmptyQuery);
            }
            match &self.0 {
                Ok(items) => Ok(VolumesResponse {
                    total_items: items.len() as u64,
                    items: items.clone(),
                }),
                Err(status) => Err(ShelfError::HttpStatus {
                    status: *status,
                    url: "http://books.test/volumes".into(),
                }),
            }
        }
    }

    fn volume(title: &str, author: &str) -> Volume {
        Volume {
            id: format!("id-{title}"),
            volume_info: VolumeInfo {
                title: Some(title.into()),
                authors: vec![author.into()],
                published_date: Some("1818".into()),
                ..VolumeInfo::default()
            },
        }
    }

    fn app_with(source: Canned) -> App {
        App::new(Box::new(source), open_catalog_in_memory().expect("catalog"))
    }

    fn press(app: &mut App, code: KeyCode) -> Action {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn search(app: &mut App) {
        assert_eq!(press(app, KeyCode::Enter), Action::Search);
        app.begin_search();
        assert_eq!(app.status, SEARCHING);
        app.run_search();
    }

    #[test]
    fn starts_on_title_field_with_catalog_count() {
        let app = app_with(Canned(Ok(Vec::new())));
        assert_eq!(app.view, View::Search);
        assert_eq!(app.focus, Focus::Field(Field::Title));
        assert_eq!(app.status, "0 books in catalog");
    }

    #[test]
    fn command_letters_are_text_inside_fields() {
        let mut app = app_with(Canned(Ok(Vec::new())));
        type_text(&mut app, "qsjkd");
        assert_eq!(app.form.value(Field::Title), "qsjkd");
        assert_eq!(app.view, View::Search);
    }

    #[test]
    fn search_then_save_selected_result() {
        let mut app = app_with(Canned(Ok(vec![
            volume("Frankenstein", "Mary Shelley"),
            volume("Dracula", "Bram Stoker"),
        ])));
        type_text(&mut app, "gothic");
        search(&mut app);

        assert_eq!(app.results.len(), 2);
        assert_eq!(app.results_state.selected(), Some(0));

        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focus, Focus::Results);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.results_state.selected(), Some(1));

        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.status, "Saved #1 Dracula");
        assert_eq!(app.library.len(), 1);

        press(&mut app, KeyCode::Char('k'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.library.len(), 2);
    }

    #[test]
    fn empty_result_set_says_no_results() {
        let mut app = app_with(Canned(Ok(Vec::new())));
        type_text(&mut app, "zzzz");
        search(&mut app);
        assert_eq!(app.status, NO_RESULTS);
        assert!(app.results_state.selected().is_none());
    }

    #[test]
    fn failures_name_their_class() {
        let mut app = app_with(Canned(Err(503)));
        type_text(&mut app, "dune");
        search(&mut app);
        assert_eq!(app.status, "API error: HTTP 503");

        let mut app = app_with(Canned(Ok(Vec::new())));
        search(&mut app);
        assert!(app.status.starts_with("search query is empty"));
    }

    #[test]
    fn results_without_author_are_not_saved() {
        let mut app = app_with(Canned(Ok(vec![volume("Anonymous tract", "")])));
        type_text(&mut app, "tract");
        search(&mut app);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::Char('s'));
        assert!(app.status.contains("author is required"));
        assert!(app.library.is_empty());
    }

    #[test]
    fn library_toggle_and_delete() {
        let mut app = app_with(Canned(Ok(vec![volume("Frankenstein", "Mary Shelley")])));
        type_text(&mut app, "frank");
        search(&mut app);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::Char('s'));

        press(&mut app, KeyCode::F(2));
        assert_eq!(app.view, View::Library);
        assert_eq!(app.library_state.selected(), Some(0));

        press(&mut app, KeyCode::Char('d'));
        assert!(app.library.is_empty());
        assert_eq!(app.status, "Removed #1 Frankenstein");
        assert!(app.library_state.selected().is_none());

        app.handle_key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL));
        assert_eq!(app.view, View::Search);
    }

    #[test]
    fn quit_keys() {
        let mut app = app_with(Canned(Ok(Vec::new())));
        assert_eq!(press(&mut app, KeyCode::Esc), Action::Quit);
        assert_eq!(
            app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
        assert_eq!(press(&mut app, KeyCode::Char('q')), Action::None);

        press(&mut app, KeyCode::F(2));
        assert_eq!(press(&mut app, KeyCode::Char('q')), Action::Quit);
    }

    #[test]
    fn step_clamps_to_bounds() {
        let mut state = TableState::default();
        step(&mut state, 3, -1);
        assert_eq!(state.selected(), Some(0));
        step(&mut state, 3, 5);
        assert_eq!(state.selected(), Some(2));
        step(&mut state, 0, 1);
        assert_eq!(state.selected(), None);
    }
}
