//! Search form: three single-line inputs and the focus ring.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use shelf_core::api::SearchQuery;

/// One of the search inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Author,
    Isbn,
}

impl Field {
    pub const ALL: [Self; 3] = [Self::Title, Self::Author, Self::Isbn];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Author => "Author",
            Self::Isbn => "ISBN",
        }
    }
}

/// What receives key input in the search view.
///
/// Tab order: Title → Author → ISBN → Results → Title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(Field),
    Results,
}

impl Default for Focus {
    fn default() -> Self {
        Self::Field(Field::Title)
    }
}

impl Focus {
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Field(Field::Title) => Self::Field(Field::Author),
            Self::Field(Field::Author) => Self::Field(Field::Isbn),
            Self::Field(Field::Isbn) => Self::Results,
            Self::Results => Self::Field(Field::Title),
        }
    }

    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Self::Field(Field::Title) => Self::Results,
            Self::Field(Field::Author) => Self::Field(Field::Title),
            Self::Field(Field::Isbn) => Self::Field(Field::Author),
            Self::Results => Self::Field(Field::Isbn),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchForm {
    title: String,
    author: String,
    isbn: String,
}

impl SearchForm {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Author => &self.author,
            Field::Isbn => &self.isbn,
        }
    }

    const fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.title,
            Field::Author => &mut self.author,
            Field::Isbn => &mut self.isbn,
        }
    }

    /// Apply an editing key to `field`. Returns `false` for keys that are not
    /// edits so the caller can treat them as commands.
    pub fn edit(&mut self, field: Field, key: KeyEvent) -> bool {
        let value = self.value_mut(field);
        match key.code {
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                value.clear();
                true
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                value.push(c);
                true
            }
            KeyCode::Backspace => {
                value.pop();
                true
            }
            _ => false,
        }
    }

    pub fn to_query(&self) -> SearchQuery {
        SearchQuery::new(self.title.as_str(), self.author.as_str(), self.isbn.as_str())
    }
}
