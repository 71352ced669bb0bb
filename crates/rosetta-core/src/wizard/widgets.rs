//! List and text input widget state, independent of rendering

use crate::catalog::{DeployOption, Example, Language};

/// Something that can be shown as a row in a selection list
pub trait ListEntry {
    fn title(&self) -> &str;

    fn description(&self) -> Option<&str> {
        None
    }
}

impl ListEntry for Language {
    fn title(&self) -> &str {
        &self.title
    }
}

impl ListEntry for Example {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> Option<&str> {
        Some(self.description.as_str()).filter(|d| !d.is_empty())
    }
}

impl ListEntry for DeployOption {
    fn title(&self) -> &str {
        self.kind.title()
    }

    fn description(&self) -> Option<&str> {
        Some(self.kind.description()).filter(|d| !d.is_empty())
    }
}

/// Type-erased view of a list, used by the renderer
pub trait ListView {
    fn title(&self) -> &str;
    fn len(&self) -> usize;
    fn cursor(&self) -> usize;
    fn row(&self, index: usize) -> Option<(&str, Option<&str>)>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Single-choice list with a wrapping cursor
#[derive(Debug, Clone)]
pub struct ListWidget<T> {
    title: String,
    items: Vec<T>,
    cursor: usize,
}

impl<T> ListWidget<T> {
    pub fn new(title: impl Into<String>, items: Vec<T>) -> Self {
        Self {
            title: title.into(),
            items,
            cursor: 0,
        }
    }

    pub fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.cursor = (self.cursor + 1) % self.items.len();
    }

    pub fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.cursor = if self.cursor == 0 {
            self.items.len() - 1
        } else {
            self.cursor - 1
        };
    }

    pub fn selected(&self) -> Option<&T> {
        self.items.get(self.cursor)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }
}

impl<T: ListEntry> ListView for ListWidget<T> {
    fn title(&self) -> &str {
        &self.title
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn row(&self, index: usize) -> Option<(&str, Option<&str>)> {
        self.items
            .get(index)
            .map(|item| (item.title(), item.description()))
    }
}

/// Single-line text input
///
/// The cursor counts characters, not bytes.
#[derive(Debug, Clone)]
pub struct TextInput {
    title: String,
    placeholder: String,
    value: String,
    cursor: usize,
    char_limit: usize,
    error: Option<String>,
}

impl TextInput {
    pub fn new(title: impl Into<String>, placeholder: impl Into<String>, char_limit: usize) -> Self {
        Self {
            title: title.into(),
            placeholder: placeholder.into(),
            value: String::new(),
            cursor: 0,
            char_limit,
            error: None,
        }
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn insert_char(&mut self, c: char) {
        if self.value.chars().count() >= self.char_limit {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
        self.error = None;
    }

    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
            self.error = None;
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }
}
