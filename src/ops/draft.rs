//! The create/edit form as data.
//!
//! An [`EventDraft`] holds the form's editable state: separate date
//! components, comma-separated tag text, and the image list. [`EventDraft::build`]
//! turns it into a [`TimelineEvent`] ready for the store.

use crate::model::event::TimelineEvent;
use crate::util::date::{DateParts, format_parts, parse_date};
use crate::util::id::generate_id;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("title is required")]
    EmptyTitle,
    #[error("no image at position {0}")]
    NoSuchImage(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    /// `Some` when editing an existing event; its ID is kept on save
    pub id: Option<String>,
    pub date: DateParts,
    pub title: String,
    pub content: String,
    /// Comma-separated tag text as typed
    pub tags: String,
    pub link: String,
    pub images: Vec<String>,
}

impl EventDraft {
    /// Blank draft for a new event. The date comes from `default_date` when
    /// given, otherwise today.
    pub fn new(default_date: Option<&str>) -> Self {
        let today = DateParts::today();
        let date = match default_date {
            Some(d) => parse_date(d).or(today),
            None => today,
        };
        EventDraft {
            id: None,
            date,
            title: String::new(),
            content: String::new(),
            tags: String::new(),
            link: String::new(),
            images: Vec::new(),
        }
    }

    /// Draft pre-filled from a stored event.
    pub fn from_event(event: &TimelineEvent) -> Self {
        let mut draft = EventDraft::new(None);
        draft.id = Some(event.id.clone());
        draft.set_date(&event.date);
        draft.title = event.title.clone();
        draft.content = event.content.clone();
        draft.tags = event.tags.join(", ");
        draft.link = event.link.clone().unwrap_or_default();
        draft.images = event.images.clone();
        draft
    }

    /// Load date components from a date string. Components that fail to
    /// parse keep their current values.
    pub fn set_date(&mut self, date: &str) {
        self.date = parse_date(date).or(self.date);
    }

    pub fn add_image(&mut self, blob: String) {
        self.images.push(blob);
    }

    pub fn remove_image(&mut self, index: usize) -> Result<String, DraftError> {
        if index >= self.images.len() {
            return Err(DraftError::NoSuchImage(index));
        }
        Ok(self.images.remove(index))
    }

    /// Produce the event to save. New drafts get a fresh ID.
    pub fn build(&self) -> Result<TimelineEvent, DraftError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DraftError::EmptyTitle);
        }
        let link = self.link.trim();
        Ok(TimelineEvent {
            id: self.id.clone().unwrap_or_else(generate_id),
            date: format_parts(&self.date),
            title: title.to_string(),
            content: self.content.clone(),
            images: self.images.clone(),
            tags: split_tags(&self.tags),
            link: (!link.is_empty()).then(|| link.to_string()),
            children: Vec::new(),
        })
    }
}

/// Split comma-separated tag text into trimmed, non-empty tags.
pub fn split_tags(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
