#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod app;
pub mod capabilities;
pub mod defaults;
pub mod event;
pub mod model;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use app::{
    App, CategorySection, DeletePrompt, EditorView, ItemView, PickView, RecoveryView, SearchView,
    ToastView, ViewModel,
};
pub use capabilities::{Capabilities, Effect};
pub use event::Event;
pub use model::{
    Category, FallbackReason, Item, ItemDraft, ItemId, LoadOutcome, Model, Phase, PickState,
    Priority, Tab, Toast, ToastId, ToastKind,
};

/// Single durable key the shell maps the `Storage` capability onto.
/// The whole collection is stored under it as one JSON array.
pub const STORE_KEY: &str = "tripline_items";

pub const SEARCH_DEBOUNCE_MS: u64 = 300;
pub const PICK_SUSPENSE_MS: u64 = 600;
pub const PICK_FOCUS_DELAY_MS: u64 = 100;
pub const PICK_REVEAL_TTL_MS: u64 = 4000;
pub const TOAST_TTL_MS: u64 = 3000;
pub const MAX_PROGRESS: u8 = 100;
pub const NEW_ITEM_TITLE: &str = "New item";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Storage,
    Serialization,
    Deserialization,
    InvalidState,
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Storage => "STORAGE_ERROR",
            Self::Serialization => "SERIALIZATION_ERROR",
            Self::Deserialization => "DESERIALIZATION_ERROR",
            Self::InvalidState => "INVALID_STATE",
            Self::Internal => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("[{}] {message}", .kind.code())]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub fn user_facing_message(&self) -> &'static str {
        match self.kind {
            ErrorKind::Storage => "Unable to save your data locally.",
            ErrorKind::Serialization | ErrorKind::Deserialization => {
                "Your saved data looks damaged or comes from an incompatible version."
            }
            ErrorKind::InvalidState | ErrorKind::Internal => {
                "Something went wrong. Reload the page, or reset your data if it keeps happening."
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Wall-clock milliseconds since the Unix epoch. Only used to stamp per-item
/// stopwatches; all scheduling goes through the `Timer` capability instead.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn get_current_time_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
