use serde::{Deserialize, Serialize};

use crate::capabilities::{StorageOutput, TimerId, TimerOutput};
use crate::model::{Category, ItemDraft, ItemId, Tab, ToastId, ToastKind};

/// The only way the model changes. Shell interactions and resolved
/// effects all arrive here.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub enum Event {
    #[default]
    Noop,

    // lifecycle
    AppStarted,
    StoreLoaded(StorageOutput),
    PersistCompleted(StorageOutput),

    // collection mutations
    ToggleCompletion {
        id: ItemId,
    },
    SetProgress {
        id: ItemId,
        value: u8,
    },
    DeleteRequested {
        id: ItemId,
    },
    DeleteConfirmed,
    DeleteCancelled,
    ChangeCategory {
        id: ItemId,
        category: Category,
    },
    ToggleTimer {
        id: ItemId,
    },
    SaveRequested {
        draft: ItemDraft,
    },

    // navigation, editor, search
    TabSelected {
        tab: Tab,
    },
    DateSelected {
        date: Option<String>,
    },
    EditRequested {
        id: Option<ItemId>,
    },
    ComposeForDate {
        date: String,
    },
    EditorClosed,
    SearchChanged {
        query: String,
    },
    DebounceElapsed {
        token: TimerId,
        output: TimerOutput,
    },

    // random selection
    PickRequested {
        category: Option<Category>,
    },
    PickDelayElapsed {
        token: TimerId,
        output: TimerOutput,
    },
    FocusDelayElapsed {
        token: TimerId,
        output: TimerOutput,
    },
    RevealExpired {
        token: TimerId,
        output: TimerOutput,
    },

    // notifications
    ShowToast {
        message: String,
        kind: ToastKind,
    },
    ToastExpired {
        id: ToastId,
        output: TimerOutput,
    },

    // containment boundary
    FatalError {
        message: String,
    },
    ReloadRequested,
    HardResetRequested,
    HardResetConfirmed,
    HardResetCancelled,
    StorageCleared(StorageOutput),
}

impl Event {
    /// Stable name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::AppStarted => "app_started",
            Self::StoreLoaded(_) => "store_loaded",
            Self::PersistCompleted(_) => "persist_completed",
            Self::ToggleCompletion { .. } => "toggle_completion",
            Self::SetProgress { .. } => "set_progress",
            Self::DeleteRequested { .. } => "delete_requested",
            Self::DeleteConfirmed => "delete_confirmed",
            Self::DeleteCancelled => "delete_cancelled",
            Self::ChangeCategory { .. } => "change_category",
            Self::ToggleTimer { .. } => "toggle_timer",
            Self::SaveRequested { .. } => "save_requested",
            Self::TabSelected { .. } => "tab_selected",
            Self::DateSelected { .. } => "date_selected",
            Self::EditRequested { .. } => "edit_requested",
            Self::ComposeForDate { .. } => "compose_for_date",
            Self::EditorClosed => "editor_closed",
            Self::SearchChanged { .. } => "search_changed",
            Self::DebounceElapsed { .. } => "debounce_elapsed",
            Self::PickRequested { .. } => "pick_requested",
            Self::PickDelayElapsed { .. } => "pick_delay_elapsed",
            Self::FocusDelayElapsed { .. } => "focus_delay_elapsed",
            Self::RevealExpired { .. } => "reveal_expired",
            Self::ShowToast { .. } => "show_toast",
            Self::ToastExpired { .. } => "toast_expired",
            Self::FatalError { .. } => "fatal_error",
            Self::ReloadRequested => "reload_requested",
            Self::HardResetRequested => "hard_reset_requested",
            Self::HardResetConfirmed => "hard_reset_confirmed",
            Self::HardResetCancelled => "hard_reset_cancelled",
            Self::StorageCleared(_) => "storage_cleared",
        }
    }

    /// Whether this event originates from a user gesture, as opposed to a
    /// resolved effect or lifecycle plumbing.
    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        !matches!(
            self,
            Self::Noop
                | Self::AppStarted
                | Self::StoreLoaded(_)
                | Self::PersistCompleted(_)
                | Self::DebounceElapsed { .. }
                | Self::PickDelayElapsed { .. }
                | Self::FocusDelayElapsed { .. }
                | Self::RevealExpired { .. }
                | Self::ShowToast { .. }
                | Self::ToastExpired { .. }
                | Self::FatalError { .. }
                | Self::StorageCleared(_)
        )
    }
}
