use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::capabilities::timer::TimerId;
use crate::{AppError, MAX_PROGRESS};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl ItemId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToastId(pub String);

impl ToastId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The twelve fixed buckets items live in. Serde tags match the persisted
/// payload of the original web app so stored data round-trips.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Critical,
    Daily,
    Todo,
    Costume,
    A,
    B,
    C,
    D,
    Inventory,
    Food,
    Meetup,
    Uncertain,
}

impl Category {
    pub const ALL: [Self; 12] = [
        Self::Critical,
        Self::Daily,
        Self::Todo,
        Self::Costume,
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::Inventory,
        Self::Food,
        Self::Meetup,
        Self::Uncertain,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical prep",
            Self::Daily => "Daily rhythm",
            Self::Todo => "To do",
            Self::Costume => "Costume",
            Self::A => "Day A",
            Self::B => "Day B",
            Self::C => "Day C",
            Self::D => "Day D",
            Self::Inventory => "Inventory",
            Self::Food => "Food",
            Self::Meetup => "Meetup",
            Self::Uncertain => "Uncertain",
        }
    }

    /// Whether items in this category are driven by a schedule rather than a
    /// checklist. Affects how shells render them, not core behavior.
    #[must_use]
    pub const fn is_time_based(self) -> bool {
        matches!(
            self,
            Self::Critical | Self::A | Self::B | Self::C | Self::D
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tab {
    #[default]
    Dashboard,
    Calendar,
    Lists,
    Inventory,
}

impl Tab {
    /// Where an item of this category is surfaced after a random pick.
    #[must_use]
    pub const fn for_category(category: Category) -> Self {
        match category {
            Category::Inventory | Category::Food | Category::Meetup => Self::Inventory,
            _ => Self::Dashboard,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Minutes, matching the original payload's numeric field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer_started_at: Option<u64>,
}

/// Partial item state as edited in the item form. Merged over the existing
/// item on save, or over blank defaults when creating.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_duration: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToastKind {
    Success,
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub kind: ToastKind,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchState {
    pub live: String,
    pub debounced: String,
    pub pending: Option<TimerId>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PickState {
    #[default]
    Idle,
    Selecting {
        token: TimerId,
        category: Option<Category>,
    },
    Revealed {
        token: TimerId,
        item_id: ItemId,
        title: String,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditorState {
    /// `None` when composing a new item.
    pub editing: Option<ItemId>,
    /// Date prefilled from the calendar when composing for a specific day.
    pub initial_date: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Booting,
    Ready,
    Broken(AppError),
}

#[derive(Default)]
pub struct Model {
    pub phase: Phase,
    pub items: Vec<Item>,
    pub active_tab: Tab,
    pub selected_date: Option<String>,
    pub editor: Option<EditorState>,
    pub pending_delete: Option<ItemId>,
    pub pending_reset: bool,
    pub search: SearchState,
    pub toasts: Vec<Toast>,
    pub pick: PickState,
    pub highlighted_item: Option<ItemId>,
    pub focus_item: Option<ItemId>,
    timer_seq: u64,
}

impl Model {
    /// Issue a fresh timer id. Ids are unique per model lifetime, which is
    /// what lets stale timer callbacks be detected and dropped.
    pub fn next_timer_id(&mut self) -> TimerId {
        self.timer_seq += 1;
        TimerId(self.timer_seq)
    }
}

/// How the persisted payload was resolved into a collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Restored(Vec<Item>),
    Fallback(FallbackReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallbackReason {
    Missing,
    Malformed,
}

/// Total function from whatever is in storage to a usable collection.
/// Absent or unreadable payloads fall back; they are never an error.
#[must_use]
pub fn decode_collection(raw: Option<&str>) -> LoadOutcome {
    match raw {
        None => LoadOutcome::Fallback(FallbackReason::Missing),
        Some(data) => match serde_json::from_str::<Vec<Item>>(data) {
            Ok(items) => LoadOutcome::Restored(items),
            Err(_) => LoadOutcome::Fallback(FallbackReason::Malformed),
        },
    }
}

/// Outcome of a collection mutation, carried back so `update` can decide
/// which toast to queue. `items` is always a full replacement collection.
pub struct Mutation {
    pub items: Vec<Item>,
    pub changed: bool,
}

#[must_use]
pub fn toggle_completion(items: &[Item], id: &ItemId) -> (Mutation, Option<bool>) {
    let mut now_completed = None;
    let next = items
        .iter()
        .map(|item| {
            if &item.id == id {
                let mut item = item.clone();
                item.is_completed = !item.is_completed;
                if item.is_completed {
                    item.timer_started_at = None;
                }
                now_completed = Some(item.is_completed);
                item
            } else {
                item.clone()
            }
        })
        .collect();
    (
        Mutation {
            items: next,
            changed: now_completed.is_some(),
        },
        now_completed,
    )
}

#[must_use]
pub fn set_progress(items: &[Item], id: &ItemId, value: u8) -> (Mutation, Option<u8>) {
    let value = value.min(MAX_PROGRESS);
    let mut applied = None;
    let next = items
        .iter()
        .map(|item| {
            if &item.id == id {
                let mut item = item.clone();
                item.progress = Some(value);
                item.is_completed = value == MAX_PROGRESS;
                if item.is_completed {
                    item.timer_started_at = None;
                }
                applied = Some(value);
                item
            } else {
                item.clone()
            }
        })
        .collect();
    (
        Mutation {
            items: next,
            changed: applied.is_some(),
        },
        applied,
    )
}

#[must_use]
pub fn delete_item(items: &[Item], id: &ItemId) -> Mutation {
    let next: Vec<Item> = items.iter().filter(|i| &i.id != id).cloned().collect();
    let changed = next.len() != items.len();
    Mutation {
        items: next,
        changed,
    }
}

#[must_use]
pub fn change_category(items: &[Item], id: &ItemId, category: Category) -> Mutation {
    let mut changed = false;
    let next = items
        .iter()
        .map(|item| {
            if &item.id == id {
                changed = true;
                let mut item = item.clone();
                item.category = category;
                item
            } else {
                item.clone()
            }
        })
        .collect();
    Mutation {
        items: next,
        changed,
    }
}

/// Flip the per-item stopwatch. Returns whether the timer is now running.
#[must_use]
pub fn toggle_timer(items: &[Item], id: &ItemId, now_ms: u64) -> (Mutation, Option<bool>) {
    let mut now_running = None;
    let next = items
        .iter()
        .map(|item| {
            if &item.id == id {
                let mut item = item.clone();
                if item.timer_started_at.is_some() {
                    item.timer_started_at = None;
                    now_running = Some(false);
                } else {
                    item.timer_started_at = Some(now_ms);
                    now_running = Some(true);
                }
                item
            } else {
                item.clone()
            }
        })
        .collect();
    (
        Mutation {
            items: next,
            changed: now_running.is_some(),
        },
        now_running,
    )
}

fn normalize(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

/// Merge a draft over an existing item. Empty-string date/time mean
/// "cleared", matching the form semantics of the original app.
#[must_use]
pub fn apply_draft(items: &[Item], id: &ItemId, draft: ItemDraft) -> Mutation {
    let mut changed = false;
    let next = items
        .iter()
        .map(|item| {
            if &item.id == id {
                changed = true;
                let mut item = item.clone();
                if let Some(title) = draft.title.clone() {
                    item.title = title;
                }
                if draft.description.is_some() {
                    item.description = normalize(draft.description.clone());
                }
                if let Some(category) = draft.category {
                    item.category = category;
                }
                if draft.date.is_some() {
                    item.date = normalize(draft.date.clone());
                }
                if draft.time.is_some() {
                    item.time = normalize(draft.time.clone());
                }
                if let Some(progress) = draft.progress {
                    item.progress = Some(progress.min(MAX_PROGRESS));
                    item.is_completed = item.progress == Some(MAX_PROGRESS);
                }
                if draft.location.is_some() {
                    item.location = normalize(draft.location.clone());
                }
                if draft.priority.is_some() {
                    item.priority = draft.priority;
                }
                if draft.suggested_duration.is_some() {
                    item.suggested_duration = draft.suggested_duration;
                }
                item
            } else {
                item.clone()
            }
        })
        .collect();
    Mutation {
        items: next,
        changed,
    }
}

/// Build a brand-new item from a draft, filling defaults for anything the
/// form left blank.
#[must_use]
pub fn create_from_draft(draft: ItemDraft) -> Item {
    Item {
        id: ItemId::generate(),
        title: normalize(draft.title).unwrap_or_else(|| crate::NEW_ITEM_TITLE.to_string()),
        description: normalize(draft.description),
        category: draft.category.unwrap_or(Category::D),
        date: normalize(draft.date),
        time: normalize(draft.time),
        is_completed: draft.progress == Some(MAX_PROGRESS),
        progress: Some(draft.progress.unwrap_or(0).min(MAX_PROGRESS)),
        location: normalize(draft.location),
        priority: draft.priority,
        suggested_duration: draft.suggested_duration,
        timer_started_at: None,
    }
}

#[must_use]
pub fn filter_by_search<'a>(items: &'a [Item], query: &str) -> Vec<&'a Item> {
    if query.is_empty() {
        return items.iter().collect();
    }
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| item.title.to_lowercase().contains(&needle))
        .collect()
}

#[must_use]
pub fn items_in_category<'a>(items: &'a [&'a Item], category: Category) -> Vec<&'a Item> {
    items
        .iter()
        .filter(|item| item.category == category)
        .copied()
        .collect()
}

/// Rounded completion percent over the whole collection. Empty is 0.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn completion_ratio(items: &[Item]) -> u8 {
    if items.is_empty() {
        return 0;
    }
    let done = items.iter().filter(|i| i.is_completed).count();
    ((done as f64 / items.len() as f64) * 100.0).round() as u8
}

#[must_use]
pub fn items_on_date<'a>(items: &'a [Item], date: &str) -> Vec<&'a Item> {
    items
        .iter()
        .filter(|item| item.date.as_deref() == Some(date))
        .collect()
}

#[must_use]
pub fn eligible_for_pick<'a>(items: &'a [Item], category: Option<Category>) -> Vec<&'a Item> {
    items
        .iter()
        .filter(|item| !item.is_completed)
        .filter(|item| category.is_none_or(|c| item.category == c))
        .collect()
}
