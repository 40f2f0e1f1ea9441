use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::capabilities::{Capabilities, StorageOutput, TimerOutput};
use crate::defaults::default_items;
use crate::event::Event;
use crate::model::{
    self, Category, EditorState, FallbackReason, Item, ItemId, LoadOutcome, Model, Phase,
    PickState, Priority, Tab, Toast, ToastId, ToastKind,
};
use crate::{
    AppError, ErrorKind, PICK_FOCUS_DELAY_MS, PICK_REVEAL_TTL_MS, PICK_SUSPENSE_MS,
    SEARCH_DEBOUNCE_MS, TOAST_TTL_MS,
};

#[derive(Default)]
pub struct App;

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Self::Event, model: &mut Self::Model, caps: &Self::Capabilities) {
        tracing::debug!(
            event = event.name(),
            user_initiated = event.is_user_initiated(),
            "update"
        );

        // While broken, only the recovery surface is live.
        if matches!(model.phase, Phase::Broken(_)) && !is_recovery_event(&event) {
            return;
        }

        match event {
            Event::Noop => {}

            Event::AppStarted => {
                model.phase = Phase::Booting;
                caps.storage.load(Event::StoreLoaded);
                caps.render.render();
            }

            Event::StoreLoaded(output) => {
                let raw = match output {
                    StorageOutput::Value { data } => data,
                    StorageOutput::Error { message } => {
                        tracing::warn!(%message, "load failed, starting from defaults");
                        None
                    }
                    StorageOutput::Done => None,
                };
                match model::decode_collection(raw.as_deref()) {
                    LoadOutcome::Restored(items) => {
                        tracing::info!(count = items.len(), "collection restored");
                        model.items = items;
                    }
                    LoadOutcome::Fallback(reason) => {
                        if reason == FallbackReason::Malformed {
                            tracing::warn!("stored payload unreadable, using defaults");
                        }
                        model.items = default_items();
                        persist(model, caps);
                    }
                }
                model.phase = Phase::Ready;
                caps.render.render();
            }

            Event::PersistCompleted(output) => {
                if let StorageOutput::Error { message } = output {
                    tracing::warn!(%message, "persist failed, in-memory state kept");
                }
            }

            Event::ToggleCompletion { id } => {
                let (m, now_completed) = model::toggle_completion(&model.items, &id);
                if m.changed {
                    model.items = m.items;
                    if now_completed == Some(true) {
                        self.toast(model, caps, "Task completed", ToastKind::Success);
                    }
                    persist(model, caps);
                }
                caps.render.render();
            }

            Event::SetProgress { id, value } => {
                let (m, applied) = model::set_progress(&model.items, &id, value);
                if m.changed {
                    model.items = m.items;
                    if applied == Some(crate::MAX_PROGRESS) {
                        self.toast(model, caps, "Progress complete", ToastKind::Success);
                    }
                    persist(model, caps);
                }
                caps.render.render();
            }

            Event::DeleteRequested { id } => {
                model.pending_delete = Some(id);
                caps.render.render();
            }

            Event::DeleteCancelled => {
                model.pending_delete = None;
                caps.render.render();
            }

            Event::DeleteConfirmed => {
                if let Some(id) = model.pending_delete.take() {
                    let m = model::delete_item(&model.items, &id);
                    if m.changed {
                        model.items = m.items;
                        if model.highlighted_item.as_ref() == Some(&id) {
                            model.highlighted_item = None;
                        }
                        if model.focus_item.as_ref() == Some(&id) {
                            model.focus_item = None;
                        }
                        self.toast(model, caps, "Item deleted", ToastKind::Error);
                        persist(model, caps);
                    }
                }
                caps.render.render();
            }

            Event::ChangeCategory { id, category } => {
                let m = model::change_category(&model.items, &id, category);
                if m.changed {
                    model.items = m.items;
                    let message = format!("Moved to {}", category.label());
                    self.toast(model, caps, message, ToastKind::Info);
                    persist(model, caps);
                }
                caps.render.render();
            }

            Event::ToggleTimer { id } => {
                let now = crate::get_current_time_ms();
                let (m, now_running) = model::toggle_timer(&model.items, &id, now);
                if m.changed {
                    model.items = m.items;
                    let message = if now_running == Some(true) {
                        "Timer started"
                    } else {
                        "Timer stopped"
                    };
                    self.toast(model, caps, message, ToastKind::Info);
                    persist(model, caps);
                }
                caps.render.render();
            }

            Event::SaveRequested { mut draft } => {
                if let Some(editor) = model.editor.take() {
                    match editor.editing {
                        Some(id) => {
                            let m = model::apply_draft(&model.items, &id, draft);
                            if m.changed {
                                model.items = m.items;
                            }
                        }
                        None => {
                            if draft.date.is_none() {
                                draft.date = editor.initial_date;
                            }
                            model.items.push(model::create_from_draft(draft));
                        }
                    }
                    self.toast(model, caps, "Saved", ToastKind::Success);
                    persist(model, caps);
                }
                caps.render.render();
            }

            Event::TabSelected { tab } => {
                model.active_tab = tab;
                caps.render.render();
            }

            Event::DateSelected { date } => {
                model.selected_date = date;
                caps.render.render();
            }

            Event::EditRequested { id } => {
                model.editor = Some(EditorState {
                    editing: id,
                    initial_date: None,
                });
                caps.render.render();
            }

            Event::ComposeForDate { date } => {
                model.editor = Some(EditorState {
                    editing: None,
                    initial_date: Some(date),
                });
                caps.render.render();
            }

            Event::EditorClosed => {
                model.editor = None;
                caps.render.render();
            }

            Event::SearchChanged { query } => {
                model.search.live = query;
                if let Some(stale) = model.search.pending.take() {
                    caps.timer.cancel(stale);
                }
                let token = model.next_timer_id();
                model.search.pending = Some(token);
                caps.timer
                    .start(token, SEARCH_DEBOUNCE_MS, move |output| {
                        Event::DebounceElapsed { token, output }
                    });
                caps.render.render();
            }

            Event::DebounceElapsed { token, output } => {
                if model.search.pending == Some(token) && matches!(output, TimerOutput::Fired { .. })
                {
                    model.search.pending = None;
                    model.search.debounced = model.search.live.clone();
                    caps.render.render();
                }
            }

            Event::PickRequested { category } => {
                if model::eligible_for_pick(&model.items, category).is_empty() {
                    self.toast(model, caps, "Nothing left to pick", ToastKind::Info);
                } else {
                    model.highlighted_item = None;
                    model.focus_item = None;
                    let token = model.next_timer_id();
                    model.pick = PickState::Selecting { token, category };
                    caps.timer.start(token, PICK_SUSPENSE_MS, move |output| {
                        Event::PickDelayElapsed { token, output }
                    });
                }
                caps.render.render();
            }

            Event::PickDelayElapsed { token, output } => {
                let category = match &model.pick {
                    PickState::Selecting {
                        token: current,
                        category,
                    } if *current == token && matches!(output, TimerOutput::Fired { .. }) => {
                        *category
                    }
                    _ => return,
                };
                // Eligibility is re-read here: the collection may have
                // changed during the suspense window.
                let eligible = model::eligible_for_pick(&model.items, category);
                if eligible.is_empty() {
                    model.pick = PickState::Idle;
                    self.toast(model, caps, "Nothing left to pick", ToastKind::Info);
                    caps.render.render();
                    return;
                }
                let winner = eligible[rand::thread_rng().gen_range(0..eligible.len())];
                let (item_id, title, winner_category) =
                    (winner.id.clone(), winner.title.clone(), winner.category);

                let reveal_token = model.next_timer_id();
                model.pick = PickState::Revealed {
                    token: reveal_token,
                    item_id: item_id.clone(),
                    title,
                };
                model.highlighted_item = Some(item_id);
                model.active_tab = Tab::for_category(winner_category);

                let focus_timer = model.next_timer_id();
                caps.timer
                    .start(focus_timer, PICK_FOCUS_DELAY_MS, move |output| {
                        Event::FocusDelayElapsed {
                            token: reveal_token,
                            output,
                        }
                    });
                caps.timer
                    .start(reveal_token, PICK_REVEAL_TTL_MS, move |output| {
                        Event::RevealExpired {
                            token: reveal_token,
                            output,
                        }
                    });
                caps.render.render();
            }

            Event::FocusDelayElapsed { token, output } => {
                if let PickState::Revealed {
                    token: current,
                    item_id,
                    ..
                } = &model.pick
                {
                    if *current == token && matches!(output, TimerOutput::Fired { .. }) {
                        model.focus_item = Some(item_id.clone());
                        caps.render.render();
                    }
                }
            }

            Event::RevealExpired { token, output } => {
                if let PickState::Revealed { token: current, .. } = &model.pick {
                    if *current == token && matches!(output, TimerOutput::Fired { .. }) {
                        model.pick = PickState::Idle;
                        model.highlighted_item = None;
                        model.focus_item = None;
                        caps.render.render();
                    }
                }
            }

            Event::ShowToast { message, kind } => {
                self.toast(model, caps, message, kind);
                caps.render.render();
            }

            Event::ToastExpired { id, output } => {
                if matches!(output, TimerOutput::Fired { .. }) {
                    model.toasts.retain(|t| t.id != id);
                    caps.render.render();
                }
            }

            Event::FatalError { message } => {
                tracing::error!(%message, "entering broken state");
                model.phase = Phase::Broken(AppError::new(ErrorKind::Internal, message));
                caps.render.render();
            }

            Event::ReloadRequested => {
                model.phase = Phase::Booting;
                caps.storage.load(Event::StoreLoaded);
                caps.render.render();
            }

            Event::HardResetRequested => {
                model.pending_reset = true;
                caps.render.render();
            }

            Event::HardResetCancelled => {
                model.pending_reset = false;
                caps.render.render();
            }

            Event::HardResetConfirmed => {
                model.pending_reset = false;
                caps.storage.clear(Event::StorageCleared);
                caps.render.render();
            }

            Event::StorageCleared(output) => {
                if let StorageOutput::Error { message } = output {
                    tracing::warn!(%message, "clear failed, resetting in memory anyway");
                }
                reset_transient_state(model);
                model.items = default_items();
                model.phase = Phase::Ready;
                persist(model, caps);
                self.toast(model, caps, "Data reset", ToastKind::Info);
                caps.render.render();
            }
        }
    }

    fn view(&self, model: &Self::Model) -> Self::ViewModel {
        if let Phase::Broken(err) = &model.phase {
            return ViewModel {
                recovery: Some(RecoveryView {
                    code: err.code().to_string(),
                    message: err.user_facing_message().to_string(),
                }),
                ..ViewModel::default()
            };
        }

        let filtered = model::filter_by_search(&model.items, &model.search.debounced);
        let sections = Category::ALL
            .iter()
            .filter_map(|&category| {
                let items = model::items_in_category(&filtered, category);
                if items.is_empty() {
                    return None;
                }
                let completed = items.iter().filter(|i| i.is_completed).count();
                Some(CategorySection {
                    total: items.len(),
                    completed,
                    category,
                    label: category.label().to_string(),
                    time_based: category.is_time_based(),
                    items: items.into_iter().map(ItemView::from).collect(),
                })
            })
            .collect();

        let date_items = model
            .selected_date
            .as_deref()
            .map(|date| {
                model::items_on_date(&model.items, date)
                    .into_iter()
                    .map(ItemView::from)
                    .collect()
            })
            .unwrap_or_default();

        let delete_prompt = model.pending_delete.as_ref().and_then(|id| {
            model.items.iter().find(|i| &i.id == id).map(|i| DeletePrompt {
                id: i.id.clone(),
                title: i.title.clone(),
            })
        });

        let editor = model.editor.as_ref().map(|e| EditorView {
            item: e
                .editing
                .as_ref()
                .and_then(|id| model.items.iter().find(|i| &i.id == id))
                .map(ItemView::from),
            editing: e.editing.clone(),
            initial_date: e.initial_date.clone(),
        });

        ViewModel {
            is_loading: matches!(model.phase, Phase::Booting),
            recovery: None,
            completion_pct: model::completion_ratio(&model.items),
            active_tab: model.active_tab,
            search: SearchView {
                live: model.search.live.clone(),
                debounced: model.search.debounced.clone(),
                is_settling: model.search.pending.is_some(),
            },
            sections,
            selected_date: model.selected_date.clone(),
            date_items,
            editor,
            delete_prompt,
            reset_prompt: model.pending_reset,
            toasts: model
                .toasts
                .iter()
                .map(|t| ToastView {
                    id: t.id.clone(),
                    message: t.message.clone(),
                    kind: t.kind,
                })
                .collect(),
            pick: match &model.pick {
                PickState::Idle => PickView::Idle,
                PickState::Selecting { .. } => PickView::Selecting,
                PickState::Revealed { item_id, title, .. } => PickView::Revealed {
                    item_id: item_id.clone(),
                    title: title.clone(),
                },
            },
            highlighted_item: model.highlighted_item.clone(),
            focus_item: model.focus_item.clone(),
        }
    }
}

impl App {
    fn toast(
        &self,
        model: &mut Model,
        caps: &Capabilities,
        message: impl Into<String>,
        kind: ToastKind,
    ) {
        let toast = Toast {
            id: ToastId::generate(),
            message: message.into(),
            kind,
        };
        let id = toast.id.clone();
        model.toasts.push(toast);
        let timer = model.next_timer_id();
        caps.timer.start(timer, TOAST_TTL_MS, move |output| {
            Event::ToastExpired { id, output }
        });
    }
}

const fn is_recovery_event(event: &Event) -> bool {
    matches!(
        event,
        Event::ReloadRequested
            | Event::HardResetRequested
            | Event::HardResetConfirmed
            | Event::HardResetCancelled
            | Event::StoreLoaded(_)
            | Event::StorageCleared(_)
            | Event::Noop
    )
}

/// Serialize and save the whole collection. Failures surface through
/// `PersistCompleted` and are logged, never shown.
fn persist(model: &Model, caps: &Capabilities) {
    match serde_json::to_string(&model.items) {
        Ok(data) => caps.storage.save(data, Event::PersistCompleted),
        Err(err) => tracing::warn!(%err, "could not serialize collection, skipping save"),
    }
}

fn reset_transient_state(model: &mut Model) {
    model.active_tab = Tab::default();
    model.selected_date = None;
    model.editor = None;
    model.pending_delete = None;
    model.search = model::SearchState::default();
    model.toasts.clear();
    model.pick = PickState::Idle;
    model.highlighted_item = None;
    model.focus_item = None;
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewModel {
    pub is_loading: bool,
    pub recovery: Option<RecoveryView>,
    pub completion_pct: u8,
    pub active_tab: Tab,
    pub search: SearchView,
    pub sections: Vec<CategorySection>,
    pub selected_date: Option<String>,
    pub date_items: Vec<ItemView>,
    pub editor: Option<EditorView>,
    pub delete_prompt: Option<DeletePrompt>,
    pub reset_prompt: bool,
    pub toasts: Vec<ToastView>,
    pub pick: PickView,
    pub highlighted_item: Option<ItemId>,
    pub focus_item: Option<ItemId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryView {
    pub code: String,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchView {
    pub live: String,
    pub debounced: String,
    pub is_settling: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySection {
    pub category: Category,
    pub label: String,
    pub time_based: bool,
    pub items: Vec<ItemView>,
    pub completed: usize,
    pub total: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    pub id: ItemId,
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    pub category_label: String,
    pub date: Option<String>,
    pub time: Option<String>,
    pub is_completed: bool,
    pub progress: Option<u8>,
    pub location: Option<String>,
    pub priority: Option<Priority>,
    pub suggested_duration: Option<u32>,
    pub timer_started_at: Option<u64>,
}

impl From<&Item> for ItemView {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            description: item.description.clone(),
            category: item.category,
            category_label: item.category.label().to_string(),
            date: item.date.clone(),
            time: item.time.clone(),
            is_completed: item.is_completed,
            progress: item.progress,
            location: item.location.clone(),
            priority: item.priority,
            suggested_duration: item.suggested_duration,
            timer_started_at: item.timer_started_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorView {
    pub editing: Option<ItemId>,
    pub item: Option<ItemView>,
    pub initial_date: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePrompt {
    pub id: ItemId,
    pub title: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastView {
    pub id: ToastId,
    pub message: String,
    pub kind: ToastKind,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickView {
    #[default]
    Idle,
    Selecting,
    Revealed {
        item_id: ItemId,
        title: String,
    },
}
