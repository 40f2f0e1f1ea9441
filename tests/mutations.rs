use crux_core::testing::AppTester;
use crux_core::Request;

use tripline::capabilities::{StorageOperation, StorageOutput};
use tripline::{App, Category, Effect, Event, Item, ItemDraft, ItemId, Model, Tab, ToastKind};

fn storage_requests(effects: Vec<Effect>) -> Vec<Request<StorageOperation>> {
    effects
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::Storage(request) => Some(request),
            _ => None,
        })
        .collect()
}

fn item(id: &str, title: &str, category: Category) -> Item {
    Item {
        id: ItemId(id.to_string()),
        title: title.to_string(),
        description: None,
        category,
        date: None,
        time: None,
        is_completed: false,
        progress: Some(0),
        location: None,
        priority: None,
        suggested_duration: None,
        timer_started_at: None,
    }
}

/// Boot straight into a known collection.
fn ready_with(app: &AppTester<App, Effect>, model: &mut Model, items: Vec<Item>) {
    let update = app.update(Event::AppStarted, model);
    let mut load = storage_requests(update.effects).remove(0);
    let payload = serde_json::to_string(&items).unwrap();
    let update = app
        .resolve(
            &mut load,
            StorageOutput::Value {
                data: Some(payload),
            },
        )
        .expect("an update");
    for event in update.events {
        app.update(event, model);
    }
    assert_eq!(model.items, items);
}

#[test]
fn toggling_completion_persists_and_toasts_once() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    ready_with(&app, &mut model, vec![item("a", "Pack chargers", Category::Todo)]);

    let update = app.update(
        Event::ToggleCompletion {
            id: ItemId("a".into()),
        },
        &mut model,
    );

    assert!(model.items[0].is_completed);
    assert_eq!(storage_requests(update.effects).len(), 1);
    let view = app.view(&model);
    let toasts: Vec<_> = view
        .toasts
        .iter()
        .filter(|t| t.kind == ToastKind::Success)
        .collect();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].message, "Task completed");

    // Un-completing saves again but stays quiet
    let update = app.update(
        Event::ToggleCompletion {
            id: ItemId("a".into()),
        },
        &mut model,
    );
    assert!(!model.items[0].is_completed);
    assert_eq!(storage_requests(update.effects).len(), 1);
    assert_eq!(app.view(&model).toasts.len(), 1, "no second toast");
}

#[test]
fn unknown_id_mutations_do_not_touch_storage() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    ready_with(&app, &mut model, vec![item("a", "x", Category::Todo)]);

    for event in [
        Event::ToggleCompletion {
            id: ItemId("ghost".into()),
        },
        Event::SetProgress {
            id: ItemId("ghost".into()),
            value: 50,
        },
        Event::ChangeCategory {
            id: ItemId("ghost".into()),
            category: Category::Food,
        },
        Event::ToggleTimer {
            id: ItemId("ghost".into()),
        },
    ] {
        let update = app.update(event, &mut model);
        assert!(storage_requests(update.effects).is_empty());
    }
    assert!(app.view(&model).toasts.is_empty());
}

#[test]
fn reaching_full_progress_completes_with_a_toast() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    ready_with(&app, &mut model, vec![item("a", "Hem the cloak", Category::Costume)]);

    let update = app.update(
        Event::SetProgress {
            id: ItemId("a".into()),
            value: 60,
        },
        &mut model,
    );
    assert_eq!(storage_requests(update.effects).len(), 1);
    assert!(!model.items[0].is_completed);
    assert!(app.view(&model).toasts.is_empty(), "no toast below 100");

    app.update(
        Event::SetProgress {
            id: ItemId("a".into()),
            value: 100,
        },
        &mut model,
    );
    assert!(model.items[0].is_completed);
    let view = app.view(&model);
    assert!(view.toasts.iter().any(|t| t.message == "Progress complete"));
}

#[test]
fn delete_needs_confirmation() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    ready_with(
        &app,
        &mut model,
        vec![
            item("a", "one", Category::Todo),
            item("b", "two", Category::Todo),
        ],
    );

    // 1. Requesting opens the prompt, nothing is removed yet
    let update = app.update(
        Event::DeleteRequested {
            id: ItemId("a".into()),
        },
        &mut model,
    );
    assert!(storage_requests(update.effects).is_empty());
    let prompt = app.view(&model).delete_prompt.expect("prompt is open");
    assert_eq!(prompt.title, "one");

    // 2. Cancelling keeps the item
    app.update(Event::DeleteCancelled, &mut model);
    assert!(app.view(&model).delete_prompt.is_none());
    assert_eq!(model.items.len(), 2);

    // 3. Confirming removes it and persists
    app.update(
        Event::DeleteRequested {
            id: ItemId("a".into()),
        },
        &mut model,
    );
    let update = app.update(Event::DeleteConfirmed, &mut model);
    assert_eq!(storage_requests(update.effects).len(), 1);
    assert_eq!(model.items.len(), 1);
    assert_eq!(model.items[0].id, ItemId("b".into()));
    let view = app.view(&model);
    assert!(view
        .toasts
        .iter()
        .any(|t| t.kind == ToastKind::Error && t.message == "Item deleted"));
}

#[test]
fn changing_category_announces_the_destination() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    ready_with(&app, &mut model, vec![item("a", "Dumplings", Category::Todo)]);

    let update = app.update(
        Event::ChangeCategory {
            id: ItemId("a".into()),
            category: Category::Food,
        },
        &mut model,
    );

    assert_eq!(model.items[0].category, Category::Food);
    assert_eq!(storage_requests(update.effects).len(), 1);
    let view = app.view(&model);
    assert!(view
        .toasts
        .iter()
        .any(|t| t.kind == ToastKind::Info && t.message == "Moved to Food"));
}

#[test]
fn item_stopwatch_toggles_and_persists() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    ready_with(&app, &mut model, vec![item("a", "Walk the old town", Category::A)]);

    let update = app.update(
        Event::ToggleTimer {
            id: ItemId("a".into()),
        },
        &mut model,
    );
    assert!(model.items[0].timer_started_at.is_some());
    assert_eq!(storage_requests(update.effects).len(), 1);
    assert!(app.view(&model).toasts.iter().any(|t| t.message == "Timer started"));

    let update = app.update(
        Event::ToggleTimer {
            id: ItemId("a".into()),
        },
        &mut model,
    );
    assert!(model.items[0].timer_started_at.is_none());
    assert_eq!(storage_requests(update.effects).len(), 1);
    assert!(app.view(&model).toasts.iter().any(|t| t.message == "Timer stopped"));
}

#[test]
fn saving_a_new_item_fills_defaults() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    ready_with(&app, &mut model, vec![]);

    app.update(Event::EditRequested { id: None }, &mut model);
    assert!(app.view(&model).editor.is_some());

    let update = app.update(
        Event::SaveRequested {
            draft: ItemDraft::default(),
        },
        &mut model,
    );

    assert_eq!(model.items.len(), 1);
    let created = &model.items[0];
    assert_eq!(created.title, "New item");
    assert_eq!(created.category, Category::D);
    assert_eq!(created.progress, Some(0));
    assert_eq!(storage_requests(update.effects).len(), 1);

    let view = app.view(&model);
    assert!(view.editor.is_none(), "save closes the editor");
    assert!(view.toasts.iter().any(|t| t.message == "Saved"));
}

#[test]
fn composing_from_the_calendar_prefills_the_date() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    ready_with(&app, &mut model, vec![]);

    app.update(
        Event::ComposeForDate {
            date: "2026-09-13".into(),
        },
        &mut model,
    );
    let editor = app.view(&model).editor.expect("editor is open");
    assert_eq!(editor.initial_date.as_deref(), Some("2026-09-13"));

    app.update(
        Event::SaveRequested {
            draft: ItemDraft {
                title: Some("Harbor ferry".into()),
                ..ItemDraft::default()
            },
        },
        &mut model,
    );
    assert_eq!(model.items[0].date.as_deref(), Some("2026-09-13"));
}

#[test]
fn every_tab_can_be_selected() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    ready_with(&app, &mut model, vec![]);

    assert_eq!(app.view(&model).active_tab, Tab::Dashboard);
    for tab in [Tab::Calendar, Tab::Lists, Tab::Inventory, Tab::Dashboard] {
        app.update(Event::TabSelected { tab }, &mut model);
        assert_eq!(app.view(&model).active_tab, tab);
    }
}

#[test]
fn selecting_a_date_surfaces_that_days_items() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    let mut ferry = item("a", "Harbor ferry", Category::B);
    ferry.date = Some("2026-09-13".into());
    let mut museum = item("b", "Museum quarter", Category::C);
    museum.date = Some("2026-09-14".into());
    let chargers = item("c", "Pack chargers", Category::Todo);
    ready_with(&app, &mut model, vec![ferry, museum, chargers]);

    app.update(
        Event::DateSelected {
            date: Some("2026-09-13".into()),
        },
        &mut model,
    );
    let view = app.view(&model);
    assert_eq!(view.selected_date.as_deref(), Some("2026-09-13"));
    assert_eq!(view.date_items.len(), 1);
    assert_eq!(view.date_items[0].title, "Harbor ferry");

    // A day with nothing scheduled shows an empty slice
    app.update(
        Event::DateSelected {
            date: Some("2026-01-01".into()),
        },
        &mut model,
    );
    assert!(app.view(&model).date_items.is_empty());

    // Clearing the selection clears the slice
    app.update(Event::DateSelected { date: None }, &mut model);
    let view = app.view(&model);
    assert_eq!(view.selected_date, None);
    assert!(view.date_items.is_empty());
}

#[test]
fn editing_merges_the_draft_over_the_item() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    let mut existing = item("a", "Temple visit", Category::A);
    existing.date = Some("2026-09-12".into());
    ready_with(&app, &mut model, vec![existing]);

    app.update(
        Event::EditRequested {
            id: Some(ItemId("a".into())),
        },
        &mut model,
    );
    let update = app.update(
        Event::SaveRequested {
            draft: ItemDraft {
                title: Some("Temple visit, early".into()),
                time: Some("07:30".into()),
                ..ItemDraft::default()
            },
        },
        &mut model,
    );

    assert_eq!(model.items.len(), 1);
    assert_eq!(model.items[0].title, "Temple visit, early");
    assert_eq!(model.items[0].time.as_deref(), Some("07:30"));
    assert_eq!(model.items[0].date.as_deref(), Some("2026-09-12"));
    assert_eq!(storage_requests(update.effects).len(), 1);
}
