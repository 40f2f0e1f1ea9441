use crate::model::{Category, Item, ItemId, Priority};

fn seed(
    id: &str,
    title: &str,
    category: Category,
    date: Option<&str>,
    time: Option<&str>,
) -> Item {
    Item {
        id: ItemId(format!("seed-{id}")),
        title: title.to_string(),
        description: None,
        category,
        date: date.map(str::to_string),
        time: time.map(str::to_string),
        is_completed: false,
        progress: Some(0),
        location: None,
        priority: None,
        suggested_duration: None,
        timer_started_at: None,
    }
}

/// Built-in starter dataset, used whenever storage is empty or unreadable
/// and after a hard reset. Fixed ids keep repeated fallbacks stable.
#[must_use]
pub fn default_items() -> Vec<Item> {
    let mut items = vec![
        seed(
            "01",
            "Renew passport and print a copy",
            Category::Critical,
            Some("2026-09-01"),
            None,
        ),
        seed(
            "02",
            "Confirm travel insurance covers the whole trip",
            Category::Critical,
            None,
            None,
        ),
        seed(
            "03",
            "Review tomorrow's itinerary before bed",
            Category::Daily,
            None,
            Some("21:30"),
        ),
        seed("04", "Charge camera and power bank", Category::Todo, None, None),
        seed("05", "Hem the cloak and fit the belt", Category::Costume, None, None),
        seed(
            "06",
            "Old town walking loop",
            Category::A,
            Some("2026-09-12"),
            Some("09:00"),
        ),
        seed(
            "07",
            "Harbor ferry and lighthouse",
            Category::B,
            Some("2026-09-13"),
            Some("10:30"),
        ),
        seed(
            "08",
            "Museum quarter, book tickets ahead",
            Category::C,
            Some("2026-09-14"),
            None,
        ),
        seed("09", "Free day, leave room for detours", Category::D, Some("2026-09-15"), None),
        seed("10", "Restock blister plasters", Category::Inventory, None, None),
        seed(
            "11",
            "Soup dumplings at the night market",
            Category::Food,
            None,
            Some("19:00"),
        ),
        seed(
            "12",
            "Coffee with Mira near the station",
            Category::Meetup,
            Some("2026-09-13"),
            Some("16:00"),
        ),
        seed("13", "Maybe the hot springs if weather holds", Category::Uncertain, None, None),
    ];

    items[0].priority = Some(Priority::High);
    items[1].priority = Some(Priority::High);
    items[3].priority = Some(Priority::Medium);
    items[4].progress = Some(40);
    items[4].suggested_duration = Some(120);
    items[10].location = Some("North gate food street".into());
    items[11].location = Some("Central station, west exit".into());

    items
}
