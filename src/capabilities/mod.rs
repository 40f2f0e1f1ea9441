pub mod storage;
pub mod timer;

pub use self::storage::{Storage, StorageOperation, StorageOutput};
pub use self::timer::{Timer, TimerId, TimerOperation, TimerOutput};

pub use crux_core::render::Render;

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
#[effect(app = "App")]
pub struct Capabilities {
    pub render: Render<Event>,
    pub storage: Storage<Event>,
    pub timer: Timer<Event>,
}
