use crux_core::capability::{CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

/// Durable storage for the whole collection under one shell-chosen key
/// (`STORE_KEY` in a browser shell). The payload is an opaque string to
/// the shell; the core owns its format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageOperation {
    Load,
    Save { data: String },
    Clear,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageOutput {
    /// Response to `Load`. `None` when nothing was ever stored.
    Value { data: Option<String> },
    /// Response to `Save` and `Clear`.
    Done,
    /// The shell could not complete the operation (quota, disabled storage).
    Error { message: String },
}

impl Operation for StorageOperation {
    type Output = StorageOutput;
}

pub struct Storage<Ev> {
    context: CapabilityContext<StorageOperation, Ev>,
}

impl<Ev> Storage<Ev>
where
    Ev: 'static,
{
    #[must_use]
    pub fn new(context: CapabilityContext<StorageOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn load<F>(&self, make_event: F)
    where
        F: FnOnce(StorageOutput) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let output = context.request_from_shell(StorageOperation::Load).await;
            context.update_app(make_event(output));
        });
    }

    pub fn save<F>(&self, data: String, make_event: F)
    where
        F: FnOnce(StorageOutput) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let output = context
                .request_from_shell(StorageOperation::Save { data })
                .await;
            context.update_app(make_event(output));
        });
    }

    pub fn clear<F>(&self, make_event: F)
    where
        F: FnOnce(StorageOutput) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let output = context.request_from_shell(StorageOperation::Clear).await;
            context.update_app(make_event(output));
        });
    }
}

impl<Ev> crux_core::capability::Capability<Ev> for Storage<Ev> {
    type Operation = StorageOperation;
    type MappedSelf<MappedEv> = Storage<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        Storage::new(self.context.map_event(f))
    }
}
