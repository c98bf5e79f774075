//! Backend commands queued from UI to backend worker.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendCommand {
    FetchStoredPrice,
    RequestUpdate,
}

impl BackendCommand {
    pub fn name(self) -> &'static str {
        match self {
            BackendCommand::FetchStoredPrice => "fetch_stored_price",
            BackendCommand::RequestUpdate => "request_update",
        }
    }
}
