use thiserror::Error;

/// The only failure surfaced to the user when the order collection cannot be
/// fetched. Transport, status and payload problems all collapse into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Error)]
#[error("orders could not be loaded")]
pub struct OrdersLoadError;

impl OrdersLoadError {
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

impl From<anyhow::Error> for OrdersLoadError {
    fn from(error: anyhow::Error) -> Self {
        tracing::warn!(error = %format!("{error:#}"), "order source failed");
        Self
    }
}
