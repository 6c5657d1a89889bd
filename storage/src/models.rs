//! Storage models: insert payloads, the reconstructed read model, and query parameters.

mod message_query;
mod new_message;
mod persisted_message;

pub use message_query::MessageQuery;
pub use new_message::{NewGroupMessage, NewSingleMessage};
pub(crate) use persisted_message::MessageRow;
pub use persisted_message::{PersistedMedia, PersistedMessage};
