use crate::common::types::ChatMessage;

/// Events the network layer reports up to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkEvent {
    /// A well-formed message list, in server order.
    MessagesFetched(Vec<ChatMessage>),
    /// The send request completed; the input can be cleared.
    MessageSent,
}
