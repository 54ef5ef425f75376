/// Commands the UI sends down to the network layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkCommand {
    /// Post already-trimmed content to the conversation.
    SendMessage(String),
    /// Fetch the message list once, outside the poll timer.
    FetchNow,
}
