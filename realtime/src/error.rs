//! Errors surfaced by the channel core.

use crate::listeners::Topic;

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// Each topic holds at most one handler; drop the existing subscription first.
    #[error("a handler is already subscribed to {0}")]
    AlreadySubscribed(Topic),
    #[error("invalid channel config: {0}")]
    Config(String),
    #[error(transparent)]
    Codec(#[from] events::CodecError),
}
