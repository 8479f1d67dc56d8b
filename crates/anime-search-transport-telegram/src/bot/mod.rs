/// Command and message handlers
pub mod handlers;
/// Channel membership lookup via the Bot API
pub mod membership;
/// Reply planning and sending
pub mod messaging;

pub use membership::TelegramMembership;
