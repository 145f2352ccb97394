use crate::email::Message;
use crate::Error;

/// Something that can deliver a `Message`.
///
/// Each provider is one implementation; the message itself stays generic.
pub trait Transport {
    /// Deliver a single message.
    ///
    /// Either every precondition passes and the message is handed off to the
    /// provider, or nothing is sent and the first failure is returned.
    fn send(&self, message: &Message) -> Result<(), Error>;
}
