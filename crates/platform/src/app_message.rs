//! Companion-app message channel
//!
//! The host owns the transport to the phone. Opening the channel reserves
//! inbox and outbox buffers; inbound messages are then delivered as raw
//! dictionary bytes through the host event loop.

use thiserror::Error;

/// Largest buffer a host will reserve for either direction.
pub const MAX_BUFFER_SIZE: usize = 656;

/// Message channel failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelError {
    /// Requested buffer sizes exceed what the host can reserve.
    #[error("buffer of {requested} bytes exceeds the {max} byte limit")]
    BufferTooLarge {
        /// Requested size in bytes.
        requested: usize,
        /// Largest size the host supports.
        max: usize,
    },
    /// The channel is already open.
    #[error("message channel already open")]
    AlreadyOpen,
    /// The host could not allocate the buffers.
    #[error("out of memory for message buffers")]
    OutOfMemory,
}

/// Bidirectional message channel to the companion app.
pub trait MessageChannel {
    /// Open the channel with the given inbox and outbox sizes in bytes.
    fn open(&mut self, inbox_size: usize, outbox_size: usize) -> Result<(), ChannelError>;

    /// Close the channel and stop delivering inbound messages.
    fn close(&mut self);

    /// Size of the inbox reserved by [`MessageChannel::open`], 0 when closed.
    fn inbox_size(&self) -> usize;
}

/// Validate a requested buffer size against [`MAX_BUFFER_SIZE`].
pub fn check_buffer_size(requested: usize) -> Result<(), ChannelError> {
    if requested > MAX_BUFFER_SIZE {
        Err(ChannelError::BufferTooLarge {
            requested,
            max: MAX_BUFFER_SIZE,
        })
    } else {
        Ok(())
    }
}
