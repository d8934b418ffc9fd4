//! Session error types

use eatft_protocol::FrameError;

/// Widget table errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// No free slot left
    RegistryFull,
    /// Slot is empty
    NotRegistered,
    /// Operation does not apply to this kind of widget
    WrongKind,
}

/// Errors returned by [`Session`](crate::Session) operations
///
/// `E` is the error type of the transport in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Command did not fit the outbound frame
    Frame(FrameError),
    /// Widget table rejected the operation
    Registry(RegistryError),
    /// Transport failed; the session has been reset
    Transport(E),
}

impl<E> From<FrameError> for Error<E> {
    fn from(e: FrameError) -> Self {
        Error::Frame(e)
    }
}

impl<E> From<RegistryError> for Error<E> {
    fn from(e: RegistryError) -> Self {
        Error::Registry(e)
    }
}
