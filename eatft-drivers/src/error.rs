//! Transport errors

/// Errors raised while moving a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError<E> {
    /// Underlying bus or serial port failed
    Bus(E),
    /// Display did not acknowledge within the configured retries
    RetryLimit,
    /// Display stopped sending in the middle of a frame
    Truncated,
    /// Declared payload length does not fit the inbound buffer
    Oversized,
}

impl<E> From<E> for TransportError<E> {
    fn from(e: E) -> Self {
        TransportError::Bus(e)
    }
}
