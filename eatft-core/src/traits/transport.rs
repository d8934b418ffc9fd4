//! Transport trait

use eatft_protocol::InFrame;

/// Moves whole frames between the session and the display
///
/// Two flavors exist. A blocking transport finishes every operation
/// before returning and is always ready. A tick-driven transport only
/// starts the transfer; a timer then advances it byte by byte and
/// [`Transport::is_ready`] stays false until it has completed.
///
/// The session never calls `transmit`, `receive` or `fetch` while
/// `is_ready` is false.
pub trait Transport {
    /// Bus level error
    type Error;

    /// Start sending a sealed frame, `[control][len][payload][checksum]`
    ///
    /// Completes once the display has acknowledged the frame.
    fn transmit(&mut self, frame: &[u8]) -> Result<(), Self::Error>;

    /// Start receiving the display's answer
    fn receive(&mut self) -> Result<(), Self::Error>;

    /// True if no transfer is in progress
    fn is_ready(&self) -> bool;

    /// Copy the last received frame into `frame`
    fn fetch(&mut self, frame: &mut InFrame) -> Result<(), Self::Error>;

    /// Error raised by a transfer that ran in the background
    ///
    /// Blocking transports report errors directly and keep the default.
    fn take_fault(&mut self) -> Option<Self::Error> {
        None
    }
}
