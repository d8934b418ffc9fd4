//! Periodic tick source
//!
//! The non-blocking display transport is stepped from a compare-match
//! interrupt. It switches that interrupt on when a transfer starts and off
//! again once the transfer is done, so the MCU is not woken for nothing.

/// Gate for a periodic timer interrupt
pub trait TickSource {
    /// Start delivering ticks
    fn enable(&mut self);

    /// Stop delivering ticks
    fn disable(&mut self);

    /// Whether ticks are currently being delivered
    fn is_enabled(&self) -> bool;
}

/// Tick source for setups where the timer runs unconditionally
///
/// The caller keeps ticking and the transport simply idles in its ready
/// state between transfers.
#[derive(Debug, Default, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FreeRunning;

impl TickSource for FreeRunning {
    fn enable(&mut self) {}

    fn disable(&mut self) {}

    fn is_enabled(&self) -> bool {
        true
    }
}
