//! Transport configuration

/// Settings shared by all transports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransportConfig {
    /// Give up after this many failed handshakes for one frame
    ///
    /// `None` resends until the display acknowledges.
    pub ack_retry_limit: Option<u16>,
}

impl TransportConfig {
    /// Resend forever
    pub const fn unbounded() -> Self {
        Self {
            ack_retry_limit: None,
        }
    }

    /// Give up after `limit` failed handshakes
    pub const fn with_retry_limit(limit: u16) -> Self {
        Self {
            ack_retry_limit: Some(limit),
        }
    }

    /// True once `failures` handshakes have failed and no retry is left
    pub fn retries_exhausted(&self, failures: u16) -> bool {
        matches!(self.ack_retry_limit, Some(limit) if failures >= limit)
    }
}
