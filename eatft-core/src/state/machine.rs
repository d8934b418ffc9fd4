//! Session state machine definition
//!
//! One frame is in flight at a time. The session advances exactly one
//! state per step and only while the transport is ready.
//!
//! ```text
//!  Ready ──▶ Transmit ──┬──────────────────────────▶ Reset ──▶ Ready
//!                       └─▶ Receive ──▶ Event ──────▲
//! ```

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Idle; new commands may be staged
    #[default]
    Ready,
    /// Sealed frame waiting to be sent
    Transmit,
    /// Frame sent, answer expected
    Receive,
    /// Answer received, not yet validated
    Event,
    /// Clear the outbound frame
    Reset,
}

impl State {
    /// True if a new command may be staged
    pub fn is_ready(&self) -> bool {
        *self == State::Ready
    }

    /// State entered after this state's step has run
    ///
    /// `armed` is where a transmission continues: [`State::Receive`] if
    /// the frame asked for an answer, [`State::Reset`] otherwise.
    pub fn next(self, armed: State) -> Self {
        match self {
            State::Ready => State::Transmit,
            State::Transmit => armed,
            State::Receive => State::Event,
            State::Event => State::Reset,
            State::Reset => State::Ready,
        }
    }
}
