//! Input events reported by the display
//!
//! The answer to a poll carries the display's send buffer. The first
//! command in it decides the event:
//!
//! ```text
//! button/switch:  ESC 'A' <count> <code>
//! touch area:     ESC 'H' <count> <action> <x lo> <x hi> <y lo> <y hi>
//! ```

use crate::geometry::Point;

/// Command type of a button or switch event
pub const CMD_BUTTON: u8 = b'A';

/// Command type of a free touch area event
pub const CMD_TOUCH: u8 = b'H';

/// Exact payload length of a touch area event
pub const TOUCH_PAYLOAD_LEN: usize = 8;

/// Set in a button code when the button went down
pub const CODE_DOWN: u8 = 0x80;

// Payload offsets
const OFFSET_CMD: usize = 1;
const OFFSET_CODE: usize = 3;
const OFFSET_ACTION: usize = 3;
const OFFSET_X: usize = 4;
const OFFSET_Y: usize = 6;

// Wire format values
const ACTION_RELEASE: u8 = 0;
const ACTION_PRESS: u8 = 1;
const ACTION_REPEAT: u8 = 2;

/// What happened inside a touch area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchAction {
    Release,
    Press,
    /// Finger held down and moving; carries no new information
    Repeat,
}

impl TouchAction {
    /// Parse an action from its wire byte
    ///
    /// Values other than press and repeat count as a release.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            ACTION_PRESS => TouchAction::Press,
            ACTION_REPEAT => TouchAction::Repeat,
            _ => TouchAction::Release,
        }
    }

    /// Convert to wire byte
    pub fn to_byte(self) -> u8 {
        match self {
            TouchAction::Release => ACTION_RELEASE,
            TouchAction::Press => ACTION_PRESS,
            TouchAction::Repeat => ACTION_REPEAT,
        }
    }
}

/// Reasons an inbound payload is not a usable event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventError {
    /// Payload too short to carry a command type and data
    TooShort,
    /// Touch event whose payload is not exactly [`TOUCH_PAYLOAD_LEN`] bytes
    BadTouchLength(u8),
    /// Command type this driver does not handle
    UnknownCommand(u8),
}

/// Event decoded from a validated inbound payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayEvent {
    /// Code-addressed button or switch changed state
    Button {
        /// Low seven bits of the reported code
        code: u8,
        down: bool,
    },
    /// Free touch area touched
    Touch { action: TouchAction, at: Point },
}

impl DisplayEvent {
    /// Decode the payload of a validated inbound frame
    pub fn parse(payload: &[u8]) -> Result<Self, EventError> {
        let Some(&cmd) = payload.get(OFFSET_CMD) else {
            return Err(EventError::TooShort);
        };

        match cmd {
            CMD_BUTTON => {
                let code = *payload.get(OFFSET_CODE).ok_or(EventError::TooShort)?;
                Ok(DisplayEvent::Button {
                    code: code & !CODE_DOWN,
                    down: code & CODE_DOWN != 0,
                })
            }
            CMD_TOUCH => {
                // the display occasionally sends short touch packets
                if payload.len() != TOUCH_PAYLOAD_LEN {
                    return Err(EventError::BadTouchLength(payload.len() as u8));
                }
                let x = u16::from_le_bytes([payload[OFFSET_X], payload[OFFSET_X + 1]]);
                let y = u16::from_le_bytes([payload[OFFSET_Y], payload[OFFSET_Y + 1]]);
                Ok(DisplayEvent::Touch {
                    action: TouchAction::from_byte(payload[OFFSET_ACTION]),
                    at: Point::new(x, y),
                })
            }
            other => Err(EventError::UnknownCommand(other)),
        }
    }

    /// Whether the event reports a press
    pub fn is_down(&self) -> bool {
        match self {
            DisplayEvent::Button { down, .. } => *down,
            DisplayEvent::Touch { action, .. } => *action == TouchAction::Press,
        }
    }
}
