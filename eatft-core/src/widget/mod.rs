//! Widgets and input dispatch
//!
//! Buttons and switches are addressed by code on the wire: slot index
//! plus one, with bit 7 set in the code sent on press. Free touch areas
//! have no code; the display reports the touched coordinate and the
//! registry hit-tests it.
//!
//! Buttons fill the table from the front and touch areas from the back,
//! so both kinds can be live without their indices meeting until the
//! table is full.

mod create;
mod dispatch;
pub mod registry;

pub use registry::{Registry, Widget, WidgetId, WidgetKind};

/// Passed to a widget callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WidgetEvent {
    /// Widget that received the input
    pub id: WidgetId,
    pub kind: WidgetKind,
    /// Value given when the widget was created
    pub payload: usize,
    /// Pressed (or switched on) rather than released
    pub down: bool,
}
