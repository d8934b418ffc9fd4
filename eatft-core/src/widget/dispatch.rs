//! Routing display input to widget callbacks

use eatft_protocol::{DisplayEvent, TouchAction};

use super::{WidgetEvent, WidgetKind};
use crate::session::Session;
use crate::traits::Transport;

impl<T: Transport, U> Session<T, U> {
    /// Invoke the callback of the widget `event` addresses
    ///
    /// Input for unknown codes or outside every touch area is dropped.
    pub(crate) fn dispatch(&mut self, event: DisplayEvent) {
        let (id, down) = match event {
            DisplayEvent::Button { code, down } => match self.widgets.by_code(code) {
                Some(id) => (id, down),
                None => {
                    warn!("no widget for button code {}", code);
                    return;
                }
            },
            DisplayEvent::Touch {
                action: TouchAction::Repeat,
                ..
            } => return,
            DisplayEvent::Touch { action, at } => match self.widgets.hit_test(at) {
                Some(id) => (id, action == TouchAction::Press),
                None => {
                    warn!("no touch area at {}, {}", at.x, at.y);
                    return;
                }
            },
        };

        let Some(widget) = self.widgets.get_mut(id) else {
            return;
        };
        if widget.kind == WidgetKind::Switch {
            widget.enabled = down;
        }
        let widget = *widget;

        debug!("widget {} {}", id.index(), if down { "down" } else { "up" });
        (widget.callback)(
            self,
            WidgetEvent {
                id,
                kind: widget.kind,
                payload: widget.payload,
                down,
            },
        );
    }
}
