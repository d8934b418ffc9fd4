//! Display configuration
//!
//! Values the widget layer needs to place things on screen. The defaults
//! match the 4.3" EA TFT43 panel.

use eatft_protocol::{Corners, Rect};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of widget slots per session
pub const MAX_WIDGETS: usize = 16;

// Button codes are 7 bits on the wire and code 0 is never sent
const _: () = assert!(MAX_WIDGETS <= 127);

/// Screen geometry and layout margins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Screen width in pixels
    pub width: u16,
    /// Screen height in pixels
    pub height: u16,
    /// Horizontal inset of buttons, switches and text boxes
    pub margin_x: u16,
    /// Vertical inset, also the gap between stacked window buttons
    pub margin_y: u16,
    /// Height of buttons created inside a window
    pub button_height: u16,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 480,
            margin_x: 2,
            margin_y: 2,
            button_height: 50,
        }
    }
}

impl DisplayConfig {
    /// The whole screen
    pub fn screen(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Corners of `rect` shrunk by the configured margins
    ///
    /// The far corner is pulled in by twice the margin, so a row of
    /// adjacent buttons keeps a visible gap.
    pub fn inset(&self, rect: Rect) -> Corners {
        let (mx, my) = (self.margin_x, self.margin_y);
        Corners {
            x1: rect.x.saturating_add(mx),
            y1: rect.y.saturating_add(my),
            x2: rect.x2().saturating_sub(mx.saturating_mul(2)),
            y2: rect.y2().saturating_sub(my.saturating_mul(2)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_screen() {
        let config = DisplayConfig::default();
        assert_eq!(config.screen(), Rect::new(0, 0, 800, 480));
    }

    #[test]
    fn test_inset() {
        let config = DisplayConfig::default();
        let corners = config.inset(Rect::new(10, 20, 100, 50));
        assert_eq!(
            corners,
            Corners {
                x1: 12,
                y1: 22,
                x2: 106,
                y2: 66
            }
        );
    }

    #[test]
    fn test_inset_degenerate_rect() {
        let config = DisplayConfig::default();
        let corners = config.inset(Rect::new(0, 0, 1, 1));
        assert_eq!(corners.x2, 0);
        assert_eq!(corners.y2, 0);
    }
}
