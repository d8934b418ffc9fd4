//! Command set of the EA TFT displays
//!
//! Every command is an ESC byte followed by a two-letter mnemonic and
//! fixed binary arguments. Coordinates are 16-bit little-endian, strings
//! are NUL-terminated. Several commands may share one frame.

use crate::frame::{FrameError, OutFrame};
use crate::geometry::{Corners, Point, Rect};

/// Built-in fonts
pub mod font {
    pub const F4X6: u8 = 1;
    pub const F6X8: u8 = 2;
    pub const F7X12: u8 = 3;
    pub const GENEVA10: u8 = 4;
    pub const CHICAGO14: u8 = 5;
    pub const SWISS30: u8 = 6;
    pub const BIGZIF50: u8 = 7;
    pub const BIGZIF100: u8 = 8;
}

/// Default palette indices
pub mod color {
    pub const BLACK: u8 = 1;
    pub const BLUE: u8 = 2;
    pub const RED: u8 = 3;
    pub const GREEN: u8 = 4;
    pub const YELLOW: u8 = 5;
    pub const WHITE: u8 = 8;
    pub const GRAY: u8 = 16;
}

/// Sent after the code/coordinate of a remove command: delete the widget
/// from the screen as well as from the touch list
const REMOVE_AND_ERASE: u8 = 0x01;

/// Placement of text inside a text box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextPos {
    TopLeft = 1,
    TopCenter,
    TopRight,
    MidLeft,
    MidCenter,
    MidRight,
    BotLeft,
    BotCenter,
    BotRight,
}

/// Alignment of a label relative to its anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    /// Wire byte
    pub fn to_byte(self) -> u8 {
        match self {
            Align::Left => b'L',
            Align::Center => b'C',
            Align::Right => b'R',
        }
    }
}

/// Label of a button or switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Label<'a> {
    pub align: Align,
    pub text: &'a str,
}

/// Commands sent to the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command<'a> {
    /// Switch the text terminal on or off
    TerminalEnable(bool),
    /// Print version info on the terminal
    TerminalInfo,
    /// Clear the screen
    Clear,
    /// Set drawing colors
    ColorSet { fg: u8, bg: u8 },
    /// Enable touch input
    TouchEnable(bool),
    /// Enable the touch beeper
    TouchBeep(bool),
    ButtonFont(u8),
    /// Same zoom factor for both axes
    ButtonFontZoom(u8),
    ButtonFontColor { normal: u8, selected: u8 },
    /// Label offset when pressed
    ButtonOffset { x: u8, y: u8 },
    ButtonFrameColor { normal: [u8; 3], selected: [u8; 3] },
    ButtonFrame { frame: u8, angle: u8 },
    /// Define a touch button
    ButtonCreate {
        area: Corners,
        down_code: u8,
        up_code: u8,
        label: Label<'a>,
    },
    /// Define a touch switch
    SwitchCreate {
        area: Corners,
        down_code: u8,
        up_code: u8,
        label: Label<'a>,
    },
    /// Set a switch state without touching it
    SwitchSet { code: u8, on: bool },
    /// Following switches form a radio group
    RadioGroup(u8),
    /// Delete a button or switch by its code
    ButtonRemove(u8),
    /// Define a free touch area
    TouchArea(Rect),
    /// Delete the free touch area that covers the centroid of `Rect`
    TouchAreaRemove(Rect),
    FrameColor { inner: u8, outer: u8, fill: u8 },
    FrameDraw(Rect),
    RectDraw(Rect),
    RectClear(Rect),
    RectFill(Rect, u8),
    /// Same width for both axes
    LineWidth(u8),
    LineDraw(Point, Point),
    Font(u8),
    FontColor { fore: u8, back: u8 },
    /// Draw a string anchored at a point
    Text {
        align: Align,
        at: Point,
        text: &'a str,
    },
    /// Draw a string inside a box
    TextBox {
        area: Corners,
        pos: TextPos,
        text: &'a str,
    },
}

impl Command<'_> {
    /// Append this command to `frame`
    ///
    /// On error the frame is left unchanged.
    pub fn encode(&self, frame: &mut OutFrame) -> Result<(), FrameError> {
        let mark = frame.mark();
        let result = frame.escape().and_then(|()| self.encode_body(frame));
        if result.is_err() {
            frame.rewind(mark);
        }
        result
    }

    fn encode_body(&self, f: &mut OutFrame) -> Result<(), FrameError> {
        match *self {
            Command::TerminalEnable(on) => f.put_bytes(&[b'T', if on { b'E' } else { b'A' }]),
            Command::TerminalInfo => f.put_bytes(b"TI"),
            Command::Clear => f.put_bytes(b"DL"),
            Command::ColorSet { fg, bg } => f.put_bytes(&[b'F', b'D', fg, bg]),
            Command::TouchEnable(on) => f.put_bytes(&[b'A', b'A', on as u8]),
            Command::TouchBeep(on) => f.put_bytes(&[b'A', b'S', on as u8]),
            Command::ButtonFont(font) => f.put_bytes(&[b'A', b'F', font]),
            Command::ButtonFontZoom(zoom) => f.put_bytes(&[b'A', b'Z', zoom, zoom]),
            Command::ButtonFontColor { normal, selected } => {
                f.put_bytes(&[b'F', b'A', normal, selected])
            }
            Command::ButtonOffset { x, y } => f.put_bytes(&[b'A', b'O', x, y]),
            Command::ButtonFrameColor { normal, selected } => {
                f.put_bytes(b"FE")?;
                f.put_bytes(&normal)?;
                f.put_bytes(&selected)
            }
            Command::ButtonFrame { frame, angle } => f.put_bytes(&[b'A', b'E', frame, angle]),
            Command::ButtonCreate {
                area,
                down_code,
                up_code,
                label,
            } => {
                f.put_bytes(b"AT")?;
                put_key(f, area, down_code, up_code, label)
            }
            Command::SwitchCreate {
                area,
                down_code,
                up_code,
                label,
            } => {
                f.put_bytes(b"AK")?;
                put_key(f, area, down_code, up_code, label)
            }
            Command::SwitchSet { code, on } => f.put_bytes(&[b'A', b'P', code, on as u8]),
            Command::RadioGroup(group) => f.put_bytes(&[b'A', b'R', group]),
            Command::ButtonRemove(code) => f.put_bytes(&[b'A', b'L', code, REMOVE_AND_ERASE]),
            Command::TouchArea(rect) => {
                f.put_bytes(b"AH")?;
                put_corners(f, rect.into())
            }
            Command::TouchAreaRemove(rect) => {
                let center = rect.centroid();
                f.put_bytes(b"AV")?;
                f.put_u16_le(center.x)?;
                f.put_u16_le(center.y)?;
                f.put_u8(REMOVE_AND_ERASE)
            }
            Command::FrameColor { inner, outer, fill } => {
                f.put_bytes(&[b'F', b'R', outer, inner, fill])
            }
            Command::FrameDraw(rect) => {
                f.put_bytes(b"RR")?;
                put_corners(f, rect.into())
            }
            Command::RectDraw(rect) => {
                f.put_bytes(b"GR")?;
                put_corners(f, rect.into())
            }
            Command::RectClear(rect) => {
                f.put_bytes(b"RL")?;
                put_corners(f, rect.into())
            }
            Command::RectFill(rect, color) => {
                f.put_bytes(b"RF")?;
                put_corners(f, rect.into())?;
                f.put_u8(color)
            }
            Command::LineWidth(width) => f.put_bytes(&[b'G', b'Z', width, width]),
            Command::LineDraw(from, to) => {
                f.put_bytes(b"GD")?;
                put_corners(
                    f,
                    Corners {
                        x1: from.x,
                        y1: from.y,
                        x2: to.x,
                        y2: to.y,
                    },
                )
            }
            Command::Font(font) => f.put_bytes(&[b'Z', b'F', font]),
            Command::FontColor { fore, back } => f.put_bytes(&[b'F', b'Z', fore, back]),
            Command::Text { align, at, text } => {
                f.put_bytes(&[b'Z', align.to_byte()])?;
                f.put_u16_le(at.x)?;
                f.put_u16_le(at.y)?;
                f.put_cstr(text.as_bytes())
            }
            Command::TextBox { area, pos, text } => {
                f.put_bytes(b"ZB")?;
                put_corners(f, area)?;
                f.put_u8(pos as u8)?;
                f.put_cstr(text.as_bytes())
            }
        }
    }
}

fn put_corners(f: &mut OutFrame, c: Corners) -> Result<(), FrameError> {
    f.put_u16_le(c.x1)?;
    f.put_u16_le(c.y1)?;
    f.put_u16_le(c.x2)?;
    f.put_u16_le(c.y2)
}

fn put_key(
    f: &mut OutFrame,
    area: Corners,
    down_code: u8,
    up_code: u8,
    label: Label<'_>,
) -> Result<(), FrameError> {
    put_corners(f, area)?;
    f.put_bytes(&[down_code, up_code, label.align.to_byte()])?;
    f.put_cstr(label.text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{checksum, ESC, MAX_PAYLOAD};

    fn encoded(cmd: Command<'_>) -> OutFrame {
        let mut frame = OutFrame::new();
        cmd.encode(&mut frame).unwrap();
        frame
    }

    #[test]
    fn test_clear() {
        let frame = encoded(Command::Clear);
        assert_eq!(frame.payload(), &[ESC, b'D', b'L']);
    }

    #[test]
    fn test_terminal_enable() {
        assert_eq!(encoded(Command::TerminalEnable(true)).payload(), &[ESC, b'T', b'E']);
        assert_eq!(encoded(Command::TerminalEnable(false)).payload(), &[ESC, b'T', b'A']);
    }

    #[test]
    fn test_button_create_layout() {
        let frame = encoded(Command::ButtonCreate {
            area: Corners {
                x1: 2,
                y1: 2,
                x2: 0x0104,
                y2: 50,
            },
            down_code: 0x81,
            up_code: 0x01,
            label: Label {
                align: Align::Left,
                text: "Ok",
            },
        });

        assert_eq!(
            frame.payload(),
            &[
                ESC, b'A', b'T', 2, 0, 2, 0, 0x04, 0x01, 50, 0, 0x81, 0x01, b'L', b'O', b'k', 0
            ]
        );
    }

    #[test]
    fn test_switch_uses_ak() {
        let frame = encoded(Command::SwitchCreate {
            area: Corners::default(),
            down_code: 0x82,
            up_code: 0x02,
            label: Label {
                align: Align::Center,
                text: "",
            },
        });
        assert_eq!(&frame.payload()[..3], &[ESC, b'A', b'K']);
        assert_eq!(&frame.payload()[11..], &[0x82, 0x02, b'C', 0]);
    }

    #[test]
    fn test_touch_area_uses_corners() {
        let frame = encoded(Command::TouchArea(Rect::new(50, 0, 100, 100)));
        assert_eq!(
            frame.payload(),
            &[ESC, b'A', b'H', 50, 0, 0, 0, 150, 0, 100, 0]
        );
    }

    #[test]
    fn test_touch_area_remove_uses_centroid() {
        let frame = encoded(Command::TouchAreaRemove(Rect::new(50, 0, 100, 100)));
        assert_eq!(frame.payload(), &[ESC, b'A', b'V', 100, 0, 50, 0, 0x01]);
    }

    #[test]
    fn test_button_remove() {
        let frame = encoded(Command::ButtonRemove(3));
        assert_eq!(frame.payload(), &[ESC, b'A', b'L', 3, 0x01]);
    }

    #[test]
    fn test_frame_color_order() {
        let frame = encoded(Command::FrameColor {
            inner: 1,
            outer: 2,
            fill: 3,
        });
        assert_eq!(frame.payload(), &[ESC, b'F', b'R', 2, 1, 3]);
    }

    #[test]
    fn test_text_box() {
        let frame = encoded(Command::TextBox {
            area: Rect::new(0, 0, 10, 10).into(),
            pos: TextPos::MidCenter,
            text: "x",
        });
        assert_eq!(
            frame.payload(),
            &[ESC, b'Z', b'B', 0, 0, 0, 0, 10, 0, 10, 0, 5, b'x', 0]
        );
    }

    #[test]
    fn test_commands_share_a_frame() {
        let mut frame = OutFrame::new();
        Command::Font(font::F7X12).encode(&mut frame).unwrap();
        Command::FontColor {
            fore: color::BLACK,
            back: color::BLUE,
        }
        .encode(&mut frame)
        .unwrap();

        assert_eq!(
            frame.payload(),
            &[ESC, b'Z', b'F', 3, ESC, b'F', b'Z', 1, 2]
        );
        assert_eq!(frame.payload_sum(), checksum(frame.payload()));
    }

    #[test]
    fn test_oversized_text_leaves_frame_untouched() {
        let mut frame = OutFrame::new();
        Command::Clear.encode(&mut frame).unwrap();

        let long = core::str::from_utf8(&[b'a'; MAX_PAYLOAD]).unwrap();
        let result = Command::Text {
            align: Align::Left,
            at: Point::new(0, 0),
            text: long,
        }
        .encode(&mut frame);

        assert_eq!(result, Err(FrameError::FrameTooLarge));
        assert_eq!(frame.payload(), &[ESC, b'D', b'L']);
    }
}
