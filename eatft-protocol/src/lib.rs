//! EA TFT serial protocol ("small protocol")
//!
//! This crate defines the wire format spoken between a host MCU and an
//! Electronic Assembly eDIP/EA TFT touch display over SPI or RS-232. It
//! holds the parts that need no knowledge of transports or sessions:
//!
//! - [`frame`]: outbound frame builder with running checksum, inbound
//!   frame validation
//! - [`commands`]: the drawing and widget command set
//! - [`events`]: touch/button events found in poll responses
//! - [`geometry`]: rectangles and points in display pixels
//!
//! # Protocol Overview
//!
//! ```text
//! ┌─────────┬────────┬──────────────────────────┬──────────┐
//! │ CONTROL │ LENGTH │ PAYLOAD                  │ CHECKSUM │
//! │ 1B      │ 1B     │ ESC cmd args [ESC ...]   │ 1B       │
//! └─────────┴────────┴──────────────────────────┴──────────┘
//! ```
//!
//! CONTROL is DC1 for plain commands and DC2 for requests that the display
//! answers with a frame of its own. Each outbound frame is acknowledged
//! with a single ACK or NAK byte.

#![no_std]
#![deny(unsafe_code)]

mod fmt;

pub mod commands;
pub mod events;
pub mod frame;
pub mod geometry;

pub use commands::{Align, Command, Label, TextPos};
pub use events::{DisplayEvent, EventError, TouchAction};
pub use frame::{
    checksum, Arg, Control, FrameError, InFrame, OutFrame, ACK, DC1, DC2, ESC, IN_CAPACITY, NAK,
    OUT_CAPACITY,
};
pub use geometry::{Corners, Point, Rect};
