//! Protocol engine for EA TFT touch displays
//!
//! This crate contains everything between the wire format and the
//! application that does not depend on a concrete bus:
//!
//! - [`Transport`] trait, implemented by the blocking serial and
//!   tick-driven SPI backends
//! - [`Session`]: the READY/TRANSMIT/RECEIVE/EVENT/RESET state machine
//!   that owns the frame buffers and polls for input
//! - Widget registry and event dispatch (buttons, switches, touch areas)
//! - Display configuration (screen size, margins)
//!
//! ```text
//! application ──encode──▶ OutFrame ──flush──▶ Transport ──▶ display
//!      ▲                                          │
//!      └──callback◀── Registry ◀── DisplayEvent ◀─┘ poll response
//! ```

#![no_std]
#![deny(unsafe_code)]

mod fmt;

pub mod config;
pub mod error;
pub mod session;
pub mod state;
pub mod traits;
pub mod widget;

#[cfg(test)]
mod mock;

pub use config::{DisplayConfig, MAX_WIDGETS};
pub use error::{Error, RegistryError};
pub use session::{Callback, Session, UserAction};
pub use state::State;
pub use traits::Transport;
pub use widget::{Registry, Widget, WidgetEvent, WidgetId, WidgetKind};
