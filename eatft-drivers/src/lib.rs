//! Transport implementations
//!
//! This crate provides the two [`Transport`](eatft_core::Transport)
//! backends for EA TFT displays:
//!
//! - [`SerialTransport`]: blocking RS-232/USB serial; every operation
//!   completes before it returns
//! - [`TickDriver`]: SPI stepped one byte per timer tick, shared with the
//!   timer interrupt through [`SharedTickDriver`]

#![no_std]
#![deny(unsafe_code)]

mod fmt;

pub mod config;
pub mod error;
pub mod serial;
pub mod tick;

pub use config::TransportConfig;
pub use error::TransportError;
pub use serial::SerialTransport;
pub use tick::{SharedTickDriver, TickDriver, TickTransport};
