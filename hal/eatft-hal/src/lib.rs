//! EA TFT Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the display transports are written
//! against. Chip-specific HALs (or the optional `embedded-hal` /
//! `embedded-io` adapters in [`compat`]) implement them, so the same
//! protocol engine runs over an AVR-style timer + SPI peripheral or a host
//! serial port.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  eatft-core (session, widgets)          │
//! └─────────────────────────────────────────┘
//!                     │ Transport
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  eatft-drivers (serial, tick-driven)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  eatft-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Bus-select line
//! - [`spi::SpiBus`] - SPI byte exchange
//! - [`uart::UartTx`], [`uart::UartRx`] - Blocking serial communication
//! - [`timer::TickSource`] - Periodic tick interrupt gate

#![no_std]
#![deny(unsafe_code)]

pub mod compat;
pub mod gpio;
pub mod spi;
pub mod timer;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use gpio::OutputPin;
pub use spi::SpiBus;
pub use timer::{FreeRunning, TickSource};
pub use uart::{UartRx, UartTx};
