//! Bus abstraction
//!
//! The session only talks to the display through [`Transport`]; the
//! concrete serial and SPI backends live in `eatft-drivers`.

pub mod transport;

pub use transport::Transport;
