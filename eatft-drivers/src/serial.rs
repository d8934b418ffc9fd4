//! Blocking serial transport
//!
//! Used with the display's RS-232 interface, typically from a host
//! through a USB adapter. Every frame is written in one go and followed
//! by a single handshake byte from the display:
//!
//! ```text
//! host:    DC1 len payload... bcc
//! display:                          ACK | NAK
//! ```
//!
//! The answer to a request arrives as `DC1 len payload... bcc` and is
//! read header first, then `len + 1` more bytes.

use eatft_core::Transport;
use eatft_hal::uart::{UartRx, UartTx};
use eatft_protocol::{InFrame, ACK, IN_CAPACITY};

use crate::config::TransportConfig;
use crate::error::TransportError;

/// Transport over a blocking serial port
///
/// Always ready: [`Transport::transmit`] returns once the frame has been
/// acknowledged and [`Transport::receive`] once the answer is complete.
pub struct SerialTransport<U> {
    uart: U,
    config: TransportConfig,
    inbound: InFrame,
}

impl<U> SerialTransport<U> {
    pub fn new(uart: U, config: TransportConfig) -> Self {
        Self {
            uart,
            config,
            inbound: InFrame::new(),
        }
    }

    /// Give back the serial port
    pub fn into_inner(self) -> U {
        self.uart
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

impl<U, E> Transport for SerialTransport<U>
where
    U: UartTx<Error = E> + UartRx<Error = E>,
{
    type Error = TransportError<E>;

    fn transmit(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
        let mut failures: u16 = 0;

        loop {
            self.uart.write_blocking(frame)?;
            self.uart.flush()?;

            match self.uart.read_byte()? {
                Some(ACK) => return Ok(()),
                Some(other) => trace!("handshake {}, resending", other),
                None => trace!("no handshake, resending"),
            }

            failures = failures.saturating_add(1);
            if self.config.retries_exhausted(failures) {
                error!("display did not acknowledge after {} attempts", failures);
                return Err(TransportError::RetryLimit);
            }
        }
    }

    fn receive(&mut self) -> Result<(), Self::Error> {
        self.inbound.clear();

        let mut buf = [0u8; IN_CAPACITY];
        if self.uart.read_blocking(&mut buf[..2])? < 2 {
            return Err(TransportError::Truncated);
        }

        let declared = buf[1];
        if !InFrame::fits(declared) {
            warn!("answer of {} bytes does not fit", declared);
            return Err(TransportError::Oversized);
        }

        // payload plus checksum
        let end = 2 + declared as usize + 1;
        let got = self.uart.read_blocking(&mut buf[2..end])?;
        self.inbound =
            InFrame::from_bytes(&buf[..2 + got]).map_err(|_| TransportError::Oversized)?;

        if 2 + got < end {
            return Err(TransportError::Truncated);
        }
        Ok(())
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn fetch(&mut self, frame: &mut InFrame) -> Result<(), Self::Error> {
        frame.copy_from(&self.inbound);
        Ok(())
    }
}
