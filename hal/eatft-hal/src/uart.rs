//! Blocking serial port traits
//!
//! Implemented by chip HALs, or by host serial ports through
//! [`crate::compat::IoSerial`].

/// Sending half of a serial port
pub trait UartTx {
    type Error;

    /// Write all of `data`
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Wait until everything written has left the port
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Receiving half of a serial port
pub trait UartRx {
    type Error;

    /// Read up to `buf.len()` bytes
    ///
    /// Blocks until the buffer is filled, the port's read timeout expires
    /// or an error occurs. Returns the number of bytes actually read, which
    /// is less than `buf.len()` only on timeout.
    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Read one byte
    ///
    /// Returns `None` if the read timed out.
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        let mut buf = [0u8; 1];
        let n = self.read_blocking(&mut buf)?;
        Ok((n == 1).then_some(buf[0]))
    }
}
