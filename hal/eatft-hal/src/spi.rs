//! SPI master trait
//!
//! The display expects mode 3 (idle-high clock, sampled on the rising
//! edge), LSB first; the chip HAL configures the peripheral accordingly.

/// SPI bus master
///
/// The tick-driven display transport moves exactly one byte per timer
/// interrupt, so [`SpiBus::exchange`] is the operation it leans on; the slice
/// forms are kept for HALs that want to batch.
pub trait SpiBus {
    /// Error type for SPI operations
    type Error;

    /// Full-duplex transfer; `read` and `write` have the same length
    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error>;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Read while clocking out zeros
    fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Clock out `data`, replacing it with what was clocked in
    fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<(), Self::Error>;

    /// Clock out one byte and return the byte clocked in
    fn exchange(&mut self, byte: u8) -> Result<u8, Self::Error> {
        let mut buf = [byte];
        self.transfer_in_place(&mut buf)?;
        Ok(buf[0])
    }
}
