//! Adapters from the embedded Rust ecosystem traits
//!
//! - [`EhPin`] / [`EhSpi`] wrap `embedded-hal` 1.0 output pins and SPI buses
//!   (feature `embedded-hal`).
//! - [`IoSerial`] wraps an `embedded-io` byte stream such as a host serial
//!   port (feature `embedded-io`).

#[cfg(feature = "embedded-hal")]
pub use self::eh::{EhPin, EhSpi};

#[cfg(feature = "embedded-io")]
pub use self::eio::IoSerial;

#[cfg(feature = "embedded-hal")]
mod eh {
    use crate::gpio::OutputPin;
    use crate::spi::SpiBus;

    /// `embedded-hal` output pin
    ///
    /// Pin errors are dropped: select lines on every supported chip are
    /// infallible. The last commanded level is cached so `is_set_high`
    /// does not need a stateful pin.
    pub struct EhPin<P> {
        pin: P,
        high: bool,
    }

    impl<P: embedded_hal::digital::OutputPin> EhPin<P> {
        /// Wrap a pin, assuming it currently idles high
        pub fn new(pin: P) -> Self {
            Self { pin, high: true }
        }

        /// Give back the wrapped pin
        pub fn into_inner(self) -> P {
            self.pin
        }
    }

    impl<P: embedded_hal::digital::OutputPin> OutputPin for EhPin<P> {
        fn set_high(&mut self) {
            let _ = self.pin.set_high();
            self.high = true;
        }

        fn set_low(&mut self) {
            let _ = self.pin.set_low();
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    /// `embedded-hal` SPI bus
    pub struct EhSpi<S> {
        bus: S,
    }

    impl<S: embedded_hal::spi::SpiBus<u8>> EhSpi<S> {
        pub fn new(bus: S) -> Self {
            Self { bus }
        }

        /// Give back the wrapped bus
        pub fn into_inner(self) -> S {
            self.bus
        }
    }

    impl<S: embedded_hal::spi::SpiBus<u8>> SpiBus for EhSpi<S> {
        type Error = S::Error;

        fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
            self.bus.transfer(read, write)?;
            self.bus.flush()
        }

        fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
            self.bus.write(data)?;
            self.bus.flush()
        }

        fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
            self.bus.read(buf)?;
            self.bus.flush()
        }

        fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<(), Self::Error> {
            self.bus.transfer_in_place(data)?;
            self.bus.flush()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use core::convert::Infallible;

        struct Pin {
            high: bool,
        }

        impl embedded_hal::digital::ErrorType for Pin {
            type Error = Infallible;
        }

        impl embedded_hal::digital::OutputPin for Pin {
            fn set_low(&mut self) -> Result<(), Infallible> {
                self.high = false;
                Ok(())
            }

            fn set_high(&mut self) -> Result<(), Infallible> {
                self.high = true;
                Ok(())
            }
        }

        /// Bus that echoes every byte back incremented by one
        struct Bus;

        impl embedded_hal::spi::ErrorType for Bus {
            type Error = Infallible;
        }

        impl embedded_hal::spi::SpiBus<u8> for Bus {
            fn read(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
                words.fill(0);
                Ok(())
            }

            fn write(&mut self, _words: &[u8]) -> Result<(), Infallible> {
                Ok(())
            }

            fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Infallible> {
                for (r, w) in read.iter_mut().zip(write) {
                    *r = w.wrapping_add(1);
                }
                Ok(())
            }

            fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
                for w in words.iter_mut() {
                    *w = w.wrapping_add(1);
                }
                Ok(())
            }

            fn flush(&mut self) -> Result<(), Infallible> {
                Ok(())
            }
        }

        #[test]
        fn test_pin_tracks_level() {
            let mut pin = EhPin::new(Pin { high: true });
            pin.set_low();
            assert!(pin.is_set_low());
            assert!(!pin.into_inner().high);
        }

        #[test]
        fn test_spi_exchange() {
            let mut bus = EhSpi::new(Bus);
            assert_eq!(bus.exchange(0x05), Ok(0x06));
        }
    }
}

#[cfg(feature = "embedded-io")]
mod eio {
    use crate::uart::{UartRx, UartTx};

    /// `embedded-io` serial port
    pub struct IoSerial<S> {
        port: S,
    }

    impl<S> IoSerial<S> {
        pub fn new(port: S) -> Self {
            Self { port }
        }

        /// Give back the wrapped port
        pub fn into_inner(self) -> S {
            self.port
        }
    }

    impl<S: embedded_io::Write> UartTx for IoSerial<S> {
        type Error = S::Error;

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
            self.port.write_all(data)
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.port.flush()
        }
    }

    impl<S: embedded_io::Read> UartRx for IoSerial<S> {
        type Error = S::Error;

        fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            let mut filled = 0;
            while filled < buf.len() {
                match self.port.read(&mut buf[filled..])? {
                    // Timed out or closed
                    0 => break,
                    n => filled += n,
                }
            }
            Ok(filled)
        }
    }

}
