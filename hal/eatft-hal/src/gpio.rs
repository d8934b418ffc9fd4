//! Output pins
//!
//! The display transports only ever drive pins (the SPI bus-select line),
//! so this module carries the output side alone.

/// Push-pull output
pub trait OutputPin {
    fn set_high(&mut self);

    fn set_low(&mut self);

    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Level last driven, not read back from the pad
    fn is_set_high(&self) -> bool;

    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Active-low select line
///
/// Wraps an [`OutputPin`] so callers can speak in terms of asserting and
/// releasing the select signal. The line starts released.
pub struct SelectLine<P> {
    pin: P,
}

impl<P: OutputPin> SelectLine<P> {
    /// Wrap a pin, driving it to the released (high) level
    pub fn new(mut pin: P) -> Self {
        pin.set_high();
        Self { pin }
    }

    /// Pull the line low
    pub fn assert(&mut self) {
        self.pin.set_low();
    }

    /// Let the line go high
    pub fn release(&mut self) {
        self.pin.set_high();
    }

    /// Whether the line is currently asserted
    pub fn is_asserted(&self) -> bool {
        self.pin.is_set_low()
    }

    /// Give back the wrapped pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}
