//! Tick-driven SPI transport
//!
//! The display's SPI interface wants short pauses between bytes and a
//! settle time before the handshake byte can be read. Instead of busy
//! waiting, [`TickDriver::tick`] is called from a periodic timer
//! interrupt (about 10 kHz) and moves at most one byte per call.
//!
//! ```text
//! transmit:  Start ─▶ Send ×n ─▶ Wait ─▶ ReceiveAck ─┬─ ACK ──▶ Ready
//!              ▲                                     │
//!              └──────────── NAK / garbage ──────────┘
//!
//! receive:   Receive ─▶ ReceiveHeader ×2 ─▶ ReceivePayload ×(len+1) ─▶ Ready
//! ```
//!
//! The timer interrupt only needs to run during a transfer: the driver
//! enables its [`TickSource`] when a transfer starts and disables it on
//! the first tick spent in `Ready`.
//!
//! The session and the interrupt share the driver through a
//! [`SharedTickDriver`]. The session gets a [`TickTransport`] handle, the
//! interrupt handler calls [`SharedTickDriver::tick`].

use core::cell::RefCell;

use eatft_core::Transport;
use eatft_hal::gpio::SelectLine;
use eatft_hal::{OutputPin, SpiBus, TickSource};
use eatft_protocol::{InFrame, ACK, OUT_CAPACITY};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;

use crate::config::TransportConfig;
use crate::error::TransportError;

/// Byte clocked out while reading
const DUMMY: u8 = 0x00;

/// Transfer states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverState {
    /// Idle; the next tick stops the timer
    Ready,
    /// Select the display and rewind the frame
    Start,
    /// One frame byte per tick
    Send,
    /// Settle time, then clock in the handshake byte
    Wait,
    /// Evaluate the handshake
    ReceiveAck,
    /// Select the display for reading
    Receive,
    /// Control byte and length
    ReceiveHeader,
    /// Payload and checksum
    ReceivePayload,
}

/// SPI transfer state machine
///
/// `B` is the SPI bus (mode 3, LSB first), `P` the active-low select
/// line and `K` the timer interrupt gate.
pub struct TickDriver<B: SpiBus, P, K> {
    bus: B,
    select: SelectLine<P>,
    ticker: K,
    config: TransportConfig,
    state: DriverState,
    out: Vec<u8, OUT_CAPACITY>,
    pos: usize,
    /// Bytes still to be read in `ReceivePayload`
    remaining: usize,
    handshake: u8,
    failures: u16,
    inbound: InFrame,
    fault: Option<TransportError<B::Error>>,
}

impl<B: SpiBus, P: OutputPin, K: TickSource> TickDriver<B, P, K> {
    /// Create an idle driver; releases the select line and stops the timer
    pub fn new(bus: B, select: P, mut ticker: K, config: TransportConfig) -> Self {
        ticker.disable();
        Self {
            bus,
            select: SelectLine::new(select),
            ticker,
            config,
            state: DriverState::Ready,
            out: Vec::new(),
            pos: 0,
            remaining: 0,
            handshake: 0,
            failures: 0,
            inbound: InFrame::new(),
            fault: None,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Give back bus, select pin and tick source
    pub fn release(self) -> (B, P, K) {
        (self.bus, self.select.into_inner(), self.ticker)
    }

    /// Advance the transfer by one step
    ///
    /// Call from the timer interrupt.
    pub fn tick(&mut self) {
        match self.state {
            DriverState::Ready => {
                self.ticker.disable();
                self.select.release();
            }
            DriverState::Start => {
                self.select.assert();
                self.pos = 0;
                self.state = DriverState::Send;
            }
            DriverState::Send => match self.out.get(self.pos) {
                Some(&byte) => {
                    if self.exchange(byte).is_some() {
                        self.pos += 1;
                    }
                }
                None => {
                    self.select.release();
                    self.state = DriverState::Wait;
                }
            },
            DriverState::Wait => {
                self.select.assert();
                if let Some(byte) = self.exchange(DUMMY) {
                    self.handshake = byte;
                    self.state = DriverState::ReceiveAck;
                }
            }
            DriverState::ReceiveAck => self.check_handshake(),
            DriverState::Receive => {
                self.select.assert();
                self.inbound.clear();
                self.state = DriverState::ReceiveHeader;
            }
            DriverState::ReceiveHeader => {
                let Some(byte) = self.exchange(DUMMY) else {
                    return;
                };
                if self.inbound.push(byte).is_err() {
                    return self.fail(TransportError::Oversized);
                }
                if self.inbound.len() == 2 {
                    let declared = self.inbound.declared_len();
                    if !InFrame::fits(declared) {
                        warn!("answer of {} bytes does not fit", declared);
                        return self.fail(TransportError::Oversized);
                    }
                    self.remaining = declared as usize + 1;
                    self.state = DriverState::ReceivePayload;
                }
            }
            DriverState::ReceivePayload => {
                let Some(byte) = self.exchange(DUMMY) else {
                    return;
                };
                if self.inbound.push(byte).is_err() {
                    return self.fail(TransportError::Oversized);
                }
                self.remaining -= 1;
                if self.remaining == 0 {
                    self.state = DriverState::Ready;
                }
            }
        }
    }

    fn check_handshake(&mut self) {
        if self.handshake == ACK {
            self.state = DriverState::Ready;
            return;
        }

        self.select.release();
        self.failures = self.failures.saturating_add(1);
        trace!("handshake {}, resending", self.handshake);

        if self.config.retries_exhausted(self.failures) {
            error!(
                "display did not acknowledge after {} attempts",
                self.failures
            );
            self.fail(TransportError::RetryLimit);
        } else {
            self.state = DriverState::Start;
        }
    }

    /// Clock one byte out and one in; a bus error aborts the transfer
    fn exchange(&mut self, byte: u8) -> Option<u8> {
        match self.bus.exchange(byte) {
            Ok(read) => Some(read),
            Err(e) => {
                self.fail(TransportError::Bus(e));
                None
            }
        }
    }

    fn fail(&mut self, fault: TransportError<B::Error>) {
        self.select.release();
        self.ticker.disable();
        self.state = DriverState::Ready;
        self.fault = Some(fault);
    }
}

impl<B: SpiBus, P: OutputPin, K: TickSource> Transport for TickDriver<B, P, K> {
    type Error = TransportError<B::Error>;

    fn transmit(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
        self.out.clear();
        self.out
            .extend_from_slice(frame)
            .map_err(|_| TransportError::Oversized)?;
        self.failures = 0;
        self.state = DriverState::Start;
        self.ticker.enable();
        Ok(())
    }

    fn receive(&mut self) -> Result<(), Self::Error> {
        self.state = DriverState::Receive;
        self.ticker.enable();
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.state == DriverState::Ready
    }

    fn fetch(&mut self, frame: &mut InFrame) -> Result<(), Self::Error> {
        frame.copy_from(&self.inbound);
        Ok(())
    }

    fn take_fault(&mut self) -> Option<Self::Error> {
        self.fault.take()
    }
}

/// [`TickDriver`] shared between the session and the timer interrupt
///
/// `M` selects the lock; `CriticalSectionRawMutex` when the interrupt
/// really preempts the session.
pub struct SharedTickDriver<M: RawMutex, B: SpiBus, P, K> {
    driver: Mutex<M, RefCell<TickDriver<B, P, K>>>,
}

impl<M: RawMutex, B: SpiBus, P: OutputPin, K: TickSource> SharedTickDriver<M, B, P, K> {
    pub const fn new(driver: TickDriver<B, P, K>) -> Self {
        Self {
            driver: Mutex::new(RefCell::new(driver)),
        }
    }

    /// Advance the transfer; call from the timer interrupt
    pub fn tick(&self) {
        self.with(TickDriver::tick);
    }

    /// Handle for the session
    pub fn transport(&self) -> TickTransport<'_, M, B, P, K> {
        TickTransport { shared: self }
    }

    pub fn state(&self) -> DriverState {
        self.with(|driver| driver.state())
    }

    pub fn into_inner(self) -> TickDriver<B, P, K> {
        self.driver.into_inner().into_inner()
    }

    fn with<R>(&self, f: impl FnOnce(&mut TickDriver<B, P, K>) -> R) -> R {
        self.driver.lock(|cell| {
            let mut driver = cell.borrow_mut();
            f(&mut driver)
        })
    }
}

/// Session side of a [`SharedTickDriver`]
pub struct TickTransport<'a, M: RawMutex, B: SpiBus, P, K> {
    shared: &'a SharedTickDriver<M, B, P, K>,
}

impl<M, B, P, K> Transport for TickTransport<'_, M, B, P, K>
where
    M: RawMutex,
    B: SpiBus,
    P: OutputPin,
    K: TickSource,
{
    type Error = TransportError<B::Error>;

    fn transmit(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
        self.shared.with(|driver| driver.transmit(frame))
    }

    fn receive(&mut self) -> Result<(), Self::Error> {
        self.shared.with(|driver| driver.receive())
    }

    fn is_ready(&self) -> bool {
        self.shared.with(|driver| driver.is_ready())
    }

    fn fetch(&mut self, frame: &mut InFrame) -> Result<(), Self::Error> {
        self.shared.with(|driver| driver.fetch(frame))
    }

    fn take_fault(&mut self) -> Option<Self::Error> {
        self.shared.with(|driver| driver.take_fault())
    }
}
