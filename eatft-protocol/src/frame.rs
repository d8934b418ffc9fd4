//! Frame encoding and validation for the EA TFT small protocol.
//!
//! Outbound frame format:
//! - CONTROL (1 byte): DC1 (no response expected) or DC2 (response expected)
//! - LENGTH (1 byte): payload length
//! - PAYLOAD (0-61 bytes): one or more ESC-prefixed commands
//! - CHECKSUM (1 byte): 8-bit sum of CONTROL, LENGTH and all PAYLOAD bytes
//!
//! Inbound frames use the same layout, but their checksum leaves out the
//! control byte: it sums LENGTH and the PAYLOAD bytes only.
//!
//! The checksum is accumulated while the payload is written, so sealing a
//! frame only has to fold in the two header bytes.

use heapless::Vec;

/// Command escape prefix
pub const ESC: u8 = 0x1B;

/// Control byte: command only, display answers with ACK/NAK
pub const DC1: u8 = 0x11;

/// Control byte: request, display answers with ACK/NAK and then a frame
pub const DC2: u8 = 0x12;

/// Positive handshake byte
pub const ACK: u8 = 0x06;

/// Negative handshake byte
pub const NAK: u8 = 0x15;

/// Outbound buffer size, header and checksum included
pub const OUT_CAPACITY: usize = 64;

/// Inbound buffer size, header and checksum included
pub const IN_CAPACITY: usize = 32;

/// Bytes of every frame that are not payload (CONTROL, LENGTH, CHECKSUM)
pub const FRAME_OVERHEAD: usize = 3;

/// Largest payload that fits in the outbound buffer
pub const MAX_PAYLOAD: usize = OUT_CAPACITY - FRAME_OVERHEAD;

/// Largest payload that fits in the inbound buffer
pub const MAX_IN_PAYLOAD: usize = IN_CAPACITY - FRAME_OVERHEAD;

/// Errors that can occur while encoding or validating a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Encoding would overflow the frame buffer
    FrameTooLarge,
    /// An encode argument does not match its directive, or is missing
    BadArgument,
    /// Frame ends before its declared length
    Malformed,
    /// Trailing checksum byte does not match the frame contents
    ChecksumMismatch,
    /// Frame declares a zero-length payload
    Empty,
}

/// Control byte selecting whether the display replies with a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Control {
    /// Fire-and-forget command (DC1)
    #[default]
    NoResponse,
    /// Request expecting a response frame (DC2)
    Response,
}

impl Control {
    /// Wire value
    pub fn to_byte(self) -> u8 {
        match self {
            Control::NoResponse => DC1,
            Control::Response => DC2,
        }
    }

    /// Parse a wire value
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            DC1 => Some(Control::NoResponse),
            DC2 => Some(Control::Response),
            _ => None,
        }
    }
}

/// 8-bit additive checksum
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}

/// One value consumed by an [`OutFrame::encode`] directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg<'a> {
    /// `%c`: one byte
    Byte(u8),
    /// `%D`: one 16-bit value, little-endian
    Word(u16),
    /// `%s`: byte string, written up to its first NUL and then terminated
    Str(&'a [u8]),
}

/// Position in an [`OutFrame`] that a failed encode can be rolled back to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    len: usize,
    sum: u8,
}

/// Outbound frame under construction
///
/// The buffer holds the complete wire image: `[control][len][payload][checksum]`.
/// Header and checksum bytes are only filled in by [`OutFrame::seal`].
#[derive(Debug, Clone)]
pub struct OutFrame {
    buf: [u8; OUT_CAPACITY],
    /// Payload length
    len: usize,
    /// Running sum of payload bytes
    sum: u8,
    control: Control,
    sealed: bool,
}

impl Default for OutFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl OutFrame {
    /// Create an empty fire-and-forget frame
    pub const fn new() -> Self {
        Self {
            buf: [0; OUT_CAPACITY],
            len: 0,
            sum: 0,
            control: Control::NoResponse,
            sealed: false,
        }
    }

    /// Drop all staged bytes and return to fire-and-forget defaults
    pub fn reset(&mut self) {
        self.len = 0;
        self.sum = 0;
        self.control = Control::NoResponse;
        self.sealed = false;
    }

    /// Number of payload bytes staged
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if nothing is staged
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Staged payload bytes
    pub fn payload(&self) -> &[u8] {
        &self.buf[2..2 + self.len]
    }

    /// Running checksum of the payload only
    pub fn payload_sum(&self) -> u8 {
        self.sum
    }

    pub fn control(&self) -> Control {
        self.control
    }

    pub fn set_control(&mut self, control: Control) {
        self.control = control;
    }

    /// True once [`OutFrame::seal`] has appended the checksum
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Remember the current write position
    pub fn mark(&self) -> Mark {
        Mark {
            len: self.len,
            sum: self.sum,
        }
    }

    /// Discard everything written after `mark`
    pub fn rewind(&mut self, mark: Mark) {
        self.len = mark.len;
        self.sum = mark.sum;
    }

    /// Append one byte
    pub fn put_u8(&mut self, byte: u8) -> Result<(), FrameError> {
        if self.len >= MAX_PAYLOAD {
            return Err(FrameError::FrameTooLarge);
        }
        self.buf[2 + self.len] = byte;
        self.sum = self.sum.wrapping_add(byte);
        self.len += 1;
        Ok(())
    }

    /// Append a 16-bit value, low byte first
    pub fn put_u16_le(&mut self, value: u16) -> Result<(), FrameError> {
        let [lo, hi] = value.to_le_bytes();
        self.put_u8(lo)?;
        self.put_u8(hi)
    }

    /// Append raw bytes
    pub fn put_bytes(&mut self, bytes: &[u8]) -> Result<(), FrameError> {
        bytes.iter().try_for_each(|&b| self.put_u8(b))
    }

    /// Append a NUL-terminated string
    ///
    /// Bytes after an embedded NUL are not written.
    pub fn put_cstr(&mut self, s: &[u8]) -> Result<(), FrameError> {
        let end = s.iter().position(|&b| b == 0).unwrap_or(s.len());
        self.put_bytes(&s[..end])?;
        self.put_u8(0)
    }

    /// Append the escape byte that opens every command
    pub fn escape(&mut self) -> Result<(), FrameError> {
        self.put_u8(ESC)
    }

    /// Append bytes described by a format string
    ///
    /// Literal bytes are copied. Directives: `%c` byte, `%D` 16-bit
    /// little-endian, `%s` NUL-terminated string, `%%` a literal `%`. An
    /// unknown directive is logged and skipped. A missing or mismatched
    /// argument fails the call.
    ///
    /// The call is all-or-nothing: on error the frame is left as it was.
    /// Returns the new payload length.
    pub fn encode(&mut self, fmt: &[u8], args: &[Arg<'_>]) -> Result<usize, FrameError> {
        let mark = self.mark();
        match self.encode_inner(fmt, args) {
            Ok(()) => Ok(self.len),
            Err(e) => {
                self.rewind(mark);
                Err(e)
            }
        }
    }

    fn encode_inner(&mut self, fmt: &[u8], args: &[Arg<'_>]) -> Result<(), FrameError> {
        let mut args = args.iter();
        let mut bytes = fmt.iter();

        while let Some(&b) = bytes.next() {
            if b != b'%' {
                self.put_u8(b)?;
                continue;
            }

            match bytes.next() {
                Some(b'c') => match args.next() {
                    Some(Arg::Byte(v)) => self.put_u8(*v)?,
                    _ => return Err(FrameError::BadArgument),
                },
                Some(b'D') => match args.next() {
                    Some(Arg::Word(v)) => self.put_u16_le(*v)?,
                    _ => return Err(FrameError::BadArgument),
                },
                Some(b's') => match args.next() {
                    Some(Arg::Str(s)) => self.put_cstr(s)?,
                    _ => return Err(FrameError::BadArgument),
                },
                Some(b'%') => self.put_u8(b'%')?,
                Some(&other) => {
                    warn!("unknown format directive %{}", other);
                }
                None => {
                    warn!("format string ends in a bare %");
                }
            }
        }

        Ok(())
    }

    /// Finalize the frame
    ///
    /// Writes the header, folds control byte and length into the checksum
    /// and appends it. Returns the wire length, or 0 if nothing was staged.
    pub fn seal(&mut self) -> usize {
        if self.len == 0 {
            return 0;
        }

        let control = self.control.to_byte();
        let length = self.len as u8;

        self.buf[0] = control;
        self.buf[1] = length;
        self.buf[2 + self.len] = self.sum.wrapping_add(control).wrapping_add(length);
        self.sealed = true;

        self.len + FRAME_OVERHEAD
    }

    /// Complete wire image of a sealed frame
    ///
    /// Empty if the frame has not been sealed.
    pub fn wire(&self) -> &[u8] {
        if self.sealed {
            &self.buf[..self.len + FRAME_OVERHEAD]
        } else {
            &[]
        }
    }
}

/// Inbound frame as received from the display
///
/// Holds raw wire bytes `[control][len][payload][checksum]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InFrame {
    buf: Vec<u8, IN_CAPACITY>,
}

impl InFrame {
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Copy raw wire bytes into a new frame
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FrameError> {
        let mut frame = Self::new();
        frame
            .buf
            .extend_from_slice(bytes)
            .map_err(|_| FrameError::FrameTooLarge)?;
        Ok(frame)
    }

    /// Build a well-formed frame around `payload`
    ///
    /// This is what the display itself would send; handy for simulation.
    pub fn compose(control: u8, payload: &[u8]) -> Result<Self, FrameError> {
        if payload.len() > MAX_IN_PAYLOAD {
            return Err(FrameError::FrameTooLarge);
        }

        let mut frame = Self::new();
        let length = payload.len() as u8;
        frame.push(control)?;
        frame.push(length)?;
        for &b in payload {
            frame.push(b)?;
        }
        let sum = checksum(payload).wrapping_add(length);
        frame.push(sum)?;
        Ok(frame)
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Append one received byte
    pub fn push(&mut self, byte: u8) -> Result<(), FrameError> {
        self.buf.push(byte).map_err(|_| FrameError::FrameTooLarge)
    }

    /// Overwrite this frame with another one's contents
    pub fn copy_from(&mut self, other: &InFrame) {
        self.buf.clone_from(&other.buf);
    }

    /// Raw received bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Number of raw bytes received
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Control byte, if received
    pub fn control(&self) -> Option<u8> {
        self.buf.first().copied()
    }

    /// Declared payload length, 0 if the header is incomplete
    pub fn declared_len(&self) -> u8 {
        self.buf.get(1).copied().unwrap_or(0)
    }

    /// True if a payload of `declared` bytes plus header and checksum fits
    pub fn fits(declared: u8) -> bool {
        declared as usize <= MAX_IN_PAYLOAD
    }

    /// Check the frame and return its payload
    ///
    /// The checksum covers the length byte and the declared payload, and
    /// must equal the byte that follows them. The control byte is not
    /// part of the sum.
    pub fn validate(&self) -> Result<&[u8], FrameError> {
        if self.buf.len() < 2 {
            return Err(FrameError::Malformed);
        }

        let declared = self.declared_len() as usize;
        if declared == 0 {
            return Err(FrameError::Empty);
        }

        let end = 2 + declared;
        let Some(&trailer) = self.buf.get(end) else {
            return Err(FrameError::Malformed);
        };

        if checksum(&self.buf[1..end]) != trailer {
            return Err(FrameError::ChecksumMismatch);
        }

        Ok(&self.buf[2..end])
    }
}
