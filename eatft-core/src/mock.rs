//! Blocking in-memory transport for tests

use eatft_protocol::{InFrame, DC1, OUT_CAPACITY};
use heapless::{Deque, Vec};

use crate::traits::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

/// Records transmitted frames and answers each receive with the next
/// queued reply, or an empty frame when none is queued
pub struct MockTransport {
    pub sent: Vec<Vec<u8, OUT_CAPACITY>, 32>,
    pub transmits: usize,
    pub receives: usize,
    pub replies: Deque<InFrame, 8>,
    pub current: InFrame,
    pub ready: bool,
    pub fail_transmit: bool,
    pub fault: Option<MockError>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            sent: Vec::new(),
            transmits: 0,
            receives: 0,
            replies: Deque::new(),
            current: InFrame::new(),
            ready: true,
            fail_transmit: false,
            fault: None,
        }
    }

    /// Queue a well-formed answer carrying `payload`
    pub fn reply(&mut self, payload: &[u8]) {
        self.reply_frame(InFrame::compose(DC1, payload).unwrap());
    }

    /// Queue raw answer bytes
    pub fn reply_raw(&mut self, bytes: &[u8]) {
        self.reply_frame(InFrame::from_bytes(bytes).unwrap());
    }

    pub fn reply_frame(&mut self, frame: InFrame) {
        self.replies.push_back(frame).unwrap();
    }

    pub fn last_sent(&self) -> &[u8] {
        self.sent.last().map(|f| f.as_slice()).unwrap_or(&[])
    }

    /// Payloads of frames sent without expecting an answer
    pub fn commands(&self) -> impl Iterator<Item = &[u8]> {
        self.sent
            .iter()
            .filter(|f| f[0] == DC1)
            .map(|f| &f[2..f.len() - 1])
    }
}

impl Transport for MockTransport {
    type Error = MockError;

    fn transmit(&mut self, frame: &[u8]) -> Result<(), MockError> {
        if self.fail_transmit {
            return Err(MockError);
        }
        self.transmits += 1;
        let _ = self.sent.push(Vec::from_slice(frame).unwrap());
        Ok(())
    }

    fn receive(&mut self) -> Result<(), MockError> {
        self.receives += 1;
        self.current = match self.replies.pop_front() {
            Some(frame) => frame,
            None => InFrame::compose(DC1, &[]).unwrap(),
        };
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn fetch(&mut self, frame: &mut InFrame) -> Result<(), MockError> {
        frame.copy_from(&self.current);
        Ok(())
    }

    fn take_fault(&mut self) -> Option<MockError> {
        self.fault.take()
    }
}
