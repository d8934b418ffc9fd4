//! Display session
//!
//! A [`Session`] owns the outbound and inbound frame buffers, the widget
//! table and the transport. Commands are staged into the outbound frame
//! and only leave when the session is flushed:
//!
//! ```ignore
//! session.send(&Command::Clear)?;
//! session.text_box(rect, TextPos::MidCenter, "Hello")?;
//! session.flush()?;   // seal and arm
//! session.settle()?;  // drive until the frame is acknowledged
//! ```
//!
//! When nothing is staged, advancing an idle session sends a poll. The
//! display answers with its send buffer, which carries touch and button
//! input; valid answers are routed to widget callbacks.

use embassy_futures::yield_now;
use eatft_protocol::{
    Arg, Command, Control, DisplayEvent, EventError, FrameError, InFrame, OutFrame, Rect, TextPos,
};

use crate::config::{DisplayConfig, MAX_WIDGETS};
use crate::error::Error;
use crate::state::State;
use crate::traits::Transport;
use crate::widget::{Registry, WidgetEvent};

/// Widget callback
pub type Callback<T, U> = fn(&mut Session<T, U>, WidgetEvent);

/// Hook run after every valid inbound frame, matched or not
pub type UserAction<T, U> = fn(&mut Session<T, U>);

/// Payload of the poll request ("send buffer")
const POLL: u8 = b'S';

/// Protocol session with one display
///
/// `U` is application state reachable from callbacks through
/// [`Session::user_mut`].
pub struct Session<T, U = ()> {
    pub(crate) transport: T,
    pub(crate) out: OutFrame,
    pub(crate) inbound: InFrame,
    pub(crate) state: State,
    /// Where `Transmit` continues
    pub(crate) next_state: State,
    pub(crate) widgets: Registry<Callback<T, U>, MAX_WIDGETS>,
    pub(crate) window: Option<Rect>,
    pub(crate) config: DisplayConfig,
    pub(crate) user_action: Option<UserAction<T, U>>,
    pub(crate) user: U,
}

impl<T: Transport> Session<T> {
    /// Create a session with default configuration and no user state
    pub fn new(transport: T) -> Self {
        Self::with_user(transport, DisplayConfig::default(), ())
    }
}

impl<T: Transport, U> Session<T, U> {
    pub fn with_user(transport: T, config: DisplayConfig, user: U) -> Self {
        Self {
            transport,
            out: OutFrame::new(),
            inbound: InFrame::new(),
            state: State::Ready,
            next_state: State::Reset,
            widgets: Registry::new(),
            window: None,
            config,
            user_action: None,
            user,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn user(&self) -> &U {
        &self.user
    }

    pub fn user_mut(&mut self) -> &mut U {
        &mut self.user
    }

    pub fn widgets(&self) -> &Registry<Callback<T, U>, MAX_WIDGETS> {
        &self.widgets
    }

    /// Outbound frame as staged so far
    pub fn staged(&self) -> &OutFrame {
        &self.out
    }

    /// Last frame received from the display
    pub fn inbound(&self) -> &InFrame {
        &self.inbound
    }

    /// Tear down the session, returning transport and user state
    pub fn into_parts(self) -> (T, U) {
        (self.transport, self.user)
    }

    /// Install the hook run after each valid inbound frame
    pub fn register_user_action(&mut self, hook: UserAction<T, U>) {
        self.user_action = Some(hook);
    }

    pub fn clear_user_action(&mut self) {
        self.user_action = None;
    }

    /// Advance the session by one state
    ///
    /// Does nothing while the transport is busy. An idle session with
    /// nothing staged sends a poll. While commands are staged but not yet
    /// flushed, an idle session holds them and skips the poll. A transport
    /// error resets the session and drops the frame in flight.
    pub fn process(&mut self) -> Result<(), Error<T::Error>> {
        if !self.transport.is_ready() {
            return Ok(());
        }

        if let Some(fault) = self.transport.take_fault() {
            return Err(self.abort(fault));
        }

        let state = self.state;
        match state {
            State::Ready => {
                // Staged commands only leave through flush or poll
                if !self.out.is_empty() {
                    trace!("{} bytes staged, waiting for flush", self.out.len());
                    return Ok(());
                }
                self.stage_poll()?;
                self.arm();
            }
            State::Transmit => {
                if let Err(e) = self.transport.transmit(self.out.wire()) {
                    return Err(self.abort(e));
                }
                self.enter(state.next(self.next_state));
            }
            State::Receive => {
                if let Err(e) = self.transport.receive() {
                    return Err(self.abort(e));
                }
                self.enter(state.next(self.next_state));
            }
            State::Event => {
                // Callbacks may stage and flush new commands
                self.enter(state.next(self.next_state));
                if let Err(e) = self.transport.fetch(&mut self.inbound) {
                    return Err(self.abort(e));
                }
                self.handle_inbound();
            }
            State::Reset => {
                self.out.reset();
                self.next_state = State::Reset;
                self.enter(state.next(self.next_state));
            }
        }

        Ok(())
    }

    /// Drive the session until it is ready for new commands
    pub fn settle(&mut self) -> Result<(), Error<T::Error>> {
        while !self.state.is_ready() {
            self.process()?;
        }
        Ok(())
    }

    /// Seal the staged commands and arm them for transmission
    ///
    /// Waits for the previous frame first. With nothing staged this is a
    /// no-op; the frame leaves on the next [`Session::process`].
    pub fn flush(&mut self) -> Result<(), Error<T::Error>> {
        self.settle()?;
        self.arm();
        Ok(())
    }

    /// Ask the display for pending input
    ///
    /// Anything staged is sent first.
    pub fn poll(&mut self) -> Result<(), Error<T::Error>> {
        self.flush()?;
        self.settle()?;
        self.stage_poll()?;
        self.arm();
        Ok(())
    }

    /// Like [`Session::settle`], yielding while the transport is busy
    pub async fn settle_async(&mut self) -> Result<(), Error<T::Error>> {
        while !self.state.is_ready() {
            if self.transport.is_ready() {
                self.process()?;
            } else {
                yield_now().await;
            }
        }
        Ok(())
    }

    /// Like [`Session::flush`], yielding while the transport is busy
    pub async fn flush_async(&mut self) -> Result<(), Error<T::Error>> {
        self.settle_async().await?;
        self.arm();
        Ok(())
    }

    /// Start a new command in the outbound frame
    ///
    /// Waits until the session is ready, writes the escape byte and hands
    /// out the frame for the command body. Writes through the returned
    /// frame are not rolled back: a failing `put_*` leaves the partial
    /// command staged unless the caller rewinds to an [`OutFrame::mark`]
    /// taken after this call returns. [`Session::stage_with`] does that.
    pub fn begin_frame(&mut self) -> Result<&mut OutFrame, Error<T::Error>> {
        self.settle()?;
        self.out.escape()?;
        Ok(&mut self.out)
    }

    /// Stage one command written by `write`, all or nothing
    ///
    /// The escape byte is written first. If `write` fails, the frame is
    /// rewound to where it was before the call.
    pub fn stage_with<F>(&mut self, write: F) -> Result<(), Error<T::Error>>
    where
        F: FnOnce(&mut OutFrame) -> Result<(), FrameError>,
    {
        self.settle()?;
        let mark = self.out.mark();
        if let Err(e) = self.out.escape().and_then(|()| write(&mut self.out)) {
            self.out.rewind(mark);
            return Err(e.into());
        }
        Ok(())
    }

    /// Stage one command described by a format string
    ///
    /// See [`OutFrame::encode`] for the directives. The escape byte is
    /// written first. Nothing is staged if the call fails. Returns the
    /// staged payload length.
    pub fn encode(&mut self, fmt: &[u8], args: &[Arg<'_>]) -> Result<usize, Error<T::Error>> {
        self.settle()?;
        let mark = self.out.mark();
        match self.out.escape().and_then(|()| self.out.encode(fmt, args)) {
            Ok(len) => Ok(len),
            Err(e) => {
                self.out.rewind(mark);
                Err(e.into())
            }
        }
    }

    /// Stage one command
    pub fn send(&mut self, command: &Command<'_>) -> Result<(), Error<T::Error>> {
        self.settle()?;
        command.encode(&mut self.out)?;
        Ok(())
    }

    /// Stage text inside `rect`, inset by the configured margins
    pub fn text_box(
        &mut self,
        rect: Rect,
        pos: TextPos,
        text: &str,
    ) -> Result<(), Error<T::Error>> {
        let area = self.config.inset(rect);
        self.send(&Command::TextBox { area, pos, text })
    }

    fn enter(&mut self, state: State) {
        trace!("session {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    fn stage_poll(&mut self) -> Result<(), FrameError> {
        self.out.put_u8(POLL)?;
        self.out.set_control(Control::Response);
        self.next_state = State::Receive;
        Ok(())
    }

    /// Seal the frame and schedule it, if anything is staged
    fn arm(&mut self) {
        if self.out.seal() > 0 {
            self.enter(State::Transmit);
        }
    }

    fn abort(&mut self, e: T::Error) -> Error<T::Error> {
        error!("transport failed in {:?}, resetting session", self.state);
        self.out.reset();
        self.inbound.clear();
        self.next_state = State::Reset;
        self.state = State::Ready;
        Error::Transport(e)
    }

    fn handle_inbound(&mut self) {
        let event = match self.inbound.validate() {
            Ok(payload) => DisplayEvent::parse(payload),
            Err(FrameError::Empty) => {
                trace!("no input pending");
                return;
            }
            Err(e) => {
                warn!("dropping inbound frame: {:?}", e);
                return;
            }
        };

        match event {
            Ok(event) => self.dispatch(event),
            Err(EventError::UnknownCommand(cmd)) => debug!("ignoring inbound command {}", cmd),
            Err(e) => warn!("dropping malformed event: {:?}", e),
        }

        if let Some(hook) = self.user_action {
            hook(self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockError, MockTransport};
    use eatft_protocol::{checksum, DC1, DC2, ESC};

    fn session() -> Session<MockTransport, u32> {
        Session::with_user(MockTransport::new(), DisplayConfig::default(), 0)
    }

    fn count_hook(session: &mut Session<MockTransport, u32>) {
        *session.user_mut() += 1;
    }

    #[test]
    fn test_encode_stages_without_sending() {
        let mut s = session();
        let len = s.encode(b"DL", &[]).unwrap();
        assert_eq!(len, 3);
        assert_eq!(s.staged().payload(), &[ESC, b'D', b'L']);
        assert_eq!(s.transport().transmits, 0);
        assert_eq!(s.state(), State::Ready);
    }

    #[test]
    fn test_flush_arms_and_settle_sends() {
        let mut s = session();
        s.send(&Command::Clear).unwrap();
        s.flush().unwrap();
        assert_eq!(s.state(), State::Transmit);
        assert_eq!(s.transport().transmits, 0);

        s.settle().unwrap();
        assert_eq!(s.state(), State::Ready);
        assert_eq!(s.transport().transmits, 1);

        let frame = s.transport().last_sent();
        assert_eq!(&frame[..2], &[DC1, 3]);
        assert_eq!(&frame[2..5], &[ESC, b'D', b'L']);
        assert_eq!(frame[5], checksum(&frame[..5]));
    }

    #[test]
    fn test_flush_with_nothing_staged_is_noop() {
        let mut s = session();
        s.flush().unwrap();
        s.flush().unwrap();
        assert_eq!(s.state(), State::Ready);
        assert_eq!(s.transport().transmits, 0);

        s.send(&Command::Clear).unwrap();
        s.flush().unwrap();
        s.flush().unwrap();
        s.flush().unwrap();
        assert_eq!(s.transport().transmits, 1);
    }

    #[test]
    fn test_percent_escape_reaches_wire() {
        let mut s = session();
        s.encode(b"ZL%D%D50%%\0", &[Arg::Word(10), Arg::Word(20)])
            .unwrap();
        s.flush().unwrap();
        s.settle().unwrap();

        let frame = s.transport().last_sent();
        let payload = &frame[2..frame.len() - 1];
        assert_eq!(payload, &[ESC, b'Z', b'L', 10, 0, 20, 0, b'5', b'0', b'%', 0]);
        assert_eq!(frame[frame.len() - 1], checksum(&frame[..frame.len() - 1]));
    }

    #[test]
    fn test_failed_encode_leaves_frame_unchanged() {
        let mut s = session();
        s.send(&Command::Clear).unwrap();
        let before = s.staged().payload_sum();

        let err = s.encode(b"%c%c", &[Arg::Byte(1)]).unwrap_err();
        assert_eq!(err, Error::Frame(FrameError::BadArgument));
        assert_eq!(s.staged().payload(), &[ESC, b'D', b'L']);
        assert_eq!(s.staged().payload_sum(), before);
    }

    #[test]
    fn test_oversized_command_rejected() {
        let mut s = session();
        let text = "0123456789012345678901234567890123456789012345678901234567890123";
        let err = s
            .text_box(Rect::new(0, 0, 100, 100), TextPos::MidCenter, text)
            .unwrap_err();
        assert_eq!(err, Error::Frame(FrameError::FrameTooLarge));
        assert!(s.staged().is_empty());
    }

    #[test]
    fn test_idle_process_polls() {
        let mut s = session();
        s.process().unwrap();
        assert_eq!(s.state(), State::Transmit);
        s.settle().unwrap();

        assert_eq!(s.transport().transmits, 1);
        assert_eq!(s.transport().receives, 1);
        let frame = s.transport().last_sent();
        assert_eq!(frame, &[DC2, 1, b'S', DC2 + 1 + b'S']);
    }

    #[test]
    fn test_idle_process_holds_staged_commands() {
        let mut s = session();
        s.encode(b"DL", &[]).unwrap();
        for _ in 0..3 {
            s.process().unwrap();
        }
        s.settle().unwrap();

        assert_eq!(s.transport().transmits, 0);
        assert_eq!(s.transport().receives, 0);
        assert_eq!(s.state(), State::Ready);
        assert_eq!(s.staged().payload(), &[ESC, b'D', b'L']);

        // Still staged once flushed, and sent as a plain command
        s.flush().unwrap();
        s.settle().unwrap();
        assert_eq!(s.transport().transmits, 1);
        assert_eq!(s.transport().last_sent()[0], DC1);
        assert_eq!(s.transport().commands().last(), Some(&[ESC, b'D', b'L'][..]));
    }

    #[test]
    fn test_poll_sends_staged_then_requests() {
        let mut s = session();
        s.send(&Command::Clear).unwrap();
        s.poll().unwrap();
        s.settle().unwrap();

        assert_eq!(s.transport().transmits, 2);
        assert_eq!(s.transport().receives, 1);
        assert_eq!(s.transport().sent[0][0], DC1);
        assert_eq!(s.transport().sent[1][0], DC2);
    }

    #[test]
    fn test_control_resets_after_poll() {
        let mut s = session();
        s.poll().unwrap();
        s.settle().unwrap();

        s.send(&Command::Clear).unwrap();
        assert_eq!(s.staged().control(), Control::NoResponse);
    }

    #[test]
    fn test_hook_runs_on_valid_frame() {
        let mut s = session();
        s.register_user_action(count_hook);
        s.transport_mut().reply(&[ESC, b'A', 1, 0x85]);
        s.poll().unwrap();
        s.settle().unwrap();
        assert_eq!(*s.user(), 1);
    }

    #[test]
    fn test_hook_skipped_for_empty_answer() {
        let mut s = session();
        s.register_user_action(count_hook);
        s.poll().unwrap();
        s.settle().unwrap();
        assert_eq!(*s.user(), 0);
    }

    #[test]
    fn test_hook_skipped_on_bad_checksum() {
        let mut s = session();
        s.register_user_action(count_hook);

        let good = InFrame::compose(DC1, &[ESC, b'A', 1, 0x81]).unwrap();
        let mut bytes = [0u8; 7];
        bytes.copy_from_slice(good.as_bytes());
        bytes[6] = bytes[6].wrapping_add(1);
        s.transport_mut().reply_raw(&bytes);

        s.poll().unwrap();
        s.settle().unwrap();
        assert_eq!(*s.user(), 0);
    }

    #[test]
    fn test_clear_user_action() {
        let mut s = session();
        s.register_user_action(count_hook);
        s.clear_user_action();
        s.transport_mut().reply(&[ESC, b'A', 1, 0x85]);
        s.poll().unwrap();
        s.settle().unwrap();
        assert_eq!(*s.user(), 0);
    }

    #[test]
    fn test_busy_transport_defers() {
        let mut s = session();
        s.send(&Command::Clear).unwrap();
        s.flush().unwrap();

        s.transport_mut().ready = false;
        for _ in 0..3 {
            s.process().unwrap();
        }
        assert_eq!(s.state(), State::Transmit);
        assert_eq!(s.transport().transmits, 0);

        s.transport_mut().ready = true;
        s.settle().unwrap();
        assert_eq!(s.transport().transmits, 1);
    }

    #[test]
    fn test_transmit_error_resets_session() {
        let mut s = session();
        s.send(&Command::Clear).unwrap();
        s.flush().unwrap();
        s.transport_mut().fail_transmit = true;

        assert_eq!(s.settle(), Err(Error::Transport(MockError)));
        assert_eq!(s.state(), State::Ready);
        assert!(s.staged().is_empty());
    }

    #[test]
    fn test_background_fault_reported() {
        let mut s = session();
        s.poll().unwrap();
        s.transport_mut().fault = Some(MockError);

        assert_eq!(s.process(), Err(Error::Transport(MockError)));
        assert_eq!(s.state(), State::Ready);

        // Next step polls again
        s.process().unwrap();
        s.settle().unwrap();
        assert_eq!(s.transport().receives, 1);
    }

    #[test]
    fn test_begin_frame_typed_writes() {
        let mut s = session();
        let frame = s.begin_frame().unwrap();
        frame.put_bytes(b"GD").unwrap();
        frame.put_u16_le(300).unwrap();
        assert_eq!(s.staged().payload(), &[ESC, b'G', b'D', 0x2C, 0x01]);
    }

    #[test]
    fn test_stage_with_rolls_back_partial_command() {
        let mut s = session();
        s.send(&Command::Clear).unwrap();

        let err = s
            .stage_with(|f| {
                f.put_bytes(b"ZL")?;
                f.put_bytes(&[b'x'; 64])
            })
            .unwrap_err();
        assert_eq!(err, Error::Frame(FrameError::FrameTooLarge));
        assert_eq!(s.staged().payload(), &[ESC, b'D', b'L']);
        assert_eq!(s.staged().payload_sum(), checksum(&[ESC, b'D', b'L']));

        s.stage_with(|f| f.put_bytes(b"DL")).unwrap();
        assert_eq!(s.staged().payload(), &[ESC, b'D', b'L', ESC, b'D', b'L']);
    }

    #[test]
    fn test_text_box_applies_margins() {
        let mut s = session();
        s.text_box(Rect::new(10, 20, 100, 50), TextPos::TopLeft, "Hi")
            .unwrap();
        assert_eq!(
            s.staged().payload(),
            &[ESC, b'Z', b'B', 12, 0, 22, 0, 106, 0, 66, 0, 1, b'H', b'i', 0]
        );
    }

    #[test]
    fn test_flush_async() {
        let mut s = session();
        s.send(&Command::Clear).unwrap();
        embassy_futures::block_on(async {
            s.flush_async().await.unwrap();
            s.settle_async().await.unwrap();
        });
        assert_eq!(s.transport().transmits, 1);
    }

    #[test]
    fn test_into_parts() {
        let mut s = session();
        *s.user_mut() = 7;
        let (transport, user) = s.into_parts();
        assert_eq!(transport.transmits, 0);
        assert_eq!(user, 7);
    }
}
