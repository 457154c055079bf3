//! Per-node connection: send/receive buffering, the outstanding-request
//! queue, and the state machine that governs both.

use std::collections::VecDeque;
use std::io;

use log::{debug, trace, warn};

use crate::error::{Error, ErrorKind, Result};
use crate::redirect::RequestState;
use crate::transport::Transport;
use crate::value::{self, Decoded, Reply};

/// `disconnected → connecting → ready → draining → (disconnected | failed)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Disconnected,
    Connecting,
    Ready,
    Draining,
    Failed,
}

/// One in-flight request, owned by whichever connection currently holds
/// it. Ownership transfers to a different connection on redirection.
pub struct Request {
    pub bytes: Vec<u8>,
    pub callback: Box<dyn FnOnce(Result<Reply>)>,
    pub target_slot: Option<u16>,
    pub redirect_hops: u32,
    pub retry_attempts: u32,
    pub ask_pending: bool,
    pub state: RequestState,
}

impl Request {
    pub fn new(bytes: Vec<u8>, callback: Box<dyn FnOnce(Result<Reply>)>) -> Request {
        Request {
            bytes,
            callback,
            target_slot: None,
            redirect_hops: 0,
            retry_attempts: 0,
            ask_pending: false,
            state: RequestState::new(),
        }
    }

    pub fn complete(self, result: Result<Reply>) {
        (self.callback)(result)
    }
}

/// A completed reply popped off the head of the pending queue, paired with
/// the request it answers.
pub struct Completed {
    pub request: Request,
    pub reply: Reply,
}

/// Owns exactly one transport and the FIFO queue of requests written to it
/// but not yet answered.
pub struct Connection {
    pub addr: String,
    state: State,
    transport: Box<dyn Transport>,
    send_buffer: Vec<u8>,
    send_cursor: usize,
    recv_buffer: Vec<u8>,
    pending: VecDeque<Request>,
}

impl Connection {
    pub fn new(addr: String, transport: Box<dyn Transport>) -> Connection {
        Connection {
            addr,
            state: State::Connecting,
            transport,
            send_buffer: Vec::new(),
            send_cursor: 0,
            recv_buffer: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn mark_ready(&mut self) {
        debug!("connection to {} ready", self.addr);
        self.state = State::Ready;
    }

    /// Appends a request's bytes to the send buffer and enqueues it.
    /// Accepted in both `Connecting` and `Ready` states: bytes queue up
    /// and flush once the transport is up, matching how a real client
    /// lets callers submit before the handshake completes.
    pub fn enqueue(&mut self, mut request: Request) -> Result<()> {
        if matches!(self.state, State::Draining | State::Failed | State::Disconnected) {
            return Err(Error::simple(
                ErrorKind::IoError,
                "cannot enqueue on a non-accepting connection",
            ));
        }
        request.state.send();
        self.send_buffer.extend_from_slice(&request.bytes);
        self.pending.push_back(request);
        Ok(())
    }

    /// Flushes as much of the send buffer as the transport accepts right
    /// now. Call when the event loop reports write readiness.
    pub fn flush_writes(&mut self) -> Result<()> {
        while self.send_cursor < self.send_buffer.len() {
            match self.transport.write(&self.send_buffer[self.send_cursor..]) {
                Ok(0) => break,
                Ok(n) => self.send_cursor += n,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => {
                    let err = Error::from(e);
                    self.fail(err.clone());
                    return Err(err);
                }
            }
        }
        if self.send_cursor == self.send_buffer.len() {
            self.send_buffer.clear();
            self.send_cursor = 0;
        }
        Ok(())
    }

    /// Reads available bytes and decodes as many complete replies as are
    /// present, returning each paired with the request it answers (popped
    /// FIFO from `pending`).
    pub fn on_readable(&mut self) -> Result<Vec<Completed>> {
        let mut scratch = [0u8; 4096];
        loop {
            match self.transport.read(&mut scratch) {
                Ok(0) => break,
                Ok(n) => self.recv_buffer.extend_from_slice(&scratch[..n]),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => {
                    let err = Error::from(e);
                    self.fail(err.clone());
                    return Err(err);
                }
            }
        }
        self.drain_decoded()
    }

    fn drain_decoded(&mut self) -> Result<Vec<Completed>> {
        let mut completed = Vec::new();
        loop {
            match value::decode_one(&self.recv_buffer) {
                Ok(Decoded::Value(reply, used)) => {
                    self.recv_buffer.drain(..used);
                    match self.pending.pop_front() {
                        Some(request) => completed.push(Completed { request, reply }),
                        None => {
                            warn!("reply received on {} with no pending request", self.addr);
                        }
                    }
                }
                Ok(Decoded::Incomplete) => break,
                Err(e) => {
                    self.fail(e.clone());
                    return Err(e);
                }
            }
        }
        if self.pending.is_empty() && self.state == State::Draining {
            self.state = State::Disconnected;
        }
        Ok(completed)
    }

    /// Moves to `draining`: no new requests are accepted, but outstanding
    /// ones still get their replies. Transitions to `disconnected` once
    /// the pending queue empties.
    pub fn start_draining(&mut self) {
        if self.pending.is_empty() {
            self.state = State::Disconnected;
        } else {
            self.state = State::Draining;
        }
    }

    /// Fails the connection: every pending request's callback fires with
    /// `err`, buffers are discarded, state becomes `failed`.
    pub fn fail(&mut self, err: Error) {
        warn!("connection to {} failed: {err}", self.addr);
        self.state = State::Failed;
        self.send_buffer.clear();
        self.send_cursor = 0;
        self.recv_buffer.clear();
        while let Some(request) = self.pending.pop_front() {
            request.complete(Err(err.clone()));
        }
    }

    pub fn mark_connect_failed(&mut self, err: Error) {
        trace!("connect to {} failed", self.addr);
        self.fail(err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::StubTransport;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn callback_recorder() -> (Rc<RefCell<Vec<Result<Reply>>>>, Box<dyn FnOnce(Result<Reply>)>) {
        let results = Rc::new(RefCell::new(Vec::new()));
        let sink = results.clone();
        let cb: Box<dyn FnOnce(Result<Reply>)> = Box::new(move |r| sink.borrow_mut().push(r));
        (results, cb)
    }

    #[test]
    fn enqueue_then_flush_writes_bytes_to_transport() {
        let transport = StubTransport::new(1);
        let mut conn = Connection::new("10.0.0.1:6379".into(), Box::new(transport));
        conn.mark_ready();
        let (_results, cb) = callback_recorder();
        conn.enqueue(Request::new(b"*1\r\n$4\r\nPING\r\n".to_vec(), cb)).unwrap();
        conn.flush_writes().unwrap();
        assert_eq!(conn.pending_len(), 1);
    }

    #[test]
    fn on_readable_pairs_reply_with_request_fifo() {
        let mut transport = StubTransport::new(1);
        transport.push_reply(b"+PONG\r\n");
        let mut conn = Connection::new("10.0.0.1:6379".into(), Box::new(transport));
        conn.mark_ready();
        let (_results, cb) = callback_recorder();
        conn.enqueue(Request::new(b"*1\r\n$4\r\nPING\r\n".to_vec(), cb)).unwrap();
        let completed = conn.on_readable().unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].reply, Reply::Status("PONG".into()));
    }

    #[test]
    fn fail_invokes_every_pending_callback_with_an_error() {
        let transport = StubTransport::new(1);
        let mut conn = Connection::new("10.0.0.1:6379".into(), Box::new(transport));
        conn.mark_ready();
        let (results, cb) = callback_recorder();
        conn.enqueue(Request::new(b"*1\r\n$4\r\nPING\r\n".to_vec(), cb)).unwrap();
        conn.fail(Error::simple(ErrorKind::IoError, "boom"));
        assert_eq!(results.borrow().len(), 1);
        assert!(results.borrow()[0].is_err());
        assert_eq!(conn.state(), State::Failed);
    }

    #[test]
    fn draining_with_empty_queue_goes_straight_to_disconnected() {
        let transport = StubTransport::new(1);
        let mut conn = Connection::new("10.0.0.1:6379".into(), Box::new(transport));
        conn.mark_ready();
        conn.start_draining();
        assert_eq!(conn.state(), State::Disconnected);
    }

    #[test]
    fn draining_with_pending_requests_waits_for_queue_to_empty() {
        let mut transport = StubTransport::new(1);
        transport.push_reply(b"+PONG\r\n");
        let mut conn = Connection::new("10.0.0.1:6379".into(), Box::new(transport));
        conn.mark_ready();
        let (_results, cb) = callback_recorder();
        conn.enqueue(Request::new(b"*1\r\n$4\r\nPING\r\n".to_vec(), cb)).unwrap();
        conn.start_draining();
        assert_eq!(conn.state(), State::Draining);
        conn.on_readable().unwrap();
        assert_eq!(conn.state(), State::Disconnected);
    }
}
