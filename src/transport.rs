//! The byte transport: out of scope as a concrete implementation (TCP/TLS
//! socket handling belongs to the embedding application), but its interface
//! is part of this crate's contract, since [`crate::connection::Connection`]
//! is written against it.

use std::collections::VecDeque;
use std::io;

use crate::event_loop::Descriptor;

/// A non-blocking byte-stream transport. `write`/`read` follow the usual
/// non-blocking socket convention: `Ok(0)` on read means "nothing
/// available right now", and `io::ErrorKind::WouldBlock` may be returned by
/// either side instead of `Ok(0)`. Errors otherwise fail the connection.
pub trait Transport {
    fn descriptor(&self) -> Descriptor;
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize>;
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// An in-memory stand-in used by dispatcher-level tests: writes are
/// recorded rather than sent anywhere, and reads are served from a
/// pre-scripted queue of byte chunks, one per call, letting a test drive
/// exact reply framing (including splitting a reply across multiple reads).
#[derive(Default)]
pub struct StubTransport {
    descriptor: Descriptor,
    pub written: Vec<u8>,
    scripted_reads: VecDeque<Vec<u8>>,
}

impl StubTransport {
    pub fn new(descriptor: Descriptor) -> StubTransport {
        StubTransport {
            descriptor,
            written: Vec::new(),
            scripted_reads: VecDeque::new(),
        }
    }

    /// Queues a chunk of bytes to be handed back on a future `read` call.
    pub fn push_reply(&mut self, bytes: &[u8]) {
        self.scripted_reads.push_back(bytes.to_vec());
    }
}

impl Transport for StubTransport {
    fn descriptor(&self) -> Descriptor {
        self.descriptor
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.scripted_reads.pop_front() {
            Some(chunk) => {
                let n = chunk.len().min(buf.len());
                buf[..n].copy_from_slice(&chunk[..n]);
                if n < chunk.len() {
                    // partial consume: push the remainder back for next read
                    let mut remainder = chunk;
                    remainder.drain(..n);
                    self.scripted_reads.push_front(remainder);
                }
                Ok(n)
            }
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_writes_and_replays_scripted_reads() {
        let mut t = StubTransport::new(1);
        t.write(b"hello").unwrap();
        assert_eq!(t.written, b"hello");

        t.push_reply(b"+OK\r\n");
        let mut buf = [0u8; 16];
        let n = t.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"+OK\r\n");
    }

    #[test]
    fn read_with_no_scripted_data_returns_zero() {
        let mut t = StubTransport::new(1);
        let mut buf = [0u8; 4];
        assert_eq!(t.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn read_splits_a_chunk_larger_than_the_buffer() {
        let mut t = StubTransport::new(1);
        t.push_reply(b"0123456789");
        let mut buf = [0u8; 4];
        let n1 = t.read(&mut buf).unwrap();
        assert_eq!(&buf[..n1], b"0123");
        let n2 = t.read(&mut buf).unwrap();
        assert_eq!(&buf[..n2], b"4567");
    }
}
