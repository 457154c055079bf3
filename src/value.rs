//! The reply tree and the RESP2 decoder that produces it.
//!
//! The decoder is a leaf: it knows nothing about slots, connections, or
//! redirection. It turns whatever bytes a transport has handed the
//! connection into zero or more [`Reply`] values plus a byte count telling
//! the caller how much of the buffer was consumed.

use crate::error::{Error, ErrorKind, Result};

/// A decoded RESP2 reply.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    /// `+OK\r\n`-style simple string.
    Status(String),
    /// `-ERR ...\r\n`-style error. The full error text, unparsed.
    Error(String),
    /// `:1234\r\n`.
    Int(i64),
    /// `$3\r\nfoo\r\n`, or `None` for `$-1\r\n`.
    Bulk(Option<Vec<u8>>),
    /// `*2\r\n...`, or `None` for `*-1\r\n`.
    Array(Option<Vec<Reply>>),
}

impl Reply {
    /// Borrow this reply as a bulk string's bytes, if it is one.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Reply::Bulk(Some(b)) => Some(b),
            Reply::Status(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    /// If this is a top-level error reply, the raw error text (e.g.
    /// `"MOVED 1234 10.0.0.2:6379"`).
    pub fn as_error_text(&self) -> Option<&str> {
        match self {
            Reply::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Result of one decode attempt over a byte slice.
pub enum Decoded {
    /// A full reply was decoded, consuming `usize` bytes from the front of
    /// the slice.
    Value(Reply, usize),
    /// The slice does not yet contain a complete reply; the caller should
    /// read more bytes from the transport and retry with the same offset.
    Incomplete,
}

/// Decode exactly one reply from the front of `buf`, if possible.
///
/// Never panics on truncated input — running off the end of `buf` while
/// looking for a terminator or declared length is reported as
/// [`Decoded::Incomplete`], not an error. A malformed leading byte (not one
/// of `+-:$*`) is a [`ErrorKind::ProtocolError`].
pub fn decode_one(buf: &[u8]) -> Result<Decoded> {
    if buf.is_empty() {
        return Ok(Decoded::Incomplete);
    }
    let tag = buf[0];
    let rest = &buf[1..];
    let line = match find_crlf(rest) {
        Some(end) => &rest[..end],
        None => return Ok(Decoded::Incomplete),
    };
    let line_len = line.len() + 2; // + the CRLF itself
    let consumed_header = 1 + line_len;

    match tag {
        b'+' => {
            let s = String::from_utf8_lossy(line).into_owned();
            Ok(Decoded::Value(Reply::Status(s), consumed_header))
        }
        b'-' => {
            let s = String::from_utf8_lossy(line).into_owned();
            Ok(Decoded::Value(Reply::Error(s), consumed_header))
        }
        b':' => {
            let n = parse_i64(line)?;
            Ok(Decoded::Value(Reply::Int(n), consumed_header))
        }
        b'$' => {
            let len = parse_i64(line)?;
            if len < 0 {
                return Ok(Decoded::Value(Reply::Bulk(None), consumed_header));
            }
            let body_start = consumed_header;
            // Compare as u64/i64 before ever adding to a usize offset, so a
            // declared length near i64::MAX can't wrap a 64-bit `usize`.
            let remaining = (buf.len() - body_start) as i64;
            if len + 2 > remaining {
                return Ok(Decoded::Incomplete);
            }
            let len = len as usize;
            let body_end = body_start + len;
            let total = body_end + 2;
            let data = buf[body_start..body_end].to_vec();
            Ok(Decoded::Value(Reply::Bulk(Some(data)), total))
        }
        b'*' => {
            let len = parse_i64(line)?;
            if len < 0 {
                return Ok(Decoded::Value(Reply::Array(None), consumed_header));
            }
            // An array can't have more elements than there are remaining
            // bytes (each element needs at least 1), so this also bounds
            // the `with_capacity` below against a huge declared length.
            if len > (buf.len() - consumed_header) as i64 {
                return Ok(Decoded::Incomplete);
            }
            let len = len as usize;
            let mut items = Vec::with_capacity(len);
            let mut offset = consumed_header;
            for _ in 0..len {
                match decode_one(&buf[offset..])? {
                    Decoded::Value(v, used) => {
                        items.push(v);
                        offset += used;
                    }
                    Decoded::Incomplete => return Ok(Decoded::Incomplete),
                }
            }
            Ok(Decoded::Value(Reply::Array(Some(items)), offset))
        }
        _ => Err(Error::with_message(
            ErrorKind::ProtocolError,
            "Invalid reply",
            format!("unexpected leading byte {:#x}", tag),
        )),
    }
}

fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\r\n")
}

fn parse_i64(line: &[u8]) -> Result<i64> {
    std::str::from_utf8(line)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| {
            Error::with_message(
                ErrorKind::ProtocolError,
                "Invalid reply",
                "expected a decimal integer length/value".to_owned(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_simple_string() {
        match decode_one(b"+OK\r\n").unwrap() {
            Decoded::Value(Reply::Status(s), used) => {
                assert_eq!(s, "OK");
                assert_eq!(used, 5);
            }
            _ => panic!("expected a value"),
        }
    }

    #[test]
    fn decodes_bulk_string() {
        match decode_one(b"$3\r\nbar\r\n").unwrap() {
            Decoded::Value(Reply::Bulk(Some(b)), used) => {
                assert_eq!(b, b"bar");
                assert_eq!(used, 9);
            }
            _ => panic!("expected a value"),
        }
    }

    #[test]
    fn decodes_nil_bulk() {
        match decode_one(b"$-1\r\n").unwrap() {
            Decoded::Value(Reply::Bulk(None), _) => {}
            _ => panic!("expected nil bulk"),
        }
    }

    #[test]
    fn decodes_error() {
        match decode_one(b"-MOVED 1234 10.0.0.2:6379\r\n").unwrap() {
            Decoded::Value(Reply::Error(s), _) => assert_eq!(s, "MOVED 1234 10.0.0.2:6379"),
            _ => panic!("expected an error"),
        }
    }

    #[test]
    fn decodes_array() {
        match decode_one(b"*2\r\n$3\r\nfoo\r\n:7\r\n").unwrap() {
            Decoded::Value(Reply::Array(Some(items)), used) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[0], Reply::Bulk(Some(b"foo".to_vec())));
                assert_eq!(items[1], Reply::Int(7));
                assert_eq!(used, 17);
            }
            _ => panic!("expected an array"),
        }
    }

    #[test]
    fn reports_incomplete_on_truncated_bulk() {
        match decode_one(b"$5\r\nfo").unwrap() {
            Decoded::Incomplete => {}
            _ => panic!("expected incomplete"),
        }
    }

    #[test]
    fn reports_incomplete_without_crlf() {
        match decode_one(b"+OK").unwrap() {
            Decoded::Incomplete => {}
            _ => panic!("expected incomplete"),
        }
    }

    #[test]
    fn rejects_unknown_tag() {
        assert!(decode_one(b"!nope\r\n").is_err());
    }
}
