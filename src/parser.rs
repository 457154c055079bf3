//! The wire-format command parser: turns one serialized RESP2 request into
//! a resolved command descriptor and its key list.
//!
//! This does not touch sockets or buffering across calls — given a byte
//! slice that holds exactly one multi-bulk request, it tokenizes, resolves
//! the descriptor (including subcommand dispatch), checks arity, and runs
//! key extraction. Everything it returns borrows `buf`'s offsets rather
//! than copying argument bytes.

use crate::commands::{self, CommandInfo};
use crate::error::{Error, ErrorKind, Result};
use crate::keys::{self, KeySpan};

/// A fully parsed request: the resolved descriptor and the keys it touches.
#[derive(Debug)]
pub struct ParsedCommand {
    /// Byte offsets of every argv element (including argv[0] and, for a
    /// subcommand-dispatch command, argv[1]) within the original buffer.
    pub argv: Vec<(usize, usize)>,
    /// The descriptor this command resolved to: a subcommand's child entry
    /// when the top-level command dispatches on one.
    pub descriptor: &'static CommandInfo,
    pub keys: Vec<KeySpan>,
}

impl ParsedCommand {
    pub fn argc(&self) -> usize {
        self.argv.len()
    }

    pub fn arg<'a>(&self, buf: &'a [u8], index: usize) -> &'a [u8] {
        let (s, e) = self.argv[index];
        &buf[s..e]
    }
}

fn parse_error(msg: impl Into<String>) -> Error {
    Error::with_message(ErrorKind::ParseError, "Command parse error", msg.into())
}

fn find_crlf(buf: &[u8], from: usize) -> Option<usize> {
    buf[from..].windows(2).position(|w| w == b"\r\n").map(|p| from + p)
}

fn parse_decimal(buf: &[u8], line_end: usize, cursor: usize) -> Result<i64> {
    std::str::from_utf8(&buf[cursor..line_end])
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| parse_error("expected a decimal length"))
}

/// Splits a multi-bulk request into argv spans.
fn tokenize(buf: &[u8]) -> Result<Vec<(usize, usize)>> {
    if buf.first() != Some(&b'*') {
        return Err(parse_error("request did not begin with '*'"));
    }
    let mut cursor = 1;
    let header_end = find_crlf(buf, cursor).ok_or_else(|| parse_error("missing CRLF after argc"))?;
    let argc = parse_decimal(buf, header_end, cursor)?;
    if argc < 0 {
        return Err(parse_error("negative argc"));
    }
    // Every argument needs at least 4 bytes ("$0\r\n" plus its own
    // trailing CRLF), so argc can never legitimately exceed the buffer
    // length. Rejecting early here also keeps the Vec::with_capacity
    // below from being handed an attacker-controlled huge capacity.
    if argc as usize > buf.len() {
        return Err(parse_error("argc exceeds the size of the buffer"));
    }
    cursor = header_end + 2;

    let mut argv = Vec::with_capacity(argc as usize);
    for _ in 0..argc {
        if cursor >= buf.len() || buf[cursor] != b'$' {
            return Err(parse_error("expected '$' bulk header"));
        }
        cursor += 1;
        let line_end = find_crlf(buf, cursor).ok_or_else(|| parse_error("missing CRLF after bulk length"))?;
        let len = parse_decimal(buf, line_end, cursor)?;
        if len < 0 {
            return Err(parse_error("negative bulk length"));
        }
        let data_start = line_end + 2;
        let remaining = buf.len().saturating_sub(data_start);
        // Compare as u64 so a declared length near i64::MAX can never
        // overflow when added to an offset. `+ 2` accounts for the
        // argument's own trailing CRLF, which must also fit.
        if len as u64 + 2 > remaining as u64 {
            return Err(parse_error("truncated request"));
        }
        let len = len as usize;
        let data_end = data_start + len;
        if &buf[data_end..data_end + 2] != b"\r\n" {
            return Err(parse_error("bulk argument missing trailing CRLF"));
        }
        argv.push((data_start, data_end));
        cursor = data_end + 2;
    }
    Ok(argv)
}

fn satisfies_arity(descriptor: &CommandInfo, argc: usize) -> bool {
    if descriptor.arity >= 0 {
        argc == descriptor.arity as usize
    } else {
        argc >= (-descriptor.arity) as usize
    }
}

/// Parses and resolves one request, returning its descriptor and key list.
///
/// Error messages mirror the server's own wording: an unresolved command or
/// subcommand produces `"Unknown command '<name>', with args beginning
/// with: ..."`-style text rooted in the raw input bytes; a descriptor-level
/// arity or key-extraction failure names the command by its canonical,
/// uppercase table entry.
pub fn parse(buf: &[u8]) -> Result<ParsedCommand> {
    let argv = tokenize(buf)?;
    if argv.is_empty() {
        return Err(parse_error("empty request"));
    }

    let name_bytes = &buf[argv[0].0..argv[0].1];
    let top = commands::lookup(name_bytes).ok_or_else(|| {
        Error::with_message(
            ErrorKind::UnknownCommand,
            "Unknown command",
            String::from_utf8_lossy(name_bytes).into_owned(),
        )
    })?;

    let descriptor = if top.flags.subcommand_dispatch {
        if argv.len() < 2 {
            // No subcommand token to dispatch on at all; the server reports
            // this the same way it reports a name it has never heard of.
            return Err(Error::with_message(
                ErrorKind::UnknownCommand,
                "Unknown command",
                String::from_utf8_lossy(name_bytes).into_owned(),
            ));
        }
        let sub_bytes = &buf[argv[1].0..argv[1].1];
        commands::lookup_subcommand(top, sub_bytes).ok_or_else(|| {
            Error::with_message(
                ErrorKind::UnknownCommand,
                "Unknown command",
                format!(
                    "{} {}",
                    String::from_utf8_lossy(name_bytes),
                    String::from_utf8_lossy(sub_bytes)
                ),
            )
        })?
    } else {
        top
    };

    if !satisfies_arity(descriptor, argv.len()) {
        let label = if top.flags.subcommand_dispatch {
            format!("{} {}", top.name, descriptor.name)
        } else {
            descriptor.name.to_owned()
        };
        return Err(Error::with_message(
            ErrorKind::WrongArity,
            "Wrong number of arguments",
            label,
        ));
    }

    // Subcommand descriptors' first_key/last_key are indices into the full
    // argv (argv[0] is the parent command, argv[1] the subcommand token),
    // the same convention XGROUP/XINFO/CLUSTER use server-side, so no
    // slicing is needed here even when a subcommand was resolved.
    let keys = keys::extract(descriptor, &argv, buf)?;

    if descriptor.flags.needs_keys && keys.is_empty() {
        let label = if top.flags.subcommand_dispatch {
            format!("{} {}", top.name, descriptor.name)
        } else {
            descriptor.name.to_owned()
        };
        return Err(Error::with_message(
            ErrorKind::NoKeys,
            "Failed to find keys of command",
            label,
        ));
    }

    Ok(ParsedCommand { argv, descriptor, keys })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(parts: &[&str]) -> Vec<u8> {
        let mut buf = format!("*{}\r\n", parts.len()).into_bytes();
        for p in parts {
            buf.extend_from_slice(format!("${}\r\n{}\r\n", p.len(), p).into_bytes().as_slice());
        }
        buf
    }

    #[test]
    fn rejects_non_array_prefix() {
        let err = parse(b"GET foo\r\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseError);
    }

    #[test]
    fn resolves_simple_command_and_key() {
        let buf = encode(&["GET", "foo"]);
        let parsed = parse(&buf).unwrap();
        assert_eq!(parsed.descriptor.name, "GET");
        assert_eq!(parsed.keys.len(), 1);
        assert_eq!(parsed.keys[0].bytes(&buf), b"foo");
    }

    #[test]
    fn unknown_command_reports_raw_name() {
        let buf = encode(&["NOTACOMMAND", "x"]);
        let err = parse(&buf).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownCommand);
    }

    #[test]
    fn wrong_arity_is_reported() {
        let buf = encode(&["GET"]);
        let err = parse(&buf).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WrongArity);
    }

    #[test]
    fn xgroup_destroy_alone_fails_key_extraction_not_arity() {
        let buf = encode(&["XGROUP", "DESTROY"]);
        let err = parse(&buf).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoKeys);
    }

    #[test]
    fn xgroup_destroy_with_key_resolves() {
        let buf = encode(&["XGROUP", "DESTROY", "mystream", "mygroup"]);
        let parsed = parse(&buf).unwrap();
        assert_eq!(parsed.descriptor.name, "DESTROY");
        assert_eq!(parsed.keys.len(), 1);
        assert_eq!(parsed.keys[0].bytes(&buf), b"mystream");
    }

    #[test]
    fn mset_extracts_alternating_keys() {
        let buf = encode(&["MSET", "foo", "val1", "bar", "val2"]);
        let parsed = parse(&buf).unwrap();
        let words: Vec<&[u8]> = parsed.keys.iter().map(|k| k.bytes(&buf)).collect();
        assert_eq!(words, vec![b"foo".as_ref(), b"bar".as_ref()]);
    }

    #[test]
    fn eval_with_zero_numkeys_has_no_keys() {
        let buf = encode(&["EVAL", "return 1", "0"]);
        let parsed = parse(&buf).unwrap();
        assert!(parsed.keys.is_empty());
    }

    #[test]
    fn ping_needs_no_keys() {
        let buf = encode(&["PING"]);
        let parsed = parse(&buf).unwrap();
        assert!(parsed.keys.is_empty());
    }
}
