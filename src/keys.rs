//! Key-extraction rules: turning a parsed argv into the ordered list of key
//! spans a command descriptor says it has.
//!
//! Three rules exist: the normal `first_key/last_key/key_step` walk, the
//! numkeys-prefixed script form (`EVAL`, `EVALSHA`, `FCALL`, `FCALL_RO`),
//! and a handful of movable-key commands with their own bespoke rule.

use crate::commands::{CommandInfo, LAST_KEY_TO_END};
use crate::error::{Error, ErrorKind, Result};

/// A key argument's byte offsets into the original request buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeySpan {
    pub start: usize,
    pub end: usize,
}

impl KeySpan {
    pub fn bytes<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        &buf[self.start..self.end]
    }
}

/// Resolves `last_key` (which may be negative, counting back from the end
/// of argv) against an actual argv length. Returns `None` if the resulting
/// range is out of bounds.
fn resolve_last(last_key: i32, argc: usize) -> Option<i32> {
    if last_key >= 0 {
        Some(last_key)
    } else {
        let resolved = argc as i32 + last_key;
        if resolved < 0 {
            None
        } else {
            Some(resolved)
        }
    }
}

/// The plain `first_key..=last_key` step-`key_step` walk.
fn extract_fixed(descriptor: &CommandInfo, argv: &[(usize, usize)]) -> Vec<KeySpan> {
    if descriptor.first_key <= 0 || descriptor.key_step <= 0 {
        return Vec::new();
    }
    let argc = argv.len();
    let last = match resolve_last(descriptor.last_key, argc) {
        Some(l) => l,
        None => return Vec::new(),
    };
    let first = descriptor.first_key;
    if first as usize >= argc || last < first {
        return Vec::new();
    }
    let last = last.min(argc as i32 - 1);
    let mut keys = Vec::new();
    let mut i = first;
    while i <= last {
        let idx = i as usize;
        if idx >= argc {
            break;
        }
        let (start, end) = argv[idx];
        keys.push(KeySpan { start, end });
        i += descriptor.key_step;
    }
    keys
}

/// `EVAL script numkeys key [key ...] arg [arg ...]`.
fn extract_script(argv: &[(usize, usize)], buf: &[u8]) -> Result<Vec<KeySpan>> {
    if argv.len() < 3 {
        return Ok(Vec::new());
    }
    let numkeys_span = argv[2];
    let numkeys_bytes = &buf[numkeys_span.0..numkeys_span.1];
    let numkeys: usize = std::str::from_utf8(numkeys_bytes)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            Error::with_message(
                ErrorKind::ParseError,
                "Command parse error",
                "numkeys is not a non-negative integer".to_owned(),
            )
        })?;
    let start = 3;
    if numkeys > argv.len().saturating_sub(start) {
        return Err(Error::with_message(
            ErrorKind::ParseError,
            "Command parse error",
            "numkeys exceeds the number of arguments given".to_owned(),
        ));
    }
    let end = start + numkeys;
    Ok(argv[start..end]
        .iter()
        .map(|&(s, e)| KeySpan { start: s, end: e })
        .collect())
}

fn token_eq(buf: &[u8], span: (usize, usize), word: &str) -> bool {
    let tok = &buf[span.0..span.1];
    tok.len() == word.len() && tok.eq_ignore_ascii_case(word.as_bytes())
}

/// `XREAD`/`XREADGROUP`: scan for a standalone `STREAMS` token, skipping the
/// value(s) that belong to `GROUP`, `CONSUMER`, `COUNT`, and `BLOCK` so a
/// literal argument happening to read "streams" isn't mistaken for the
/// keyword.
fn extract_xread(argv: &[(usize, usize)], buf: &[u8]) -> Vec<KeySpan> {
    let rest = &argv[1..];
    let mut i = 0usize;
    while i < rest.len() {
        if token_eq(buf, rest[i], "STREAMS") {
            let after = &rest[i + 1..];
            let half = after.len() / 2;
            return after[..half]
                .iter()
                .map(|&(s, e)| KeySpan { start: s, end: e })
                .collect();
        }
        let skip = if token_eq(buf, rest[i], "GROUP") {
            2
        } else if token_eq(buf, rest[i], "CONSUMER")
            || token_eq(buf, rest[i], "COUNT")
            || token_eq(buf, rest[i], "BLOCK")
        {
            1
        } else {
            0
        };
        i += 1 + skip;
    }
    Vec::new()
}

/// `SORT`/`SORT_RO`: the source key, plus the destination key named after a
/// `STORE` token, if present.
fn extract_sort(argv: &[(usize, usize)], buf: &[u8]) -> Vec<KeySpan> {
    let mut keys = Vec::new();
    if argv.len() > 1 {
        let (s, e) = argv[1];
        keys.push(KeySpan { start: s, end: e });
    }
    let mut i = 2;
    while i < argv.len() {
        if token_eq(buf, argv[i], "STORE") && i + 1 < argv.len() {
            let (s, e) = argv[i + 1];
            keys.push(KeySpan { start: s, end: e });
            break;
        }
        i += 1;
    }
    keys
}

/// `GEORADIUS`/`GEORADIUSBYMEMBER`: the source key, plus a destination key
/// named after a `STORE` or `STOREDIST` token.
fn extract_georadius(argv: &[(usize, usize)], buf: &[u8]) -> Vec<KeySpan> {
    let mut keys = Vec::new();
    if argv.len() > 1 {
        let (s, e) = argv[1];
        keys.push(KeySpan { start: s, end: e });
    }
    let mut i = 2;
    while i < argv.len() {
        if (token_eq(buf, argv[i], "STORE") || token_eq(buf, argv[i], "STOREDIST"))
            && i + 1 < argv.len()
        {
            let (s, e) = argv[i + 1];
            keys.push(KeySpan { start: s, end: e });
            i += 2;
            continue;
        }
        i += 1;
    }
    keys
}

/// `ZUNIONSTORE`/`ZINTERSTORE`/`ZDIFFSTORE`: `dest numkeys key [key ...]`.
/// The destination plus every source key.
fn extract_zstore(argv: &[(usize, usize)], buf: &[u8]) -> Result<Vec<KeySpan>> {
    if argv.len() < 3 {
        return Ok(Vec::new());
    }
    let mut keys = Vec::new();
    let (s, e) = argv[1];
    keys.push(KeySpan { start: s, end: e });
    let numkeys_bytes = &buf[argv[2].0..argv[2].1];
    let numkeys: usize = std::str::from_utf8(numkeys_bytes)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            Error::with_message(
                ErrorKind::ParseError,
                "Command parse error",
                "numkeys is not a non-negative integer".to_owned(),
            )
        })?;
    let start = 3;
    if numkeys > argv.len().saturating_sub(start) {
        return Err(Error::with_message(
            ErrorKind::ParseError,
            "Command parse error",
            "numkeys exceeds the number of arguments given".to_owned(),
        ));
    }
    let end = start + numkeys;
    keys.extend(argv[start..end].iter().map(|&(s, e)| KeySpan { start: s, end: e }));
    Ok(keys)
}

/// `SINTERCARD numkeys key [key ...] [LIMIT limit]`.
fn extract_sintercard(argv: &[(usize, usize)], buf: &[u8]) -> Result<Vec<KeySpan>> {
    if argv.len() < 2 {
        return Ok(Vec::new());
    }
    let numkeys_bytes = &buf[argv[1].0..argv[1].1];
    let numkeys: usize = std::str::from_utf8(numkeys_bytes)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            Error::with_message(
                ErrorKind::ParseError,
                "Command parse error",
                "numkeys is not a non-negative integer".to_owned(),
            )
        })?;
    let start = 2;
    if numkeys > argv.len().saturating_sub(start) {
        return Err(Error::with_message(
            ErrorKind::ParseError,
            "Command parse error",
            "numkeys exceeds the number of arguments given".to_owned(),
        ));
    }
    let end = start + numkeys;
    Ok(argv[start..end]
        .iter()
        .map(|&(s, e)| KeySpan { start: s, end: e })
        .collect())
}

fn extract_movable(descriptor: &CommandInfo, argv: &[(usize, usize)], buf: &[u8]) -> Result<Vec<KeySpan>> {
    match descriptor.name {
        "SORT" | "SORT_RO" => Ok(extract_sort(argv, buf)),
        "GEORADIUS" | "GEORADIUSBYMEMBER" => Ok(extract_georadius(argv, buf)),
        "XREAD" | "XREADGROUP" => Ok(extract_xread(argv, buf)),
        "ZUNIONSTORE" | "ZINTERSTORE" | "ZDIFFSTORE" => extract_zstore(argv, buf),
        "SINTERCARD" => extract_sintercard(argv, buf),
        _ => Ok(Vec::new()),
    }
}

/// Extracts the key list for `descriptor` given `argv` (spans into `buf`).
/// `descriptor` must already be the fully-resolved one (a subcommand child,
/// where applicable).
pub fn extract(descriptor: &CommandInfo, argv: &[(usize, usize)], buf: &[u8]) -> Result<Vec<KeySpan>> {
    if descriptor.flags.script_numkeys {
        extract_script(argv, buf)
    } else if descriptor.flags.movable_keys {
        extract_movable(descriptor, argv, buf)
    } else {
        Ok(extract_fixed(descriptor, argv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands;

    fn argv_spans(buf: &[u8]) -> Vec<(usize, usize)> {
        // test-only whitespace tokenizer; the real wire tokenizer lives in parser.rs
        let mut spans = Vec::new();
        let mut i = 0;
        while i < buf.len() {
            while i < buf.len() && buf[i] == b' ' {
                i += 1;
            }
            if i >= buf.len() {
                break;
            }
            let start = i;
            while i < buf.len() && buf[i] != b' ' {
                i += 1;
            }
            spans.push((start, i));
        }
        spans
    }

    #[test]
    fn fixed_extraction_mset() {
        let buf = b"MSET foo val1 bar val2";
        let argv = argv_spans(buf);
        let descriptor = commands::lookup(b"MSET").unwrap();
        let keys = extract(descriptor, &argv, buf).unwrap();
        let words: Vec<&[u8]> = keys.iter().map(|k| k.bytes(buf)).collect();
        assert_eq!(words, vec![b"foo".as_ref(), b"bar".as_ref()]);
    }

    #[test]
    fn script_extraction_with_and_without_keys() {
        let buf = b"EVAL dummy 1 foo";
        let argv = argv_spans(buf);
        let descriptor = commands::lookup(b"EVAL").unwrap();
        let keys = extract(descriptor, &argv, buf).unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].bytes(buf), b"foo");

        let buf2 = b"EVAL dummy 0 foo";
        let argv2 = argv_spans(buf2);
        let keys2 = extract(descriptor, &argv2, buf2).unwrap();
        assert!(keys2.is_empty());
    }

    #[test]
    fn xreadgroup_ignores_literal_streams_tokens() {
        let buf = b"XREADGROUP GROUP streams streams COUNT 1 streams mystream >";
        let argv = argv_spans(buf);
        let descriptor = commands::lookup(b"XREADGROUP").unwrap();
        let keys = extract(descriptor, &argv, buf).unwrap();
        let words: Vec<&[u8]> = keys.iter().map(|k| k.bytes(buf)).collect();
        assert_eq!(words, vec![b"mystream".as_ref()]);
    }

    #[test]
    fn xread_takes_first_half_after_streams() {
        let buf = b"XREAD BLOCK 42 STREAMS mystream another $ $";
        let argv = argv_spans(buf);
        let descriptor = commands::lookup(b"XREAD").unwrap();
        let keys = extract(descriptor, &argv, buf).unwrap();
        let words: Vec<&[u8]> = keys.iter().map(|k| k.bytes(buf)).collect();
        assert_eq!(words, vec![b"mystream".as_ref(), b"another".as_ref()]);
    }

    #[test]
    fn blpop_excludes_trailing_timeout() {
        let buf = b"BLPOP key1 key2 5";
        let argv = argv_spans(buf);
        let descriptor = commands::lookup(b"BLPOP").unwrap();
        let keys = extract(descriptor, &argv, buf).unwrap();
        let words: Vec<&[u8]> = keys.iter().map(|k| k.bytes(buf)).collect();
        assert_eq!(words, vec![b"key1".as_ref(), b"key2".as_ref()]);
    }

    #[test]
    fn last_key_to_end_sentinel_reaches_final_argument() {
        assert_eq!(resolve_last(LAST_KEY_TO_END, 5), Some(4));
    }
}
