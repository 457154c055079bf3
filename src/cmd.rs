//! Building the wire bytes for an outgoing request.
//!
//! Two entry points: `format_command` takes a printf-style template plus
//! positional arguments (the common case, used by typed command
//! wrappers), `encode_argv` takes already-split argument bytes and
//! bypasses formatting entirely.

/// Anything that can be written as one RESP2 bulk-string argument.
pub trait ToArg {
    fn to_arg(&self) -> Vec<u8>;
}

impl ToArg for &str {
    fn to_arg(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl ToArg for String {
    fn to_arg(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl ToArg for &[u8] {
    fn to_arg(&self) -> Vec<u8> {
        self.to_vec()
    }
}

impl ToArg for Vec<u8> {
    fn to_arg(&self) -> Vec<u8> {
        self.clone()
    }
}

impl ToArg for i64 {
    fn to_arg(&self) -> Vec<u8> {
        let mut buf = itoa::Buffer::new();
        buf.format(*self).as_bytes().to_vec()
    }
}

impl ToArg for u64 {
    fn to_arg(&self) -> Vec<u8> {
        let mut buf = itoa::Buffer::new();
        buf.format(*self).as_bytes().to_vec()
    }
}

impl ToArg for f64 {
    fn to_arg(&self) -> Vec<u8> {
        let mut buf = ryu::Buffer::new();
        buf.format(*self).as_bytes().to_vec()
    }
}

/// Encodes an already-tokenized argument list as a RESP2 multi-bulk array.
pub fn encode_argv<A: AsRef<[u8]>>(argv: &[A]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(format!("*{}\r\n", argv.len()).as_bytes());
    for arg in argv {
        let bytes = arg.as_ref();
        out.extend_from_slice(format!("${}\r\n", bytes.len()).as_bytes());
        out.extend_from_slice(bytes);
        out.extend_from_slice(b"\r\n");
    }
    out
}

/// A request under construction: a command name plus a growing argument
/// list, each pushed via [`ToArg`]. `finish` serializes it to wire bytes.
#[derive(Default)]
pub struct CommandBuilder {
    args: Vec<Vec<u8>>,
}

impl CommandBuilder {
    pub fn new(name: &str) -> CommandBuilder {
        let mut builder = CommandBuilder { args: Vec::new() };
        builder.args.push(name.as_bytes().to_vec());
        builder
    }

    pub fn arg<A: ToArg>(mut self, value: A) -> Self {
        self.args.push(value.to_arg());
        self
    }

    pub fn finish(&self) -> Vec<u8> {
        encode_argv(&self.args)
    }
}

/// Builds the request for `submit`: a command name and a slice of
/// already-stringified arguments, each encoded as one bulk string. This is
/// the "printf-style formatting" entry point from the dispatcher's point of
/// view: callers format their own values into strings before calling, and
/// this function only handles wire framing.
pub fn format_command(name: &str, args: &[&str]) -> Vec<u8> {
    let mut argv: Vec<&[u8]> = Vec::with_capacity(1 + args.len());
    argv.push(name.as_bytes());
    for a in args {
        argv.push(a.as_bytes());
    }
    encode_argv(&argv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_simple_get() {
        let bytes = format_command("GET", &["foo"]);
        assert_eq!(bytes, b"*2\r\n$3\r\nGET\r\n$3\r\nfoo\r\n".to_vec());
    }

    #[test]
    fn builder_supports_mixed_argument_types() {
        let bytes = CommandBuilder::new("SET").arg("foo").arg(42i64).finish();
        assert_eq!(bytes, b"*3\r\n$3\r\nSET\r\n$3\r\nfoo\r\n$2\r\n42\r\n".to_vec());
    }

    #[test]
    fn encode_argv_handles_binary_safe_arguments() {
        let argv: Vec<&[u8]> = vec![b"SET", b"k", b"\x00\x01\x02"];
        let bytes = encode_argv(&argv);
        assert!(bytes.windows(3).any(|w| w == [0, 1, 2]));
    }
}
