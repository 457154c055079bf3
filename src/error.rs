use std::fmt;
use std::io;

/// An error raised somewhere in the client: locally (parsing, routing) or
/// relayed from a node (a RESP2 error reply).
#[derive(Clone, Debug)]
pub struct Error {
    repr: ErrorRepr,
}

#[derive(Clone, Debug)]
enum ErrorRepr {
    Simple(ErrorKind, &'static str),
    WithDescription(ErrorKind, &'static str, String),
    WithDescriptionAndDetail(ErrorKind, &'static str, String, String),
    Io(io::ErrorKind, String),
}

/// The category a [`Error`] belongs to. Callers match on this to decide
/// whether a condition is worth retrying, rather than parsing messages.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The input buffer did not begin with `*` or was otherwise not a valid
    /// multi-bulk request.
    ParseError,
    /// `argv[0]` (plus `argv[1]` for subcommand-bearing commands) did not
    /// match anything in the command table.
    UnknownCommand,
    /// `argc` did not satisfy the descriptor's arity.
    WrongArity,
    /// A command that requires keys produced an empty key list.
    NoKeys,
    /// The keys of a single request hashed to more than one slot.
    CrossSlot,
    /// A slot has no owning node in the current topology.
    ClusterDown,
    /// `MOVED` was returned by a node.
    Moved,
    /// `ASK` was returned by a node.
    Ask,
    /// `TRYAGAIN` was returned by a node.
    TryAgain,
    /// The redirection hop limit (`max_redirections`) was exceeded.
    TooManyRedirections,
    /// A node returned an error this client does not special-case.
    ResponseError,
    /// A connect, read, or write on the transport failed.
    IoError,
    /// A per-request or per-connect timeout elapsed.
    Timeout,
    /// The seed list, authentication, or TLS configuration was invalid.
    InvalidClientConfig,
    /// The reply decoder could not make sense of the bytes on the wire.
    ProtocolError,
}

impl Error {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self.repr {
            ErrorRepr::Simple(kind, _) => kind,
            ErrorRepr::WithDescription(kind, _, _) => kind,
            ErrorRepr::WithDescriptionAndDetail(kind, _, _, _) => kind,
            ErrorRepr::Io(_, _) => ErrorKind::IoError,
        }
    }

    /// True for conditions worth a caller-level retry. `Moved`/`Ask`/
    /// `TryAgain` are already absorbed internally up to the hop/retry
    /// budget; `ClusterDown` is surfaced directly rather than retried by
    /// the dispatcher itself, but a caller seeing it should still expect
    /// the condition to clear and may want to retry later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Moved | ErrorKind::Ask | ErrorKind::TryAgain | ErrorKind::ClusterDown
        )
    }

    /// True if this is one of the three redirection kinds the [`crate::redirect`]
    /// FSM understands.
    pub fn is_cluster_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Moved | ErrorKind::Ask | ErrorKind::TryAgain | ErrorKind::ClusterDown
        )
    }

    /// The `(addr, slot)` pair a redirection-related error carries, if any
    /// — the last node a `MOVED`/`ASK` pointed at before the hop budget ran
    /// out, for [`ErrorKind::TooManyRedirections`].
    pub fn redirect_node(&self) -> Option<(&str, u16)> {
        match &self.repr {
            ErrorRepr::WithDescriptionAndDetail(_, _, addr, slot) => {
                slot.parse().ok().map(|slot| (addr.as_str(), slot))
            }
            _ => None,
        }
    }

    pub(crate) fn simple(kind: ErrorKind, desc: &'static str) -> Error {
        Error {
            repr: ErrorRepr::Simple(kind, desc),
        }
    }

    pub(crate) fn with_message(kind: ErrorKind, desc: &'static str, msg: String) -> Error {
        Error {
            repr: ErrorRepr::WithDescription(kind, desc, msg),
        }
    }

    pub(crate) fn redirection(kind: ErrorKind, desc: &'static str, addr: String, slot: u16) -> Error {
        Error {
            repr: ErrorRepr::WithDescriptionAndDetail(kind, desc, addr, slot.to_string()),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            ErrorRepr::Simple(_, desc) => write!(f, "{desc}"),
            ErrorRepr::WithDescription(_, desc, msg) => write!(f, "{desc}: {msg}"),
            ErrorRepr::WithDescriptionAndDetail(_, desc, detail, slot) => {
                write!(f, "{desc}: {detail} (slot {slot})")
            }
            ErrorRepr::Io(_, msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error {
            repr: ErrorRepr::Io(err.kind(), err.to_string()),
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Error {
        Error::with_message(
            ErrorKind::InvalidClientConfig,
            "Invalid seed URL",
            err.to_string(),
        )
    }
}

impl From<(ErrorKind, &'static str)> for Error {
    fn from((kind, desc): (ErrorKind, &'static str)) -> Error {
        Error::simple(kind, desc)
    }
}

impl From<(ErrorKind, &'static str, String)> for Error {
    fn from((kind, desc, msg): (ErrorKind, &'static str, String)) -> Error {
        Error::with_message(kind, desc, msg)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirection_carries_the_last_redirect_target() {
        let err = Error::redirection(
            ErrorKind::TooManyRedirections,
            "too many redirections",
            "10.0.0.2:6379".to_owned(),
            1234,
        );
        assert_eq!(err.kind(), ErrorKind::TooManyRedirections);
        assert_eq!(err.redirect_node(), Some(("10.0.0.2:6379", 1234)));
    }

    #[test]
    fn simple_and_with_message_errors_have_no_redirect_target() {
        assert_eq!(Error::simple(ErrorKind::ClusterDown, "down").redirect_node(), None);
        assert_eq!(
            Error::with_message(ErrorKind::ParseError, "bad", "oops".to_owned()).redirect_node(),
            None
        );
    }
}
