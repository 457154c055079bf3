//! Parsing server redirection errors and the per-request state machine
//! that decides what to do about them.

use crate::value::Reply;

/// A parsed server redirection or transient-failure signal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Redirect {
    Moved { host: String, port: u16, slot: u16 },
    Ask { host: String, port: u16, slot: u16 },
    TryAgain,
    ClusterDown(String),
    CrossSlot(String),
}

/// Recognizes the server error strings the redirection FSM understands.
/// Anything else (including non-error replies) is `None`, meaning "deliver
/// to the user as-is".
pub fn classify(reply: &Reply) -> Option<Redirect> {
    let text = reply.as_error_text()?;
    let mut parts = text.split_whitespace();
    match parts.next()? {
        "MOVED" => {
            let slot: u16 = parts.next()?.parse().ok()?;
            let (host, port) = split_addr(parts.next()?)?;
            Some(Redirect::Moved { host, port, slot })
        }
        "ASK" => {
            let slot: u16 = parts.next()?.parse().ok()?;
            let (host, port) = split_addr(parts.next()?)?;
            Some(Redirect::Ask { host, port, slot })
        }
        "TRYAGAIN" => Some(Redirect::TryAgain),
        "CLUSTERDOWN" => Some(Redirect::ClusterDown(text.to_owned())),
        "CROSSSLOT" => Some(Redirect::CrossSlot(text.to_owned())),
        _ => None,
    }
}

fn split_addr(addr: &str) -> Option<(String, u16)> {
    let (host, port) = addr.rsplit_once(':')?;
    let port: u16 = port.parse().ok()?;
    Some((host.to_owned(), port))
}

/// Per-request redirection state. The dispatcher drives these transitions;
/// this type exists so the states and their legal transitions are checked
/// by the compiler rather than scattered as ad-hoc bools.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestState {
    Fresh,
    AwaitingReply,
    Done,
    RedirectingMoved { host: String, port: u16 },
    RedirectingAsk { host: String, port: u16 },
    Retrying,
}

impl RequestState {
    pub fn new() -> RequestState {
        RequestState::Fresh
    }

    pub fn send(&mut self) {
        *self = RequestState::AwaitingReply;
    }

    /// Applies a classified reply, returning the next state. `hops` is the
    /// request's redirect counter *before* this call; the caller is
    /// responsible for incrementing it whenever this returns a
    /// `Redirecting*`/`Retrying` state.
    pub fn on_reply(&mut self, redirect: Option<&Redirect>) {
        *self = match redirect {
            None => RequestState::Done,
            Some(Redirect::Moved { host, port, .. }) => RequestState::RedirectingMoved {
                host: host.clone(),
                port: *port,
            },
            Some(Redirect::Ask { host, port, .. }) => RequestState::RedirectingAsk {
                host: host.clone(),
                port: *port,
            },
            Some(Redirect::TryAgain) => RequestState::Retrying,
            // CLUSTERDOWN and CROSSSLOT are surfaced to the caller
            // immediately rather than retried internally.
            Some(Redirect::ClusterDown(_)) | Some(Redirect::CrossSlot(_)) => RequestState::Done,
        };
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestState::Done)
    }
}

impl Default for RequestState {
    fn default() -> Self {
        RequestState::new()
    }
}
