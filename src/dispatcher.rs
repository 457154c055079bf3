//! Ties the command parser, slot hasher, topology table, and connections
//! together: accepts a user command, routes it, and reacts to replies
//! (including redirects) until the user callback fires exactly once.

use std::collections::{HashMap, HashSet};

use log::{debug, trace, warn};

use crate::config::ClusterConfig;
use crate::connection::{Connection, Request, State};
use crate::error::{Error, ErrorKind, Result};
use crate::parser;
use crate::redirect::{self, Redirect};
use crate::slot;
use crate::topology::TopologyTable;
use crate::transport::Transport;
use crate::value::Reply;

/// Creates transports for newly discovered nodes. A real embedding would
/// implement this over a TCP/TLS connector; tests use an in-memory one.
pub trait TransportFactory {
    fn connect(&mut self, addr: &str) -> Result<Box<dyn Transport>>;
}

/// Fired when a connection to a node is established or lost. The argument
/// is the node's `host:port` address.
pub type LifecycleCallback = Box<dyn FnMut(&str)>;

/// Accepts commands, routes them by slot, and owns every connection.
pub struct Dispatcher {
    config: ClusterConfig,
    topology: TopologyTable,
    connections: HashMap<String, Connection>,
    round_robin_cursor: usize,
    factory: Box<dyn TransportFactory>,
    on_connect: Option<LifecycleCallback>,
    on_disconnect: Option<LifecycleCallback>,
    closed_notified: HashSet<String>,
}

impl Dispatcher {
    pub fn new(config: ClusterConfig, topology: TopologyTable, factory: Box<dyn TransportFactory>) -> Dispatcher {
        Dispatcher {
            config,
            topology,
            connections: HashMap::new(),
            round_robin_cursor: 0,
            factory,
            on_connect: None,
            on_disconnect: None,
            closed_notified: HashSet::new(),
        }
    }

    pub fn topology(&self) -> &TopologyTable {
        &self.topology
    }

    pub fn set_connect_callback(&mut self, callback: LifecycleCallback) {
        self.on_connect = Some(callback);
    }

    pub fn set_disconnect_callback(&mut self, callback: LifecycleCallback) {
        self.on_disconnect = Some(callback);
    }

    /// Moves every known connection to `draining`: no new requests are
    /// accepted, but in-flight ones still get their replies.
    pub fn start_draining_all(&mut self) {
        let addrs: Vec<String> = self.connections.keys().cloned().collect();
        for addr in addrs {
            if let Some(conn) = self.connections.get_mut(&addr) {
                conn.start_draining();
            }
            self.notify_if_closed(&addr);
        }
    }

    fn swallow_callback() -> Box<dyn FnOnce(Result<Reply>)> {
        Box::new(|result| {
            if let Err(e) = result {
                warn!("ASKING failed ahead of a redirected command: {e}");
            }
        })
    }

    /// Fires `on_disconnect` exactly once per address, the first time its
    /// connection is observed in `Failed` or `Disconnected` state.
    fn notify_if_closed(&mut self, addr: &str) {
        let closed = matches!(
            self.connections.get(addr).map(|c| c.state()),
            Some(State::Failed) | Some(State::Disconnected)
        );
        if closed && self.closed_notified.insert(addr.to_owned()) {
            if let Some(cb) = self.on_disconnect.as_mut() {
                cb(addr);
            }
        }
    }

    fn get_or_create_connection(&mut self, addr: &str) -> Result<&mut Connection> {
        if !self.connections.contains_key(addr) {
            let transport = self.factory.connect(addr)?;
            let mut conn = Connection::new(addr.to_owned(), transport);
            conn.mark_ready();
            self.connections.insert(addr.to_owned(), conn);
            self.closed_notified.remove(addr);
            debug!("opened connection to {addr}");
            if let Some(cb) = self.on_connect.as_mut() {
                cb(addr);
            }
        }
        Ok(self.connections.get_mut(addr).unwrap())
    }

    fn pick_round_robin_primary(&mut self) -> Option<String> {
        let topology = self.topology.load();
        let mut primaries: Vec<String> = topology.primaries().map(|n| n.addr()).collect();
        if primaries.is_empty() {
            return None;
        }
        primaries.sort();
        let addr = primaries[self.round_robin_cursor % primaries.len()].clone();
        self.round_robin_cursor = self.round_robin_cursor.wrapping_add(1);
        Some(addr)
    }

    /// Entry point: parses, routes, and enqueues a command. `callback`
    /// fires exactly once, either here (on a local error) or later, from
    /// `on_readable`, once a reply (possibly after redirects) is in hand.
    pub fn submit(&mut self, command_bytes: Vec<u8>, callback: Box<dyn FnOnce(Result<Reply>)>) {
        let parsed = match parser::parse(&command_bytes) {
            Ok(p) => p,
            Err(e) => {
                callback(Err(e));
                return;
            }
        };

        let target_slot = if parsed.keys.is_empty() {
            None
        } else {
            let first_slot = slot::slot_for_key(parsed.keys[0].bytes(&command_bytes));
            for key in &parsed.keys[1..] {
                if slot::slot_for_key(key.bytes(&command_bytes)) != first_slot {
                    callback(Err(Error::simple(
                        ErrorKind::CrossSlot,
                        "CROSSSLOT Keys in request don't hash to the same slot",
                    )));
                    return;
                }
            }
            Some(first_slot)
        };

        let addr = match target_slot {
            None => match self.pick_round_robin_primary() {
                Some(addr) => addr,
                None => {
                    callback(Err(Error::simple(ErrorKind::ClusterDown, "no primaries known")));
                    return;
                }
            },
            Some(slot) => {
                let topology = self.topology.load();
                match topology.node_for_slot(slot) {
                    Some(node) => node.addr(),
                    None => {
                        callback(Err(Error::simple(
                            ErrorKind::ClusterDown,
                            "slot has no owning node in the current topology",
                        )));
                        return;
                    }
                }
            }
        };

        let mut request = Request::new(command_bytes, callback);
        request.target_slot = target_slot;
        self.route_request(&addr, request);
    }

    fn route_request(&mut self, addr: &str, request: Request) {
        let conn = match self.get_or_create_connection(addr) {
            Ok(c) => c,
            Err(e) => {
                request.complete(Err(e));
                return;
            }
        };
        if let Err(e) = conn.enqueue(request) {
            warn!("failed to enqueue on {addr}: {e}");
        }
    }

    /// Called by the event-loop adapter when `addr`'s descriptor reports
    /// write readiness.
    pub fn on_writable(&mut self, addr: &str) -> Result<()> {
        let result = match self.connections.get_mut(addr) {
            Some(conn) => conn.flush_writes(),
            None => Ok(()),
        };
        self.notify_if_closed(addr);
        result
    }

    /// Called by the event-loop adapter when `addr`'s descriptor reports
    /// read readiness. Drains every reply the transport has ready and
    /// drives redirection for each.
    pub fn on_readable(&mut self, addr: &str) -> Result<()> {
        let completed = match self.connections.get_mut(addr) {
            Some(conn) => conn.on_readable(),
            None => return Ok(()),
        };
        self.notify_if_closed(addr);
        for completed in completed? {
            self.handle_reply(completed.request, completed.reply);
        }
        Ok(())
    }

    fn handle_reply(&mut self, mut request: Request, reply: Reply) {
        if request.ask_pending {
            // the ASKING swallow entry is a separate pending slot with its
            // own no-op callback; by the time we see a reply for the real
            // request here, ASKING has already been answered.
            request.ask_pending = false;
        }

        let classified = redirect::classify(&reply);
        request.state.on_reply(classified.as_ref());

        match classified {
            Some(Redirect::Moved { host, port, slot }) => {
                self.topology.apply_moved(slot, &host, port);
                request.redirect_hops += 1;
                if request.redirect_hops > self.config.max_redirections {
                    request.complete(Err(Error::redirection(
                        ErrorKind::TooManyRedirections,
                        "too many redirections",
                        format!("{host}:{port}"),
                        slot,
                    )));
                    return;
                }
                trace!("MOVED {slot} -> {host}:{port}, hop {}", request.redirect_hops);
                let addr = format!("{host}:{port}");
                self.route_request(&addr, request);
            }
            Some(Redirect::Ask { host, port, slot }) => {
                request.redirect_hops += 1;
                if request.redirect_hops > self.config.max_redirections {
                    request.complete(Err(Error::redirection(
                        ErrorKind::TooManyRedirections,
                        "too many redirections",
                        format!("{host}:{port}"),
                        slot,
                    )));
                    return;
                }
                let addr = format!("{host}:{port}");
                request.ask_pending = true;
                let asking = Request::new(
                    crate::cmd::format_command("ASKING", &[]),
                    Self::swallow_callback(),
                );
                match self.get_or_create_connection(&addr) {
                    Ok(conn) => {
                        let _ = conn.enqueue(asking);
                        if let Err(e) = conn.enqueue(request) {
                            warn!("failed to enqueue redirected command on {addr}: {e}");
                        }
                    }
                    Err(e) => request.complete(Err(e)),
                }
            }
            Some(Redirect::TryAgain) => {
                request.retry_attempts += 1;
                if request.retry_attempts > self.config.max_retry {
                    request.complete(Err(Error::simple(ErrorKind::TryAgain, "TRYAGAIN exceeded retry budget")));
                    return;
                }
                let addr = match request.target_slot {
                    Some(slot) => self.topology.load().node_for_slot(slot).map(|n| n.addr()),
                    None => self.pick_round_robin_primary(),
                };
                match addr {
                    Some(addr) => self.route_request(&addr, request),
                    None => request.complete(Err(Error::simple(ErrorKind::ClusterDown, "no node to retry against"))),
                }
            }
            Some(Redirect::ClusterDown(msg)) => {
                request.complete(Err(Error::with_message(ErrorKind::ClusterDown, "CLUSTERDOWN", msg)));
            }
            Some(Redirect::CrossSlot(msg)) => {
                request.complete(Err(Error::with_message(ErrorKind::CrossSlot, "CROSSSLOT", msg)));
            }
            None => request.complete(Ok(reply)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Topology;
    use crate::transport::StubTransport;
    use std::cell::RefCell;
    use std::collections::HashMap as Map;
    use std::rc::Rc;

    struct StubFactory {
        transports: Rc<RefCell<Map<String, StubTransport>>>,
        next_fd: usize,
    }

    impl TransportFactory for StubFactory {
        fn connect(&mut self, addr: &str) -> Result<Box<dyn Transport>> {
            self.next_fd += 1;
            let mut map = self.transports.borrow_mut();
            let transport = map.remove(addr).unwrap_or_else(|| StubTransport::new(self.next_fd));
            Ok(Box::new(transport))
        }
    }

    fn topology_with_slot(slot: u16, addr: &str) -> TopologyTable {
        let table = TopologyTable::new();
        let (host, port) = addr.rsplit_once(':').unwrap();
        let mut t = Topology::default();
        t.apply_moved(slot, host, port.parse().unwrap());
        table.replace(t);
        table
    }

    #[test]
    fn routes_to_owning_node_and_delivers_reply() {
        let slot = slot::slot_for_key(b"foo");
        let topology = topology_with_slot(slot, "10.0.0.1:6379");
        let transports: Rc<RefCell<Map<String, StubTransport>>> = Rc::new(RefCell::new(Map::new()));
        let mut seed = StubTransport::new(1);
        seed.push_reply(b"$3\r\nbar\r\n");
        transports.borrow_mut().insert("10.0.0.1:6379".to_owned(), seed);
        let factory = StubFactory { transports, next_fd: 1 };
        let mut dispatcher = Dispatcher::new(ClusterConfig::default(), topology, Box::new(factory));

        let result = Rc::new(RefCell::new(None));
        let sink = result.clone();
        dispatcher.submit(
            crate::cmd::format_command("GET", &["foo"]),
            Box::new(move |r| *sink.borrow_mut() = Some(r)),
        );
        dispatcher.on_writable("10.0.0.1:6379").unwrap();
        dispatcher.on_readable("10.0.0.1:6379").unwrap();

        let got = result.borrow_mut().take().unwrap().unwrap();
        assert_eq!(got, Reply::Bulk(Some(b"bar".to_vec())));
    }

    #[test]
    fn moved_reply_reroutes_and_patches_topology() {
        let slot = slot::slot_for_key(b"foo");
        let topology = topology_with_slot(slot, "10.0.0.1:6379");
        let transports: Rc<RefCell<Map<String, StubTransport>>> = Rc::new(RefCell::new(Map::new()));
        let mut old = StubTransport::new(1);
        old.push_reply(format!("-MOVED {slot} 10.0.0.2:6379\r\n").as_bytes());
        let mut new_node = StubTransport::new(2);
        new_node.push_reply(b"$3\r\nbar\r\n");
        transports.borrow_mut().insert("10.0.0.1:6379".to_owned(), old);
        transports.borrow_mut().insert("10.0.0.2:6379".to_owned(), new_node);
        let factory = StubFactory { transports, next_fd: 2 };
        let mut dispatcher = Dispatcher::new(ClusterConfig::default(), topology, Box::new(factory));

        let result = Rc::new(RefCell::new(None));
        let sink = result.clone();
        dispatcher.submit(
            crate::cmd::format_command("GET", &["foo"]),
            Box::new(move |r| *sink.borrow_mut() = Some(r)),
        );
        dispatcher.on_writable("10.0.0.1:6379").unwrap();
        dispatcher.on_readable("10.0.0.1:6379").unwrap();
        dispatcher.on_writable("10.0.0.2:6379").unwrap();
        dispatcher.on_readable("10.0.0.2:6379").unwrap();

        let got = result.borrow_mut().take().unwrap().unwrap();
        assert_eq!(got, Reply::Bulk(Some(b"bar".to_vec())));
        assert_eq!(
            dispatcher.topology().load().node_for_slot(slot).unwrap().addr(),
            "10.0.0.2:6379"
        );

        // second submit to the same slot should go straight to the new node
        let transports2: Rc<RefCell<Map<String, StubTransport>>> = Rc::new(RefCell::new(Map::new()));
        let mut direct = StubTransport::new(3);
        direct.push_reply(b"$3\r\nbaz\r\n");
        transports2.borrow_mut().insert("10.0.0.2:6379".to_owned(), direct);
        dispatcher.factory = Box::new(StubFactory { transports: transports2, next_fd: 3 });
        let result2 = Rc::new(RefCell::new(None));
        let sink2 = result2.clone();
        dispatcher.submit(
            crate::cmd::format_command("GET", &["foo"]),
            Box::new(move |r| *sink2.borrow_mut() = Some(r)),
        );
        dispatcher.on_writable("10.0.0.2:6379").unwrap();
        dispatcher.on_readable("10.0.0.2:6379").unwrap();
        let got2 = result2.borrow_mut().take().unwrap().unwrap();
        assert_eq!(got2, Reply::Bulk(Some(b"baz".to_vec())));
    }

    #[test]
    fn cross_slot_keys_are_rejected_locally() {
        let topology = TopologyTable::new();
        let transports: Rc<RefCell<Map<String, StubTransport>>> = Rc::new(RefCell::new(Map::new()));
        let factory = StubFactory { transports, next_fd: 0 };
        let mut dispatcher = Dispatcher::new(ClusterConfig::default(), topology, Box::new(factory));
        let result = Rc::new(RefCell::new(None));
        let sink = result.clone();
        dispatcher.submit(
            crate::cmd::format_command("MSET", &["foo", "1", "bar", "2"]),
            Box::new(move |r| *sink.borrow_mut() = Some(r)),
        );
        let got = result.borrow_mut().take().unwrap();
        assert_eq!(got.unwrap_err().kind(), ErrorKind::CrossSlot);
    }

    #[test]
    fn connect_callback_fires_once_per_new_connection() {
        let slot = slot::slot_for_key(b"foo");
        let topology = topology_with_slot(slot, "10.0.0.1:6379");
        let mut seed = StubTransport::new(1);
        seed.push_reply(b"$3\r\nbar\r\n");
        let transports: Rc<RefCell<Map<String, StubTransport>>> = Rc::new(RefCell::new(Map::new()));
        transports.borrow_mut().insert("10.0.0.1:6379".to_owned(), seed);
        let factory = StubFactory { transports, next_fd: 1 };
        let mut dispatcher = Dispatcher::new(ClusterConfig::default(), topology, Box::new(factory));

        let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let recorder = seen.clone();
        dispatcher.set_connect_callback(Box::new(move |addr| recorder.borrow_mut().push(addr.to_owned())));

        dispatcher.submit(crate::cmd::format_command("GET", &["foo"]), Box::new(|_| {}));
        dispatcher.on_writable("10.0.0.1:6379").unwrap();
        dispatcher.on_readable("10.0.0.1:6379").unwrap();
        // a second command to the same node must not fire the callback again
        dispatcher.submit(crate::cmd::format_command("GET", &["foo"]), Box::new(|_| {}));

        assert_eq!(*seen.borrow(), vec!["10.0.0.1:6379".to_owned()]);
    }

    #[test]
    fn disconnect_callback_fires_when_draining_empties_the_queue() {
        let slot = slot::slot_for_key(b"foo");
        let topology = topology_with_slot(slot, "10.0.0.1:6379");
        let mut seed = StubTransport::new(1);
        seed.push_reply(b"$3\r\nbar\r\n");
        let transports: Rc<RefCell<Map<String, StubTransport>>> = Rc::new(RefCell::new(Map::new()));
        transports.borrow_mut().insert("10.0.0.1:6379".to_owned(), seed);
        let factory = StubFactory { transports, next_fd: 1 };
        let mut dispatcher = Dispatcher::new(ClusterConfig::default(), topology, Box::new(factory));

        let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let recorder = seen.clone();
        dispatcher.set_disconnect_callback(Box::new(move |addr| recorder.borrow_mut().push(addr.to_owned())));

        dispatcher.submit(crate::cmd::format_command("GET", &["foo"]), Box::new(|_| {}));
        dispatcher.on_writable("10.0.0.1:6379").unwrap();
        dispatcher.on_readable("10.0.0.1:6379").unwrap();

        dispatcher.start_draining_all();

        assert_eq!(*seen.borrow(), vec!["10.0.0.1:6379".to_owned()]);
    }
}
