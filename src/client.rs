//! The public entry point: seed-based bootstrap and the `submit`/
//! `submit_argv` operations a caller drives from their own event loop.

use log::info;

use crate::cmd;
use crate::config::{apply_seed_credentials, parse_seeds, ClusterConfig};
use crate::dispatcher::{Dispatcher, LifecycleCallback, TransportFactory};
use crate::error::Result;
use crate::topology::{self, TopologyTable};
use crate::transport::Transport;
use crate::value::Reply;

/// A bootstrapped cluster: owns the dispatcher (and, through it, every
/// connection) plus the lifecycle callbacks an embedder registered.
pub struct ClusterContext {
    dispatcher: Dispatcher,
}

impl ClusterContext {
    /// Connects to the cluster via `seeds` (e.g. `["redis://10.0.0.1:7000"]`),
    /// issuing `CLUSTER SLOTS` against the first reachable seed to build the
    /// initial topology.
    ///
    /// The parser and dispatcher are always available even if discovery
    /// hasn't completed; a context with an empty topology routes every
    /// keyed command to `ClusterDown` until a reply populates it, which is
    /// the same behavior a mid-flight topology refresh produces.
    pub fn connect(
        seed_urls: &[&str],
        config: ClusterConfig,
        mut factory: Box<dyn TransportFactory>,
    ) -> Result<ClusterContext> {
        let seeds = parse_seeds(seed_urls)?;
        let mut config = config;
        apply_seed_credentials(&mut config, &seeds);
        let table = TopologyTable::new();

        for seed in &seeds {
            let addr = format!("{}:{}", seed.host, seed.port);
            if let Ok(topology) = Self::discover(&addr, &mut factory) {
                info!("discovered cluster topology from seed {addr}");
                table.replace(topology);
                break;
            }
        }

        let dispatcher = Dispatcher::new(config, table, factory);
        Ok(ClusterContext { dispatcher })
    }

    fn discover(addr: &str, factory: &mut Box<dyn TransportFactory>) -> Result<crate::topology::Topology> {
        let mut transport = factory.connect(addr)?;
        let request = cmd::format_command("CLUSTER", &["SLOTS"]);
        transport.write(&request)?;
        let mut buf = Vec::new();
        let mut scratch = [0u8; 4096];
        loop {
            match transport.read(&mut scratch) {
                Ok(0) => break,
                Ok(n) => buf.extend_from_slice(&scratch[..n]),
                Err(e) => return Err(e.into()),
            }
            if let crate::value::Decoded::Value(reply, _) = crate::value::decode_one(&buf)? {
                return topology::parse_cluster_slots(&reply);
            }
        }
        Err(crate::error::Error::simple(
            crate::error::ErrorKind::IoError,
            "seed closed the connection before a CLUSTER SLOTS reply arrived",
        ))
    }

    /// Formats `name` plus already-stringified `args` into a request and
    /// dispatches it. Printf-style value formatting is the caller's
    /// responsibility; this only handles wire framing.
    pub fn submit(&mut self, name: &str, args: &[&str], callback: Box<dyn FnOnce(Result<Reply>)>) {
        let bytes = cmd::format_command(name, args);
        self.dispatcher.submit(bytes, callback);
    }

    /// Dispatches an already wire-encoded request, bypassing formatting.
    pub fn submit_argv<A: AsRef<[u8]>>(&mut self, argv: &[A], callback: Box<dyn FnOnce(Result<Reply>)>) {
        let bytes = cmd::encode_argv(argv);
        self.dispatcher.submit(bytes, callback);
    }

    /// Drains then closes every connection. Requests already in flight
    /// still receive their replies; no new ones are accepted.
    pub fn disconnect(&mut self) {
        self.dispatcher.start_draining_all();
    }

    pub fn set_connect_callback(&mut self, callback: LifecycleCallback) {
        self.dispatcher.set_connect_callback(callback);
    }

    pub fn set_disconnect_callback(&mut self, callback: LifecycleCallback) {
        self.dispatcher.set_disconnect_callback(callback);
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }
}
