use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use valkeycluster::cmd::format_command;
use valkeycluster::config::ClusterConfig;
use valkeycluster::dispatcher::{Dispatcher, TransportFactory};
use valkeycluster::error::Result;
use valkeycluster::slot::slot_for_key;
use valkeycluster::topology::{Topology, TopologyTable};
use valkeycluster::transport::{StubTransport, Transport};
use valkeycluster::Reply;

struct StubFactory {
    transports: Rc<RefCell<HashMap<String, StubTransport>>>,
    next_fd: usize,
}

impl TransportFactory for StubFactory {
    fn connect(&mut self, addr: &str) -> Result<Box<dyn Transport>> {
        self.next_fd += 1;
        let mut map = self.transports.borrow_mut();
        let transport = map
            .remove(addr)
            .unwrap_or_else(|| StubTransport::new(self.next_fd));
        Ok(Box::new(transport))
    }
}

fn topology_with_slot(slot: u16, addr: &str) -> TopologyTable {
    let table = TopologyTable::new();
    let (host, port) = addr.rsplit_once(':').unwrap();
    let mut topology = Topology::default();
    topology.apply_moved(slot, host, port.parse().unwrap());
    table.replace(topology);
    table
}

#[test]
fn scenario_10_moved_then_direct_route_on_next_submit() {
    let slot = slot_for_key(b"foo");
    let topology = topology_with_slot(slot, "10.0.0.1:6379");

    let transports: Rc<RefCell<HashMap<String, StubTransport>>> = Rc::new(RefCell::new(HashMap::new()));
    let mut first_hop = StubTransport::new(1);
    first_hop.push_reply(format!("-MOVED {slot} 10.0.0.2:6379\r\n").as_bytes());
    transports.borrow_mut().insert("10.0.0.1:6379".to_owned(), first_hop);
    let mut second_hop = StubTransport::new(2);
    second_hop.push_reply(b"$3\r\nbar\r\n");
    transports.borrow_mut().insert("10.0.0.2:6379".to_owned(), second_hop);

    let mut dispatcher = Dispatcher::new(
        ClusterConfig::default(),
        topology,
        Box::new(StubFactory { transports, next_fd: 2 }),
    );

    let result: Rc<RefCell<Option<Result<Reply>>>> = Rc::new(RefCell::new(None));
    let sink = result.clone();
    dispatcher.submit(format_command("GET", &["foo"]), Box::new(move |r| *sink.borrow_mut() = Some(r)));

    dispatcher.on_writable("10.0.0.1:6379").unwrap();
    dispatcher.on_readable("10.0.0.1:6379").unwrap();
    dispatcher.on_writable("10.0.0.2:6379").unwrap();
    dispatcher.on_readable("10.0.0.2:6379").unwrap();

    let got = result.borrow_mut().take().unwrap().unwrap();
    assert_eq!(got, Reply::Bulk(Some(b"bar".to_vec())));
    assert_eq!(dispatcher.topology().load().node_for_slot(slot).unwrap().addr(), "10.0.0.2:6379");
}
