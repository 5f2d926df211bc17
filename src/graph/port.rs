//! Input and output ports: the link sets on either side of a node.
//!
//! An [`Output`] broadcasts every value to all of its links. An [`Input`]
//! waits for exactly one value on each of its links and reduces them to a
//! weighted sum. The link lists are only mutated while the topology is being
//! built; the mutex keeps concurrent registration race-free.

use std::sync::Arc;

use crossbeam::channel::Select;
use parking_lot::Mutex;

use crate::error::{FlowError, Result};
use crate::graph::link::Link;
use crate::graph::tap::{Publication, Subscription};

#[derive(Debug, Default)]
pub struct Output {
    links: Mutex<Vec<Arc<Link>>>,
}

impl Output {
    pub fn new() -> Output {
        Output::default()
    }

    /// Sends `value` on every attached link, blocking on any link whose
    /// previous value has not been consumed yet.
    pub fn send(&self, value: f64) -> Result<()> {
        for link in self.links() {
            link.send(value)?;
        }
        Ok(())
    }

    /// Snapshot of the attached links in registration order.
    pub fn links(&self) -> Vec<Arc<Link>> {
        self.links.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.links.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.lock().is_empty()
    }

    pub fn contains(&self, link: &Link) -> bool {
        self.links.lock().iter().any(|l| l.id() == link.id())
    }

    /// Attaches a tap that receives every value broadcast by this output.
    pub fn subscribe(&self) -> Subscription {
        let link = Arc::new(Link::new());
        self.links.lock().push(Arc::clone(&link));
        Subscription::new(link)
    }
}

#[derive(Debug, Default)]
pub struct Input {
    links: Mutex<Vec<Arc<Link>>>,
}

impl Input {
    pub fn new() -> Input {
        Input::default()
    }

    /// Creates a link from `output` into this input and returns it.
    ///
    /// Both link lists are locked while the link is attached, so no reader
    /// sees it on one side only. Locks are always taken output first.
    pub fn register(&self, output: &Output) -> Arc<Link> {
        let mut outgoing = output.links.lock();
        let mut incoming = self.links.lock();
        let link = Arc::new(Link::new());
        outgoing.push(Arc::clone(&link));
        incoming.push(Arc::clone(&link));
        link
    }

    /// Creates a synthetic output wired into this input, for injecting values
    /// from outside the graph.
    pub fn publish(&self) -> Publication {
        let output = Arc::new(Output::new());
        self.register(&output);
        Publication::new(output)
    }

    /// Snapshot of the attached links in registration order.
    pub fn links(&self) -> Vec<Arc<Link>> {
        self.links.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.links.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.lock().is_empty()
    }

    pub fn contains(&self, link: &Link) -> bool {
        self.links.lock().iter().any(|l| l.id() == link.id())
    }

    /// Takes one value from every link and returns `Σ weight * value`.
    ///
    /// Links are drained in the order their values arrive, so a slow peer
    /// never holds up a link that is already full. The terms are added in
    /// registration order, which keeps the result bit-identical however the
    /// values arrived. Each raw value is remembered as that link's `last`.
    pub(crate) fn sum(&self) -> Result<f64> {
        let links = self.links();
        let mut select = Select::new();
        for link in &links {
            select.recv(link.receiver());
        }

        let mut terms = vec![0.0; links.len()];
        for _ in 0..links.len() {
            let oper = select.select();
            let index = oper.index();
            let link = &links[index];
            let value = oper
                .recv(link.receiver())
                .map_err(|_| FlowError::Disconnected { link: link.id() })?;
            terms[index] = link.absorb(value);
            select.remove(index);
        }
        Ok(terms.iter().sum())
    }
}
