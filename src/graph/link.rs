use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam::channel::{bounded, Receiver, Sender};

use crate::error::{FlowError, Result};

/// Value of [`Link::last`] before anything has travelled over the link.
pub const NEVER_RECEIVED: f64 = f64::MAX;

static NEXT_LINK_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of a link. Back errors are correlated by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(u64);

impl LinkId {
    fn next() -> LinkId {
        LinkId(NEXT_LINK_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn index(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An `f64` that can be read and written through a shared reference.
///
/// Every scalar in the graph has one writer at a time; the link channels
/// order those writes against the readers, so relaxed loads and stores suffice.
#[derive(Debug)]
pub(crate) struct Scalar(AtomicU64);

impl Scalar {
    pub(crate) fn new(value: f64) -> Scalar {
        Scalar(AtomicU64::new(value.to_bits()))
    }

    pub(crate) fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub(crate) fn set(&self, value: f64) {
        self.0.store(value.to_bits(), Ordering::Relaxed)
    }

    pub(crate) fn add(&self, delta: f64) {
        self.set(self.get() + delta)
    }
}

/// A weighted, directed edge between two ports.
///
/// The link owns a single-slot channel: a second `send` blocks until the
/// first value has been received on the other side.
#[derive(Debug)]
pub struct Link {
    id: LinkId,
    tx: Sender<f64>,
    rx: Receiver<f64>,
    weight: Scalar,
    last: Scalar,
}

impl Link {
    pub(crate) fn new() -> Link {
        let (tx, rx) = bounded(1);
        Link {
            id: LinkId::next(),
            tx,
            rx,
            weight: Scalar::new(1.0),
            last: Scalar::new(NEVER_RECEIVED),
        }
    }

    pub fn id(&self) -> LinkId {
        self.id
    }

    pub fn weight(&self) -> f64 {
        self.weight.get()
    }

    pub fn set_weight(&self, weight: f64) {
        self.weight.set(weight)
    }

    /// Raw value most recently received over this link, or [`NEVER_RECEIVED`].
    pub fn last(&self) -> f64 {
        self.last.get()
    }

    /// Like [`Link::last`], but `None` until a value has been received.
    pub fn last_value(&self) -> Option<f64> {
        let last = self.last();
        if last == NEVER_RECEIVED { None } else { Some(last) }
    }

    /// Blocks while the slot is occupied.
    pub(crate) fn send(&self, value: f64) -> Result<()> {
        self.tx.send(value).map_err(|_| FlowError::Disconnected { link: self.id })
    }

    pub(crate) fn receiver(&self) -> &Receiver<f64> {
        &self.rx
    }

    /// Records a value taken off the channel and returns its weighted contribution.
    pub(crate) fn absorb(&self, value: f64) -> f64 {
        self.last.set(value);
        value * self.weight()
    }

    pub(crate) fn adjust_weight(&self, delta: f64) {
        self.weight.add(delta)
    }
}
