use crate::graph::{BackError, Group};

/// Fixed-rate stochastic gradient descent over a chain of groups.
#[derive(Debug, Clone, Copy)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Runs one backward pass. `groups` are ordered from the output side
    /// upstream; each group's returned errors seed the next one. Returns the
    /// errors left over at the input boundary.
    pub fn step(&self, groups: &[&dyn Group], seed: Vec<BackError>) -> Vec<BackError> {
        groups.iter().fold(seed, |errors, group| {
            group.back_prop(&errors, self.learning_rate)
        })
    }
}
