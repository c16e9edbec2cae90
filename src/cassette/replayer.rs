//! Replays recorded interactions from a cassette.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Serves a cassette's interactions sequentially per port/method pair.
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Creates a replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { queues }
    }

    /// Takes the next interaction for the given port and method.
    ///
    /// # Panics
    ///
    /// Panics if the cassette has no (more) interactions for the pair,
    /// listing what the cassette does contain. Exhaustion is a fixture
    /// authoring error, not a runtime condition to recover from.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Interaction {
        let key = (port.to_string(), method.to_string());
        let popped = self.queues.get_mut(&key).and_then(VecDeque::pop_front);
        match popped {
            Some(interaction) => interaction,
            None => {
                let mut pairs: Vec<String> = self
                    .queues
                    .iter()
                    .filter(|(_, q)| !q.is_empty())
                    .map(|((p, m), q)| format!("{p}::{m} ({} left)", q.len()))
                    .collect();
                pairs.sort();
                panic!(
                    "cassette exhausted: no interaction left for port={port:?} method={method:?}; \
                     remaining: [{}]",
                    pairs.join(", ")
                )
            }
        }
    }
}
