#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, IteratorRandom};
use rand::SeedableRng;
use welcometale_core::events::ChatSink;
use welcometale_text::{visible_text, Segment};

/// Records what would have been shown in chat.
#[derive(Default)]
pub struct RecordingSink {
    pub broadcasts: Vec<Vec<Segment>>,
    pub private: Vec<(String, Vec<Segment>)>,
}

impl RecordingSink {
    pub fn broadcast_texts(&self) -> Vec<String> {
        self.broadcasts.iter().map(|m| visible_text(m)).collect()
    }
}

impl ChatSink for RecordingSink {
    fn broadcast(&mut self, message: &[Segment]) {
        self.broadcasts.push(message.to_vec());
    }

    fn send_to(&mut self, player: &str, message: &[Segment]) {
        self.private.push((player.to_owned(), message.to_vec()));
    }
}

/// Seeded random markup strings built from pieces that exercise codes,
/// escapes, URLs and line breaks.
pub struct MarkupInputs {
    rng: StdRng,
}

const ALPHABET: &[&str] = &[
    "a", "b", " ", "&", "§", "c", "l", "o", "r", "k", "z", "C", "\n", ".", ")", "www.", "http://",
    "é", "&&", "?", "ſ", "/x",
];

impl MarkupInputs {
    pub fn new(seed: u64) -> MarkupInputs {
        MarkupInputs {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Iterator for MarkupInputs {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let len = (0..24).choose(&mut self.rng).unwrap_or_default();
        let mut s = String::new();
        for _ in 0..len {
            s.push_str(ALPHABET.choose(&mut self.rng)?);
        }
        Some(s)
    }
}
