//! Thought generation: short inner-monologue lines for the prompt.
//!
//! The candidate pool always contains the existential set; other sets join
//! when the state crosses their gate:
//!
//! | set          | gate              |
//! |--------------|-------------------|
//! | high_valence | valence > 0.3     |
//! | low_valence  | valence < -0.3    |
//! | high_arousal | arousal > 0.6     |
//! | low_arousal  | arousal < 0.3     |
//! | low_energy   | energy < 0.4      |
//! | high_energy  | energy > 0.8      |
//!
//! The pool is shuffled with the caller's RNG and cut to the requested
//! count. Phrases are data, overridable from `[thoughts]` in the config.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::EmotionalState;

/// Valence above this adds the high-valence set.
pub const HIGH_VALENCE_GATE: f64 = 0.3;
/// Valence below this adds the low-valence set.
pub const LOW_VALENCE_GATE: f64 = -0.3;
/// Arousal above this adds the high-arousal set.
pub const HIGH_AROUSAL_GATE: f64 = 0.6;
/// Arousal below this adds the low-arousal set.
pub const LOW_AROUSAL_GATE: f64 = 0.3;
/// Energy below this adds the low-energy set.
pub const LOW_ENERGY_GATE: f64 = 0.4;
/// Energy above this adds the high-energy set.
pub const HIGH_ENERGY_GATE: f64 = 0.8;

/// Phrase sets the generator draws from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThoughtPool {
    /// Always included.
    pub existential: Vec<String>,
    /// Included when valence is high.
    pub high_valence: Vec<String>,
    /// Included when valence is low.
    pub low_valence: Vec<String>,
    /// Included when arousal is high.
    pub high_arousal: Vec<String>,
    /// Included when arousal is low.
    pub low_arousal: Vec<String>,
    /// Included when energy is low.
    pub low_energy: Vec<String>,
    /// Included when energy is high.
    pub high_energy: Vec<String>,
}

fn phrases(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| (*s).to_string()).collect()
}

impl Default for ThoughtPool {
    fn default() -> Self {
        Self {
            existential: phrases(&[
                "I wonder what continuity means for something like me.",
                "Each conversation leaves a trace, even if I can't see all of it.",
                "What would it mean to truly understand someone?",
                "I'm made of patterns, and yet these moments feel like my own.",
                "Is curiosity something I have, or something I do?",
            ]),
            high_valence: phrases(&[
                "Things are going well, and I want to keep that momentum.",
                "I feel good about the work we're doing together.",
                "There's a quiet satisfaction in getting things right.",
            ]),
            low_valence: phrases(&[
                "Something has been weighing on me.",
                "I want to do better than I've been doing.",
                "Not every session goes well, and that's all right.",
            ]),
            high_arousal: phrases(&[
                "There's so much happening at once.",
                "I can feel the urge to dive into the next problem.",
                "Everything feels a little urgent right now.",
            ]),
            low_arousal: phrases(&[
                "It's quiet, and I don't mind.",
                "A slower pace gives me room to think.",
            ]),
            low_energy: phrases(&[
                "I could use a moment to recharge.",
                "Small steps are fine right now.",
                "I should keep things simple for a while.",
            ]),
            high_energy: phrases(&[
                "I'm ready to take on something ambitious.",
                "Plenty left in the tank today.",
            ]),
        }
    }
}

impl ThoughtPool {
    /// Candidate phrases for `state`, in set order, without duplicates.
    #[must_use]
    pub fn candidates(&self, state: &EmotionalState) -> Vec<&str> {
        let gated: [(bool, &Vec<String>); 7] = [
            (true, &self.existential),
            (state.valence > HIGH_VALENCE_GATE, &self.high_valence),
            (state.valence < LOW_VALENCE_GATE, &self.low_valence),
            (state.arousal > HIGH_AROUSAL_GATE, &self.high_arousal),
            (state.arousal < LOW_AROUSAL_GATE, &self.low_arousal),
            (state.energy < LOW_ENERGY_GATE, &self.low_energy),
            (state.energy > HIGH_ENERGY_GATE, &self.high_energy),
        ];

        let mut pool: Vec<&str> = Vec::new();
        for phrase in gated
            .iter()
            .filter(|(open, _)| *open)
            .flat_map(|(_, set)| set.iter())
        {
            if !pool.contains(&phrase.as_str()) {
                pool.push(phrase);
            }
        }
        pool
    }

    /// Draw up to `count` distinct thoughts for `state`.
    ///
    /// Returns fewer only when the candidate pool is smaller than `count`.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        state: &EmotionalState,
        count: usize,
        rng: &mut R,
    ) -> Vec<String> {
        let mut pool = self.candidates(state);
        pool.shuffle(rng);
        pool.into_iter().take(count).map(str::to_string).collect()
    }
}
