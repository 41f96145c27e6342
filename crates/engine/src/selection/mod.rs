//! Deterministic seeded selection.
//!
//! One seed per generation cycle drives every random decision - template
//! picks, category ordering, variation choice, placeholder values - so a
//! full quest set is reproducible from its date string.

mod seed;
mod selector;

pub use seed::{Seed, SeededRng};
pub use selector::weighted_pick;
