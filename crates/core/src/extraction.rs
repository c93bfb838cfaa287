use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Draw order of one round: a permutation of `1..=max_numbers`.
///
/// The numbers live behind an `Arc` so every state snapshot of a round shares
/// the same order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractionOrder {
    numbers: Arc<[u8]>,
}

impl Default for ExtractionOrder {
    fn default() -> Self {
        Self {
            numbers: Arc::from(Vec::new()),
        }
    }
}

impl ExtractionOrder {
    pub fn generate<R: Rng + ?Sized>(max_numbers: u8, rng: &mut R) -> Self {
        let mut numbers: Vec<u8> = (1..=max_numbers).collect();
        // Fisher-Yates; every permutation equally likely.
        numbers.shuffle(rng);
        Self {
            numbers: numbers.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn number_at(&self, index: usize) -> Option<u8> {
        self.numbers.get(index).copied()
    }

    /// First `len` numbers, clamped to the order length.
    pub fn prefix(&self, len: usize) -> &[u8] {
        &self.numbers[..len.min(self.numbers.len())]
    }

    pub fn position_of(&self, number: u8) -> Option<usize> {
        self.numbers.iter().position(|&n| n == number)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.numbers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RngState;
    use std::collections::BTreeSet;

    #[test]
    fn order_is_a_permutation() {
        let mut rng = RngState::from_seed(11);
        let order = ExtractionOrder::generate(90, &mut rng);
        assert_eq!(order.len(), 90);
        let seen: BTreeSet<u8> = order.as_slice().iter().copied().collect();
        assert_eq!(seen, (1..=90).collect::<BTreeSet<u8>>());
    }

    #[test]
    fn zero_numbers_gives_empty_order() {
        let order = ExtractionOrder::generate(0, &mut RngState::from_seed(1));
        assert!(order.is_empty());
        assert_eq!(order.number_at(0), None);
    }

    #[test]
    fn prefix_and_position_agree() {
        let order = ExtractionOrder::generate(20, &mut RngState::from_seed(3));
        let first = order.number_at(0).unwrap();
        assert_eq!(order.position_of(first), Some(0));
        assert_eq!(order.prefix(3).len(), 3);
        assert_eq!(order.prefix(100).len(), 20);
    }

    #[test]
    fn clones_share_numbers() {
        let order = ExtractionOrder::generate(10, &mut RngState::from_seed(3));
        let copy = order.clone();
        assert!(Arc::ptr_eq(&order.numbers, &copy.numbers));
    }
}
