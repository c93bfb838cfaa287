//! Property tests for card layout and draw order invariants.

use std::collections::BTreeSet;

use bingo_core::{
    column_range, CardGenerator, CardLayout, ExtractionOrder, RngState, RoundConfig, RoundEngine,
    RoundToken, CARD_COLS, CARD_NUMBERS,
};
use proptest::prelude::*;

proptest! {
    /// Property: every card holds fifteen distinct numbers inside their columns.
    #[test]
    fn prop_card_shape(seed in any::<u64>(), balanced in any::<bool>()) {
        let layout = if balanced { CardLayout::Balanced } else { CardLayout::Scattered };
        let card = CardGenerator::new(layout).generate(&mut RngState::from_seed(seed));

        let numbers: Vec<u8> = card.numbers().collect();
        prop_assert_eq!(numbers.len(), CARD_NUMBERS);
        let unique: BTreeSet<u8> = numbers.iter().copied().collect();
        prop_assert_eq!(unique.len(), CARD_NUMBERS, "numbers must be distinct");

        for col in 0..CARD_COLS {
            let range = column_range(col);
            for cell in card.column(col) {
                if let Some(n) = cell.number() {
                    prop_assert!(range.contains(&n), "{} outside column {}", n, col);
                }
            }
        }
        if balanced {
            prop_assert_eq!(card.row_counts(), [5, 5, 5]);
        }
    }

    /// Property: a ticket card depends only on seed, token and ticket index.
    #[test]
    fn prop_ticket_is_pure(seed in any::<u64>(), token in any::<u64>(), ticket in 0usize..12) {
        let generator = CardGenerator::default();
        let token = RoundToken(token);
        prop_assert_eq!(generator.ticket(seed, token, ticket), generator.ticket(seed, token, ticket));
    }

    /// Property: the draw order is a permutation of 1..=N.
    #[test]
    fn prop_order_is_permutation(max in 1u8..=90, seed in any::<u64>()) {
        let order = ExtractionOrder::generate(max, &mut RngState::from_seed(seed));
        prop_assert_eq!(order.len(), max as usize);
        let seen: BTreeSet<u8> = order.as_slice().iter().copied().collect();
        prop_assert_eq!(seen, (1..=max).collect::<BTreeSet<u8>>());
    }

    /// Property: once finished, further extraction ticks change nothing.
    #[test]
    fn prop_finished_is_terminal(max in 1u8..=30, extra in 0usize..10, seed in any::<u64>()) {
        let config = RoundConfig {
            max_numbers: max,
            initial_countdown_seconds: 0,
            ..RoundConfig::default()
        };
        let mut engine = RoundEngine::with_seed(config, seed).unwrap();
        engine.tick_countdown();
        for _ in 0..max {
            engine.tick_extraction();
        }
        let finished = engine.snapshot();
        prop_assert_eq!(finished.current_index, Some(max as usize - 1));
        for _ in 0..extra {
            engine.tick_extraction();
        }
        prop_assert_eq!(engine.snapshot(), finished);
        prop_assert_eq!(engine.called_numbers().len(), max as usize);
    }
}
