use bingo_core::{Phase, RoundConfig, RoundEngine, RoundToken};

fn engine(max_numbers: u8, countdown: u32) -> RoundEngine {
    let config = RoundConfig {
        max_numbers,
        initial_countdown_seconds: countdown,
        ..RoundConfig::default()
    };
    RoundEngine::with_seed(config, 0xC0FFEE).expect("engine")
}

macro_rules! countdown_case {
    ($name:ident, $countdown:expr, $ticks:expr, $expected:expr) => {
        #[test]
        fn $name() {
            let mut engine = engine(90, $countdown);
            for _ in 0..$ticks {
                engine.tick_countdown();
            }
            assert_eq!(engine.phase(), $expected);
        }
    };
}

countdown_case!(countdown_untouched, 10, 0, Phase::Countdown { remaining: 10 });
countdown_case!(countdown_one_tick, 10, 1, Phase::Countdown { remaining: 9 });
countdown_case!(countdown_nine_ticks, 10, 9, Phase::Countdown { remaining: 1 });
countdown_case!(countdown_ten_ticks, 10, 10, Phase::Extracting);
countdown_case!(countdown_extra_ticks_ignored, 10, 15, Phase::Extracting);
countdown_case!(countdown_zero_first_tick, 0, 1, Phase::Extracting);
countdown_case!(countdown_one_first_tick, 1, 1, Phase::Extracting);
countdown_case!(countdown_three_two_ticks, 3, 2, Phase::Countdown { remaining: 1 });

macro_rules! extraction_case {
    ($name:ident, $max:expr, $ticks:expr, $index:expr, $phase:expr) => {
        #[test]
        fn $name() {
            let mut engine = engine($max, 0);
            engine.tick_countdown();
            for _ in 0..$ticks {
                engine.tick_extraction();
            }
            let state = engine.state();
            assert_eq!(state.current_index, Some($index));
            assert_eq!(state.phase, $phase);
            assert_eq!(engine.called_numbers().len(), $index + 1);
        }
    };
}

extraction_case!(extract_max5_none, 5, 0, 0, Phase::Extracting);
extraction_case!(extract_max5_three, 5, 3, 3, Phase::Extracting);
extraction_case!(extract_max5_four, 5, 4, 4, Phase::Finished);
extraction_case!(extract_max5_five, 5, 5, 4, Phase::Finished);
extraction_case!(extract_max5_many, 5, 50, 4, Phase::Finished);
extraction_case!(extract_max2_one, 2, 1, 1, Phase::Finished);
extraction_case!(extract_max1_none, 1, 0, 0, Phase::Finished);
extraction_case!(extract_max90_half, 90, 44, 44, Phase::Extracting);
extraction_case!(extract_max90_all, 90, 89, 89, Phase::Finished);

#[test]
fn scenario_ninety_numbers_after_ten_seconds() {
    let mut engine = engine(90, 10);
    for _ in 0..10 {
        engine.tick_countdown();
    }
    assert_eq!(engine.phase(), Phase::Extracting);
    assert_eq!(engine.state().current_index, Some(0));
    assert_eq!(engine.called_numbers().len(), 1);
}

#[test]
fn scenario_five_numbers_finishes_and_stays() {
    let mut engine = engine(5, 0);
    engine.tick_countdown();
    assert_eq!(engine.state().current_index, Some(0));
    for _ in 0..4 {
        engine.tick_extraction();
    }
    let finished = engine.snapshot();
    assert_eq!(finished.phase, Phase::Finished);
    assert_eq!(finished.current_index, Some(4));
    assert_eq!(engine.tick_extraction(), finished);
}

#[test]
fn index_grows_by_one_per_tick() {
    let mut engine = engine(30, 0);
    engine.tick_countdown();
    let mut last = 0usize;
    while engine.phase() == Phase::Extracting {
        let state = engine.tick_extraction();
        let index = state.current_index.expect("index");
        assert_eq!(index, last + 1);
        last = index;
    }
    assert_eq!(last, 29);
}

#[test]
fn double_toggle_restores_phase_and_index() {
    let mut engine = engine(90, 0);
    engine.tick_countdown();
    for _ in 0..7 {
        engine.tick_extraction();
    }
    let before = engine.snapshot();
    engine.toggle_pause();
    let after = engine.toggle_pause();
    assert_eq!(after.phase, before.phase);
    assert_eq!(after.current_index, before.current_index);
}

#[test]
fn called_numbers_are_a_prefix_of_the_order() {
    let mut engine = engine(90, 0);
    engine.tick_countdown();
    for _ in 0..20 {
        engine.tick_extraction();
    }
    let state = engine.snapshot();
    let prefix: Vec<u8> = state.extraction_order.prefix(21).to_vec();
    assert_eq!(state.calls(), prefix.as_slice());
    for number in prefix {
        assert!(engine.is_matched(number));
    }
    assert!(!engine.is_matched(0));
}

#[test]
fn same_seed_replays_the_same_round() {
    let mut a = engine(90, 0);
    let mut b = engine(90, 0);
    a.tick_countdown();
    b.tick_countdown();
    assert_eq!(a.state().extraction_order, b.state().extraction_order);
}

#[test]
fn every_start_mints_a_fresh_order_and_token() {
    let mut engine = engine(90, 0);
    engine.tick_countdown();
    let first = engine.snapshot();
    engine.restart();
    engine.tick_countdown();
    let second = engine.snapshot();
    assert_eq!(first.token, RoundToken(1));
    assert_eq!(second.token, RoundToken(2));
    assert_ne!(first.extraction_order, second.extraction_order);
}
