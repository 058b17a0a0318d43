//! Weighted draw tests.

use prize_wheel_core::{
    config::{PrizeConfig, WheelConfig},
    drawer::{self, FALLBACK_INDEX},
    prize_table::PrizeTable,
    rng::{RandomSource, ScriptedSource, SeededSource},
};

fn reference_table() -> PrizeTable {
    PrizeTable::from_config(&WheelConfig::default()).unwrap()
}

#[test]
fn every_roll_maps_to_its_unique_range() {
    let table = reference_table();

    for roll in 1..=100u32 {
        let containing: Vec<usize> = table
            .prizes()
            .iter()
            .enumerate()
            .filter(|(_, p)| p.range_min <= roll && roll <= p.range_max)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(containing.len(), 1, "roll {roll} covered by {containing:?}");

        let mut source = ScriptedSource::with_rolls(vec![roll]);
        let draw = drawer::draw(&table, &mut source);
        assert_eq!(draw.roll, roll);
        assert_eq!(draw.index, containing[0], "roll {roll}");
    }
}

#[test]
fn reference_rolls_land_on_expected_prizes() {
    let table = reference_table();
    let cases = [(1, 0), (5, 0), (6, 1), (23, 2), (25, 2), (26, 3), (37, 5), (75, 6), (76, 7), (100, 7)];

    for (roll, expected) in cases {
        assert_eq!(drawer::index_for(&table, roll), expected, "roll {roll}");
    }
}

#[test]
fn uncovered_roll_falls_back_to_first_prize() {
    let descriptors = vec![PrizeConfig::new("a", 30), PrizeConfig::new("b", 60)];
    let table = PrizeTable::build(&descriptors, 1).unwrap();

    let mut source = ScriptedSource::with_rolls(vec![95]);
    let draw = drawer::draw(&table, &mut source);
    assert_eq!(draw.roll, 95);
    assert_eq!(draw.index, FALLBACK_INDEX);
}

#[test]
fn draw_consumes_exactly_one_roll() {
    let table = reference_table();
    let mut source = ScriptedSource::with_rolls(vec![10, 90]);

    drawer::draw(&table, &mut source);
    assert_eq!(source.rolls_drawn(), 1);
    assert_eq!(source.units_drawn(), 0);
}

#[test]
fn seeded_rolls_stay_in_percent_range_and_cover_it() {
    let mut source = SeededSource::new(0xC0FF_EE00);
    let mut seen = [false; 101];

    for _ in 0..20_000 {
        let roll = source.roll_percent();
        assert!((1..=100).contains(&roll), "roll out of range: {roll}");
        seen[roll as usize] = true;
    }
    assert!(seen[1..].iter().all(|s| *s), "some roll in 1..=100 never appeared");
}

#[test]
fn seeded_draw_frequencies_track_weights() {
    let table = reference_table();
    let mut source = SeededSource::new(7);
    let mut counts = vec![0u32; table.len()];
    const DRAWS: u32 = 100_000;

    for _ in 0..DRAWS {
        counts[drawer::draw(&table, &mut source).index] += 1;
    }

    for (prize, count) in table.prizes().iter().zip(&counts) {
        let observed = *count as f64 * 100.0 / DRAWS as f64;
        assert!(
            (observed - prize.weight as f64).abs() < 1.0,
            "{}: observed {observed:.2}% vs configured {}%",
            prize.name, prize.weight
        );
    }
}
