//! Handicap engine.
//!
//! Pure functions implementing a fixed variant of the USGA World
//! Handicap System: per-round score differentials, the current
//! handicap index, and the handicap time series used for charting.
//!
//! Every function here is a deterministic computation over its
//! arguments. Nothing is mutated, nothing is cached, and there is no
//! I/O, so concurrent callers need no coordination. Callers are
//! responsible for pre-filtering rounds to a single player; the
//! engine does not check `player_id`.

use chrono::{Months, NaiveDate, Utc};

use crate::types::{HandicapHistoryPoint, Round};

/// Standard slope used to normalize differentials across courses.
const STANDARD_SLOPE: f64 = 113.0;

/// Scaling factor applied to the average of the best differentials.
const INDEX_MULTIPLIER: f64 = 0.96;

/// Rounds with a date older than this many calendar months are
/// excluded from the handicap history chart.
const HISTORY_WINDOW_MONTHS: u32 = 6;

/// Score differential for a single round.
///
/// `(score − rating) × 113 / slope`. Lower is better. The value is
/// not rounded here; presentation layers round to one decimal for
/// display. Assumes a non-zero slope, which the data-entry boundary
/// guarantees.
pub fn differential(round: &Round) -> f64 {
    (round.score as f64 - round.rating) * STANDARD_SLOPE / round.slope as f64
}

/// How many of the best differentials count toward the index, per the
/// USGA step table. `None` below the three-round minimum.
fn num_to_use(total_rounds: usize) -> Option<usize> {
    match total_rounds {
        0..=2 => None,
        3..=5 => Some(1),
        6..=8 => Some(2),
        9..=11 => Some(3),
        12..=14 => Some(4),
        15..=17 => Some(5),
        18 => Some(6),
        19 => Some(7),
        _ => Some(8),
    }
}

/// Round to one decimal place, half away from zero.
///
/// Matches `toFixed(1)` semantics for the positive values this domain
/// produces, so reference outputs reproduce exactly.
pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Current handicap index over a player's rounds.
///
/// Returns `0.0` when fewer than three rounds are supplied; the USGA
/// minimum is a domain rule, not a failure. Input order does not
/// matter. Ties between equal differentials are broken arbitrarily,
/// which cannot affect the result.
pub fn handicap_index(rounds: &[Round]) -> f64 {
    let Some(n) = num_to_use(rounds.len()) else {
        return 0.0;
    };

    let mut differentials: Vec<f64> = rounds.iter().map(differential).collect();
    differentials.sort_by(|a, b| a.total_cmp(b));

    let best_avg = differentials[..n].iter().sum::<f64>() / n as f64;
    round_to_tenth(best_avg * INDEX_MULTIPLIER)
}

/// Handicap time series over a player's rounds, using today's date
/// for the six-month window.
pub fn handicap_history(rounds: &[Round]) -> Vec<HandicapHistoryPoint> {
    handicap_history_at(rounds, Utc::now().date_naive())
}

/// Handicap time series with an explicit "today".
///
/// Rounds are sorted by date ascending (stable: same-date rounds keep
/// their input order). For each round, the index is recomputed over
/// the full prefix up to and including it; a point is emitted only
/// when the round itself falls within the last six calendar months
/// and at least three rounds exist so far. Output is chronological
/// with non-decreasing round counts.
///
/// The cutoff uses calendar-month arithmetic (`chrono::Months`), not
/// a fixed day count, so end-of-month dates clamp the way a calendar
/// does. Recomputing the best-N selection per prefix is O(n²), which
/// is fine at a single player's round volume.
pub fn handicap_history_at(rounds: &[Round], today: NaiveDate) -> Vec<HandicapHistoryPoint> {
    if rounds.len() < 3 {
        return Vec::new();
    }

    let mut sorted: Vec<Round> = rounds.to_vec();
    sorted.sort_by_key(|r| r.date);

    let cutoff = today
        .checked_sub_months(Months::new(HISTORY_WINDOW_MONTHS))
        .unwrap_or(NaiveDate::MIN);

    let mut points = Vec::new();
    for i in 0..sorted.len() {
        let prefix = &sorted[..=i];
        if sorted[i].date >= cutoff && prefix.len() >= 3 {
            points.push(HandicapHistoryPoint {
                date: sorted[i].date,
                handicap: handicap_index(prefix),
                round_count: prefix.len(),
            });
        }
    }
    points
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Round with the given score on a slope-113 course rated 72.0,
    /// so its differential is exactly `score - 72`.
    fn flat_round(score: i64, date: NaiveDate) -> Round {
        Round {
            id: format!("round-{score}-{date}"),
            player_id: "player-001".to_string(),
            date,
            course: "Flat Meadows".to_string(),
            tee: "White".to_string(),
            rating: 72.0,
            slope: 113,
            score,
        }
    }

    fn day(n: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap() + chrono::Days::new(n)
    }

    // -- differential --

    #[test]
    fn test_differential_formula() {
        let round = Round {
            rating: 72.5,
            slope: 130,
            score: 85,
            ..Round::sample()
        };
        // (85 - 72.5) * 113 / 130
        let expected = 12.5 * 113.0 / 130.0;
        assert!((differential(&round) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_differential_not_rounded() {
        let round = Round {
            rating: 72.5,
            slope: 130,
            score: 85,
            ..Round::sample()
        };
        let d = differential(&round);
        // Full precision is preserved for the index computation.
        assert!((d - round_to_tenth(d)).abs() > 1e-6);
    }

    #[test]
    fn test_differential_negative_for_sub_rating_score() {
        let round = Round {
            rating: 72.0,
            slope: 113,
            score: 70,
            ..Round::sample()
        };
        assert!((differential(&round) - (-2.0)).abs() < 1e-12);
    }

    // -- num_to_use step table --

    #[test]
    fn test_num_to_use_step_table() {
        assert_eq!(num_to_use(0), None);
        assert_eq!(num_to_use(2), None);
        assert_eq!(num_to_use(3), Some(1));
        assert_eq!(num_to_use(5), Some(1));
        assert_eq!(num_to_use(6), Some(2));
        assert_eq!(num_to_use(8), Some(2));
        assert_eq!(num_to_use(9), Some(3));
        assert_eq!(num_to_use(11), Some(3));
        assert_eq!(num_to_use(12), Some(4));
        assert_eq!(num_to_use(14), Some(4));
        assert_eq!(num_to_use(15), Some(5));
        assert_eq!(num_to_use(17), Some(5));
        assert_eq!(num_to_use(18), Some(6));
        assert_eq!(num_to_use(19), Some(7));
        assert_eq!(num_to_use(20), Some(8));
        assert_eq!(num_to_use(50), Some(8));
    }

    // -- rounding --

    #[test]
    fn test_round_to_tenth_half_up() {
        assert_eq!(round_to_tenth(10.85), 10.9);
        assert_eq!(round_to_tenth(10.84), 10.8);
        assert_eq!(round_to_tenth(7.232), 7.2);
        assert_eq!(round_to_tenth(9.6), 9.6);
    }

    // -- handicap_index --

    #[test]
    fn test_index_under_three_rounds_is_zero() {
        assert_eq!(handicap_index(&[]), 0.0);
        let rounds = vec![flat_round(90, day(0)), flat_round(85, day(1))];
        assert_eq!(handicap_index(&rounds), 0.0);
    }

    #[test]
    fn test_index_three_rounds_uses_best_one() {
        // Differentials 15, 10, 20 -> best is 10 -> 10 * 0.96 = 9.6
        let rounds = vec![
            flat_round(87, day(0)),
            flat_round(82, day(1)),
            flat_round(92, day(2)),
        ];
        assert_eq!(handicap_index(&rounds), 9.6);
    }

    #[test]
    fn test_index_input_order_does_not_matter() {
        let mut rounds = vec![
            flat_round(92, day(2)),
            flat_round(87, day(0)),
            flat_round(82, day(1)),
        ];
        let forward = handicap_index(&rounds);
        rounds.reverse();
        assert_eq!(handicap_index(&rounds), forward);
    }

    #[test]
    fn test_index_is_deterministic() {
        let rounds: Vec<Round> = (0..10).map(|i| flat_round(85 + i, day(i as u64))).collect();
        let first = handicap_index(&rounds);
        assert_eq!(handicap_index(&rounds), first);
    }

    #[test]
    fn test_index_does_not_mutate_input() {
        let rounds = vec![
            flat_round(92, day(0)),
            flat_round(82, day(1)),
            flat_round(87, day(2)),
        ];
        let scores_before: Vec<i64> = rounds.iter().map(|r| r.score).collect();
        let _ = handicap_index(&rounds);
        let scores_after: Vec<i64> = rounds.iter().map(|r| r.score).collect();
        assert_eq!(scores_before, scores_after);
    }

    #[test]
    fn test_index_twenty_rounds_uses_best_eight() {
        // Differentials 1..=20. Best 8 average = 4.5; 19 rounds would
        // use best 7 (avg 4.0) and 18 rounds best 6 (avg 3.5).
        let rounds: Vec<Round> = (1..=20)
            .map(|i| flat_round(72 + i, day(i as u64)))
            .collect();
        assert_eq!(handicap_index(&rounds), round_to_tenth(4.5 * 0.96)); // 4.3

        let nineteen = &rounds[..19];
        assert_eq!(handicap_index(nineteen), round_to_tenth(4.0 * 0.96)); // 3.8

        let eighteen = &rounds[..18];
        assert_eq!(handicap_index(eighteen), round_to_tenth(3.5 * 0.96)); // 3.4
    }

    #[test]
    fn test_index_end_to_end_scenario() {
        // Scores [90, 88, 85, 92, 80] on rating 72.0 / slope 120:
        // five rounds -> best 1, from score 80: (80-72)*113/120 = 7.533...
        // 7.533 * 0.96 = 7.232 -> 7.2
        let rounds: Vec<Round> = [90, 88, 85, 92, 80]
            .iter()
            .enumerate()
            .map(|(i, &score)| Round {
                id: format!("round-{i}"),
                score,
                rating: 72.0,
                slope: 120,
                date: day(i as u64),
                ..Round::sample()
            })
            .collect();
        assert_eq!(handicap_index(&rounds), 7.2);
    }

    #[test]
    fn test_index_tied_differentials() {
        // All identical differentials: tie order is irrelevant.
        let rounds: Vec<Round> = (0..6).map(|i| flat_round(82, day(i))).collect();
        // Differential 10 everywhere, best 2 average 10 -> 9.6
        assert_eq!(handicap_index(&rounds), 9.6);
    }

    // -- handicap_history --

    #[test]
    fn test_history_under_three_rounds_is_empty() {
        let today = day(30);
        assert!(handicap_history_at(&[], today).is_empty());
        let rounds = vec![flat_round(90, day(0)), flat_round(85, day(1))];
        assert!(handicap_history_at(&rounds, today).is_empty());
    }

    #[test]
    fn test_history_emits_one_point_per_recent_round() {
        let rounds = vec![
            flat_round(87, day(0)),
            flat_round(82, day(5)),
            flat_round(92, day(10)),
            flat_round(85, day(15)),
        ];
        let points = handicap_history_at(&rounds, day(20));
        // First two rounds are below the 3-round minimum.
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, day(10));
        assert_eq!(points[0].round_count, 3);
        assert_eq!(points[0].handicap, 9.6);
        assert_eq!(points[1].date, day(15));
        assert_eq!(points[1].round_count, 4);
    }

    #[test]
    fn test_history_sorts_unordered_input() {
        let rounds = vec![
            flat_round(85, day(15)),
            flat_round(87, day(0)),
            flat_round(92, day(10)),
            flat_round(82, day(5)),
        ];
        let points = handicap_history_at(&rounds, day(20));
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, day(10));
        assert_eq!(points[1].date, day(15));
    }

    #[test]
    fn test_history_excludes_rounds_older_than_six_months() {
        // Three old rounds satisfy the 3-round minimum, but only the
        // recent round's own date is inside the window.
        let old = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let rounds = vec![
            flat_round(87, old),
            flat_round(82, old + chrono::Days::new(1)),
            flat_round(92, old + chrono::Days::new(2)),
            flat_round(85, NaiveDate::from_ymd_opt(2026, 7, 1).unwrap()),
        ];
        let today = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let points = handicap_history_at(&rounds, today);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2026, 7, 1).unwrap());
        // The old rounds still count toward the prefix.
        assert_eq!(points[0].round_count, 4);
    }

    #[test]
    fn test_history_all_rounds_stale_is_empty() {
        let old = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let rounds: Vec<Round> = (0..5)
            .map(|i| flat_round(85 + i, old + chrono::Days::new(i as u64)))
            .collect();
        let today = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        assert!(handicap_history_at(&rounds, today).is_empty());
    }

    #[test]
    fn test_history_cutoff_uses_calendar_months() {
        // Six months before 2026-08-24 is 2026-02-24. A round on the
        // cutoff day itself is included; one day earlier is not.
        let today = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let cutoff = NaiveDate::from_ymd_opt(2026, 2, 24).unwrap();

        let base = vec![
            flat_round(87, NaiveDate::from_ymd_opt(2025, 11, 1).unwrap()),
            flat_round(82, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()),
        ];

        let mut on_cutoff = base.clone();
        on_cutoff.push(flat_round(92, cutoff));
        assert_eq!(handicap_history_at(&on_cutoff, today).len(), 1);

        let mut before_cutoff = base;
        before_cutoff.push(flat_round(92, cutoff - chrono::Days::new(1)));
        assert!(handicap_history_at(&before_cutoff, today).is_empty());
    }

    #[test]
    fn test_history_month_end_clamping() {
        // Six months before August 31 clamps to the last day of
        // February. A round on February 28 is then inside the window.
        let today = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();
        let rounds = vec![
            flat_round(87, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()),
            flat_round(82, NaiveDate::from_ymd_opt(2026, 1, 2).unwrap()),
            flat_round(92, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()),
        ];
        let points = handicap_history_at(&rounds, today);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].round_count, 3);
    }

    #[test]
    fn test_history_monotonic_dates_and_counts() {
        let rounds: Vec<Round> = (0..12)
            .map(|i| flat_round(80 + (i % 7), day(i as u64 * 3)))
            .collect();
        let points = handicap_history_at(&rounds, day(40));
        assert!(!points.is_empty());
        for pair in points.windows(2) {
            assert!(pair[0].date <= pair[1].date);
            assert!(pair[0].round_count < pair[1].round_count);
        }
    }

    #[test]
    fn test_history_does_not_mutate_input() {
        let rounds = vec![
            flat_round(85, day(15)),
            flat_round(87, day(0)),
            flat_round(92, day(10)),
        ];
        let order_before: Vec<NaiveDate> = rounds.iter().map(|r| r.date).collect();
        let _ = handicap_history_at(&rounds, day(20));
        let order_after: Vec<NaiveDate> = rounds.iter().map(|r| r.date).collect();
        assert_eq!(order_before, order_after);
    }
}
