//! Gamification scoring engine.
//!
//! Pure functions mapping completed intervals to points, cumulative points
//! to levels, and completion timestamps to streak continuity. Nothing here
//! holds state or touches storage; the lifecycle manager feeds in
//! pre-validated inputs and persists the results.
//!
//! The leveling curve is a square-root progression: level `n` begins at
//! `(n-1)^2 * 100` points, so each level costs more than the last.

use chrono::{DateTime, Utc};

use crate::session::SessionKind;

/// Base points per completed work interval.
const WORK_BASE_POINTS: i64 = 10;
/// Base points per completed short break.
const BREAK_BASE_POINTS: i64 = 2;
/// Base points per completed long break.
const LONG_BREAK_BASE_POINTS: i64 = 5;

/// One bonus point per this many minutes of interval duration.
const DURATION_BONUS_STEP_MINUTES: u32 = 5;

/// Each streak day adds 10% to the multiplier.
const STREAK_MULTIPLIER_STEP: f64 = 0.1;
/// Multiplier cap, reached at streak >= 20.
const STREAK_MULTIPLIER_CAP: f64 = 3.0;

/// Scale of the leveling curve: level n begins at `(n-1)^2 * 100` points.
const LEVEL_CURVE_SCALE: i64 = 100;

/// Points awarded for a completed interval.
///
/// Base points by kind plus a discrete duration bonus, multiplied by the
/// streak multiplier and rounded half away from zero. The streak cap is
/// the only clamping performed here; duration bounds are the caller's
/// responsibility.
pub fn interval_points(duration_minutes: u32, kind: SessionKind, current_streak: u32) -> i64 {
    let base = match kind {
        SessionKind::Work => WORK_BASE_POINTS,
        SessionKind::Break => BREAK_BASE_POINTS,
        SessionKind::LongBreak => LONG_BREAK_BASE_POINTS,
    };
    let bonus = (duration_minutes / DURATION_BONUS_STEP_MINUTES) as i64;
    let multiplier =
        (1.0 + current_streak as f64 * STREAK_MULTIPLIER_STEP).min(STREAK_MULTIPLIER_CAP);
    ((base + bonus) as f64 * multiplier).round() as i64
}

/// Level reached at a cumulative point total. Always >= 1; points below
/// zero are treated as zero.
pub fn level_for_points(points: i64) -> u32 {
    if points <= 0 {
        return 1;
    }
    isqrt((points / LEVEL_CURVE_SCALE) as u64) as u32 + 1
}

/// Points required to move from `level` to `level + 1`.
///
/// Inverse of [`level_for_points`]: `level_for_points(threshold - 1)` is
/// `level` and `level_for_points(threshold)` is `level + 1`.
pub fn points_threshold_for_level(level: u32) -> i64 {
    let level = i64::from(level);
    level * level * LEVEL_CURVE_SCALE
}

/// Position within the current level as a whole percentage, clamped to
/// 0..=100.
pub fn level_progress_percent(points: i64, level: u32) -> u8 {
    let floor = points_threshold_for_level(level.saturating_sub(1));
    let ceil = points_threshold_for_level(level);
    let progress = (points - floor) as f64 / (ceil - floor) as f64 * 100.0;
    progress.round().clamp(0.0, 100.0) as u8
}

/// Whether a daily streak survives from the last completed session to now.
///
/// Timestamps are compared date-only: the streak continues if the last
/// completion was today or yesterday, and breaks once two or more calendar
/// days have elapsed. The streak rewards daily engagement, not a strict
/// 24-hour cadence.
pub fn streak_continues(last_completed_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    let elapsed_days = (now.date_naive() - last_completed_at.date_naive()).num_days();
    (0..=1).contains(&elapsed_days)
}

/// Integer square root. The float candidate is corrected so exact squares
/// land on the right side of level boundaries.
fn isqrt(n: u64) -> u64 {
    let mut x = (n as f64).sqrt() as u64;
    while x.saturating_mul(x) > n {
        x -= 1;
    }
    while (x + 1).saturating_mul(x + 1) <= n {
        x += 1;
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    #[test]
    fn base_points_by_kind() {
        assert_eq!(interval_points(25, SessionKind::Work, 0), 15); // 10 + 5
        assert_eq!(interval_points(5, SessionKind::Break, 0), 3); // 2 + 1
        assert_eq!(interval_points(15, SessionKind::LongBreak, 0), 8); // 5 + 3
    }

    #[test]
    fn duration_bonus_is_stepped() {
        // One point per started 5-minute block, floored.
        assert_eq!(interval_points(4, SessionKind::Work, 0), 10);
        assert_eq!(interval_points(5, SessionKind::Work, 0), 11);
        assert_eq!(interval_points(9, SessionKind::Work, 0), 11);
        assert_eq!(interval_points(120, SessionKind::Work, 0), 34);
    }

    #[test]
    fn streak_multiplier_applies() {
        // (10 + 5) * 1.3 = 19.5, rounded half away from zero
        assert_eq!(interval_points(25, SessionKind::Work, 3), 20);
    }

    #[test]
    fn streak_multiplier_caps_at_three() {
        assert_eq!(interval_points(25, SessionKind::Work, 20), 45); // (10+5)*3
        assert_eq!(
            interval_points(25, SessionKind::Work, 1000),
            interval_points(25, SessionKind::Work, 20)
        );
    }

    #[test]
    fn level_curve_boundaries() {
        assert_eq!(level_for_points(0), 1);
        assert_eq!(level_for_points(99), 1);
        assert_eq!(level_for_points(100), 2);
        assert_eq!(level_for_points(399), 2);
        assert_eq!(level_for_points(400), 3);
        assert_eq!(level_for_points(-5), 1);
    }

    #[test]
    fn thresholds_match_curve() {
        assert_eq!(points_threshold_for_level(1), 100);
        assert_eq!(points_threshold_for_level(2), 400);
        assert_eq!(points_threshold_for_level(10), 10_000);
    }

    #[test]
    fn progress_percent_within_level() {
        assert_eq!(level_progress_percent(0, 1), 0);
        assert_eq!(level_progress_percent(50, 1), 50);
        assert_eq!(level_progress_percent(100, 2), 0);
        assert_eq!(level_progress_percent(250, 2), 50); // (250-100)/300
    }

    #[test]
    fn streak_continuity_by_calendar_day() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        assert!(streak_continues(now - Duration::hours(2), now));
        assert!(streak_continues(now - Duration::days(1), now));
        assert!(!streak_continues(now - Duration::days(2), now));
        assert!(!streak_continues(now - Duration::days(30), now));
    }

    #[test]
    fn streak_tolerates_midnight_boundary() {
        // 23:50 yesterday to 00:10 today is 20 minutes apart but one
        // calendar day, and still continues.
        let last = Utc.with_ymd_and_hms(2026, 3, 9, 23, 50, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 0, 10, 0).unwrap();
        assert!(streak_continues(last, now));
    }

    proptest! {
        #[test]
        fn level_is_monotonic(points in 0i64..5_000_000) {
            prop_assert!(level_for_points(points) <= level_for_points(points + 1));
        }

        #[test]
        fn threshold_round_trips(level in 1u32..1000) {
            let threshold = points_threshold_for_level(level);
            prop_assert_eq!(level_for_points(threshold - 1), level);
            prop_assert_eq!(level_for_points(threshold), level + 1);
        }

        #[test]
        fn progress_is_bounded(points in 0i64..5_000_000) {
            let level = level_for_points(points);
            let pct = level_progress_percent(points, level);
            prop_assert!(pct <= 100);
        }

        #[test]
        fn far_streaks_score_like_the_cap(
            duration in 1u32..=120,
            streak in 20u32..2000,
        ) {
            prop_assert_eq!(
                interval_points(duration, SessionKind::Work, streak),
                interval_points(duration, SessionKind::Work, 20)
            );
        }
    }
}
