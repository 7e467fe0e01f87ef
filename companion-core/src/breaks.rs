//! Free time between classes inside the display window.

use crate::models::{BreakInterval, ClassEntry, DayOfWeek, DisplayWindow, TimeRange};
use crate::time::WallTime;

/// Gaps this long or shorter are not worth showing.
pub const MIN_BREAK_MINUTES: i64 = 60;

/// Breaks for one day's classes, ascending by start.
///
/// `classes` is expected to hold only entries of `day`; the sort is stable so
/// equal start times keep their input order.
pub fn compute_breaks(
    classes: &[ClassEntry],
    day: DayOfWeek,
    window_start: WallTime,
    window_end: WallTime,
) -> Vec<BreakInterval> {
    let mut breaks = Vec::new();
    let ws = window_start.minutes() as i64;
    let we = window_end.minutes() as i64;

    let mut sorted: Vec<&ClassEntry> = classes.iter().collect();
    sorted.sort_by_key(|c| c.start());

    let Some(first) = sorted.first() else {
        if we - ws > MIN_BREAK_MINUTES {
            breaks.push(make_break(day, "full", ws, we));
        }
        return breaks;
    };

    let mut cursor = ws;
    let first_start = first.start() as i64;
    if first_start - cursor > MIN_BREAK_MINUTES {
        breaks.push(make_break(day, "start", cursor, first_start));
    }
    cursor = first.end() as i64;

    for (i, pair) in sorted.windows(2).enumerate() {
        let prev_end = pair[0].end() as i64;
        let next_start = pair[1].start() as i64;
        if next_start - prev_end > MIN_BREAK_MINUTES {
            breaks.push(make_break(day, &i.to_string(), prev_end, next_start));
        }
        cursor = cursor.max(pair[1].end() as i64);
    }

    if we - cursor > MIN_BREAK_MINUTES {
        breaks.push(make_break(day, "end", cursor, we));
    }
    breaks
}

/// Breaks for `day` taken from a whole-week class list.
pub fn breaks_for_day(
    classes: &[ClassEntry],
    day: DayOfWeek,
    window: &DisplayWindow,
) -> Vec<BreakInterval> {
    let todays: Vec<ClassEntry> = classes.iter().filter(|c| c.day == day).cloned().collect();
    compute_breaks(&todays, day, window.start, window.end)
}

fn make_break(day: DayOfWeek, tag: &str, start: i64, end: i64) -> BreakInterval {
    BreakInterval {
        id: format!("break-{day}-{tag}"),
        day,
        start_time: WallTime::saturating(start as u32),
        end_time: WallTime::saturating(end as u32),
        duration_minutes: (end - start) as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClassDraft;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn class(start: &str, end: &str) -> ClassEntry {
        let mut rng = StdRng::seed_from_u64(3);
        ClassDraft::new("c", DayOfWeek::Monday, start.parse().unwrap(), end.parse().unwrap())
            .into_entry(&mut rng)
    }

    fn spans(breaks: &[BreakInterval]) -> Vec<(String, String)> {
        breaks
            .iter()
            .map(|b| (b.start_time.to_string(), b.end_time.to_string()))
            .collect()
    }

    fn default_window() -> (WallTime, WallTime) {
        let w = DisplayWindow::default();
        (w.start, w.end)
    }

    #[test]
    fn empty_day_is_one_break() {
        let b = compute_breaks(&[], DayOfWeek::Monday, WallTime::hm(8, 0), WallTime::hm(14, 0));
        assert_eq!(spans(&b), vec![("08:00".into(), "14:00".into())]);
        assert_eq!(b[0].duration_minutes, 360);
        assert_eq!(b[0].id, "break-Monday-full");

        let b = compute_breaks(&[], DayOfWeek::Monday, WallTime::hm(8, 0), WallTime::hm(9, 0));
        assert!(b.is_empty());
    }

    #[test]
    fn exactly_sixty_minutes_is_suppressed() {
        let (ws, we) = default_window();
        let classes = vec![class("13:00", "14:00"), class("09:00", "10:00")];
        let b = compute_breaks(&classes, DayOfWeek::Monday, ws, we);
        assert_eq!(
            spans(&b),
            vec![
                ("10:00".into(), "13:00".into()),
                ("14:00".into(), "22:00".into()),
            ]
        );
        assert_eq!(b[0].duration_minutes, 180);
        assert_eq!(b[1].duration_minutes, 480);
        assert_eq!(b[0].id, "break-Monday-0");
        assert_eq!(b[1].id, "break-Monday-end");
    }

    #[test]
    fn leading_gap_is_reported() {
        let (ws, we) = default_window();
        let b = compute_breaks(&[class("10:00", "21:30")], DayOfWeek::Monday, ws, we);
        assert_eq!(spans(&b), vec![("08:00".into(), "10:00".into())]);
        assert_eq!(b[0].id, "break-Monday-start");
    }

    #[test]
    fn classes_outside_the_window_do_not_panic() {
        let (ws, we) = default_window();
        let classes = vec![class("06:00", "07:00"), class("22:30", "23:30")];
        let b = compute_breaks(&classes, DayOfWeek::Monday, ws, we);
        // gaps between classes are left unclipped; projection clips them
        assert_eq!(spans(&b), vec![("07:00".into(), "22:30".into())]);
    }

    #[test]
    fn overlapping_input_keeps_cursor_monotonic() {
        let (ws, we) = default_window();
        let classes = vec![class("09:00", "18:00"), class("10:00", "11:00")];
        let b = compute_breaks(&classes, DayOfWeek::Monday, ws, we);
        assert_eq!(spans(&b), vec![("18:00".into(), "22:00".into())]);
    }

    #[test]
    fn week_lookup_filters_by_day() {
        let mut tuesday = class("10:00", "21:00");
        tuesday.day = DayOfWeek::Tuesday;
        let classes = vec![tuesday];
        let window = DisplayWindow::default();
        assert_eq!(breaks_for_day(&classes, DayOfWeek::Monday, &window).len(), 1);
        assert_eq!(breaks_for_day(&classes, DayOfWeek::Tuesday, &window).len(), 1);
        assert_eq!(
            breaks_for_day(&classes, DayOfWeek::Tuesday, &window)[0].id,
            "break-Tuesday-start"
        );
    }

    proptest! {
        #[test]
        fn never_emits_short_breaks(starts in proptest::collection::vec(0u32..30, 0..6)) {
            // non-overlapping half-hour classes placed on distinct slots
            let mut slots: Vec<u32> = starts.into_iter().map(|s| 300 + s * 30).collect();
            slots.sort_unstable();
            slots.dedup();
            let classes: Vec<ClassEntry> = slots
                .iter()
                .map(|&s| class(&crate::time::minutes_to_time(s), &crate::time::minutes_to_time(s + 30)))
                .collect();
            let (ws, we) = default_window();
            let breaks = compute_breaks(&classes, DayOfWeek::Monday, ws, we);
            for b in &breaks {
                prop_assert!(b.duration_minutes > 60);
                prop_assert!(b.start_time < b.end_time);
            }
            for w in breaks.windows(2) {
                prop_assert!(w[0].end_time <= w[1].start_time);
            }
        }
    }
}
