use crate::models::TimeRange;

/// Half-open intersection on the same day. Touching ranges do not overlap.
pub fn overlaps<A: TimeRange + ?Sized, B: TimeRange + ?Sized>(a: &A, b: &B) -> bool {
    a.day() == b.day() && a.start() < b.end() && b.start() < a.end()
}

/// True when `candidate` collides with any of `existing`.
pub fn has_overlap<C, E>(candidate: &C, existing: &[E]) -> bool
where
    C: TimeRange + ?Sized,
    E: TimeRange,
{
    existing.iter().any(|e| overlaps(candidate, e))
}

/// First entry the candidate collides with, for conflict messages.
pub fn find_conflict<'a, C, E>(candidate: &C, existing: &'a [E]) -> Option<&'a E>
where
    C: TimeRange + ?Sized,
    E: TimeRange,
{
    existing.iter().find(|e| overlaps(candidate, *e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassDraft, ClassEntry, DayOfWeek};
    use crate::time::WallTime;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn entry(day: DayOfWeek, start: u32, end: u32) -> ClassEntry {
        let mut rng = StdRng::seed_from_u64(1);
        ClassDraft::new(
            "x",
            day,
            WallTime::from_minutes(start).unwrap(),
            WallTime::from_minutes(end).unwrap(),
        )
        .into_entry(&mut rng)
    }

    fn draft(day: DayOfWeek, start: u32, end: u32) -> ClassDraft {
        ClassDraft::new(
            "y",
            day,
            WallTime::from_minutes(start).unwrap(),
            WallTime::from_minutes(end).unwrap(),
        )
    }

    #[test]
    fn touching_classes_do_not_overlap() {
        let existing = vec![entry(DayOfWeek::Monday, 9 * 60, 10 * 60)];
        assert!(!has_overlap(&draft(DayOfWeek::Monday, 10 * 60, 11 * 60), &existing));
        assert!(!has_overlap(&draft(DayOfWeek::Monday, 8 * 60, 9 * 60), &existing));
    }

    #[test]
    fn partial_and_nested_overlap() {
        let existing = vec![entry(DayOfWeek::Monday, 9 * 60, 11 * 60)];
        assert!(has_overlap(&draft(DayOfWeek::Monday, 10 * 60, 12 * 60), &existing));
        assert!(has_overlap(&draft(DayOfWeek::Monday, 9 * 60 + 30, 10 * 60), &existing));
        assert!(has_overlap(&draft(DayOfWeek::Monday, 8 * 60, 12 * 60), &existing));
        assert!(find_conflict(&draft(DayOfWeek::Monday, 8 * 60, 12 * 60), &existing).is_some());
    }

    #[test]
    fn other_days_never_overlap() {
        let existing = vec![entry(DayOfWeek::Monday, 9 * 60, 11 * 60)];
        assert!(!has_overlap(&draft(DayOfWeek::Tuesday, 9 * 60, 11 * 60), &existing));
        assert!(!has_overlap(&draft(DayOfWeek::Friday, 0, 23 * 60), &[] as &[ClassEntry]));
    }

    proptest! {
        #[test]
        fn matches_interval_condition(
            cs in 0u32..1400, clen in 1u32..40,
            es in 0u32..1400, elen in 1u32..40,
            same_day in any::<bool>(),
        ) {
            let ce = cs + clen;
            let ee = es + elen;
            let other = if same_day { DayOfWeek::Monday } else { DayOfWeek::Sunday };
            let c = draft(DayOfWeek::Monday, cs, ce);
            let e = entry(other, es, ee);
            let expected = same_day && cs < ee && es < ce;
            prop_assert_eq!(has_overlap(&c, std::slice::from_ref(&e)), expected);
            prop_assert_eq!(overlaps(&c, &e), overlaps(&e, &c));
        }
    }
}
