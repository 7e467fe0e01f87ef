//! Maps classes and breaks onto the fixed 30-minute grid of the week view.

use crate::breaks::breaks_for_day;
use crate::models::{BreakInterval, ClassEntry, DayOfWeek, DisplayWindow, TimeRange};
use crate::time::{WallTime, SLOT_MINUTES};
use serde::Serialize;

/// Vertical position of an item, in the caller's row units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Placement {
    pub offset: f32,
    pub span: f32,
}

/// Clips `item` to the window and scales it to rows of `row_height`.
/// `None` when nothing of the item is visible.
pub fn project<T: TimeRange + ?Sized>(
    item: &T,
    window_start: WallTime,
    window_end: WallTime,
    row_height: f32,
) -> Option<Placement> {
    let ws = window_start.minutes();
    let we = window_end.minutes();
    if item.end() <= ws || item.start() >= we {
        return None;
    }
    let start = item.start().max(ws);
    let end = item.end().min(we);
    let slot = SLOT_MINUTES as f32;
    let offset = (start - ws) as f32 / slot * row_height;
    let span = end.saturating_sub(start) as f32 / slot * row_height;
    if span <= 0.0 {
        return None;
    }
    Some(Placement { offset, span })
}

pub fn grid_rows(window: &DisplayWindow) -> u32 {
    window.rows()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DayItem {
    Class(ClassEntry),
    Break(BreakInterval),
}

impl TimeRange for DayItem {
    fn day(&self) -> DayOfWeek {
        match self {
            DayItem::Class(c) => c.day(),
            DayItem::Break(b) => b.day(),
        }
    }
    fn start(&self) -> u32 {
        match self {
            DayItem::Class(c) => c.start(),
            DayItem::Break(b) => b.start(),
        }
    }
    fn end(&self) -> u32 {
        match self {
            DayItem::Class(c) => c.end(),
            DayItem::Break(b) => b.end(),
        }
    }
}

/// One day's classes and breaks, by start time.
pub fn day_items(classes: &[ClassEntry], day: DayOfWeek, window: &DisplayWindow) -> Vec<DayItem> {
    let mut items: Vec<DayItem> = classes
        .iter()
        .filter(|c| c.day == day)
        .cloned()
        .map(DayItem::Class)
        .collect();
    items.extend(breaks_for_day(classes, day, window).into_iter().map(DayItem::Break));
    items.sort_by_key(|i| i.start());
    items
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlacedItem {
    pub item: DayItem,
    pub placement: Placement,
}

pub fn layout_day(
    classes: &[ClassEntry],
    day: DayOfWeek,
    window: &DisplayWindow,
    row_height: f32,
) -> Vec<PlacedItem> {
    day_items(classes, day, window)
        .into_iter()
        .filter_map(|item| {
            project(&item, window.start, window.end, row_height)
                .map(|placement| PlacedItem { item, placement })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClassDraft;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn class(start: u32, end: u32) -> ClassEntry {
        let mut rng = StdRng::seed_from_u64(5);
        ClassDraft::new(
            "c",
            DayOfWeek::Wednesday,
            WallTime::from_minutes(start).unwrap(),
            WallTime::from_minutes(end).unwrap(),
        )
        .into_entry(&mut rng)
    }

    fn window() -> DisplayWindow {
        DisplayWindow::default()
    }

    #[test]
    fn projects_inside_window() {
        let w = window();
        let p = project(&class(9 * 60, 10 * 60 + 30), w.start, w.end, 40.0).unwrap();
        assert_eq!(p, Placement { offset: 80.0, span: 120.0 });
    }

    #[test]
    fn clips_partial_items() {
        let w = window();
        let early = project(&class(7 * 60, 9 * 60), w.start, w.end, 1.0).unwrap();
        assert_eq!(early, Placement { offset: 0.0, span: 2.0 });
        let late = project(&class(21 * 60, 23 * 60), w.start, w.end, 1.0).unwrap();
        assert_eq!(late, Placement { offset: 26.0, span: 2.0 });
    }

    #[test]
    fn hides_items_outside_window() {
        let w = window();
        assert!(project(&class(6 * 60, 8 * 60), w.start, w.end, 1.0).is_none());
        assert!(project(&class(22 * 60, 23 * 60), w.start, w.end, 1.0).is_none());
        assert!(project(&class(9 * 60, 10 * 60), w.start, w.end, 0.0).is_none());
    }

    #[test]
    fn day_layout_interleaves_breaks() {
        let classes = vec![class(13 * 60, 14 * 60), class(9 * 60, 10 * 60)];
        let placed = layout_day(&classes, DayOfWeek::Wednesday, &window(), 1.0);
        let kinds: Vec<&str> = placed
            .iter()
            .map(|p| match p.item {
                DayItem::Class(_) => "class",
                DayItem::Break(_) => "break",
            })
            .collect();
        assert_eq!(kinds, vec!["class", "break", "class", "break"]);
        assert_eq!(placed[1].placement, Placement { offset: 4.0, span: 6.0 });
        assert_eq!(grid_rows(&window()), 28);
    }

    #[test]
    fn empty_day_is_one_full_break() {
        let placed = layout_day(&[], DayOfWeek::Sunday, &window(), 1.0);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].placement, Placement { offset: 0.0, span: 28.0 });
    }

    proptest! {
        #[test]
        fn partial_overlap_has_positive_span(start in 0u32..1400, len in 1u32..600) {
            let end = (start + len).min(1439);
            prop_assume!(start < end);
            let w = window();
            let c = class(start, end);
            let visible = end > w.start_minutes() && start < w.end_minutes();
            match project(&c, w.start, w.end, 40.0) {
                Some(p) => {
                    prop_assert!(visible);
                    prop_assert!(p.span > 0.0);
                    prop_assert!(p.offset >= 0.0);
                    prop_assert!(p.offset + p.span <= 28.0 * 40.0 + f32::EPSILON);
                }
                None => prop_assert!(!visible),
            }
        }
    }
}
