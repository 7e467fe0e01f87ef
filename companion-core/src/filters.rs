use crate::models::{ClassEntry, DayOfWeek, TimeRange};

/// Week order, then start time.
pub fn sort_classes(classes: &mut [ClassEntry]) {
    classes.sort_by_key(|c| (c.day, c.start()));
}

pub fn classes_for_day(classes: &[ClassEntry], day: DayOfWeek) -> Vec<ClassEntry> {
    classes.iter().filter(|c| c.day == day).cloned().collect()
}

pub fn filter_by_text(classes: &[ClassEntry], query: &str) -> Vec<ClassEntry> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return classes.to_vec();
    }
    classes
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&q) || c.location.to_lowercase().contains(&q))
        .cloned()
        .collect()
}
