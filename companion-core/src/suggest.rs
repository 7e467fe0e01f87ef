//! Request/response shapes of the AI study-time suggestion service.

use crate::models::ClassEntry;
use crate::time::format_for_service;
use crate::CoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    pub name: String,
    pub day: String,
    pub formatted_start: String,
    pub formatted_end: String,
    pub location: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SuggestRequest {
    pub schedule: Vec<ScheduleItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_tasks: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_study_style: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudyTimeSuggestion {
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub reason: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SuggestResponse {
    pub overall_summary: String,
    pub suggested_study_times: Vec<StudyTimeSuggestion>,
}

#[async_trait]
pub trait SuggestionService: Send + Sync {
    async fn suggest(&self, request: &SuggestRequest) -> Result<SuggestResponse, CoreError>;
}

pub fn to_schedule(classes: &[ClassEntry]) -> Vec<ScheduleItem> {
    classes
        .iter()
        .map(|c| ScheduleItem {
            name: c.name.clone(),
            day: c.day.to_string(),
            formatted_start: format_for_service(&c.start_time.to_string()),
            formatted_end: format_for_service(&c.end_time.to_string()),
            location: c.location.clone(),
        })
        .collect()
}

fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

impl SuggestRequest {
    pub fn from_classes(
        classes: &[ClassEntry],
        additional_tasks: Option<&str>,
        preferred_study_style: Option<&str>,
    ) -> Result<Self, CoreError> {
        if classes.is_empty() {
            return Err(CoreError::Invalid("add some classes to your timetable first"));
        }
        Ok(Self {
            schedule: to_schedule(classes),
            additional_tasks: non_blank(additional_tasks),
            preferred_study_style: non_blank(preferred_study_style),
        })
    }
}

/// Builds the request and hands the service's answer back untouched.
pub async fn request_suggestions<S: SuggestionService + ?Sized>(
    service: &S,
    classes: &[ClassEntry],
    additional_tasks: Option<&str>,
    preferred_study_style: Option<&str>,
) -> Result<SuggestResponse, CoreError> {
    let request = SuggestRequest::from_classes(classes, additional_tasks, preferred_study_style)?;
    tracing::info!(classes = request.schedule.len(), "requesting study suggestions");
    service.suggest(&request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassDraft, DayOfWeek};
    use crate::time::WallTime;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Echo;

    #[async_trait]
    impl SuggestionService for Echo {
        async fn suggest(&self, request: &SuggestRequest) -> Result<SuggestResponse, CoreError> {
            Ok(SuggestResponse {
                overall_summary: format!("{} classes", request.schedule.len()),
                suggested_study_times: vec![StudyTimeSuggestion {
                    day: "Monday".into(),
                    start_time: request.schedule[0].formatted_end.clone(),
                    end_time: "whenever".into(),
                    reason: "right after class".into(),
                }],
            })
        }
    }

    fn math() -> ClassEntry {
        let mut rng = StdRng::seed_from_u64(9);
        ClassDraft::new("Math", DayOfWeek::Monday, WallTime::hm(9, 0), WallTime::hm(13, 30))
            .validate()
            .unwrap()
            .into_entry(&mut rng)
    }

    #[test]
    fn schedule_uses_twelve_hour_times() {
        let items = to_schedule(&[math()]);
        assert_eq!(items[0].formatted_start, "9:00 AM");
        assert_eq!(items[0].formatted_end, "1:30 PM");
        assert_eq!(items[0].day, "Monday");
        assert_eq!(items[0].location, "N/A");
    }

    #[test]
    fn request_wire_shape() {
        let req = SuggestRequest::from_classes(&[math()], Some("  "), Some("Pomodoro")).unwrap();
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["schedule"][0]["formattedStart"], "9:00 AM");
        assert!(v.get("additionalTasks").is_none());
        assert_eq!(v["preferredStudyStyle"], "Pomodoro");
    }

    #[test]
    fn empty_timetable_is_refused() {
        assert!(matches!(
            SuggestRequest::from_classes(&[], None, None),
            Err(CoreError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn response_passes_through() {
        let resp = request_suggestions(&Echo, &[math()], None, None).await.unwrap();
        assert_eq!(resp.overall_summary, "1 classes");
        assert_eq!(resp.suggested_study_times[0].start_time, "1:30 PM");
        assert_eq!(resp.suggested_study_times[0].end_time, "whenever");
    }
}
