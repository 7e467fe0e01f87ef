use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use companion_core::{
    breaks_for_day, grid_rows, layout_day, BreakInterval, ClassDraft, ClassEntry, CoreError,
    DayOfWeek, DisplayWindow, TimetableService,
};
use std::sync::Arc;

use crate::api::dto::{ApiError, BreaksQuery, LayoutOut, LayoutQuery};

pub struct AppState {
    pub timetable: Arc<TimetableService>,
    pub window: DisplayWindow,
    pub row_height: f32,
}

pub async fn list_classes(State(st): State<Arc<AppState>>) -> Json<Vec<ClassEntry>> {
    Json(st.timetable.snapshot())
}

pub async fn add_class(
    State(st): State<Arc<AppState>>,
    Json(draft): Json<ClassDraft>,
) -> Result<(StatusCode, Json<ClassEntry>), ApiError> {
    let entry = st.timetable.add(draft).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn delete_class(
    State(st): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    st.timetable.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_breaks(
    State(st): State<Arc<AppState>>,
    Query(q): Query<BreaksQuery>,
) -> Json<Vec<BreakInterval>> {
    let classes = st.timetable.snapshot();
    let days = q.day.map(|d| vec![d]).unwrap_or_else(|| DayOfWeek::ALL.to_vec());
    Json(
        days.into_iter()
            .flat_map(|d| breaks_for_day(&classes, d, &st.window))
            .collect(),
    )
}

pub async fn day_layout(
    State(st): State<Arc<AppState>>,
    Path(day): Path<String>,
    Query(q): Query<LayoutQuery>,
) -> Result<Json<LayoutOut>, ApiError> {
    let day: DayOfWeek = day.parse()?;
    let row_height = q.row_height.unwrap_or(st.row_height);
    if !(row_height.is_finite() && row_height > 0.0) {
        return Err(CoreError::Invalid("row_height must be positive").into());
    }
    let classes = st.timetable.snapshot();
    Ok(Json(LayoutOut {
        day,
        rows: grid_rows(&st.window),
        row_height,
        items: layout_day(&classes, day, &st.window, row_height),
    }))
}
