use axum::{http::StatusCode, response::IntoResponse, Json};
use companion_core::{CoreError, DayOfWeek, ErrorKind, PlacedItem};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct BreaksQuery {
    pub day: Option<DayOfWeek>,
}

#[derive(Deserialize)]
pub struct LayoutQuery {
    pub row_height: Option<f32>,
}

#[derive(Serialize)]
pub struct LayoutOut {
    pub day: DayOfWeek,
    pub rows: u32,
    pub row_height: f32,
    pub items: Vec<PlacedItem>,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
}

/// `CoreError` as an HTTP response.
pub struct ApiError(pub CoreError);

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        Self(e)
    }
}

pub fn status_for(err: &CoreError) -> StatusCode {
    match err {
        CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        CoreError::Conflict(_) | CoreError::Busy(_) => StatusCode::CONFLICT,
        _ => match err.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::Integration => StatusCode::BAD_GATEWAY,
            ErrorKind::Persistence | ErrorKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(ErrorOut {
            error: self.0.to_string(),
        });
        (status_for(&self.0), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(status_for(&CoreError::Conflict("overlap")), StatusCode::CONFLICT);
        assert_eq!(status_for(&CoreError::Invalid("name")), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&CoreError::NotFound("class")), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(&CoreError::Storage("io")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
