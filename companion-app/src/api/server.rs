use axum::{
    routing::{delete, get},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::routes::{add_class, day_layout, delete_class, list_breaks, list_classes, AppState};
use crate::context::AppContext;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/classes", get(list_classes).post(add_class))
        .route("/classes/:id", delete(delete_class))
        .route("/breaks", get(list_breaks))
        .route("/layout/:day", get(day_layout))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(ctx: &AppContext, addr: SocketAddr) -> anyhow::Result<()> {
    let state = Arc::new(AppState {
        timetable: ctx.timetable.clone(),
        window: ctx.window,
        row_height: ctx.row_height(),
    });

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, user = %ctx.user.user_id, "api listening");
    axum::serve(listener, router(state).into_make_service()).await?;
    Ok(())
}
