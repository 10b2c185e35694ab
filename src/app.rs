use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/activities", get(handlers::activities))
        .route("/leaderboard", get(handlers::leaderboard))
        .route("/teams", get(handlers::teams))
        .route("/users", get(handlers::users))
        .route("/users/:id/edit", get(handlers::edit_user).post(handlers::save_user))
        .route("/workouts", get(handlers::workouts))
        .route("/theme/toggle", post(handlers::toggle_theme))
        .with_state(state)
}
