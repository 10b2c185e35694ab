use crate::controller::ViewController;
use crate::loader::{self, Outcome, Resource};
use crate::models::{Team, User, UserUpdate};
use crate::normalize;
use crate::prefs;
use crate::state::AppState;
use crate::ui;
use axum::{
    extract::{Form, Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use tokio::sync::Mutex;
use tracing::error;

async fn dark_mode(state: &AppState) -> bool {
    state.prefs.lock().await.dark_mode
}

/// One view activation: force `Loading`, run a single fetch with the lock
/// released, then install the outcome unless a newer activation superseded
/// it in the meantime. Returns a snapshot of the controller's state for
/// rendering.
async fn activate<T>(state: &AppState, controller: &Mutex<ViewController<T>>) -> Outcome<T>
where
    T: Resource + Clone,
{
    let token = controller.lock().await.begin_activation();
    let outcome = loader::fetch_list::<T>(&state.http, &state.api_base).await;
    let mut guard = controller.lock().await;
    guard.apply(token, outcome);
    guard.state().clone()
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(ui::render_home(dark_mode(&state).await))
}

pub async fn activities(State(state): State<AppState>) -> Html<String> {
    let outcome = activate(&state, &state.activities).await;
    Html(ui::render_activities(&outcome, dark_mode(&state).await))
}

pub async fn leaderboard(State(state): State<AppState>) -> Html<String> {
    let outcome = activate(&state, &state.leaderboard).await;
    Html(ui::render_leaderboard(&outcome, dark_mode(&state).await))
}

pub async fn teams(State(state): State<AppState>) -> Html<String> {
    let outcome = activate(&state, &state.teams).await;
    Html(ui::render_teams(&outcome, dark_mode(&state).await))
}

pub async fn workouts(State(state): State<AppState>) -> Html<String> {
    let outcome = activate(&state, &state.workouts).await;
    Html(ui::render_workouts(&outcome, dark_mode(&state).await))
}

pub async fn users(State(state): State<AppState>) -> Html<String> {
    // Arriving at the list closes any open editor (cancel or the
    // post-success auto-close), discarding its buffer.
    state.editor.lock().await.close();
    let outcome = activate(&state, &state.users).await;
    Html(ui::render_users(&outcome, dark_mode(&state).await))
}

pub async fn edit_user(State(state): State<AppState>, Path(id): Path<String>) -> Html<String> {
    let dark = dark_mode(&state).await;
    let user = match find_user(&state, &id).await {
        Some(user) => user,
        None => return Html(ui::render_user_not_found(&id, dark)),
    };

    let mut editor = state.editor.lock().await;
    editor.open(&user);
    // Independent fetch for the selector; a failure degrades it to an empty
    // option list instead of blocking the edit.
    match loader::fetch_list::<Team>(&state.http, &state.api_base).await {
        Outcome::Ready(teams) => editor.set_team_options(teams),
        Outcome::Failed(reason) => {
            error!("failed to load team options: {reason}");
            editor.set_team_options(Vec::new());
        }
        Outcome::Loading => {}
    }

    Html(ui::render_editor(&editor, dark))
}

pub async fn save_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<UserUpdate>,
) -> Response {
    let dark = dark_mode(&state).await;
    let mut editor = state.editor.lock().await;
    if !editor.is_open_for(&id) {
        return Redirect::to("/users").into_response();
    }

    editor.update_buffer(&form);
    if let Some(raw) = editor.submit(&state.http, &state.api_base).await {
        // Optimistic merge: overlay the server's answer onto the held list
        // right away. The reload triggered by the redirect back to /users is
        // the source of truth and supersedes this.
        let mut users = state.users.lock().await;
        if let Some(records) = users.records_mut() {
            if let Some(user) = records.iter_mut().find(|user| user.id == id) {
                normalize::apply_user_patch(user, &raw);
            }
        }
    }

    Html(ui::render_editor(&editor, dark)).into_response()
}

pub async fn toggle_theme(State(state): State<AppState>) -> Redirect {
    let mut prefs = state.prefs.lock().await;
    prefs.dark_mode = !prefs.dark_mode;
    if let Err(err) = prefs::persist_prefs(&state.prefs_path, &prefs).await {
        error!("failed to persist preferences: {err}");
    }
    Redirect::to("/")
}

/// Looks the user up in the held list when it is `Ready`, otherwise runs a
/// fresh activation first.
async fn find_user(state: &AppState, id: &str) -> Option<User> {
    if let Outcome::Ready(users) = state.users.lock().await.state() {
        if let Some(user) = users.iter().find(|user| user.id == id) {
            return Some(user.clone());
        }
    }
    match activate(state, &state.users).await {
        Outcome::Ready(users) => users.into_iter().find(|user| user.id == id),
        _ => None,
    }
}
