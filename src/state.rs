use crate::controller::ViewController;
use crate::models::{Activity, LeaderboardEntry, Team, User, Workout};
use crate::prefs::Prefs;
use crate::reconciler::EditReconciler;
use reqwest::Client;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// Shared application state. Each resource view privately owns its own
/// controller; the only cross-view piece is the users editor, which by
/// contract only touches the users controller.
#[derive(Clone)]
pub struct AppState {
    pub http: Client,
    pub api_base: String,
    pub prefs_path: PathBuf,
    pub prefs: Arc<Mutex<Prefs>>,
    pub users: Arc<Mutex<ViewController<User>>>,
    pub teams: Arc<Mutex<ViewController<Team>>>,
    pub activities: Arc<Mutex<ViewController<Activity>>>,
    pub workouts: Arc<Mutex<ViewController<Workout>>>,
    pub leaderboard: Arc<Mutex<ViewController<LeaderboardEntry>>>,
    pub editor: Arc<Mutex<EditReconciler>>,
}

impl AppState {
    pub fn new(http: Client, api_base: String, prefs_path: PathBuf, prefs: Prefs) -> Self {
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            prefs_path,
            prefs: Arc::new(Mutex::new(prefs)),
            users: Arc::new(Mutex::new(ViewController::new())),
            teams: Arc::new(Mutex::new(ViewController::new())),
            activities: Arc::new(Mutex::new(ViewController::new())),
            workouts: Arc::new(Mutex::new(ViewController::new())),
            leaderboard: Arc::new(Mutex::new(ViewController::new())),
            editor: Arc::new(Mutex::new(EditReconciler::new())),
        }
    }
}
