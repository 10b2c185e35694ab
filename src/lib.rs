pub mod app;
pub mod controller;
pub mod errors;
pub mod handlers;
pub mod loader;
pub mod models;
pub mod normalize;
pub mod prefs;
pub mod reconciler;
pub mod state;
pub mod ui;

pub use app::router;
pub use prefs::{load_prefs, resolve_prefs_path};
pub use state::AppState;
