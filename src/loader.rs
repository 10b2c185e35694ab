use crate::errors::FetchError;
use crate::models::{Activity, LeaderboardEntry, Team, User, Workout};
use crate::normalize;
use reqwest::Client;
use serde_json::Value;

/// Lifecycle of one view's data. `Ready` with an empty list is a valid
/// terminal state, not a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Loading,
    Ready(Vec<T>),
    Failed(String),
}

/// A list resource the dashboard can load: an endpoint plus the total
/// normalizer that turns one raw record into its canonical shape.
pub trait Resource: Sized {
    const ENDPOINT: &'static str;
    fn normalize(raw: &Value, index: usize) -> Self;
}

impl Resource for User {
    const ENDPOINT: &'static str = "/api/users/";
    fn normalize(raw: &Value, index: usize) -> Self {
        normalize::normalize_user(raw, index)
    }
}

impl Resource for Team {
    const ENDPOINT: &'static str = "/api/teams/";
    fn normalize(raw: &Value, index: usize) -> Self {
        normalize::normalize_team(raw, index)
    }
}

impl Resource for Activity {
    const ENDPOINT: &'static str = "/api/activities/";
    fn normalize(raw: &Value, index: usize) -> Self {
        normalize::normalize_activity(raw, index)
    }
}

impl Resource for Workout {
    const ENDPOINT: &'static str = "/api/workouts/";
    fn normalize(raw: &Value, index: usize) -> Self {
        normalize::normalize_workout(raw, index)
    }
}

impl Resource for LeaderboardEntry {
    const ENDPOINT: &'static str = "/api/leaderboard/";
    fn normalize(raw: &Value, index: usize) -> Self {
        normalize::normalize_leaderboard_entry(raw, index)
    }
}

/// One independent round trip: a single GET with no retry, no timeout
/// override and no caching. Transport, status and decode failures all land
/// in `Failed` with the same kind of short reason.
pub async fn fetch_list<T: Resource>(client: &Client, base_url: &str) -> Outcome<T> {
    match fetch_records::<T>(client, base_url).await {
        Ok(records) => Outcome::Ready(records),
        Err(err) => Outcome::Failed(err.to_string()),
    }
}

async fn fetch_records<T: Resource>(client: &Client, base_url: &str) -> Result<Vec<T>, FetchError> {
    let url = format!("{base_url}{}", T::ENDPOINT);
    let response = client.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }
    let payload: Value = response
        .json()
        .await
        .map_err(|err| FetchError::Decode(err.to_string()))?;
    let records = normalize::unwrap_records(&payload)
        .iter()
        .enumerate()
        .map(|(index, raw)| T::normalize(raw, index))
        .collect();
    Ok(records)
}
