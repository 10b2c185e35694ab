use crate::models::{
    Activity, Exercise, LeaderboardEntry, RecordDate, Role, Team, User, Workout,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Extracts the record list from a backend reply that is either a bare array
/// or a paginated envelope with a `results` array. Every other shape degrades
/// silently to an empty list; the caller never sees an error for this.
pub fn unwrap_records(payload: &Value) -> Vec<Value> {
    match payload {
        Value::Array(items) => items.clone(),
        Value::Object(fields) => match fields.get("results") {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// First present, non-null candidate field. A `null` counts as absent so the
/// next alias gets a chance, matching how the backend omits fields.
fn alias_value<'a>(raw: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| raw.get(name))
        .find(|value| !value.is_null())
}

fn str_alias(raw: &Value, names: &[&str]) -> Option<String> {
    match alias_value(raw, names)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn num_alias(raw: &Value, names: &[&str]) -> Option<f64> {
    match alias_value(raw, names)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.parse().ok(),
        _ => None,
    }
}

fn int_alias(raw: &Value, names: &[&str]) -> Option<i64> {
    match alias_value(raw, names)? {
        Value::Number(number) => number.as_i64().or_else(|| number.as_f64().map(|n| n as i64)),
        Value::String(text) => text.parse().ok(),
        _ => None,
    }
}

fn count_alias(raw: &Value, names: &[&str]) -> Option<u64> {
    int_alias(raw, names).map(|count| count.max(0) as u64)
}

/// Stable list key even when the backend's primary key field name varies.
/// Records without any id fall back to a positional key, so two anonymous
/// records never collide within one response.
fn identifier(raw: &Value, kind: &str, index: usize) -> String {
    str_alias(raw, &["_id", "id"]).unwrap_or_else(|| format!("{kind}-{index}"))
}

/// Defensive date parse. Missing input and unparseable input are different
/// render states and must never be conflated.
pub fn parse_date(raw: Option<&Value>) -> RecordDate {
    let Some(value) = raw else {
        return RecordDate::Absent;
    };
    match value {
        Value::Null => RecordDate::Absent,
        Value::String(text) => parse_instant(text)
            .map(RecordDate::Valid)
            .unwrap_or(RecordDate::Invalid),
        Value::Number(number) => number
            .as_i64()
            .and_then(|millis| DateTime::from_timestamp_millis(millis))
            .map(RecordDate::Valid)
            .unwrap_or(RecordDate::Invalid),
        _ => RecordDate::Invalid,
    }
}

fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

pub fn normalize_user(raw: &Value, index: usize) -> User {
    let email = str_alias(raw, &["email"]);
    let username = str_alias(raw, &["username"])
        .or_else(|| {
            email
                .as_deref()
                .and_then(|address| address.split('@').next())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "N/A".to_string());
    let joined_at = match parse_date(alias_value(raw, &["date_joined", "created_at"])) {
        RecordDate::Valid(instant) => Some(instant),
        // Join dates render as absent even when malformed.
        _ => None,
    };

    User {
        id: identifier(raw, "user", index),
        display_name: str_alias(raw, &["name", "username"])
            .unwrap_or_else(|| "Unknown User".to_string()),
        username,
        email,
        role: str_alias(raw, &["role"])
            .map(|role| Role::parse(&role))
            .unwrap_or_default(),
        team: str_alias(raw, &["team_id", "team_name", "team"]),
        total_points: int_alias(raw, &["total_points"]).unwrap_or(0),
        joined_at,
    }
}

pub fn normalize_team(raw: &Value, index: usize) -> Team {
    // An explicit count wins even when it is zero; the embedded member list
    // is only a fallback.
    let member_count = count_alias(raw, &["member_count"])
        .or_else(|| {
            raw.get("members")
                .and_then(Value::as_array)
                .map(|members| members.len() as u64)
        })
        .unwrap_or(0);

    Team {
        id: identifier(raw, "team", index),
        name: str_alias(raw, &["name"]).unwrap_or_else(|| "N/A".to_string()),
        description: str_alias(raw, &["description"]).unwrap_or_default(),
        member_count,
        created_at: parse_date(alias_value(raw, &["created_at"])),
    }
}

pub fn normalize_activity(raw: &Value, index: usize) -> Activity {
    Activity {
        id: identifier(raw, "activity", index),
        user: str_alias(raw, &["user_name", "user", "user_id"])
            .unwrap_or_else(|| "N/A".to_string()),
        activity_type: str_alias(raw, &["activity_type"]).unwrap_or_else(|| "N/A".to_string()),
        duration_minutes: num_alias(raw, &["duration"]),
        distance_km: num_alias(raw, &["distance"]),
        calories_burned: num_alias(raw, &["calories_burned"]),
        date: parse_date(alias_value(raw, &["date"])),
    }
}

pub fn normalize_workout(raw: &Value, index: usize) -> Workout {
    let exercises = raw
        .get("exercises")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(normalize_exercise).collect())
        .unwrap_or_default();

    Workout {
        id: identifier(raw, "workout", index),
        name: str_alias(raw, &["name", "title"]).unwrap_or_else(|| "N/A".to_string()),
        description: str_alias(raw, &["description"]),
        category: str_alias(raw, &["category", "workout_type", "type"])
            .unwrap_or_else(|| "N/A".to_string()),
        duration_minutes: num_alias(raw, &["duration"]),
        difficulty: str_alias(raw, &["difficulty"]),
        exercises,
    }
}

fn normalize_exercise(raw: &Value) -> Exercise {
    Exercise {
        name: str_alias(raw, &["name"]).unwrap_or_else(|| "N/A".to_string()),
        sets: int_alias(raw, &["sets"]),
        reps: int_alias(raw, &["reps"]),
        duration: str_alias(raw, &["duration"]),
        distance: str_alias(raw, &["distance"]),
    }
}

pub fn normalize_leaderboard_entry(raw: &Value, index: usize) -> LeaderboardEntry {
    LeaderboardEntry {
        id: identifier(raw, "entry", index),
        user: str_alias(raw, &["user_name", "user"]).unwrap_or_else(|| "N/A".to_string()),
        team_id: str_alias(raw, &["team_id"]),
        total_points: int_alias(raw, &["total_points"]).unwrap_or(0),
        activities_count: count_alias(raw, &["activities_count", "total_activities"]).unwrap_or(0),
    }
}

/// Shallow overlay for the optimistic merge after a user update: only fields
/// actually present in the server's response overwrite the held record.
pub fn apply_user_patch(user: &mut User, raw: &Value) {
    if let Some(id) = str_alias(raw, &["_id", "id"]) {
        user.id = id;
    }
    if let Some(name) = str_alias(raw, &["name"]) {
        user.display_name = name;
    }
    if let Some(username) = str_alias(raw, &["username"]) {
        user.username = username;
    }
    if let Some(email) = str_alias(raw, &["email"]) {
        user.email = Some(email);
    }
    if let Some(role) = str_alias(raw, &["role"]) {
        user.role = Role::parse(&role);
    }
    if let Some(team) = str_alias(raw, &["team_id", "team_name", "team"]) {
        user.team = Some(team);
    }
    if let Some(points) = int_alias(raw, &["total_points"]) {
        user.total_points = points;
    }
    if let Some(value) = alias_value(raw, &["date_joined", "created_at"]) {
        user.joined_at = match parse_date(Some(value)) {
            RecordDate::Valid(instant) => Some(instant),
            _ => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unwrap_records_passes_bare_arrays_through() {
        let payload = json!([{"_id": "a"}, {"_id": "b"}]);
        let records = unwrap_records(&payload);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], json!({"_id": "a"}));
    }

    #[test]
    fn unwrap_records_extracts_envelope_results() {
        let payload = json!({"count": 2, "results": [{"_id": "a"}], "next": null});
        assert_eq!(unwrap_records(&payload), vec![json!({"_id": "a"})]);
    }

    #[test]
    fn unwrap_records_degrades_other_shapes_to_empty() {
        assert!(unwrap_records(&json!({"items": []})).is_empty());
        assert!(unwrap_records(&json!({"results": "nope"})).is_empty());
        assert!(unwrap_records(&json!(null)).is_empty());
        assert!(unwrap_records(&json!(42)).is_empty());
        assert!(unwrap_records(&json!("text")).is_empty());
    }

    #[test]
    fn normalize_user_is_total_on_empty_input() {
        let user = normalize_user(&json!({}), 3);
        assert_eq!(user.id, "user-3");
        assert_eq!(user.display_name, "Unknown User");
        assert_eq!(user.username, "N/A");
        assert_eq!(user.email, None);
        assert_eq!(user.role, Role::Member);
        assert_eq!(user.team, None);
        assert_eq!(user.total_points, 0);
        assert_eq!(user.joined_at, None);
    }

    #[test]
    fn normalize_user_derives_username_from_email_local_part() {
        let user = normalize_user(&json!({"email": "thor@asgard.io"}), 0);
        assert_eq!(user.username, "thor");
        assert_eq!(user.email.as_deref(), Some("thor@asgard.io"));
    }

    #[test]
    fn normalize_user_resolves_aliases_in_order() {
        let user = normalize_user(
            &json!({
                "_id": "u1",
                "name": "Tony Stark",
                "username": "ironman",
                "team_id": "team_marvel",
                "role": "leader",
                "total_points": 900,
                "date_joined": "2024-03-15T00:00:00Z"
            }),
            0,
        );
        assert_eq!(user.id, "u1");
        assert_eq!(user.display_name, "Tony Stark");
        assert_eq!(user.username, "ironman");
        assert_eq!(user.role, Role::Leader);
        assert_eq!(user.team.as_deref(), Some("team_marvel"));
        assert_eq!(user.total_points, 900);
        assert!(user.joined_at.is_some());
    }

    #[test]
    fn user_join_date_renders_absent_when_malformed() {
        let user = normalize_user(&json!({"date_joined": "not-a-date"}), 0);
        assert_eq!(user.joined_at, None);
    }

    #[test]
    fn date_parse_keeps_absent_and_invalid_apart() {
        let valid = parse_date(Some(&json!("2024-03-15T00:00:00Z")));
        let invalid = parse_date(Some(&json!("not-a-date")));
        let absent = parse_date(None);
        assert!(matches!(valid, RecordDate::Valid(_)));
        assert_eq!(invalid, RecordDate::Invalid);
        assert_eq!(absent, RecordDate::Absent);
        assert_ne!(valid.display(), invalid.display());
        assert_ne!(invalid.display(), absent.display());
        assert_ne!(valid.display(), absent.display());
    }

    #[test]
    fn null_date_counts_as_absent_not_invalid() {
        assert_eq!(parse_date(Some(&json!(null))), RecordDate::Absent);
    }

    #[test]
    fn team_explicit_count_wins_even_when_zero() {
        let team = normalize_team(&json!({"member_count": 0, "members": ["a", "b"]}), 0);
        assert_eq!(team.member_count, 0);
    }

    #[test]
    fn team_falls_back_to_member_list_length_then_zero() {
        let from_list = normalize_team(&json!({"members": ["a", "b", "c"]}), 0);
        assert_eq!(from_list.member_count, 3);
        let bare = normalize_team(&json!({}), 0);
        assert_eq!(bare.member_count, 0);
        assert_eq!(bare.description, "");
        assert_eq!(bare.created_at, RecordDate::Absent);
    }

    #[test]
    fn activity_missing_numbers_stay_absent() {
        let activity = normalize_activity(&json!({"activity_type": "Running"}), 1);
        assert_eq!(activity.activity_type, "Running");
        assert_eq!(activity.duration_minutes, None);
        assert_eq!(activity.distance_km, None);
        assert_eq!(activity.calories_burned, None);
        assert_eq!(activity.date, RecordDate::Absent);
        assert_eq!(activity.user, "N/A");
        assert_eq!(activity.id, "activity-1");
    }

    #[test]
    fn workout_category_resolves_through_alias_chain() {
        assert_eq!(
            normalize_workout(&json!({"category": "Cardio"}), 0).category,
            "Cardio"
        );
        assert_eq!(
            normalize_workout(&json!({"workout_type": "Strength"}), 0).category,
            "Strength"
        );
        assert_eq!(normalize_workout(&json!({"type": "HIIT"}), 0).category, "HIIT");
        assert_eq!(normalize_workout(&json!({}), 0).category, "N/A");
    }

    #[test]
    fn workout_name_falls_back_to_title_and_exercises_keep_order() {
        let workout = normalize_workout(
            &json!({
                "title": "Morning Blast",
                "exercises": [
                    {"name": "Push-ups", "sets": 3, "reps": 15},
                    {"name": "Plank", "duration": "60s"}
                ]
            }),
            0,
        );
        assert_eq!(workout.name, "Morning Blast");
        assert_eq!(workout.exercises.len(), 2);
        assert_eq!(workout.exercises[0].name, "Push-ups");
        assert_eq!(workout.exercises[1].duration.as_deref(), Some("60s"));
    }

    #[test]
    fn leaderboard_count_resolution_is_presence_based() {
        let zero_wins = normalize_leaderboard_entry(
            &json!({"activities_count": 0, "total_activities": 7}),
            0,
        );
        assert_eq!(zero_wins.activities_count, 0);
        let fallback = normalize_leaderboard_entry(&json!({"total_activities": 7}), 0);
        assert_eq!(fallback.activities_count, 7);
        let bare = normalize_leaderboard_entry(&json!({}), 4);
        assert_eq!(bare.activities_count, 0);
        assert_eq!(bare.total_points, 0);
        assert_eq!(bare.user, "N/A");
        assert_eq!(bare.id, "entry-4");
    }

    #[test]
    fn normalization_is_idempotent_over_its_own_output() {
        let raw = json!({
            "_id": "u1",
            "name": "Diana",
            "username": "wonder",
            "email": "diana@themyscira.io",
            "role": "admin",
            "team_id": "team_dc",
            "total_points": 1200,
            "date_joined": "2024-03-15T00:00:00Z"
        });
        let first = normalize_user(&raw, 0);
        let refed = json!({
            "_id": first.id,
            "name": first.display_name,
            "username": first.username,
            "email": first.email,
            "role": first.role.as_str(),
            "team_id": first.team,
            "total_points": first.total_points,
            "date_joined": first.joined_at.unwrap().to_rfc3339(),
        });
        let second = normalize_user(&refed, 0);
        assert_eq!(first, second);
    }

    #[test]
    fn apply_user_patch_only_overwrites_present_fields() {
        let mut user = normalize_user(
            &json!({"_id": "u1", "name": "Tony Stark", "email": "tony@stark.io", "role": "member", "team_id": "t1"}),
            0,
        );
        apply_user_patch(&mut user, &json!({"_id": "u1", "role": "leader"}));
        assert_eq!(user.role, Role::Leader);
        assert_eq!(user.display_name, "Tony Stark");
        assert_eq!(user.email.as_deref(), Some("tony@stark.io"));
        assert_eq!(user.team.as_deref(), Some("t1"));
    }
}
