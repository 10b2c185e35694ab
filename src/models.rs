use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    Member,
    Leader,
    Admin,
}

impl Role {
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "leader" => Role::Leader,
            "admin" => Role::Admin,
            _ => Role::Member,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Leader => "leader",
            Role::Admin => "admin",
        }
    }
}

/// A date field that keeps "never sent" and "sent but unparseable" apart.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordDate {
    Absent,
    Invalid,
    Valid(DateTime<Utc>),
}

impl RecordDate {
    pub fn display(&self) -> String {
        match self {
            RecordDate::Absent => "N/A".to_string(),
            RecordDate::Invalid => "Invalid Date".to_string(),
            RecordDate::Valid(instant) => instant.format("%b %-d, %Y").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub display_name: String,
    pub username: String,
    pub email: Option<String>,
    pub role: Role,
    pub team: Option<String>,
    pub total_points: i64,
    pub joined_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub description: String,
    pub member_count: u64,
    pub created_at: RecordDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub id: String,
    pub user: String,
    pub activity_type: String,
    pub duration_minutes: Option<f64>,
    pub distance_km: Option<f64>,
    pub calories_burned: Option<f64>,
    pub date: RecordDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub name: String,
    pub sets: Option<i64>,
    pub reps: Option<i64>,
    pub duration: Option<String>,
    pub distance: Option<String>,
}

impl Exercise {
    /// Optional attributes joined in a fixed order: sets, reps, duration, distance.
    pub fn detail(&self) -> String {
        let mut text = String::new();
        if let Some(sets) = self.sets {
            text.push_str(&format!(" - {sets} sets"));
        }
        if let Some(reps) = self.reps {
            text.push_str(&format!(" × {reps} reps"));
        }
        if let Some(duration) = &self.duration {
            text.push_str(&format!(" - {duration}"));
        }
        if let Some(distance) = &self.distance {
            text.push_str(&format!(" - {distance}"));
        }
        text
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub duration_minutes: Option<f64>,
    pub difficulty: Option<String>,
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub id: String,
    pub user: String,
    pub team_id: Option<String>,
    pub total_points: i64,
    pub activities_count: u64,
}

impl LeaderboardEntry {
    pub fn team_label(&self) -> String {
        team_label(self.team_id.as_deref())
    }
}

pub fn team_label(team_id: Option<&str>) -> String {
    match team_id {
        Some("team_marvel") => "Team Marvel".to_string(),
        Some("team_dc") => "Team DC".to_string(),
        Some(other) if !other.is_empty() => other.to_string(),
        _ => "N/A".to_string(),
    }
}

/// Body of `PATCH /api/users/{id}/` and the shape of the edit form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    pub team_id: String,
    pub role: String,
}
