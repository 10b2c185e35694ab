use crate::loader::Outcome;
use crate::models::{Activity, LeaderboardEntry, Team, User, Workout};
use crate::reconciler::{EditReconciler, SaveState};

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Numeric display: absent renders as the "N/A" sentinel, whole numbers drop
/// the trailing `.0`.
pub fn fmt_number(value: Option<f64>) -> String {
    match value {
        None => "N/A".to_string(),
        Some(number) if number.fract() == 0.0 && number.abs() < 1e15 => {
            format!("{}", number as i64)
        }
        Some(number) => format!("{number}"),
    }
}

pub fn render_home(dark: bool) -> String {
    let content = r#"<div class="page-header"><h2>OctoFit Tracker</h2></div>
<p class="subtitle">Fitness activity, teams and standings for Mergington High School.</p>
<ul class="home-links">
  <li><a href="/activities">📊 Activities</a></li>
  <li><a href="/leaderboard">🏆 Leaderboard</a></li>
  <li><a href="/teams">👥 Teams</a></li>
  <li><a href="/users">👤 Users</a></li>
  <li><a href="/workouts">💪 Workouts</a></li>
</ul>"#;
    page("OctoFit Tracker", dark, "", content)
}

/// The shared three-state render contract: a spinner while loading, the
/// failure banner with no data on error, and the list (or its defined empty
/// state) when ready.
fn view_body<T>(
    view_name: &str,
    empty_message: &str,
    outcome: &Outcome<T>,
    render_ready: impl FnOnce(&[T]) -> String,
) -> String {
    match outcome {
        Outcome::Loading => {
            r#"<div class="loading-container"><div class="loading-spinner"></div></div>"#
                .to_string()
        }
        Outcome::Failed(reason) => format!(
            r#"<div class="error-container"><div class="alert alert-danger" role="alert">
<h4>Error Loading {view_name}</h4><p>{}</p></div></div>"#,
            escape_html(reason)
        ),
        Outcome::Ready(records) if records.is_empty() => format!(
            r#"<div class="empty-state"><p>{empty_message}</p></div>"#
        ),
        Outcome::Ready(records) => render_ready(records),
    }
}

pub fn render_users(outcome: &Outcome<User>, dark: bool) -> String {
    let body = view_body("Users", "No users found", outcome, |users| {
        let mut cards = String::from(r#"<div class="card-grid">"#);
        for user in users {
            let email = user
                .email
                .as_deref()
                .map(escape_html)
                .unwrap_or_else(|| "N/A".to_string());
            let team = user
                .team
                .as_deref()
                .map(escape_html)
                .unwrap_or_else(|| "No team".to_string());
            let joined = user
                .joined_at
                .map(|instant| instant.format("%b %-d, %Y").to_string())
                .unwrap_or_else(|| "N/A".to_string());
            cards.push_str(&format!(
                r#"<div class="card">
<div class="card-header">👤 {name}</div>
<ul class="card-list">
  <li><strong>Username:</strong> {username}</li>
  <li><strong>Email:</strong> {email}</li>
  <li><strong>Role:</strong> <span class="badge">{role}</span></li>
  <li><strong>Team:</strong> <span class="badge badge-info">{team}</span></li>
  <li><strong>Points:</strong> <span class="badge badge-warning">{points}</span></li>
  <li><strong>Joined:</strong> {joined}</li>
</ul>
<a class="button" href="/users/{id}/edit">✏️ Edit User</a>
</div>"#,
                name = escape_html(&user.display_name),
                username = escape_html(&user.username),
                role = user.role.as_str(),
                points = user.total_points,
                id = escape_html(&user.id),
            ));
        }
        cards.push_str("</div>");
        cards
    });
    page("Users", dark, "", &with_header("Users", &body))
}

pub fn render_teams(outcome: &Outcome<Team>, dark: bool) -> String {
    let body = view_body("Teams", "No teams found", outcome, |teams| {
        let mut cards = String::from(r#"<div class="card-grid">"#);
        for team in teams {
            let description = if team.description.is_empty() {
                "No description available".to_string()
            } else {
                escape_html(&team.description)
            };
            cards.push_str(&format!(
                r#"<div class="card">
<div class="card-header">👥 {name}</div>
<p>{description}</p>
<ul class="card-list">
  <li><strong>Members:</strong> <span class="badge">{members}</span></li>
  <li><strong>Team ID:</strong> {id}</li>
  <li><strong>Created:</strong> {created}</li>
</ul>
</div>"#,
                name = escape_html(&team.name),
                members = team.member_count,
                id = escape_html(&team.id),
                created = team.created_at.display(),
            ));
        }
        cards.push_str("</div>");
        cards
    });
    page("Teams", dark, "", &with_header("Teams", &body))
}

pub fn render_activities(outcome: &Outcome<Activity>, dark: bool) -> String {
    let body = view_body("Activities", "No activities found", outcome, |activities| {
        let mut table = format!(
            r#"<p class="subtitle">Total Activities: <strong>{}</strong></p>
<table>
<thead><tr><th>User</th><th>Activity Type</th><th>Duration (min)</th><th>Distance (km)</th><th>Calories</th><th>Date</th></tr></thead>
<tbody>"#,
            activities.len()
        );
        for activity in activities {
            table.push_str(&format!(
                r#"<tr><td><strong>{user}</strong></td><td><span class="badge">{kind}</span></td><td>{duration}</td><td>{distance}</td><td><span class="badge badge-success">{calories} kcal</span></td><td>{date}</td></tr>"#,
                user = escape_html(&activity.user),
                kind = escape_html(&activity.activity_type),
                duration = fmt_number(activity.duration_minutes),
                distance = fmt_number(activity.distance_km),
                calories = fmt_number(activity.calories_burned),
                date = activity.date.display(),
            ));
        }
        table.push_str("</tbody></table>");
        table
    });
    page("Activities", dark, "", &with_header("Activities", &body))
}

pub fn render_workouts(outcome: &Outcome<Workout>, dark: bool) -> String {
    let body = view_body("Workouts", "No workouts found", outcome, |workouts| {
        let mut cards = String::from(r#"<div class="card-grid">"#);
        for workout in workouts {
            let description = workout
                .description
                .as_deref()
                .map(escape_html)
                .unwrap_or_else(|| "No description available".to_string());
            let difficulty = workout.difficulty.as_deref().unwrap_or("N/A");
            let mut exercises = String::new();
            if !workout.exercises.is_empty() {
                exercises.push_str(&format!(
                    r#"<li><strong>Exercises:</strong> <span class="badge badge-info">{} exercises</span><ol>"#,
                    workout.exercises.len()
                ));
                for exercise in &workout.exercises {
                    exercises.push_str(&format!(
                        "<li><strong>{}</strong>{}</li>",
                        escape_html(&exercise.name),
                        escape_html(&exercise.detail()),
                    ));
                }
                exercises.push_str("</ol></li>");
            }
            cards.push_str(&format!(
                r#"<div class="card">
<div class="card-header">💪 {name}</div>
<p>{description}</p>
<ul class="card-list">
  <li><strong>Category:</strong> <span class="badge">{category}</span></li>
  <li><strong>Duration:</strong> {duration} minutes</li>
  <li><strong>Difficulty:</strong> <span class="badge {difficulty_class}">{difficulty}</span></li>
  {exercises}
</ul>
</div>"#,
                name = escape_html(&workout.name),
                category = escape_html(&workout.category),
                duration = fmt_number(workout.duration_minutes),
                difficulty_class = difficulty_class(workout.difficulty.as_deref()),
                difficulty = escape_html(difficulty),
            ));
        }
        cards.push_str("</div>");
        cards
    });
    page("Workouts", dark, "", &with_header("Workouts", &body))
}

pub fn render_leaderboard(outcome: &Outcome<LeaderboardEntry>, dark: bool) -> String {
    let body = view_body("Leaderboard", "No leaderboard data found", outcome, |entries| {
        let mut table = format!(
            r#"<p class="subtitle">Compete with <strong>{}</strong> athletes</p>
<table>
<thead><tr><th>Rank</th><th>User</th><th>Team</th><th>Total Points</th><th>Total Activities</th></tr></thead>
<tbody>"#,
            entries.len()
        );
        // Rank is positional: the server's ordering is trusted as given and
        // never re-sorted here.
        for (index, entry) in entries.iter().enumerate() {
            table.push_str(&format!(
                r#"<tr><td><span class="{rank_class}">{rank}</span></td><td><strong>{user}</strong></td><td><span class="badge badge-info">👥 {team}</span></td><td><span class="badge badge-danger">🏆 {points}</span></td><td><span class="badge">📊 {count}</span></td></tr>"#,
                rank_class = rank_class(index),
                rank = index + 1,
                user = escape_html(&entry.user),
                team = escape_html(&entry.team_label()),
                points = entry.total_points,
                count = entry.activities_count,
            ));
        }
        table.push_str("</tbody></table>");
        table
    });
    page("Leaderboard", dark, "", &with_header("Leaderboard", &body))
}

pub fn render_editor(editor: &EditReconciler, dark: bool) -> String {
    let Some(buffer) = editor.buffer() else {
        return render_user_not_found("unknown", dark);
    };

    let (alert, head_extra, button) = match editor.save_state() {
        Some(SaveState::Succeeded) => (
            r#"<div class="alert alert-success" role="alert">User updated successfully!</div>"#
                .to_string(),
            // Auto-close after a short delay: back to the list, which
            // re-fetches the authoritative data.
            r#"<meta http-equiv="refresh" content="1;url=/users">"#,
            r#"<button type="submit" disabled>Saved!</button>"#,
        ),
        Some(SaveState::Failed(reason)) => (
            format!(
                r#"<div class="alert alert-danger" role="alert">{}</div>"#,
                escape_html(reason)
            ),
            "",
            r#"<button type="submit">Save Changes</button>"#,
        ),
        _ => (
            String::new(),
            "",
            r#"<button type="submit">Save Changes</button>"#,
        ),
    };

    let mut team_options = String::from(r#"<option value="">Select a team</option>"#);
    for team in editor.team_options() {
        let selected = if team.id == buffer.team_id { " selected" } else { "" };
        team_options.push_str(&format!(
            r#"<option value="{id}"{selected}>{name}</option>"#,
            id = escape_html(&team.id),
            name = escape_html(&team.name),
        ));
    }

    let mut role_options = String::new();
    for role in ["member", "leader", "admin"] {
        let selected = if role == buffer.role.as_str() { " selected" } else { "" };
        role_options.push_str(&format!(
            r#"<option value="{role}"{selected}>{role}</option>"#
        ));
    }

    let content = format!(
        r#"<div class="page-header"><h2>Edit User Details</h2></div>
{alert}
<form class="edit-form" method="post" action="/users/{id}/edit">
  <label for="name">Name</label>
  <input type="text" id="name" name="name" value="{name}" required>
  <label for="email">Email</label>
  <input type="email" id="email" name="email" value="{email}" required>
  <label for="team_id">Team</label>
  <select id="team_id" name="team_id">{team_options}</select>
  <label for="role">Role</label>
  <select id="role" name="role">{role_options}</select>
  <div class="form-actions">
    <a class="button button-secondary" href="/users">Cancel</a>
    {button}
  </div>
</form>"#,
        id = escape_html(&buffer.user_id),
        name = escape_html(&buffer.name),
        email = escape_html(&buffer.email),
    );

    page("Edit User", dark, head_extra, &content)
}

pub fn render_user_not_found(id: &str, dark: bool) -> String {
    let content = format!(
        r#"<div class="error-container"><div class="alert alert-danger" role="alert">
<h4>Error Loading Users</h4><p>No user with id {} was found.</p></div></div>
<a class="button" href="/users">Back to users</a>"#,
        escape_html(id)
    );
    page("Edit User", dark, "", &content)
}

/// Difficulty styling is a case-insensitive match; anything unrecognized
/// gets the neutral badge.
fn difficulty_class(difficulty: Option<&str>) -> &'static str {
    match difficulty.map(str::to_lowercase).as_deref() {
        Some("beginner") => "difficulty-beginner",
        Some("intermediate") => "difficulty-intermediate",
        Some("advanced") => "difficulty-advanced",
        _ => "badge-neutral",
    }
}

fn rank_class(index: usize) -> &'static str {
    match index {
        0 => "rank-badge rank-1",
        1 => "rank-badge rank-2",
        2 => "rank-badge rank-3",
        _ => "rank-badge rank-other",
    }
}

fn with_header(title: &str, body: &str) -> String {
    format!(r#"<div class="page-header"><h2>{title}</h2></div>{body}"#)
}

fn page(title: &str, dark: bool, head_extra: &str, content: &str) -> String {
    let theme_icon = if dark { "☀️" } else { "🌙" };
    PAGE_HTML
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{BODY_CLASS}}", if dark { "dark-mode" } else { "" })
        .replace("{{HEAD_EXTRA}}", head_extra)
        .replace("{{THEME_ICON}}", theme_icon)
        .replace("{{CONTENT}}", content)
}

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}} · OctoFit Tracker</title>
  {{HEAD_EXTRA}}
  <style>
    :root {
      --bg: #f5f6fa;
      --ink: #22272e;
      --card: #ffffff;
      --accent: #667eea;
      --accent-2: #764ba2;
      --muted: #6b7280;
      --danger-bg: #fdecea;
      --danger-ink: #b3261e;
      --success-bg: #e6f4ea;
      --success-ink: #1e7d34;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Segoe UI", "Helvetica Neue", sans-serif;
    }

    body.dark-mode {
      --bg: #1c2128;
      --ink: #e6e8eb;
      --card: #2a313a;
      --muted: #9aa4b2;
      --danger-bg: #3a2422;
      --danger-ink: #f2b8b5;
      --success-bg: #20372a;
      --success-ink: #a5d6b0;
    }

    nav {
      background: linear-gradient(135deg, var(--accent), var(--accent-2));
      color: white;
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      gap: 16px;
      padding: 12px 24px;
    }

    nav .brand { font-weight: 700; font-size: 1.1rem; margin-right: auto; }
    nav a { color: white; text-decoration: none; }
    nav form { margin: 0; }
    nav button {
      background: transparent;
      border: none;
      color: white;
      font-size: 1rem;
      cursor: pointer;
    }

    main { max-width: 1080px; margin: 0 auto; padding: 24px 18px 48px; }

    .page-header h2 { margin: 0 0 16px; }
    .subtitle { color: var(--muted); }

    .loading-container { display: grid; place-items: center; padding: 64px 0; }
    .loading-spinner {
      width: 44px;
      height: 44px;
      border: 4px solid rgba(102, 126, 234, 0.25);
      border-top-color: var(--accent);
      border-radius: 50%;
      animation: spin 0.8s linear infinite;
    }
    @keyframes spin { to { transform: rotate(360deg); } }

    .alert { border-radius: 10px; padding: 14px 18px; margin-bottom: 16px; }
    .alert h4 { margin: 0 0 6px; }
    .alert p { margin: 0; }
    .alert-danger { background: var(--danger-bg); color: var(--danger-ink); }
    .alert-success { background: var(--success-bg); color: var(--success-ink); }

    .empty-state { text-align: center; color: var(--muted); padding: 64px 0; }

    .card-grid {
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(280px, 1fr));
      gap: 18px;
    }
    .card {
      background: var(--card);
      border-radius: 14px;
      padding: 18px;
      box-shadow: 0 6px 18px rgba(34, 39, 46, 0.08);
    }
    .card-header { font-weight: 600; margin-bottom: 10px; }
    .card-list { list-style: none; margin: 0; padding: 0; }
    .card-list li { padding: 6px 0; border-top: 1px solid rgba(107, 114, 128, 0.15); }
    .card-list ol { margin: 6px 0 0; padding-left: 20px; font-size: 0.9rem; }

    table { width: 100%; border-collapse: collapse; background: var(--card); border-radius: 12px; overflow: hidden; }
    th, td { text-align: left; padding: 10px 14px; border-bottom: 1px solid rgba(107, 114, 128, 0.15); }
    th { background: rgba(102, 126, 234, 0.12); }

    .badge {
      display: inline-block;
      background: var(--accent);
      color: white;
      border-radius: 999px;
      padding: 2px 10px;
      font-size: 0.8rem;
    }
    .badge-info { background: #0891b2; }
    .badge-success { background: #16a34a; }
    .badge-warning { background: #d97706; }
    .badge-danger { background: #dc2626; }
    .badge-neutral { background: var(--muted); }
    .difficulty-beginner { background: #16a34a; }
    .difficulty-intermediate { background: #d97706; }
    .difficulty-advanced { background: #dc2626; }

    .rank-badge {
      display: inline-grid;
      place-items: center;
      width: 34px;
      height: 34px;
      border-radius: 50%;
      font-weight: 700;
      color: white;
      background: var(--muted);
    }
    .rank-1 { background: #d4a017; }
    .rank-2 { background: #9ca3af; }
    .rank-3 { background: #b45309; }

    .edit-form {
      max-width: 460px;
      background: var(--card);
      border-radius: 14px;
      padding: 22px;
      display: grid;
      gap: 8px;
    }
    .edit-form input, .edit-form select {
      padding: 8px 10px;
      border-radius: 8px;
      border: 1px solid rgba(107, 114, 128, 0.4);
      background: var(--bg);
      color: var(--ink);
    }
    .form-actions { display: flex; gap: 10px; justify-content: flex-end; margin-top: 10px; }

    .button, .edit-form button {
      display: inline-block;
      background: var(--accent);
      color: white;
      border: none;
      border-radius: 8px;
      padding: 8px 16px;
      text-decoration: none;
      font-size: 0.95rem;
      cursor: pointer;
      margin-top: 10px;
    }
    .button-secondary { background: var(--muted); }
    .edit-form button:disabled { opacity: 0.6; cursor: default; }

    .home-links { list-style: none; padding: 0; display: grid; gap: 10px; font-size: 1.1rem; }
    .home-links a { color: var(--accent); text-decoration: none; }
  </style>
</head>
<body class="{{BODY_CLASS}}">
  <nav>
    <a class="brand" href="/">OctoFit Tracker</a>
    <a href="/activities">📊 Activities</a>
    <a href="/leaderboard">🏆 Leaderboard</a>
    <a href="/teams">👥 Teams</a>
    <a href="/users">👤 Users</a>
    <a href="/workouts">💪 Workouts</a>
    <form method="post" action="/theme/toggle">
      <button type="submit" aria-label="Toggle dark mode">{{THEME_ICON}}</button>
    </form>
  </nav>
  <main>
    {{CONTENT}}
  </main>
</body>
</html>
"#;
