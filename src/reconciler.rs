use crate::errors::FetchError;
use crate::models::{Role, Team, User, UserUpdate};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum SaveState {
    Idle,
    Failed(String),
    Succeeded,
}

/// Editable fields of one user, seeded from the selected record and mutated
/// locally until submit.
#[derive(Debug, Clone, PartialEq)]
pub struct EditBuffer {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub team_id: String,
    pub role: Role,
}

#[derive(Debug)]
struct Editor {
    buffer: EditBuffer,
    save_state: SaveState,
}

/// Edit flow for the users view. Closed until a record is selected; while
/// open it owns the edit buffer and the save state. The team options come
/// from an independent fetch whose failure only degrades the selector, it
/// never blocks editing.
#[derive(Debug, Default)]
pub struct EditReconciler {
    editor: Option<Editor>,
    team_options: Vec<Team>,
}

impl EditReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, user: &User) {
        self.editor = Some(Editor {
            buffer: EditBuffer {
                user_id: user.id.clone(),
                name: user.display_name.clone(),
                email: user.email.clone().unwrap_or_default(),
                team_id: user.team.clone().unwrap_or_default(),
                role: user.role,
            },
            save_state: SaveState::Idle,
        });
    }

    /// Buffer and save state are discarded; nothing survives a close.
    pub fn close(&mut self) {
        self.editor = None;
        self.team_options.clear();
    }

    pub fn is_open(&self) -> bool {
        self.editor.is_some()
    }

    pub fn is_open_for(&self, user_id: &str) -> bool {
        self.buffer().is_some_and(|buffer| buffer.user_id == user_id)
    }

    pub fn buffer(&self) -> Option<&EditBuffer> {
        self.editor.as_ref().map(|editor| &editor.buffer)
    }

    pub fn save_state(&self) -> Option<&SaveState> {
        self.editor.as_ref().map(|editor| &editor.save_state)
    }

    pub fn set_team_options(&mut self, teams: Vec<Team>) {
        self.team_options = teams;
    }

    pub fn team_options(&self) -> &[Team] {
        &self.team_options
    }

    /// Local mutation only; no network effect and no change to the save
    /// state.
    pub fn update_buffer(&mut self, form: &UserUpdate) {
        if let Some(editor) = &mut self.editor {
            editor.buffer.name = form.name.clone();
            editor.buffer.email = form.email.clone();
            editor.buffer.team_id = form.team_id.clone();
            editor.buffer.role = Role::parse(&form.role);
        }
    }

    /// Submits the editable fields to the per-record endpoint. Once a submit
    /// has succeeded the editor is resubmit-proof: further calls return
    /// None without touching the network. On failure the buffer survives
    /// unchanged so the user can retry.
    ///
    /// Returns the raw response body on success so the caller can overlay it
    /// onto the held list before the authoritative reload.
    pub async fn submit(&mut self, client: &Client, base_url: &str) -> Option<Value> {
        let editor = self.editor.as_mut()?;
        if editor.save_state == SaveState::Succeeded {
            debug!("ignoring resubmit after a successful save");
            return None;
        }

        let update = UserUpdate {
            name: editor.buffer.name.clone(),
            email: editor.buffer.email.clone(),
            team_id: editor.buffer.team_id.clone(),
            role: editor.buffer.role.as_str().to_string(),
        };

        match send_patch(client, base_url, &editor.buffer.user_id, &update).await {
            Ok(raw) => {
                editor.save_state = SaveState::Succeeded;
                Some(raw)
            }
            Err(err) => {
                editor.save_state = SaveState::Failed(err.to_string());
                None
            }
        }
    }
}

async fn send_patch(
    client: &Client,
    base_url: &str,
    user_id: &str,
    update: &UserUpdate,
) -> Result<Value, FetchError> {
    let url = format!("{base_url}/api/users/{user_id}/");
    let response = client.patch(&url).json(update).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }
    response
        .json()
        .await
        .map_err(|err| FetchError::Decode(err.to_string()))
}
