//! Session-level state the chat shell renders from, and the rule for when a
//! realtime session should (re)connect.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

use crate::api::UserEnv;
use crate::core::store::Store;
use crate::core::theme::ThemeVariant;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    pub theme: ThemeVariant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatProfile {
    pub name: String,
    #[serde(default)]
    pub markdown_description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    #[serde(default)]
    pub chat_profiles: Vec<ChatProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub is_authenticated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectParams {
    pub ws_endpoint: String,
    pub user_env: UserEnv,
    pub access_token: Option<String>,
}

/// Whether the active chat profile allows a session to start.
///
/// Unknown until project settings load; projects without profiles are always
/// fine, projects with profiles need one selected.
pub fn chat_profile_ok(project: Option<&ProjectSettings>, chat_profile: Option<&str>) -> bool {
    match project {
        None => false,
        Some(project) if project.chat_profiles.is_empty() => true,
        Some(_) => chat_profile.is_some(),
    }
}

/// Profile to select automatically when the project defines some and none is chosen.
pub fn autoselect_profile<'a>(
    project: Option<&'a ProjectSettings>,
    chat_profile: Option<&str>,
) -> Option<&'a str> {
    if chat_profile.is_some() {
        return None;
    }
    project
        .and_then(|p| p.chat_profiles.first())
        .map(|profile| profile.name.as_str())
}

pub fn connect_params(
    ws_endpoint: &str,
    auth: &AuthState,
    user_env: &UserEnv,
    profile_ok: bool,
) -> Option<ConnectParams> {
    if !auth.is_authenticated || !profile_ok {
        return None;
    }
    Some(ConnectParams {
        ws_endpoint: ws_endpoint.to_string(),
        user_env: user_env.clone(),
        access_token: auth.access_token.clone(),
    })
}

/// Every piece of session state, each independently observable.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    pub settings: Store<Settings>,
    pub project_settings: Store<Option<ProjectSettings>>,
    pub chat_profile: Store<Option<String>>,
    pub auth: Store<AuthState>,
    pub user_env: Store<UserEnv>,
}

impl SessionState {
    pub fn new(theme: ThemeVariant) -> Self {
        let state = Self::default();
        state.settings.set(Settings { theme });
        state
    }

    pub fn chat_profile_ok(&self) -> bool {
        let profile = self.chat_profile.get();
        self.project_settings
            .read(|project| chat_profile_ok(project.as_ref(), profile.as_deref()))
    }

    /// Select the first profile if the project has profiles and none is chosen.
    /// Returns the profile that was selected.
    pub fn autoselect_profile(&self) -> Option<String> {
        let current = self.chat_profile.get();
        let selected = self.project_settings.read(|project| {
            autoselect_profile(project.as_ref(), current.as_deref()).map(str::to_string)
        })?;
        debug!(profile = %selected, "auto-selecting chat profile");
        self.chat_profile.set(Some(selected.clone()));
        Some(selected)
    }

    pub fn connect_params(&self, ws_endpoint: &str) -> Option<ConnectParams> {
        let auth = self.auth.get();
        let user_env = self.user_env.get();
        connect_params(ws_endpoint, &auth, &user_env, self.chat_profile_ok())
    }
}

/// Emits [`ConnectParams`] whenever a connection dependency changes and the
/// session is allowed to connect.
pub struct SessionController {
    state: SessionState,
    ws_endpoint: String,
}

impl SessionController {
    pub fn new(state: SessionState, ws_endpoint: impl Into<String>) -> Self {
        Self {
            state,
            ws_endpoint: ws_endpoint.into(),
        }
    }

    /// Runs until `tx`'s receiver is dropped or every store is gone.
    pub async fn run(self, tx: mpsc::UnboundedSender<ConnectParams>) {
        let mut user_env = self.state.user_env.subscribe();
        let mut auth = self.state.auth.subscribe();
        let mut profile = self.state.chat_profile.subscribe();
        let mut project = self.state.project_settings.subscribe();
        let mut last: Option<ConnectParams> = None;

        loop {
            self.state.autoselect_profile();

            let next = self.state.connect_params(&self.ws_endpoint);
            if next.is_some() && next != last {
                debug!(ws_endpoint = %self.ws_endpoint, "session dependencies changed; connecting");
                if let Some(params) = next.clone() {
                    if tx.send(params).is_err() {
                        return;
                    }
                }
            }
            last = next;

            let changed = tokio::select! {
                res = user_env.changed() => res,
                res = auth.changed() => res,
                res = profile.changed() => res,
                res = project.changed() => res,
                _ = tx.closed() => return,
            };
            if changed.is_err() {
                return;
            }
            user_env.mark_unchanged();
            auth.mark_unchanged();
            profile.mark_unchanged();
            project.mark_unchanged();
        }
    }
}
