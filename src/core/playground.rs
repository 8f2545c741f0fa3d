//! Prompt playground: edit a recorded prompt's messages and replay it.

use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::api::{ChatClient, ClientError, Prompt, PromptMessage, UserEnv};
use crate::core::completion::TokenCallback;
use crate::core::store::Store;

const ROLE_ASSISTANT: &str = "assistant";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptMode {
    #[default]
    Template,
    Formatted,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaygroundState {
    pub prompt: Option<Prompt>,
    pub mode: PromptMode,
    /// Bumped on every restore so editors know to remount.
    pub restored: u64,
    pub completion_loading: bool,
}

pub fn has_template(prompt: &Prompt) -> bool {
    prompt.template.is_some()
        || prompt
            .messages
            .iter()
            .flatten()
            .any(|message| message.template.is_some())
}

pub fn title(mode: PromptMode, has_template: bool) -> &'static str {
    match (mode, has_template) {
        (PromptMode::Formatted, true) => "Formatted messages [Read Only]",
        (PromptMode::Formatted, false) => "Formatted messages",
        (PromptMode::Template, _) => "Prompt messages",
    }
}

pub struct Playground {
    state: Store<PlaygroundState>,
    original: Option<Prompt>,
}

impl Default for Playground {
    fn default() -> Self {
        Self::new()
    }
}

impl Playground {
    pub fn new() -> Self {
        Self {
            state: Store::default(),
            original: None,
        }
    }

    pub fn state(&self) -> &Store<PlaygroundState> {
        &self.state
    }

    pub fn prompt(&self) -> Option<Prompt> {
        self.state.read(|state| state.prompt.clone())
    }

    /// Open `prompt` for editing; `restore` returns to this version.
    pub fn load(&mut self, prompt: Prompt) {
        let mode = if has_template(&prompt) {
            PromptMode::Template
        } else {
            PromptMode::Formatted
        };
        self.original = Some(prompt.clone());
        self.state.update(|state| {
            state.prompt = Some(prompt);
            state.mode = mode;
            state.completion_loading = false;
        });
    }

    pub fn set_mode(&self, mode: PromptMode) {
        self.state.update(|state| state.mode = mode);
    }

    pub fn title(&self) -> &'static str {
        self.state.read(|state| {
            let templated = state.prompt.as_ref().is_some_and(has_template);
            title(state.mode, templated)
        })
    }

    /// Replace the editable text of message `index`. Writes the template when
    /// the prompt is templated, the formatted text otherwise.
    pub fn update_message(&self, index: usize, text: &str, has_template: bool) -> bool {
        let mut updated = false;
        self.state.update(|state| {
            let Some(message) = state
                .prompt
                .as_mut()
                .and_then(|prompt| prompt.messages.as_mut())
                .and_then(|messages| messages.get_mut(index))
            else {
                return;
            };
            if has_template {
                message.template = Some(text.to_string());
            } else {
                message.formatted = Some(text.to_string());
            }
            updated = true;
        });
        updated
    }

    /// Append an empty assistant message using the prompt's template format.
    pub fn add_message(&self) {
        self.state.update(|state| {
            let Some(prompt) = state.prompt.as_mut() else {
                return;
            };
            let message = PromptMessage {
                role: ROLE_ASSISTANT.to_string(),
                template: Some(String::new()),
                formatted: Some(String::new()),
                template_format: prompt.template_format.clone(),
                name: None,
            };
            prompt.messages.get_or_insert_with(Vec::new).push(message);
        });
    }

    pub fn restore(&self) {
        let original = self.original.clone();
        self.state.update(|state| {
            state.prompt = original;
            state.restored += 1;
            state.completion_loading = false;
        });
    }

    /// Send the current prompt for completion, appending streamed tokens to
    /// the prompt's completion in the store as they arrive.
    pub async fn replay(
        &self,
        client: &ChatClient,
        user_env: &UserEnv,
        access_token: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<String, ClientError> {
        if self.state.read(|state| state.prompt.is_none()) {
            return Ok(String::new());
        }

        self.state.update(|state| {
            if let Some(prompt) = state.prompt.as_mut() {
                prompt.completion = Some(String::new());
            }
            state.completion_loading = true;
        });
        let prompt = self.prompt().unwrap_or_default();

        let store = self.state.clone();
        let on_token: TokenCallback = Box::new(move |token: &str, done: bool| {
            store.update(|state| {
                if done {
                    state.completion_loading = false;
                } else if let Some(prompt) = state.prompt.as_mut() {
                    prompt
                        .completion
                        .get_or_insert_with(String::new)
                        .push_str(token);
                }
            });
        });

        let stream = match client
            .get_completion(&prompt, user_env, cancel, access_token, Some(on_token))
            .await
        {
            Ok(stream) => stream,
            Err(err) => {
                self.state.update(|state| state.completion_loading = false);
                return Err(err);
            }
        };

        stream.for_each(|_| async {}).await;
        debug!("playground replay finished");

        Ok(self.state.read(|state| {
            state
                .prompt
                .as_ref()
                .and_then(|prompt| prompt.completion.clone())
                .unwrap_or_default()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiBase;
    use crate::utils::test_utils::{test_http_client, MockResponse, MockServer};

    fn templated_prompt() -> Prompt {
        Prompt {
            template_format: Some("f-string".to_string()),
            messages: Some(vec![
                PromptMessage {
                    role: "system".to_string(),
                    template: Some("You are {persona}".to_string()),
                    formatted: Some("You are a pirate".to_string()),
                    template_format: Some("f-string".to_string()),
                    name: None,
                },
                PromptMessage {
                    role: "user".to_string(),
                    template: Some("{question}".to_string()),
                    formatted: Some("Where is the treasure?".to_string()),
                    template_format: Some("f-string".to_string()),
                    name: None,
                },
            ]),
            ..Default::default()
        }
    }

    #[test]
    fn titles_follow_mode_and_template() {
        assert_eq!(title(PromptMode::Formatted, true), "Formatted messages [Read Only]");
        assert_eq!(title(PromptMode::Formatted, false), "Formatted messages");
        assert_eq!(title(PromptMode::Template, true), "Prompt messages");
        assert_eq!(title(PromptMode::Template, false), "Prompt messages");
    }

    #[test]
    fn update_writes_template_or_formatted_and_keeps_order() {
        let mut playground = Playground::new();
        playground.load(templated_prompt());

        assert!(playground.update_message(1, "{q}?", true));
        assert!(playground.update_message(0, "You are a parrot", false));
        assert!(!playground.update_message(5, "nope", true));

        let messages = playground.prompt().unwrap().messages.unwrap();
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].template.as_deref(), Some("You are {persona}"));
        assert_eq!(messages[0].formatted.as_deref(), Some("You are a parrot"));
        assert_eq!(messages[1].template.as_deref(), Some("{q}?"));
        assert_eq!(messages[1].formatted.as_deref(), Some("Where is the treasure?"));
    }

    #[test]
    fn add_message_appends_empty_assistant_message() {
        let mut playground = Playground::new();
        let mut prompt = templated_prompt();
        prompt.template_format = Some("jinja2".to_string());
        playground.load(prompt);

        playground.add_message();
        let messages = playground.prompt().unwrap().messages.unwrap();
        let added = messages.last().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(added.role, "assistant");
        assert_eq!(added.template.as_deref(), Some(""));
        assert_eq!(added.formatted.as_deref(), Some(""));
        assert_eq!(added.template_format.as_deref(), Some("jinja2"));
    }

    #[test]
    fn restore_returns_to_loaded_prompt_and_bumps_counter() {
        let mut playground = Playground::new();
        playground.load(templated_prompt());
        playground.add_message();
        playground.update_message(0, "edited", true);

        playground.restore();
        assert_eq!(playground.prompt(), Some(templated_prompt()));
        assert_eq!(playground.state().get().restored, 1);
    }

    #[test]
    fn load_picks_mode_from_template_presence() {
        let mut playground = Playground::new();
        playground.load(templated_prompt());
        assert_eq!(playground.state().get().mode, PromptMode::Template);
        assert_eq!(playground.title(), "Prompt messages");

        let mut plain = templated_prompt();
        for message in plain.messages.as_mut().unwrap() {
            message.template = None;
        }
        playground.load(plain);
        assert_eq!(playground.state().get().mode, PromptMode::Formatted);
        assert_eq!(playground.title(), "Formatted messages");

        playground.set_mode(PromptMode::Template);
        assert_eq!(playground.title(), "Prompt messages");
    }

    #[tokio::test]
    async fn replay_streams_completion_into_store() {
        let server = MockServer::start(vec![MockResponse::chunked(
            200,
            vec!["Under ".to_string(), "the palm".to_string()],
        )])
        .await;
        let client = ChatClient::new(ApiBase::new(server.url()).with_http_client(test_http_client()));

        let mut playground = Playground::new();
        let mut prompt = templated_prompt();
        prompt.completion = Some("stale answer".to_string());
        playground.load(prompt);
        let mut rx = playground.state().subscribe();

        let completion = playground
            .replay(&client, &UserEnv::new(), None, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(completion, "Under the palm");
        let state = playground.state().get();
        assert!(!state.completion_loading);
        assert_eq!(
            state.prompt.unwrap().completion.as_deref(),
            Some("Under the palm")
        );
        assert!(rx.has_changed().unwrap());

        let sent = server.requests().await[0].json();
        assert_eq!(sent["prompt"]["completion"], "");
        assert_eq!(sent["prompt"]["messages"][1]["template"], "{question}");
    }
}
