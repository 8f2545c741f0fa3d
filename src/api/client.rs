use serde::Serialize;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use crate::api::base::{read_json, ApiBase, FormData, Payload};
use crate::api::error::ClientError;
use crate::api::{
    AuthResponse, ConversationPage, ConversationsFilters, Pagination, Prompt, UserEnv,
};
use crate::core::completion::{CompletionStream, TokenCallback};

/// Backend-specific calls layered over [`ApiBase`].
#[derive(Clone, Debug)]
pub struct ChatClient {
    base: ApiBase,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompletionRequest<'a> {
    prompt: &'a Prompt,
    user_env: &'a UserEnv,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackRequest<'a> {
    message_id: &'a str,
    feedback: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    feedback_comment: Option<&'a str>,
}

#[derive(Serialize)]
struct ConversationsRequest<'a> {
    pagination: &'a Pagination,
    filter: &'a ConversationsFilters,
}

impl ChatClient {
    pub fn new(base: ApiBase) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &ApiBase {
        &self.base
    }

    /// Authenticate through headers injected by a proxy in front of the backend.
    pub async fn header_auth(&self) -> Result<AuthResponse, ClientError> {
        let response = self
            .base
            .post("/auth/header", Payload::Json(json!({})), None, None)
            .await?;
        read_json(response).await
    }

    pub async fn password_auth(&self, form: FormData) -> Result<AuthResponse, ClientError> {
        let response = self
            .base
            .post("/login", Payload::Form(form), None, None)
            .await?;
        read_json(response).await
    }

    /// Request a completion for `prompt` and stream it back.
    ///
    /// The returned stream yields raw body chunks; `token_cb` sees each chunk
    /// decoded as text and a final `("", true)` once the stream ends, fails or
    /// is cancelled through `cancel`.
    pub async fn get_completion(
        &self,
        prompt: &Prompt,
        user_env: &UserEnv,
        cancel: &CancellationToken,
        access_token: Option<&str>,
        token_cb: Option<TokenCallback>,
    ) -> Result<CompletionStream, ClientError> {
        let payload = Payload::json(&CompletionRequest { prompt, user_env })?;
        let response = self
            .base
            .post("/completion", payload, access_token, Some(cancel))
            .await?;

        Ok(CompletionStream::new(
            response.bytes_stream(),
            cancel.clone(),
            token_cb,
        ))
    }

    pub async fn set_human_feedback(
        &self,
        message_id: &str,
        feedback: i32,
        feedback_comment: Option<&str>,
        access_token: Option<&str>,
    ) -> Result<(), ClientError> {
        let payload = Payload::json(&FeedbackRequest {
            message_id,
            feedback,
            feedback_comment,
        })?;
        self.base
            .put("/message/feedback", payload, access_token)
            .await?;
        Ok(())
    }

    pub async fn get_conversations(
        &self,
        pagination: &Pagination,
        filter: &ConversationsFilters,
        access_token: Option<&str>,
    ) -> Result<ConversationPage, ClientError> {
        let payload = Payload::json(&ConversationsRequest { pagination, filter })?;
        let response = self
            .base
            .post("/project/conversations", payload, access_token, None)
            .await?;
        read_json(response).await
    }

    pub async fn delete_conversation(
        &self,
        conversation_id: &str,
        access_token: Option<&str>,
    ) -> Result<Value, ClientError> {
        let payload = Payload::Json(json!({ "conversationId": conversation_id }));
        let response = self
            .base
            .delete("/project/conversation", payload, access_token)
            .await?;
        read_json(response).await
    }

    pub fn logo_endpoint(&self, theme: &str) -> String {
        self.base.build_endpoint(&format!("/logo?theme={theme}"))
    }

    pub fn oauth_endpoint(&self, provider: &str) -> String {
        self.base.build_endpoint(&format!("/auth/oauth/{provider}"))
    }
}
