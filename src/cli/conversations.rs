//! Conversation listing, deletion and message feedback.

use std::error::Error;

use crate::api::{Conversation, ConversationPager, ConversationsFilters, Cursor};
use crate::cli::CliContext;

const PREVIEW_CHARS: usize = 60;

pub struct ListOptions {
    pub search: Option<String>,
    pub author: Option<String>,
    pub feedback: Option<i32>,
    pub first: Option<u32>,
    pub cursor: Option<String>,
    pub all: bool,
}

impl ListOptions {
    fn filters(&self) -> ConversationsFilters {
        ConversationsFilters {
            author_email: self.author.clone(),
            search: self.search.clone(),
            feedback: self.feedback,
        }
    }
}

/// Cursors are opaque, but the backend hands out numbers for some stores.
pub(crate) fn parse_cursor(raw: &str) -> Cursor {
    match raw.trim().parse::<i64>() {
        Ok(number) => Cursor::Number(number),
        Err(_) => Cursor::Text(raw.to_string()),
    }
}

fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    let mut chars = s.chars();
    let truncated: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{truncated}...")
    } else {
        truncated
    }
}

pub(crate) fn format_conversation(conversation: &Conversation) -> String {
    let created = conversation
        .created_at
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".repeat(16));
    let author = conversation
        .app_user
        .as_ref()
        .map(|user| user.username.as_str())
        .unwrap_or("(anonymous)");
    let preview = conversation
        .preview()
        .map(|text| truncate_with_ellipsis(&text.replace('\n', " "), PREVIEW_CHARS))
        .unwrap_or_default();

    format!("{}  {created}  {author}  {preview}", conversation.id)
}

pub async fn run_list(ctx: &CliContext, options: ListOptions) -> Result<(), Box<dyn Error>> {
    let page_size = options
        .first
        .filter(|size| *size > 0)
        .unwrap_or_else(|| ctx.config.page_size());
    let mut pager = ConversationPager::new(
        &ctx.client,
        options.filters(),
        page_size,
        ctx.access_token(),
    );
    if let Some(cursor) = options.cursor.as_deref() {
        pager = pager.starting_at(parse_cursor(cursor));
    }

    let conversations = if options.all {
        pager.collect_all().await?
    } else {
        let page = pager.next_page().await?.unwrap_or_default();
        if !pager.is_exhausted() {
            if let Some(cursor) = pager.cursor() {
                eprintln!("More conversations available: --cursor {cursor}");
            }
        }
        page
    };

    if conversations.is_empty() {
        println!("No conversations found.");
        return Ok(());
    }
    for conversation in &conversations {
        println!("{}", format_conversation(conversation));
    }
    Ok(())
}

pub async fn run_delete(ctx: &CliContext, conversation_id: &str) -> Result<(), Box<dyn Error>> {
    let access_token = ctx.access_token();
    ctx.client
        .delete_conversation(conversation_id, access_token.as_deref())
        .await?;
    println!("✅ Deleted conversation {conversation_id}");
    Ok(())
}

pub async fn run_feedback(
    ctx: &CliContext,
    message_id: &str,
    score: i32,
    comment: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let access_token = ctx.access_token();
    ctx.client
        .set_human_feedback(message_id, score, comment, access_token.as_deref())
        .await?;
    println!("✅ Recorded feedback {score} on message {message_id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AppUser, ConversationMessage};
    use chrono::{TimeZone, Utc};

    fn message(content: Option<&str>) -> ConversationMessage {
        ConversationMessage {
            id: None,
            author: "user".to_string(),
            content: content.map(str::to_string),
            created_at: None,
            human_feedback: None,
            human_feedback_comment: None,
            extra: Default::default(),
        }
    }

    #[test]
    fn numeric_cursors_stay_numeric() {
        assert_eq!(parse_cursor("42"), Cursor::Number(42));
        assert_eq!(parse_cursor("abc=="), Cursor::Text("abc==".to_string()));
    }

    #[test]
    fn conversation_line_shows_date_author_and_preview() {
        let conversation = Conversation {
            id: "c1".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).single(),
            tags: Vec::new(),
            app_user: Some(AppUser {
                id: None,
                username: "ada".to_string(),
            }),
            messages: vec![message(Some("  ")), message(Some("first line\nsecond line"))],
        };

        assert_eq!(
            format_conversation(&conversation),
            "c1  2024-03-09 14:05  ada  first line second line"
        );
    }

    #[test]
    fn long_previews_are_truncated() {
        let conversation = Conversation {
            id: "c2".to_string(),
            created_at: None,
            tags: Vec::new(),
            app_user: None,
            messages: vec![message(Some(&"é".repeat(80)))],
        };

        let line = format_conversation(&conversation);
        assert!(line.starts_with("c2  ----------------  (anonymous)  "));
        assert!(line.ends_with(&format!("{}...", "é".repeat(PREVIEW_CHARS))));
    }

    #[test]
    fn filters_map_flags_to_camel_case_fields() {
        let options = ListOptions {
            search: Some("refund".to_string()),
            author: Some("ada@example.com".to_string()),
            feedback: Some(-1),
            first: None,
            cursor: None,
            all: false,
        };
        let json = serde_json::to_value(options.filters()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "authorEmail": "ada@example.com",
                "search": "refund",
                "feedback": -1
            })
        );
    }
}
