use crate::config::TelegramConfig;
use crate::services::provider::{NotificationProvider, ProviderError, ProviderReceipt};
use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug)]
struct Credentials {
    bot_token: String,
    chat_id: String,
}

/// Bot API client. One `sendMessage` call per relay, no retries, no client
/// timeout beyond the transport default.
#[derive(Clone, Debug)]
pub struct TelegramClient {
    http: reqwest::Client,
    api_base: String,
    credentials: Option<Credentials>,
}

impl TelegramClient {
    #[must_use]
    pub fn new(config: &TelegramConfig) -> Self {
        let credentials = match (&config.bot_token, &config.chat_id) {
            (Some(bot_token), Some(chat_id)) => {
                Some(Credentials { bot_token: bot_token.clone(), chat_id: chat_id.clone() })
            }
            _ => None,
        };
        Self {
            http: reqwest::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            credentials,
        }
    }
}

#[derive(Debug, Serialize)]
struct SendMessageBody<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

#[derive(Debug, Deserialize)]
struct SendMessageReply {
    ok: bool,
    #[serde(default)]
    result: Option<MessageRef>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    message_id: i64,
}

#[async_trait]
impl NotificationProvider for TelegramClient {
    fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    async fn send_text(&self, text: &str) -> Result<ProviderReceipt, ProviderError> {
        let creds = self.credentials.as_ref().ok_or(ProviderError::NotConfigured)?;

        // The token is part of the URL; keep it out of logs and errors.
        let url = format!("{}/bot{}/sendMessage", self.api_base, creds.bot_token);
        let body = SendMessageBody {
            chat_id: &creds.chat_id,
            text,
            parse_mode: "Markdown",
            disable_web_page_preview: false,
        };

        let response = self.http.post(&url).json(&body).send().await.context("sendMessage request failed")?;
        let reply: SendMessageReply =
            response.json().await.context("sendMessage reply was not valid JSON")?;

        if reply.ok {
            let message_id = reply
                .result
                .map(|r| r.message_id)
                .context("sendMessage reply was ok but carried no message")?;
            Ok(ProviderReceipt::Accepted { message_id })
        } else {
            Ok(ProviderReceipt::Rejected {
                description: reply.description.unwrap_or_else(|| "unknown error".to_string()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: Option<&str>, chat: Option<&str>) -> TelegramConfig {
        TelegramConfig {
            bot_token: token.map(Into::into),
            chat_id: chat.map(Into::into),
            api_base: "https://api.telegram.org/".into(),
        }
    }

    #[test]
    fn test_configured_only_with_both_credentials() {
        assert!(TelegramClient::new(&config(Some("t"), Some("c"))).is_configured());
        assert!(!TelegramClient::new(&config(Some("t"), None)).is_configured());
        assert!(!TelegramClient::new(&config(None, Some("c"))).is_configured());
    }

    #[test]
    fn test_api_base_trailing_slash_is_trimmed() {
        let client = TelegramClient::new(&config(Some("t"), Some("c")));
        assert_eq!(client.api_base, "https://api.telegram.org");
    }

    #[test]
    fn test_send_message_body_shape() {
        let body = SendMessageBody {
            chat_id: "1234",
            text: "مرحبا",
            parse_mode: "Markdown",
            disable_web_page_preview: false,
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "chat_id": "1234",
                "text": "مرحبا",
                "parse_mode": "Markdown",
                "disable_web_page_preview": false,
            })
        );
    }

    #[test]
    fn test_reply_parses_success_and_failure_shapes() {
        let ok: SendMessageReply =
            serde_json::from_str(r#"{"ok":true,"result":{"message_id":42,"date":170}}"#).expect("parse");
        assert!(ok.ok);
        assert_eq!(ok.result.map(|r| r.message_id), Some(42));

        let err: SendMessageReply =
            serde_json::from_str(r#"{"ok":false,"error_code":400,"description":"Bad Request"}"#).expect("parse");
        assert!(!err.ok);
        assert_eq!(err.description.as_deref(), Some("Bad Request"));
    }
}
