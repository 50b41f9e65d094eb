use crate::config::TelegramConfig;
use crate::error::{AppError, AppResult};
use crate::external::{ChatCapabilityProvider, NotificationSender};
use crate::models::ChatRef;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;

/// Bot API 统一响应包装
#[derive(Debug, Deserialize)]
struct TelegramEnvelope<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatMember {
    status: String,
}

#[derive(Debug, Deserialize)]
struct UserChatBoosts {
    #[serde(default)]
    boosts: Vec<serde_json::Value>,
}

#[derive(Clone)]
pub struct TelegramBotApi {
    http: Client,
    base_url: String,
    bot_token: String,
    system_bot_token: Option<String>,
}

impl TelegramBotApi {
    pub fn new(cfg: &TelegramConfig) -> AppResult<Self> {
        let http = Client::builder()
            .user_agent("vote-giveaway-backend/telegram")
            .timeout(Duration::from_millis(cfg.check_timeout_ms))
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.api_base_url.trim_end_matches('/').to_string(),
            bot_token: cfg.bot_token.clone(),
            system_bot_token: cfg.system_bot_token.clone(),
        })
    }

    /// 系统频道使用系统 bot，其余使用主 bot
    fn token_for(&self, chat: &ChatRef) -> &str {
        match (&self.system_bot_token, chat.is_system) {
            (Some(token), true) => token,
            _ => &self.bot_token,
        }
    }

    fn method_url(&self, token: &str, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, token, method)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        token: &str,
        method: &str,
        body: serde_json::Value,
    ) -> AppResult<T> {
        let resp = self
            .http
            .post(self.method_url(token, method))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ProviderError(format!("{method}: {e}")))?;

        let status = resp.status();
        let envelope: TelegramEnvelope<T> = resp
            .json()
            .await
            .map_err(|e| AppError::ProviderError(format!("{method}: invalid response: {e}")))?;

        if !envelope.ok {
            return Err(AppError::ProviderError(format!(
                "{method}: HTTP {}: {}",
                status.as_u16(),
                envelope.description.unwrap_or_default()
            )));
        }

        envelope
            .result
            .ok_or_else(|| AppError::ProviderError(format!("{method}: missing result")))
    }
}

#[async_trait]
impl ChatCapabilityProvider for TelegramBotApi {
    async fn chat_member_status(&self, chat: &ChatRef, user_id: i64) -> AppResult<String> {
        let member: ChatMember = self
            .call(
                self.token_for(chat),
                "getChatMember",
                json!({ "chat_id": chat.id, "user_id": user_id }),
            )
            .await?;
        Ok(member.status)
    }

    async fn boost_count(&self, chat: &ChatRef, user_id: i64) -> AppResult<usize> {
        let boosts: UserChatBoosts = self
            .call(
                self.token_for(chat),
                "getUserChatBoosts",
                json!({ "chat_id": chat.id, "user_id": user_id }),
            )
            .await?;
        Ok(boosts.boosts.len())
    }
}

#[async_trait]
impl NotificationSender for TelegramBotApi {
    async fn notify(&self, user_id: i64, text: &str) -> bool {
        let result: AppResult<serde_json::Value> = self
            .call(
                &self.bot_token,
                "sendMessage",
                json!({ "chat_id": user_id, "text": text, "parse_mode": "HTML" }),
            )
            .await;
        match result {
            Ok(_) => true,
            Err(e) => {
                log::warn!("Failed to send Telegram message to user {user_id}: {e}");
                false
            }
        }
    }
}
