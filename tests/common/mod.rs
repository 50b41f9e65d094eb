#![allow(dead_code)]

use async_trait::async_trait;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use vote_giveaway_backend::error::{AppError, AppResult};
use vote_giveaway_backend::external::{ChatCapabilityProvider, NotificationSender};
use vote_giveaway_backend::models::*;
use vote_giveaway_backend::services::*;

pub const MAIN_CHAT: i64 = -1001;
pub const SYSTEM_CHAT: i64 = -1999;

/// 内存版成员 / 助力数据
#[derive(Default)]
pub struct FakeTelegram {
    members: Mutex<HashSet<(i64, i64)>>,
    boosters: Mutex<HashSet<(i64, i64)>>,
    unreachable: Mutex<HashSet<i64>>,
}

impl FakeTelegram {
    pub fn join(&self, chat_id: i64, user_id: i64) {
        self.members.lock().unwrap().insert((chat_id, user_id));
    }

    pub fn boost(&self, chat_id: i64, user_id: i64) {
        self.boosters.lock().unwrap().insert((chat_id, user_id));
    }

    pub fn break_chat(&self, chat_id: i64) {
        self.unreachable.lock().unwrap().insert(chat_id);
    }

    fn ensure_reachable(&self, chat: &ChatRef) -> AppResult<()> {
        if self.unreachable.lock().unwrap().contains(&chat.id) {
            return Err(AppError::ProviderError(format!("chat {} unreachable", chat.id)));
        }
        Ok(())
    }
}

#[async_trait]
impl ChatCapabilityProvider for FakeTelegram {
    async fn chat_member_status(&self, chat: &ChatRef, user_id: i64) -> AppResult<String> {
        self.ensure_reachable(chat)?;
        let joined = self.members.lock().unwrap().contains(&(chat.id, user_id));
        Ok(if joined { "member" } else { "left" }.to_string())
    }

    async fn boost_count(&self, chat: &ChatRef, user_id: i64) -> AppResult<usize> {
        self.ensure_reachable(chat)?;
        Ok(usize::from(
            self.boosters.lock().unwrap().contains(&(chat.id, user_id)),
        ))
    }
}

#[derive(Default)]
pub struct FakeNotifier {
    pub sent: Mutex<Vec<(i64, String)>>,
    stalled: AtomicBool,
}

impl FakeNotifier {
    /// 模拟 Telegram 无响应
    pub fn stall(&self) {
        self.stalled.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl NotificationSender for FakeNotifier {
    async fn notify(&self, user_id: i64, text: &str) -> bool {
        if self.stalled.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        self.sent.lock().unwrap().push((user_id, text.to_string()));
        true
    }
}

pub struct TestApp {
    pub pool: DatabaseConnection,
    pub telegram: Arc<FakeTelegram>,
    pub notifier: Arc<FakeNotifier>,
    pub giveaways: GiveawayService,
    pub participants: ParticipantService,
    pub voters: VoterService,
    pub leaderboard: LeaderboardService,
}

pub async fn setup() -> TestApp {
    setup_with_system_channel(None).await
}

pub async fn setup_with_system_channel(system_channel: Option<ChatRef>) -> TestApp {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let pool = Database::connect(options).await.unwrap();
    Migrator::up(&pool, None).await.unwrap();

    let telegram = Arc::new(FakeTelegram::default());
    let notifier = Arc::new(FakeNotifier::default());

    let requirement_service = RequirementService::new(telegram.clone(), Duration::from_millis(200));
    let giveaways = GiveawayService::new(
        pool.clone(),
        requirement_service.clone(),
        notifier.clone(),
        Duration::from_millis(200),
        "VoteGiveawayBot".to_string(),
        system_channel,
    );
    let participants =
        ParticipantService::new(pool.clone(), giveaways.clone(), requirement_service.clone());
    let voters = VoterService::new(
        pool.clone(),
        giveaways.clone(),
        participants.clone(),
        requirement_service,
    );
    let leaderboard = LeaderboardService::new(
        pool.clone(),
        giveaways.clone(),
        participants.clone(),
        voters.clone(),
    );

    TestApp {
        pool,
        telegram,
        notifier,
        giveaways,
        participants,
        voters,
        leaderboard,
    }
}

pub fn user(id: i64) -> TelegramUser {
    TelegramUser {
        id,
        first_name: format!("User{id}"),
        last_name: String::new(),
        username: format!("user{id}"),
        is_premium: false,
        photo_url: String::new(),
    }
}

pub fn main_chat() -> ChatRef {
    ChatRef {
        id: MAIN_CHAT,
        title: "Main Chat".to_string(),
        link: "https://t.me/main_chat".to_string(),
        photo: String::new(),
        is_system: false,
    }
}

pub fn system_chat() -> ChatRef {
    ChatRef {
        id: SYSTEM_CHAT,
        title: "System Channel".to_string(),
        link: "https://t.me/system_channel".to_string(),
        photo: String::new(),
        is_system: true,
    }
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// 进行中的活动请求（前后各留一小时）
pub fn ongoing_request(min_votes: i32) -> CreateGiveawayRequest {
    CreateGiveawayRequest {
        chats: vec![main_chat()],
        num_winners: Some(3),
        min_votes: Some(min_votes),
        participation_requirements: None,
        voting_requirements: None,
        rewards: BTreeMap::from([(1, vec!["100 TON".to_string()])]),
        start_time: now() - 3600,
        end_time: now() + 3600,
        user: user(1),
    }
}

pub async fn create_ongoing(app: &TestApp, min_votes: i32) -> String {
    app.giveaways
        .create_giveaway(ongoing_request(min_votes))
        .await
        .unwrap()
        .giveaway
        .id
}
