use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;
use std::time::Duration;

use vote_giveaway_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::{ChatCapabilityProvider, NotificationSender, TelegramBotApi},
    handlers,
    middlewares::create_cors,
    services::*,
    swagger::swagger_config,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // Telegram bot 集成（成员 / 助力查询 + 消息通知）
    let telegram = Arc::new(
        TelegramBotApi::new(&config.telegram).expect("Failed to create Telegram client"),
    );
    let provider: Arc<dyn ChatCapabilityProvider> = telegram.clone();
    let notifier: Arc<dyn NotificationSender> = telegram;

    let system_channel = config.system_channel.chat_ref();
    if let Some(chat) = &system_channel {
        log::info!("System channel {} enabled for membership checks", chat.id);
    }

    // 创建服务
    let requirement_service = RequirementService::new(
        provider,
        Duration::from_millis(config.telegram.check_timeout_ms),
    );
    let giveaway_service = GiveawayService::new(
        pool.clone(),
        requirement_service.clone(),
        notifier,
        Duration::from_millis(config.telegram.check_timeout_ms),
        config.telegram.bot_username.clone(),
        system_channel,
    );
    let participant_service = ParticipantService::new(
        pool.clone(),
        giveaway_service.clone(),
        requirement_service.clone(),
    );
    let voter_service = VoterService::new(
        pool.clone(),
        giveaway_service.clone(),
        participant_service.clone(),
        requirement_service,
    );
    let leaderboard_service = LeaderboardService::new(
        pool.clone(),
        giveaway_service.clone(),
        participant_service.clone(),
        voter_service.clone(),
    );

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(web::Data::new(giveaway_service.clone()))
            .app_data(web::Data::new(participant_service.clone()))
            .app_data(web::Data::new(voter_service.clone()))
            .app_data(web::Data::new(leaderboard_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::giveaway_config)
                    .configure(handlers::participant_config)
                    .configure(handlers::voter_config)
                    .configure(handlers::client_log_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
