use crate::models::*;
use crate::services::{GiveawayService, LeaderboardService, ParticipantService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/giveaways",
    tag = "giveaway",
    request_body = CreateGiveawayRequest,
    responses(
        (status = 200, description = "创建活动成功", body = CreateGiveawayResponse),
        (status = 400, description = "参数错误")
    )
)]
/// 创建活动并通过 bot 通知创建者
pub async fn create_giveaway(
    service: web::Data<GiveawayService>,
    req: web::Json<CreateGiveawayRequest>,
) -> Result<HttpResponse> {
    match service.create_giveaway(req.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/giveaways/{id}",
    tag = "giveaway",
    params(
        ("id" = String, Path, description = "活动ID")
    ),
    responses(
        (status = 200, description = "获取活动成功", body = GiveawayResponse),
        (status = 404, description = "活动不存在")
    )
)]
pub async fn get_giveaway(
    service: web::Data<GiveawayService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match service.get_giveaway(&path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/giveaways/{id}/participants/count",
    tag = "giveaway",
    params(
        ("id" = String, Path, description = "活动ID"),
        ("user_id" = i64, Query, description = "当前用户的 Telegram ID")
    ),
    responses(
        (status = 200, description = "获取参与人数成功", body = ParticipantsCountResponse)
    )
)]
/// 参与人数；若当前用户已参与，同时返回其参与者ID
pub async fn get_participants_count(
    service: web::Data<ParticipantService>,
    path: web::Path<String>,
    query: web::Query<UserQuery>,
) -> Result<HttpResponse> {
    match service
        .get_participants_count(&path.into_inner(), query.user_id)
        .await
    {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/giveaways/{id}/participants",
    tag = "giveaway",
    params(
        ("id" = String, Path, description = "活动ID")
    ),
    request_body = ParticipateRequest,
    responses(
        (status = 200, description = "参与成功", body = ParticipantResponse),
        (status = 400, description = "活动未开始或已结束"),
        (status = 403, description = "未满足参与门槛"),
        (status = 404, description = "活动不存在"),
        (status = 409, description = "已参与，error.existing_id 为已有参与者ID")
    )
)]
/// 参与活动:
/// 1. 活动须进行中
/// 2. 校验参与门槛
/// 3. 写入参与记录
pub async fn participate(
    service: web::Data<ParticipantService>,
    path: web::Path<String>,
    req: web::Json<ParticipateRequest>,
) -> Result<HttpResponse> {
    match service.participate(&path.into_inner(), &req.user).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/giveaways/{id}/leaderboard",
    tag = "giveaway",
    params(
        ("id" = String, Path, description = "活动ID"),
        ("viewer_id" = i64, Query, description = "查看者的 Telegram ID")
    ),
    responses(
        (status = 200, description = "获取排行榜成功", body = LeaderboardResponse),
        (status = 404, description = "活动不存在")
    )
)]
pub async fn get_leaderboard(
    service: web::Data<LeaderboardService>,
    path: web::Path<String>,
    query: web::Query<ViewerQuery>,
) -> Result<HttpResponse> {
    match service
        .get_leaderboard(&path.into_inner(), query.viewer_id)
        .await
    {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/giveaways/{id}/requirements/check",
    tag = "giveaway",
    params(
        ("id" = String, Path, description = "活动ID")
    ),
    request_body = RequirementCheckRequest,
    responses(
        (status = 200, description = "检查完成", body = RequirementCheckResponse),
        (status = 404, description = "活动不存在")
    )
)]
/// 手动重新检查参与 / 投票门槛（接口超时后用户可重试）
pub async fn check_requirements(
    service: web::Data<GiveawayService>,
    path: web::Path<String>,
    req: web::Json<RequirementCheckRequest>,
) -> Result<HttpResponse> {
    match service.check_requirements(&path.into_inner(), &req).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn giveaway_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/giveaways")
            .route("", web::post().to(create_giveaway))
            .route("/{id}", web::get().to(get_giveaway))
            .route("/{id}/participants/count", web::get().to(get_participants_count))
            .route("/{id}/participants", web::post().to(participate))
            .route("/{id}/leaderboard", web::get().to(get_leaderboard))
            .route("/{id}/requirements/check", web::post().to(check_requirements)),
    );
}
