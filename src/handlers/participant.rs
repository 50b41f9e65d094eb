use crate::models::*;
use crate::services::{LeaderboardService, ParticipantService, VoterService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/participants/{id}",
    tag = "participant",
    params(
        ("id" = String, Path, description = "参与者ID")
    ),
    responses(
        (status = 200, description = "获取参与者成功", body = ParticipantResponse),
        (status = 404, description = "参与者不存在")
    )
)]
pub async fn get_participant(
    service: web::Data<ParticipantService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match service.get_participant(&path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/participants/{id}/votes",
    tag = "participant",
    params(
        ("id" = String, Path, description = "参与者ID")
    ),
    request_body = VoteRequest,
    responses(
        (status = 200, description = "投票成功（新建或恢复）", body = VoteResponse),
        (status = 400, description = "活动未开始或已结束"),
        (status = 403, description = "未满足投票门槛"),
        (status = 404, description = "参与者不存在"),
        (status = 409, description = "已投票")
    )
)]
/// 投票:
/// 1. 活动须进行中
/// 2. 校验投票门槛
/// 3. 新建投票，或恢复此前失效的投票
pub async fn vote(
    service: web::Data<VoterService>,
    path: web::Path<String>,
    req: web::Json<VoteRequest>,
) -> Result<HttpResponse> {
    match service.vote(&path.into_inner(), &req.user).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/participants/{id}/rank",
    tag = "participant",
    params(
        ("id" = String, Path, description = "参与者ID"),
        ("viewer_id" = i64, Query, description = "查看者的 Telegram ID")
    ),
    responses(
        (status = 200, description = "获取名次成功", body = RankResponse),
        (status = 404, description = "参与者不存在")
    )
)]
/// 名次与票数；零票时 rank 为 null
pub async fn get_rank(
    service: web::Data<LeaderboardService>,
    path: web::Path<String>,
    query: web::Query<ViewerQuery>,
) -> Result<HttpResponse> {
    match service
        .get_participant_rank(&path.into_inner(), query.viewer_id)
        .await
    {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/participants/{id}/voters",
    tag = "participant",
    params(
        ("id" = String, Path, description = "参与者ID"),
        ("viewer_id" = i64, Query, description = "查看者的 Telegram ID")
    ),
    responses(
        (status = 200, description = "获取投票人列表成功", body = [VoterListItem]),
        (status = 404, description = "参与者不存在")
    )
)]
/// 有效投票人列表（最近投票在前）
pub async fn get_voters(
    service: web::Data<VoterService>,
    path: web::Path<String>,
    query: web::Query<ViewerQuery>,
) -> Result<HttpResponse> {
    match service
        .list_participant_voters(&path.into_inner(), query.viewer_id)
        .await
    {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn participant_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/participants")
            .route("/{id}", web::get().to(get_participant))
            .route("/{id}/votes", web::post().to(vote))
            .route("/{id}/rank", web::get().to(get_rank))
            .route("/{id}/voters", web::get().to(get_voters)),
    );
}
