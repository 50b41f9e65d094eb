use crate::models::*;
use crate::services::VoterService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/voters/{id}/invalidate",
    tag = "voter",
    params(
        ("id" = String, Path, description = "投票记录ID")
    ),
    responses(
        (status = 200, description = "投票已失效", body = VoterResponse),
        (status = 404, description = "投票记录不存在")
    )
)]
/// 将投票标记为失效（不计票，不出现在投票人列表；投票人可再次投票恢复）
pub async fn invalidate_vote(
    service: web::Data<VoterService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match service.invalidate_vote(&path.into_inner()).await {
        Ok(voter) => {
            let data: VoterResponse = voter.into();
            Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

pub fn voter_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/voters").route("/{id}/invalidate", web::post().to(invalidate_vote)),
    );
}
