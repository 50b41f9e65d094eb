use actix_web::{HttpResponse, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/log-error",
    tag = "client",
    responses(
        (status = 200, description = "已记录")
    )
)]
/// Mini App 前端错误上报，仅写日志
pub async fn log_error(payload: web::Json<serde_json::Value>) -> Result<HttpResponse> {
    log::warn!("Mini App error: {}", payload.into_inner());
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

pub fn client_log_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/log-error", web::post().to(log_error));
}
