use actix_cors::Cors;

/// Mini App 运行在 Telegram webview 中，来源不固定，放开所有来源
pub fn create_cors() -> Cors {
    Cors::default()
        .allowed_origin_fn(|_, _req_head| true)
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_any_header()
        .max_age(3600)
}
