use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::handlers::complaint::complaint_upload_body_limit;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new().nest("/complaints", complaint_routes(config))
}

fn complaint_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let create = OpenApiRouter::new()
        .routes(routes!(handlers::complaint::create_worker_complaint))
        .routes(routes!(handlers::complaint::create_customer_complaint))
        .layer(complaint_upload_body_limit(&config.complaint));

    OpenApiRouter::new()
        .merge(create)
        .routes(routes!(
            handlers::complaint::get_complaint,
            handlers::complaint::delete_complaint
        ))
        .routes(routes!(handlers::complaint::update_complaint_status))
}
