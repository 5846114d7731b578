mod carrier_status_callback;

use actix_web::web;
use carrier_status_callback::carrier_status_callback_controller;
use noshow_infra::CARRIER_STATUS_CALLBACK_PATH;

/// Path of the callback route relative to the `/api/v1` scope
fn callback_route() -> &'static str {
    CARRIER_STATUS_CALLBACK_PATH
        .strip_prefix("/api/v1")
        .unwrap_or(CARRIER_STATUS_CALLBACK_PATH)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        callback_route(),
        web::post().to(carrier_status_callback_controller),
    );
}
