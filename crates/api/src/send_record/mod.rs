mod get_send_records;

use actix_web::web;
use get_send_records::get_send_records_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/tenants/{tenant_id}/send-records",
        web::get().to(get_send_records_controller),
    );
}
