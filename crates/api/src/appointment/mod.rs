mod sync_appointments;

use actix_web::web;
use sync_appointments::sync_appointments_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/tenants/{tenant_id}/appointments/sync",
        web::post().to(sync_appointments_controller),
    );
}
