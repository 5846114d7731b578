mod delete_schedule;
mod get_schedules;
mod upsert_schedule;

use actix_web::web;
use delete_schedule::delete_schedule_controller;
use get_schedules::get_schedules_controller;
use upsert_schedule::upsert_schedule_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/tenants/{tenant_id}/schedules",
        web::get().to(get_schedules_controller),
    );
    cfg.route(
        "/tenants/{tenant_id}/schedules/{timing}",
        web::put().to(upsert_schedule_controller),
    );
    cfg.route(
        "/tenants/{tenant_id}/schedules/{timing}",
        web::delete().to(delete_schedule_controller),
    );
}
