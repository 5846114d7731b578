mod cancel_subscription;
mod create_tenant;
mod get_tenant;
mod renew_billing_period;
mod set_calendar_connection;

use actix_web::web;
use cancel_subscription::cancel_subscription_controller;
use create_tenant::create_tenant_controller;
use get_tenant::get_tenant_controller;
use renew_billing_period::renew_billing_period_controller;
use set_calendar_connection::set_calendar_connection_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/tenants", web::post().to(create_tenant_controller));
    cfg.route("/tenants/{tenant_id}", web::get().to(get_tenant_controller));
    cfg.route(
        "/tenants/{tenant_id}/billing/renewal",
        web::post().to(renew_billing_period_controller),
    );
    cfg.route(
        "/tenants/{tenant_id}/billing/cancel",
        web::post().to(cancel_subscription_controller),
    );
    cfg.route(
        "/tenants/{tenant_id}/calendar",
        web::put().to(set_calendar_connection_controller),
    );
}
