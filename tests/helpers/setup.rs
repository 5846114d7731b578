use noshow_api::Application;
use noshow_infra::{
    CarrierCredentials, Config, InMemoryCalendarProvider, InMemorySmsCarrier, NoShowContext,
    StaticTimeSys,
};
use noshow_sdk::NoShowSDK;
use std::sync::Arc;

pub const SECRET: &str = "dispatch-secret";
pub const CARRIER_AUTH_TOKEN: &str = "carrier-auth-token";
// 2024-03-14T09:00:00Z
pub const NOW: i64 = 1710406800000;
pub const HOUR: i64 = 1000 * 60 * 60;

pub struct TestApp {
    pub config: Config,
    pub carrier: Arc<InMemorySmsCarrier>,
    pub calendar: Arc<InMemoryCalendarProvider>,
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, NoShowSDK, String) {
    let mut ctx = NoShowContext::create_inmemory();
    ctx.config.port = 0; // Random port
    ctx.config.dispatch_secret = Some(SECRET.into());
    ctx.config.dispatch_job_hour = None;
    ctx.config.dispatch_timezone = chrono_tz::UTC;
    ctx.config.plan_credits = 500;
    ctx.config.public_base_url = Some("https://noshow.test".into());
    ctx.config.carrier = Some(CarrierCredentials {
        account_sid: "AC00000000000000000000000000000000".into(),
        auth_token: CARRIER_AUTH_TOKEN.into(),
        from_number: "+15550000000".into(),
    });
    ctx.sys = Arc::new(StaticTimeSys(NOW));

    let carrier = Arc::new(InMemorySmsCarrier::new());
    ctx.carrier = carrier.clone();
    let calendar = Arc::new(InMemoryCalendarProvider::new());
    ctx.calendar = calendar.clone();

    let config = ctx.config.clone();
    let application = Application::new(ctx)
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let app = TestApp {
        config,
        carrier,
        calendar,
    };
    let sdk = NoShowSDK::new(address.clone(), Some(SECRET));
    (app, sdk, address)
}
