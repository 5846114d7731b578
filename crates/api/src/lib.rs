mod appointment;
mod delivery;
mod dispatch;
mod error;
mod job_schedulers;
mod reminder_schedule;
mod send_record;
mod shared;
mod status;
mod template;
mod tenant;

use actix_cors::Cors;
use actix_web::{dev::Server, middleware, web, App, HttpServer};
use job_schedulers::start_dispatch_job;
use noshow_infra::NoShowContext;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub use error::NoShowError;
pub use shared::carrier_signature;

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    appointment::configure_routes(cfg);
    delivery::configure_routes(cfg);
    dispatch::configure_routes(cfg);
    reminder_schedule::configure_routes(cfg);
    send_record::configure_routes(cfg);
    status::configure_routes(cfg);
    template::configure_routes(cfg);
    tenant::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
}

impl Application {
    pub async fn new(context: NoShowContext) -> Result<Self, std::io::Error> {
        let (server, port) = Application::configure_server(context.clone()).await?;
        Application::start_job_schedulers(context);

        Ok(Self { server, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    fn start_job_schedulers(context: NoShowContext) {
        start_dispatch_job(context);
    }

    async fn configure_server(context: NoShowContext) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();

        let server = HttpServer::new(move || {
            let ctx = context.clone();

            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(ctx))
                .service(web::scope("/api/v1").configure(configure_server_api))
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    pub async fn start(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}
