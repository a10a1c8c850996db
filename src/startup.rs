use std::net::TcpListener;

use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};

use crate::{
    configuration::Settings,
    routes::{dashboard_route, download_route, JobState},
};

pub fn run(listener: TcpListener, settings: Settings) -> Result<Server, std::io::Error> {
    let settings = web::Data::new(settings);
    let job_state = web::Data::new(JobState::default());

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(dashboard_route::index)
            .service(dashboard_route::start_job)
            .service(dashboard_route::job_status)
            .service(download_route::download)
            .app_data(settings.clone())
            .app_data(job_state.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
