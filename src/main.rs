#![allow(non_snake_case)]

mod client;

#[cfg(feature = "server")]
use harvest::server;

fn main() {
    #[cfg(not(feature = "server"))]
    dioxus::launch(client::App);

    #[cfg(feature = "server")]
    dioxus::serve(|| async move {
        use dioxus_logger::tracing;

        use crate::server::{config::Config, router, startup};

        dotenvy::dotenv().ok();
        let config = match Config::from_env() {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                std::process::exit(1);
            }
        };

        let state = match startup::build_app_state(&config) {
            Ok(state) => state,
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                std::process::exit(1);
            }
        };
        let session = startup::build_session_layer();
        if let Err(e) = startup::start_scheduler(&state).await {
            eprintln!("Failed to start scheduler: {}", e);
            std::process::exit(1);
        }

        tracing::info!("Starting server");

        let mut router = dioxus::server::router(client::App);
        let server_routes = router::routes().with_state(state).layer(session);
        router = router.merge(server_routes);

        Ok(router)
    })
}
