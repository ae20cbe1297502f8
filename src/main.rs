use actix_web::{middleware::Logger, App, HttpServer, web::Data};
use actix_files as fs;
use dotenv::dotenv;
use log::{info, error};

use snowball_relay::config::Settings;
use snowball_relay::model::ModelManager;
use snowball_relay::web::{cors, routes};
use snowball_relay::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting Snowball relay");

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            std::process::exit(1);
        }
    };

    let model_manager = match ModelManager::new(&settings) {
        Ok(manager) => {
            info!("Upstream completion client initialized");
            manager
        },
        Err(e) => {
            error!("Failed to initialize upstream completion client: {:#}", e);
            std::process::exit(1);
        }
    };

    let app_state = match AppState::new(model_manager, settings.assistant_name.clone()) {
        Ok(state) => Data::new(state),
        Err(e) => {
            error!("Template parsing error: {:#}", e);
            std::process::exit(1);
        }
    };

    let cors_policy = settings.cors.clone();
    info!("CORS policy: {:?}", cors_policy);
    info!("Server running on port {}", settings.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(cors(&cors_policy))
            .app_data(app_state.clone())
            .configure(routes::configure)
            .service(fs::Files::new("/static", "./static"))
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await
}
