use actix_web::{error, error::JsonPayloadError, web, HttpResponse};
use log::warn;

use crate::web::handlers;
use crate::web::models::ErrorResponse;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            .route("/chat", web::post().to(handlers::chat))
    )
    .route("/", web::get().to(handlers::liveness))
    .route("/chat", web::get().to(handlers::chat_page));
}

// Malformed bodies get the same 400 shape as a missing message
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        match &err {
            JsonPayloadError::ContentType => warn!("Rejected chat body: not application/json"),
            JsonPayloadError::Overflow { limit } => {
                warn!("Rejected chat body: larger than {} bytes", limit)
            }
            JsonPayloadError::OverflowKnownLength { length, limit } => {
                warn!("Rejected chat body: {} bytes, limit is {}", length, limit)
            }
            JsonPayloadError::Deserialize(e) => warn!("Rejected chat body: malformed JSON: {}", e),
            other => warn!("Rejected chat body: {}", other),
        }
        let response = HttpResponse::BadRequest()
            .json(ErrorResponse::new(handlers::NO_MESSAGE_ERROR));
        error::InternalError::from_response(err, response).into()
    })
}
