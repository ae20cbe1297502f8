pub mod handlers;
pub mod models;
pub mod routes;

use actix_cors::Cors;
use actix_web::http::{header, Method};

use crate::config::CorsPolicy;

pub fn cors(policy: &CorsPolicy) -> Cors {
    let cors = match policy {
        CorsPolicy::Any => Cors::default().allow_any_origin(),
        CorsPolicy::Origin(origin) => Cors::default().allowed_origin(origin),
    };

    cors.allowed_methods(vec![Method::GET, Method::POST])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600)
}
