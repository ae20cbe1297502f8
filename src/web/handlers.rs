use actix_web::{web, HttpResponse, Responder};
use tera::Context;
use uuid::Uuid;
use log::{info, warn, error};

use crate::web::models::{ChatRequest, ChatResponse, ErrorResponse};
use crate::AppState;

pub const LIVENESS_MESSAGE: &str = "❄️ Snowball backend is live!";
pub const NO_MESSAGE_ERROR: &str = "No message provided";
pub const UPSTREAM_ERROR: &str = "Failed to get a reply from the assistant";

// Liveness check, never touches the upstream
pub async fn liveness() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(LIVENESS_MESSAGE)
}

// Browser chat page
pub async fn chat_page(data: web::Data<AppState>) -> impl Responder {
    let mut context = Context::new();
    context.insert("assistant_name", &data.assistant_name);
    match data.tera.render("index.html", &context) {
        Ok(html) => HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html),
        Err(e) => {
            error!("Template error: {}", e);
            HttpResponse::InternalServerError().body("Template error")
        }
    }
}

// Chat API endpoint: one user turn in, one trimmed reply out
pub async fn chat(
    data: web::Data<AppState>,
    req: web::Json<ChatRequest>,
) -> impl Responder {
    let request_id = Uuid::new_v4();

    let message = match req.text() {
        Some(message) => message,
        None => {
            warn!("Chat request {} rejected: no usable message", request_id);
            return HttpResponse::BadRequest().json(ErrorResponse::new(NO_MESSAGE_ERROR));
        }
    };

    info!("Chat request {}: {} characters", request_id, message.len());

    match data.model.model.generate_response(message).await {
        Ok(response) => {
            let reply = response.trim();
            if reply.is_empty() {
                error!("Chat request {}: upstream returned an empty reply", request_id);
                return HttpResponse::InternalServerError().json(ErrorResponse::new(UPSTREAM_ERROR));
            }

            info!("Chat reply {}: {}", request_id, reply);
            HttpResponse::Ok().json(ChatResponse {
                reply: reply.to_string(),
            })
        }
        Err(e) => {
            error!("Chat request {}: upstream error: {:#}", request_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(UPSTREAM_ERROR))
        }
    }
}
