// Loopback HTTP server answering every request with one canned response
use std::sync::{Arc, Mutex};

use actix_web::http::StatusCode;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

pub struct CannedServer {
    pub base_url: String,
    pub seen: Arc<Mutex<Vec<SeenRequest>>>,
}

// Must run inside an actix runtime (`#[actix_web::test]`)
pub fn serve(status: u16, body: &'static str) -> CannedServer {
    let seen: Arc<Mutex<Vec<SeenRequest>>> = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();

    let server = HttpServer::new(move || {
        let recorder = recorder.clone();
        App::new().default_service(web::to(move |req: HttpRequest, payload: web::Bytes| {
            let recorder = recorder.clone();
            async move {
                recorder.lock().unwrap().push(SeenRequest {
                    path: req.path().to_string(),
                    authorization: req
                        .headers()
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string),
                    body: String::from_utf8_lossy(&payload).into_owned(),
                });
                HttpResponse::build(StatusCode::from_u16(status).unwrap())
                    .content_type("application/json")
                    .body(body)
            }
        }))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());

    CannedServer {
        base_url: format!("http://{}", addr),
        seen,
    }
}
