use actix_multipart::Multipart;
use actix_web::{
    get, http::header, middleware, post, route, web, HttpRequest, HttpResponse, Responder,
};
use log::{info, warn};
use question_store::{parse, Question};
use serde::{Deserialize, Serialize};
use serde_json::json;
use snafu::prelude::*;

use crate::service::upload::read_file_field;
use crate::service::*;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub questions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetTypeRequest {
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: String,
}

#[derive(Debug, Serialize)]
pub struct SetTypeResponse {
    pub message: String,
    pub question: Question,
}

/// The CORS headers added to every response, errors included.
pub fn cors_headers() -> middleware::DefaultHeaders {
    middleware::DefaultHeaders::new()
        .add((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .add((header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"))
        .add((header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"))
}

/// Rejects malformed JSON bodies with a structured 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        let message = err.to_string();
        warn!("Rejecting request body: {}", message);
        ServiceError::InvalidBody { message }.into()
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(upload)
        .service(upload_preflight)
        .service(get_questions)
        .service(set_type)
        .service(health);
}

#[post("/upload")]
async fn upload(data: web::Data<AppState>, payload: Multipart) -> ServiceResult<HttpResponse> {
    let file = read_file_field(payload, data.max_upload_bytes).await?;
    info!(
        "Received export {:?} ({} bytes)",
        file.filename,
        file.content.len()
    );
    let store = parse(&file.content, &data.options).context(ParsingCsvSnafu {})?;
    let questions = data.replace(store)?;
    Ok(HttpResponse::Ok().json(UploadResponse {
        message: "CSV loaded".to_string(),
        questions,
    }))
}

#[route("/upload", method = "OPTIONS")]
async fn upload_preflight() -> impl Responder {
    HttpResponse::NoContent().finish()
}

#[get("/questions")]
async fn get_questions(data: web::Data<AppState>) -> ServiceResult<HttpResponse> {
    let store = data.get_all()?;
    Ok(HttpResponse::Ok().json(store))
}

#[post("/questions/set-type")]
async fn set_type(
    data: web::Data<AppState>,
    req: web::Json<SetTypeRequest>,
) -> ServiceResult<HttpResponse> {
    let req = req.into_inner();
    let question = data.set_type(&req.question, &req.question_type)?;
    info!("Type of {:?} set to {:?}", req.question, req.question_type);
    Ok(HttpResponse::Ok().json(SetTypeResponse {
        message: format!("Type set for '{}'", req.question),
        question,
    }))
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "qtagger"
    }))
}
