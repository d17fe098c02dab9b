use log::{debug, info};

use actix_web::{http::StatusCode, middleware, web, App, HttpResponse, HttpServer, ResponseError};
use question_store::*;
use serde_json::json;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::sync::{Mutex, MutexGuard};

pub mod routes;
mod upload;

#[derive(Debug, Snafu)]
pub enum ServiceError {
    #[snafu(display("No file part"))]
    MissingFile {},
    #[snafu(display("No selected file"))]
    EmptyFilename {},
    #[snafu(display("The uploaded file exceeds the limit of {limit} bytes"))]
    UploadTooLarge { limit: usize },
    #[snafu(display("Could not read the uploaded form: {source}"))]
    ReadingMultipart {
        source: actix_multipart::MultipartError,
    },
    #[snafu(display("Could not read the CSV file: {source}"))]
    ParsingCsv { source: ReshapeError },
    #[snafu(display("Question not found"))]
    QuestionNotFound { question: String },
    #[snafu(display("Invalid request body: {message}"))]
    InvalidBody { message: String },
    #[snafu(display("The question store is unavailable"))]
    StorePoisoned {},

    #[snafu(display("Error opening file {path}"))]
    OpeningInput { source: std::io::Error, path: String },
    #[snafu(display("Error writing to {path}"))]
    WritingOutput { source: std::io::Error, path: String },
    #[snafu(display("Error serializing the questions"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Could not listen on {host}:{port}"))]
    Binding {
        source: std::io::Error,
        host: String,
        port: u16,
    },
    #[snafu(display("The server stopped with an error"))]
    Serving { source: std::io::Error },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::MissingFile {}
            | ServiceError::EmptyFilename {}
            | ServiceError::ReadingMultipart { .. }
            | ServiceError::ParsingCsv { .. }
            | ServiceError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            ServiceError::UploadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ServiceError::QuestionNotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

/// The state shared by all the workers of the service.
///
/// Every access to the questions goes through the same lock: an upload replacing the store
/// cannot interleave with a read or an annotation.
pub struct AppState {
    store: Mutex<QuestionStore>,
    pub options: ParseOptions,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(store: QuestionStore, options: ParseOptions, max_upload_bytes: usize) -> AppState {
        AppState {
            store: Mutex::new(store),
            options,
            max_upload_bytes,
        }
    }

    fn lock(&self) -> ServiceResult<MutexGuard<'_, QuestionStore>> {
        self.store.lock().ok().context(StorePoisonedSnafu {})
    }

    /// Replaces all the questions and returns the new question texts.
    pub fn replace(&self, store: QuestionStore) -> ServiceResult<Vec<String>> {
        let keys: Vec<String> = store.keys().map(|k| k.to_string()).collect();
        let mut current = self.lock()?;
        debug!(
            "replace: {} questions -> {} questions",
            current.len(),
            store.len()
        );
        *current = store;
        Ok(keys)
    }

    /// A copy of the current questions.
    pub fn get_all(&self) -> ServiceResult<QuestionStore> {
        Ok(self.lock()?.clone())
    }

    pub fn set_type(&self, question: &str, question_type: &str) -> ServiceResult<Question> {
        let mut store = self.lock()?;
        let updated = store
            .set_type(question, question_type)
            .ok()
            .context(QuestionNotFoundSnafu { question })?;
        Ok(updated.clone())
    }
}

/// Reads an export from the disk.
pub fn load_questions(path: &str, options: &ParseOptions) -> ServiceResult<QuestionStore> {
    info!("Attempting to read export {:?}", path);
    let content = fs::read(path).context(OpeningInputSnafu { path })?;
    parse(&content, options).context(ParsingCsvSnafu {})
}

/// Writes the questions in JSON format to a file, or to the standard output with `stdout`.
pub fn write_questions(store: &QuestionStore, out: &str) -> ServiceResult<()> {
    let pretty = serde_json::to_string_pretty(store).context(SerializingJsonSnafu {})?;
    if out == "stdout" {
        println!("{}", pretty);
    } else {
        info!("Writing {} questions to {:?}", store.len(), out);
        fs::write(out, pretty).context(WritingOutputSnafu { path: out })?;
    }
    Ok(())
}

pub async fn serve(state: AppState, host: &str, port: u16) -> ServiceResult<()> {
    let data = web::Data::new(state);
    info!("Listening on http://{}:{}", host, port);
    HttpServer::new(move || {
        App::new()
            .wrap(routes::cors_headers())
            .wrap(middleware::Logger::default())
            .app_data(data.clone())
            .app_data(routes::json_config())
            .configure(routes::configure)
    })
    .bind((host, port))
    .context(BindingSnafu { host, port })?
    .run()
    .await
    .context(ServingSnafu {})
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "QID1,QID2\nAre you 18+?,Favorite color?\nYes,Blue\nNo,Red\n";

    fn loaded_state() -> AppState {
        let store = parse(EXPORT.as_bytes(), &ParseOptions::default()).unwrap();
        AppState::new(store, ParseOptions::default(), 1024)
    }

    #[test]
    fn replace_returns_keys_in_order() {
        let state = AppState::new(QuestionStore::new(), ParseOptions::default(), 1024);
        let store = parse(EXPORT.as_bytes(), &ParseOptions::default()).unwrap();
        let keys = state.replace(store).unwrap();
        assert_eq!(keys, vec!["Are you 18+?", "Favorite color?"]);
        assert_eq!(state.get_all().unwrap().len(), 2);
    }

    #[test]
    fn replace_discards_previous_annotations() {
        let state = loaded_state();
        state.set_type("Are you 18+?", "boolean").unwrap();
        let store = parse(EXPORT.as_bytes(), &ParseOptions::default()).unwrap();
        state.replace(store).unwrap();
        assert_eq!(
            state.get_all().unwrap().get("Are you 18+?").unwrap().question_type,
            None
        );
    }

    #[test]
    fn set_type_unknown_question() {
        let state = loaded_state();
        let before = state.get_all().unwrap();
        let err = state.set_type("Nope?", "likert").unwrap_err();
        assert!(matches!(err, ServiceError::QuestionNotFound { .. }));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Question not found");
        assert_eq!(state.get_all().unwrap(), before);
    }

    #[test]
    fn snapshot_is_detached_from_the_store() {
        let state = loaded_state();
        let snapshot = state.get_all().unwrap();
        state.set_type("Favorite color?", "multiple_choice").unwrap();
        assert_eq!(snapshot.get("Favorite color?").unwrap().question_type, None);
    }

    #[test]
    fn status_codes() {
        assert_eq!(
            ServiceError::MissingFile {}.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::ParsingCsv {
                source: ReshapeError::EmptyInput
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::UploadTooLarge { limit: 1 }.status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ServiceError::StorePoisoned {}.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn load_missing_file() {
        let err = load_questions("/nonexistent/export.csv", &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, ServiceError::OpeningInput { .. }));
    }

    #[test]
    fn load_then_write_questions() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("export.csv");
        fs::write(&input, EXPORT).unwrap();

        let store = load_questions(input.to_str().unwrap(), &ParseOptions::default()).unwrap();
        assert_eq!(
            store,
            parse(EXPORT.as_bytes(), &ParseOptions::default()).unwrap()
        );

        let out = dir.path().join("questions.json");
        write_questions(&store, out.to_str().unwrap()).unwrap();
        let written = fs::read_to_string(&out).unwrap();
        let read_back: QuestionStore = serde_json::from_str(&written).unwrap();
        assert_eq!(read_back, store);
        let keys: Vec<&str> = read_back.questions().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Are you 18+?", "Favorite color?"]);
    }

    #[test]
    fn load_rejects_empty_export() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.csv");
        fs::write(&input, "").unwrap();
        let err = load_questions(input.to_str().unwrap(), &ParseOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::ParsingCsv {
                source: ReshapeError::EmptyInput
            }
        ));
    }
}
