use axum::{
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, DefaultBodyLimit, Multipart, State,
    },
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;
use crate::storage::sanitize_filename;
use crate::workflow::RecommendationRequest;

const MISSING_RECOMMEND_FIELDS: &str = "Eksik veri: topic, gender veya location gerekli.";
const MISSING_UPLOAD_FIELDS: &str = "Eksik veri: image, gender veya location gerekli.";

pub fn create_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/recommend", post(recommend))
        .route(
            "/upload_image",
            post(upload_image).layer(DefaultBodyLimit::max(state.max_upload_bytes)),
        )
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug, Default, Deserialize)]
struct RecommendBody {
    topic: Option<String>,
    gender: Option<String>,
    location: Option<String>,
}

/// Trimmed value, `None` when absent or blank
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// An absent location takes the default; a blank one is rejected
fn resolve_location(value: Option<String>, default_location: &str) -> Option<String> {
    match value {
        None => Some(default_location.to_string()),
        Some(location) => non_empty(Some(location)),
    }
}

impl RecommendBody {
    fn into_request(self, default_location: &str) -> Result<RecommendationRequest, AppError> {
        let missing = || AppError::validation(MISSING_RECOMMEND_FIELDS);
        Ok(RecommendationRequest {
            topic: non_empty(self.topic).ok_or_else(missing)?,
            gender: non_empty(self.gender).ok_or_else(missing)?,
            location: resolve_location(self.location, default_location).ok_or_else(missing)?,
        })
    }
}

async fn recommend(
    State(state): State<AppState>,
    payload: Result<Json<RecommendBody>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let body = payload
        .map_err(|e| {
            debug!("Unreadable /recommend body: {}", e);
            AppError::validation(MISSING_RECOMMEND_FIELDS)
        })?
        .0;
    let request = body.into_request(&state.default_location)?;

    let weather = state.weather.fetch_weather(&request.location).await;

    let final_answer = state
        .workflow
        .recommend(&request, &weather)
        .await
        .map_err(|e| AppError::upstream("Beklenmeyen bir hata", e))?;

    Ok(Json(json!({ "final_answer": final_answer })))
}

struct UploadForm {
    gender: String,
    location: String,
    filename: String,
    image: Vec<u8>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart, default_location: &str) -> Result<Self, AppError> {
        let mut gender = None;
        let mut location = None;
        let mut image = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::validation(format!("Geçersiz form verisi: {}", e.body_text())))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "gender" | "location" => {
                    let text = field.text().await.map_err(|e| {
                        AppError::validation(format!("Geçersiz form verisi: {}", e.body_text()))
                    })?;
                    if name == "gender" {
                        gender = Some(text);
                    } else {
                        location = Some(text);
                    }
                }
                "image" => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await.map_err(|e| {
                        AppError::validation(format!("Geçersiz form verisi: {}", e.body_text()))
                    })?;
                    image = Some((filename, bytes.to_vec()));
                }
                other => debug!("Ignoring form field {:?}", other),
            }
        }

        let missing = || AppError::validation(MISSING_UPLOAD_FIELDS);
        // A directory-only filename would otherwise name the `images/` prefix itself
        let (filename, image) = image
            .map(|(filename, bytes)| (sanitize_filename(&filename).trim().to_string(), bytes))
            .filter(|(filename, _)| !filename.is_empty())
            .ok_or_else(missing)?;

        Ok(Self {
            gender: non_empty(gender).ok_or_else(missing)?,
            location: resolve_location(location, default_location).ok_or_else(missing)?,
            filename,
            image,
        })
    }
}

async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, AppError> {
    let multipart = multipart.map_err(|e| {
        debug!("Unreadable /upload_image body: {}", e);
        AppError::validation(MISSING_UPLOAD_FIELDS)
    })?;
    let form = UploadForm::read(multipart, &state.default_location).await?;

    let stored = state
        .image_store
        .store_image(form.image, &form.filename)
        .await
        .map_err(|e| AppError::upstream("Resim yükleme hatası", e))?;
    debug!(
        "Stored {} as {} ({})",
        form.filename, stored.object_name, stored.content_type
    );

    let weather = state.weather.fetch_weather(&form.location).await;
    let image_analysis = state
        .image_describer
        .describe_image(&stored.public_url, &weather, &form.gender)
        .await;

    Ok(Json(json!({ "image_analysis": image_analysis })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::agents::roles::{fashion_stylist, style_researcher};
    use crate::agent::{
        AgentPipeline, ChatMessage, CompletionOptions, LlmError, PipelineError, Stage,
        StatelessLLMInterface,
    };
    use crate::storage::{content_type_for, ImageStore, StorageError, StoredImage};
    use crate::vision::{ImageDescriber, ANALYSIS_FAILED};
    use crate::weather::{WeatherProvider, WeatherReport, WeatherSummary};
    use crate::workflow::RecommendationWorkflow;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    type Events = Arc<Mutex<Vec<String>>>;

    struct FakeWeather {
        summary: WeatherSummary,
        events: Events,
    }

    #[async_trait]
    impl WeatherProvider for FakeWeather {
        async fn fetch_weather(&self, city: &str) -> WeatherSummary {
            self.events.lock().unwrap().push(format!("weather:{}", city));
            self.summary.clone()
        }
    }

    struct FakeStore {
        fail: bool,
        events: Events,
    }

    #[async_trait]
    impl ImageStore for FakeStore {
        async fn store_image(&self, content: Vec<u8>, filename: &str) -> Result<StoredImage, StorageError> {
            self.events
                .lock()
                .unwrap()
                .push(format!("store:{}:{}", filename, content.len()));
            if self.fail {
                return Err(StorageError::Status {
                    status: 403,
                    body: "permission denied".to_string(),
                });
            }
            Ok(StoredImage {
                object_name: format!("images/{}", filename),
                content_type: content_type_for(filename),
                public_url: format!("https://storage.example/bucket/images/{}", filename),
            })
        }
    }

    struct FakePipeline {
        fail: bool,
        events: Events,
    }

    #[async_trait]
    impl AgentPipeline for FakePipeline {
        async fn run_pipeline(&self, stages: Vec<Stage>) -> Result<String, PipelineError> {
            let mut events = self.events.lock().unwrap();
            for stage in &stages {
                events.push(format!("stage:{}:{}", stage.role.name, stage.task.description));
            }
            if self.fail {
                return Err(PipelineError::EmptyPipeline);
            }
            Ok("Lacivert takım elbise, beyaz gömlek ve kahverengi deri ayakkabı.".to_string())
        }
    }

    struct FakeVisionLLM {
        fail: bool,
        events: Events,
    }

    #[async_trait]
    impl StatelessLLMInterface for FakeVisionLLM {
        async fn chat_completion(
            &self,
            _messages: Vec<ChatMessage>,
            system: Option<&str>,
            _options: CompletionOptions,
        ) -> Result<String, LlmError> {
            self.events
                .lock()
                .unwrap()
                .push(format!("vision:{}", system.unwrap_or_default()));
            if self.fail {
                return Err(LlmError::InvalidResponse("boom".to_string()));
            }
            Ok("Gri pantolon ile uyumlu.".to_string())
        }
    }

    struct Fixture {
        weather: WeatherSummary,
        store_fails: bool,
        pipeline_fails: bool,
        vision_fails: bool,
    }

    impl Default for Fixture {
        fn default() -> Self {
            Self {
                weather: WeatherSummary::Report(WeatherReport {
                    city: "Ankara".to_string(),
                    temperature_celsius: 15.0,
                    description: "açık".to_string(),
                    humidity_percent: 40.0,
                    wind_speed_mps: 3.0,
                }),
                store_fails: false,
                pipeline_fails: false,
                vision_fails: false,
            }
        }
    }

    impl Fixture {
        fn build(self) -> (Router, Events) {
            let events: Events = Arc::default();
            let pipeline = Arc::new(FakePipeline {
                fail: self.pipeline_fails,
                events: events.clone(),
            });
            let state = AppState {
                weather: Arc::new(FakeWeather {
                    summary: self.weather,
                    events: events.clone(),
                }),
                image_store: Arc::new(FakeStore {
                    fail: self.store_fails,
                    events: events.clone(),
                }),
                image_describer: Arc::new(ImageDescriber::new(
                    Arc::new(FakeVisionLLM {
                        fail: self.vision_fails,
                        events: events.clone(),
                    }),
                    1000,
                )),
                workflow: Arc::new(RecommendationWorkflow::new(
                    pipeline,
                    style_researcher(vec![]),
                    fashion_stylist(),
                )),
                default_location: "İstanbul".to_string(),
                max_upload_bytes: 1024 * 1024,
            };
            (create_routes(state.clone()).with_state(state), events)
        }
    }

    async fn post_json(app: Router, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/recommend")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, request).await
    }

    const BOUNDARY: &str = "clothing-gourmet-boundary";

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a [u8]),
    }

    async fn post_multipart(app: Router, parts: &[Part<'_>]) -> (StatusCode, Value) {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n", name, value)
                            .as_bytes(),
                    );
                }
                Part::File(name, filename, data) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n",
                            name, filename
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(data);
                    body.extend_from_slice(b"\r\n");
                }
            }
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/upload_image")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        send(app, request).await
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn recommend_business_meeting_in_ankara() {
        let (app, events) = Fixture::default().build();

        let (status, body) = post_json(
            app,
            r#"{"topic":"iş toplantısı","gender":"erkek","location":"Ankara"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["final_answer"].as_str().unwrap().contains("takım elbise"));

        let events = events.lock().unwrap();
        assert_eq!(events[0], "weather:Ankara");
        assert_eq!(
            events[1],
            "stage:Stil Araştırmacısı:Etkinlik: iş toplantısı, Cinsiyet: erkek, Hava Durumu: \
             Ankara için hava durumu: 15°C, açık, Nem: 40%, Rüzgar Hızı: 3 m/s."
        );
        assert!(events[2].starts_with("stage:Moda Stilisti:"));
    }

    #[tokio::test]
    async fn recommend_with_empty_topic_is_rejected_without_outbound_calls() {
        let (app, events) = Fixture::default().build();

        let (status, body) = post_json(app, r#"{"topic":"","gender":"kadın"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Eksik veri: topic, gender veya location gerekli." }));
        assert!(events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn recommend_rejects_blank_gender_and_blank_location() {
        let (app, _) = Fixture::default().build();
        let (status, _) = post_json(app, r#"{"topic":"düğün","gender":"   "}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (app, _) = Fixture::default().build();
        let (status, _) =
            post_json(app, r#"{"topic":"düğün","gender":"kadın","location":" "}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn recommend_rejects_malformed_json_with_json_error() {
        let (app, events) = Fixture::default().build();
        let (status, body) = post_json(app, "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        assert!(events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn recommend_defaults_location_and_trims_fields() {
        let (app, events) = Fixture::default().build();

        let (status, _) = post_json(app, r#"{"topic":"  piknik ","gender":" kadın "}"#).await;

        assert_eq!(status, StatusCode::OK);
        let events = events.lock().unwrap();
        assert_eq!(events[0], "weather:İstanbul");
        assert!(events[1].contains("Etkinlik: piknik, Cinsiyet: kadın,"));
    }

    #[tokio::test]
    async fn recommend_survives_weather_outage() {
        let (app, events) = Fixture {
            weather: WeatherSummary::Unavailable {
                error: "Hava durumu API hatası: operation timed out".to_string(),
            },
            ..Default::default()
        }
        .build();

        let (status, body) =
            post_json(app, r#"{"topic":"konser","gender":"erkek","location":"İzmir"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["final_answer"].is_string());
        assert!(events.lock().unwrap()[1].ends_with(
            "Hava Durumu: Hava durumu alınamadı: Hava durumu API hatası: operation timed out"
        ));
    }

    #[tokio::test]
    async fn recommend_pipeline_failure_is_500() {
        let (app, _) = Fixture {
            pipeline_fails: true,
            ..Default::default()
        }
        .build();

        let (status, body) =
            post_json(app, r#"{"topic":"konser","gender":"erkek"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Beklenmeyen bir hata: "));
        assert!(body.get("final_answer").is_none());
    }

    #[tokio::test]
    async fn upload_stores_then_analyses_with_form_location() {
        let (app, events) = Fixture::default().build();

        let (status, body) = post_multipart(
            app,
            &[
                Part::Text("gender", "erkek"),
                Part::Text("location", "Ankara"),
                Part::File("image", "shirt.png", b"PNGDATA"),
            ],
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "image_analysis": "Gri pantolon ile uyumlu." }));

        let events = events.lock().unwrap();
        assert_eq!(events[0], "store:shirt.png:7");
        assert_eq!(events[1], "weather:Ankara");
        assert!(events[2].starts_with("vision:") && events[2].contains("Ankara için hava durumu"));
    }

    #[tokio::test]
    async fn upload_without_image_is_rejected_before_storage() {
        let (app, events) = Fixture::default().build();

        let (status, body) = post_multipart(app, &[Part::Text("gender", "kadın")]).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Eksik veri: image, gender veya location gerekli." }));
        assert!(events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn upload_with_directory_only_filename_is_rejected_before_storage() {
        for filename in ["shirts/", "dolap/yaz/", "  "] {
            let (app, events) = Fixture::default().build();

            let (status, body) = post_multipart(
                app,
                &[Part::Text("gender", "erkek"), Part::File("image", filename, b"PNGDATA")],
            )
            .await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "filename {:?}", filename);
            assert_eq!(body, json!({ "error": "Eksik veri: image, gender veya location gerekli." }));
            assert!(events.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn upload_stores_only_the_last_path_component() {
        let (app, events) = Fixture::default().build();

        let (status, _) = post_multipart(
            app,
            &[Part::Text("gender", "erkek"), Part::File("image", "dolap/gomlek.png", b"PNG")],
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(events.lock().unwrap()[0], "store:gomlek.png:3");
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected_with_json_error() {
        let (app, events) = Fixture::default().build();
        let image = vec![0u8; 2 * 1024 * 1024];

        let (status, body) = post_multipart(
            app,
            &[Part::Text("gender", "erkek"), Part::File("image", "huge.png", &image)],
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Geçersiz form verisi: "));
        assert!(events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn upload_without_gender_is_rejected() {
        let (app, events) = Fixture::default().build();

        let (status, _) =
            post_multipart(app, &[Part::File("image", "shirt.png", b"PNGDATA")]).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn upload_still_analyses_when_weather_fails() {
        let (app, _) = Fixture {
            weather: WeatherSummary::Unavailable {
                error: "Hava durumu API hatası: 401".to_string(),
            },
            ..Default::default()
        }
        .build();

        let (status, body) = post_multipart(
            app,
            &[Part::Text("gender", "kadın"), Part::File("image", "elbise.jpg", b"JPEG")],
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(!body["image_analysis"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn upload_vision_failure_returns_fallback_text() {
        let (app, _) = Fixture {
            vision_fails: true,
            ..Default::default()
        }
        .build();

        let (status, body) = post_multipart(
            app,
            &[Part::Text("gender", "kadın"), Part::File("image", "elbise.jpg", b"JPEG")],
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["image_analysis"], ANALYSIS_FAILED);
    }

    #[tokio::test]
    async fn upload_storage_failure_is_500() {
        let (app, events) = Fixture {
            store_fails: true,
            ..Default::default()
        }
        .build();

        let (status, body) = post_multipart(
            app,
            &[Part::Text("gender", "erkek"), Part::File("image", "shirt.png", b"PNGDATA")],
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Resim yükleme hatası: "));
        assert_eq!(events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (app, _) = Fixture::default().build();
        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
