use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::Value;

/// One request as seen by the fixture backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub body: Value,
    pub authorization: Option<String>,
}

#[derive(Clone, Default)]
pub struct Recorder {
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl Recorder {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

pub struct FixtureBackend {
    pub base_url: String,
    pub recorder: Recorder,
}

#[derive(Clone)]
struct FixtureConfig {
    status: u16,
    reply: Value,
    delay: Duration,
}

/// Spawns an in-process backend on an ephemeral port that records every
/// request and answers with a fixed status and payload.
pub async fn spawn_backend(status: u16, reply: Value) -> FixtureBackend {
    spawn_backend_with_delay(status, reply, Duration::ZERO).await
}

/// Same as `spawn_backend`, but the reply is held back for `delay` so tests
/// can overlap requests.
pub async fn spawn_backend_with_delay(
    status: u16,
    reply: Value,
    delay: Duration,
) -> FixtureBackend {
    let _ = env_logger::builder().is_test(true).try_init();
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind fixture listener");
    let base_url = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());
    let recorder = Recorder::default();
    let config = FixtureConfig { status, reply, delay };

    let app_recorder = recorder.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_recorder.clone()))
            .app_data(web::Data::new(config.clone()))
            .default_service(web::route().to(record_and_reply))
    })
    .listen(listener)
    .expect("listen on fixture port")
    .workers(1)
    .run();
    actix_web::rt::spawn(server);

    FixtureBackend { base_url, recorder }
}

async fn record_and_reply(
    req: HttpRequest,
    body: web::Json<Value>,
    recorder: web::Data<Recorder>,
    config: web::Data<FixtureConfig>,
) -> HttpResponse {
    recorder.hits.fetch_add(1, Ordering::SeqCst);
    recorder.requests.lock().unwrap().push(RecordedRequest {
        path: req.path().to_string(),
        body: body.into_inner(),
        authorization: req
            .headers()
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
    });
    if !config.delay.is_zero() {
        tokio::time::sleep(config.delay).await;
    }
    HttpResponse::build(StatusCode::from_u16(config.status).unwrap()).json(config.reply.clone())
}
