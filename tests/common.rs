use axum::response::IntoResponse;
use axum::{Json, Router, extract::State, routing::post};
use nabla_relay::adapters::telegram::TelegramClient;
use nabla_relay::api::{self, ServiceContainer};
use nabla_relay::config::{Config, LogFormat, RateLimitConfig, ServerConfig, TelegramConfig, TelemetryConfig};
use nabla_relay::services::rate_limit_service::RateLimitService;
use nabla_relay::services::relay_service::RelayService;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, Once};

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("nabla_relay=debug".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).init();
    });
}

/// What the mock Bot API should answer with.
#[derive(Clone, Copy, Debug)]
pub enum ProviderScript {
    Accept { message_id: i64 },
    Reject { description: &'static str },
    Garbage,
}

#[derive(Clone)]
struct MockState {
    script: ProviderScript,
    requests: Arc<Mutex<Vec<Value>>>,
}

/// A local stand-in for the Telegram Bot API, reached through the
/// configurable API base. Records every `sendMessage` body it receives.
#[derive(Clone, Debug)]
pub struct MockTelegram {
    pub url: String,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl MockTelegram {
    pub async fn spawn(script: ProviderScript) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState { script, requests: Arc::clone(&requests) };

        let router = Router::new().route("/{bot}/sendMessage", post(send_message)).with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind mock listener");
        let addr = listener.local_addr().expect("mock listener addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve mock");
        });

        Self { url: format!("http://{addr}"), requests }
    }

    pub fn recorded(&self) -> Vec<Value> {
        self.requests.lock().expect("mock requests lock").clone()
    }
}

async fn send_message(State(state): State<MockState>, Json(body): Json<Value>) -> axum::response::Response {
    state.requests.lock().expect("mock requests lock").push(body);
    match state.script {
        ProviderScript::Accept { message_id } => {
            Json(serde_json::json!({"ok": true, "result": {"message_id": message_id}})).into_response()
        }
        ProviderScript::Reject { description } => {
            Json(serde_json::json!({"ok": false, "error_code": 400, "description": description})).into_response()
        }
        ProviderScript::Garbage => "definitely not json".into_response(),
    }
}

pub fn test_config(bot_token: Option<&str>, chat_id: Option<&str>, api_base: &str) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            trusted_proxies: vec!["127.0.0.1/32".parse().expect("cidr")],
            dev_mode: false,
        },
        telegram: TelegramConfig {
            bot_token: bot_token.map(ToString::to_string),
            chat_id: chat_id.map(ToString::to_string),
            api_base: api_base.to_string(),
        },
        rate_limit: RateLimitConfig { per_second: 10000, burst: 10000 },
        telemetry: TelemetryConfig { log_format: LogFormat::Text, otlp_endpoint: None },
    }
}

#[derive(Debug)]
pub struct TestApp {
    pub server_url: String,
    pub client: reqwest::Client,
    pub telegram: MockTelegram,
}

impl TestApp {
    /// Full app wired to a mock provider that accepts with message id 42.
    pub async fn spawn() -> Self {
        Self::spawn_with(ProviderScript::Accept { message_id: 42 }).await
    }

    pub async fn spawn_with(script: ProviderScript) -> Self {
        let telegram = MockTelegram::spawn(script).await;
        let config = test_config(Some("test-token"), Some("1234"), &telegram.url);
        Self::from_config(config, telegram).await
    }

    pub async fn from_config(config: Config, telegram: MockTelegram) -> Self {
        setup_tracing();

        let provider = Arc::new(TelegramClient::new(&config.telegram));
        let services = ServiceContainer {
            relay_service: RelayService::new(provider, &config),
            rate_limit_service: RateLimitService::new(config.server.trusted_proxies.clone()),
        };
        let router = api::app_router(config, services);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind app listener");
        let addr = listener.local_addr().expect("app listener addr");
        tokio::spawn(async move {
            axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
                .await
                .expect("serve app");
        });

        Self { server_url: format!("http://{addr}"), client: reqwest::Client::new(), telegram }
    }

    pub fn submit_url(&self) -> String {
        format!("{}/api/telegram", self.server_url)
    }

    pub async fn post_submission(&self, body: &Value) -> reqwest::Response {
        self.client.post(self.submit_url()).json(body).send().await.expect("request")
    }
}

/// Returns an address nothing is listening on, for network-fault tests.
pub async fn dead_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind probe listener");
    let addr = listener.local_addr().expect("probe addr");
    drop(listener);
    format!("http://{addr}")
}

pub fn booking_body() -> Value {
    serde_json::json!({
        "type": "booking",
        "user": {"name": "Ali", "whatsapp": "+966 50 123 4567"},
        "product": {
            "name": "اشتراك بريميوم",
            "price": 25,
            "currency": "ريال",
            "category": "اشتراكات",
            "period": "شهري",
            "notes": "تفعيل سريع من فضلك",
            "features": ["دعم فني", "تجديد تلقائي"],
        },
    })
}

pub fn contact_body() -> Value {
    serde_json::json!({
        "type": "contact",
        "user": {"name": "Ali", "whatsapp": "+966 50 123 4567"},
        "message": "Hi",
    })
}
