use emalf_core::db::open_db_in_memory;
use emalf_core::{
    HttpIdeaStore, Idea, IdeaStore, IdeaValidationError, SqliteIdeaStore, StoreError, StoreResult,
    DEFAULT_IDEAS, MAX_IDEA_CHARS,
};
use emalf_server::{ApiServer, CorsPolicy};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;

struct FailingStore(StoreError);

impl IdeaStore for FailingStore {
    fn list_all(&mut self) -> StoreResult<Vec<Idea>> {
        Err(self.0.clone())
    }

    fn pick_random(&mut self) -> StoreResult<Idea> {
        Err(self.0.clone())
    }

    fn add(&mut self, _text: &str) -> StoreResult<Idea> {
        Err(self.0.clone())
    }
}

struct RunningServer {
    addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl RunningServer {
    fn start(seed: bool, cors: &str) -> Self {
        Self::spawn(cors, move |server, shutdown| {
            let conn = open_db_in_memory().unwrap();
            let mut store = SqliteIdeaStore::new(&conn);
            if seed {
                store.seed_defaults().unwrap();
            }
            server.serve(&mut store, shutdown).unwrap();
        })
    }

    /// Serves a store that answers every call with `err`.
    fn start_failing(err: StoreError) -> Self {
        Self::spawn("*", move |server, shutdown| {
            server.serve(&mut FailingStore(err), shutdown).unwrap();
        })
    }

    fn spawn(cors: &str, run: impl FnOnce(&ApiServer, &AtomicBool) + Send + 'static) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let (addr_tx, addr_rx) = mpsc::channel();
        let thread_shutdown = Arc::clone(&shutdown);
        let cors = CorsPolicy::parse(cors);

        let handle = std::thread::spawn(move || {
            let server = ApiServer::bind("127.0.0.1:0", cors).unwrap();
            addr_tx.send(server.local_addr().unwrap()).unwrap();
            run(&server, &thread_shutdown);
        });

        let addr = addr_rx.recv().unwrap();
        Self {
            addr,
            shutdown,
            handle: Some(handle),
        }
    }

    fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn client(&self) -> HttpIdeaStore {
        HttpIdeaStore::new(self.base_url()).unwrap()
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[test]
fn http_store_lists_seeded_ideas() {
    let server = RunningServer::start(true, "*");
    let mut store = server.client();

    let ideas = store.list_all().unwrap();
    let texts: Vec<&str> = ideas.iter().map(|idea| idea.text.as_str()).collect();
    assert_eq!(texts, DEFAULT_IDEAS.to_vec());
    assert!(ideas.iter().all(|idea| idea.id.is_some()));
    assert_eq!(store.count().unwrap(), DEFAULT_IDEAS.len());
}

#[test]
fn http_store_add_then_duplicate_then_blank() {
    let server = RunningServer::start(false, "*");
    let mut store = server.client();

    let created = store.add("  Draw a fish  ").unwrap();
    assert_eq!(created.text, "Draw a fish");
    assert!(created.id.is_some());
    assert!(store.list_all().unwrap().contains(&created));

    assert_eq!(
        store.add("Draw a fish").unwrap_err(),
        StoreError::DuplicateIdea("Draw a fish".to_string())
    );
    assert_eq!(
        store.add("   ").unwrap_err(),
        StoreError::Validation(IdeaValidationError::Blank)
    );
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn http_store_random_maps_empty_pool() {
    let server = RunningServer::start(false, "*");
    let mut store = server.client();

    assert_eq!(store.pick_random().unwrap_err(), StoreError::EmptyStore);

    let created = store.add("Draw a cat").unwrap();
    assert_eq!(store.pick_random().unwrap(), created);
}

#[test]
fn server_rejects_overlong_text_with_400() {
    let server = RunningServer::start(false, "*");
    let client = reqwest::blocking::Client::new();

    let response = client
        .post(format!("{}/api/ideas", server.base_url()))
        .json(&serde_json::json!({ "text": "x".repeat(MAX_IDEA_CHARS + 1) }))
        .send()
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().unwrap();
    assert!(body["detail"].as_str().unwrap().contains("limit"));
}

#[test]
fn health_and_banner_endpoints_respond() {
    let server = RunningServer::start(true, "*");
    let client = reqwest::blocking::Client::new();

    let health: serde_json::Value = client
        .get(format!("{}/api/health", server.base_url()))
        .send()
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["ideas_count"], DEFAULT_IDEAS.len());

    let banner: serde_json::Value = client
        .get(format!("{}/api/", server.base_url()))
        .send()
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(banner["message"], "EmalfDraw API is running!");
}

#[test]
fn cors_header_echoes_allowed_origin_only() {
    let server = RunningServer::start(true, "https://draw.example");
    let client = reqwest::blocking::Client::new();

    let allowed = client
        .get(format!("{}/api/ideas", server.base_url()))
        .header("Origin", "https://draw.example")
        .send()
        .unwrap();
    assert_eq!(
        allowed
            .headers()
            .get("access-control-allow-origin")
            .and_then(|value| value.to_str().ok()),
        Some("https://draw.example")
    );

    let denied = client
        .get(format!("{}/api/ideas", server.base_url()))
        .header("Origin", "https://other.example")
        .send()
        .unwrap();
    assert!(denied
        .headers()
        .get("access-control-allow-origin")
        .is_none());

    let preflight = client
        .request(
            reqwest::Method::OPTIONS,
            format!("{}/api/ideas", server.base_url()),
        )
        .header("Origin", "https://draw.example")
        .send()
        .unwrap();
    assert_eq!(preflight.status().as_u16(), 204);
}

#[test]
fn unreachable_server_is_storage_unavailable() {
    let addr = {
        let server = RunningServer::start(false, "*");
        server.addr
    };
    let mut store = HttpIdeaStore::new(format!("http://{addr}")).unwrap();

    assert!(matches!(
        store.list_all().unwrap_err(),
        StoreError::StorageUnavailable(_)
    ));
}

#[test]
fn server_errors_map_to_storage_unavailable() {
    let server =
        RunningServer::start_failing(StoreError::StorageUnavailable("disk detached".to_string()));
    let mut store = server.client();

    assert_eq!(
        store.list_all().unwrap_err(),
        StoreError::StorageUnavailable("HTTP 500: Failed to fetch ideas".to_string())
    );
    assert_eq!(
        store.pick_random().unwrap_err(),
        StoreError::StorageUnavailable("HTTP 500: Failed to fetch random idea".to_string())
    );
    assert_eq!(
        store.add("Draw a fish").unwrap_err(),
        StoreError::StorageUnavailable("HTTP 500: Failed to create idea".to_string())
    );

    let health: serde_json::Value = reqwest::blocking::Client::new()
        .get(format!("{}/api/health", server.base_url()))
        .send()
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(health["status"], "unhealthy");
}

#[test]
fn server_side_rejection_maps_to_validation() {
    let server = RunningServer::start_failing(StoreError::Validation(
        IdeaValidationError::Rejected("contains a link".to_string()),
    ));
    let mut store = server.client();

    assert_eq!(
        store.add("Draw https://x.example").unwrap_err(),
        StoreError::Validation(IdeaValidationError::Rejected(
            "idea text rejected: contains a link".to_string()
        ))
    );
}
