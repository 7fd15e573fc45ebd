//! Request routing for the `/api` surface.
//!
//! # Responsibility
//! - Map method + path onto one idea-store operation.
//! - Translate `StoreError` into HTTP status codes and `{detail}` bodies.
//!
//! # Invariants
//! - Routing is transport-free: no socket or `tiny_http` request types here.
//! - Every response body is JSON (or empty for preflight).

use emalf_core::model::wire::{
    BannerResponse, CreateIdeaRequest, ErrorBody, HealthResponse, IdeaPayload,
};
use emalf_core::{Idea, IdeaStore, StoreError};
use log::error;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static ROOT_ROUTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/api/?$").expect("valid root route"));
static HEALTH_ROUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/api/health/?$").expect("valid health route"));
static IDEAS_ROUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/api/ideas/?$").expect("valid ideas route"));
static RANDOM_IDEA_ROUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/api/ideas/random/?$").expect("valid random route"));

/// HTTP methods the router distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Options,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Root,
    Health,
    Ideas,
    RandomIdea,
}

/// Transport-independent response: status plus optional JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<String>,
}

impl ApiResponse {
    fn json(status: u16, value: &impl Serialize) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self {
                status,
                body: Some(body),
            },
            Err(err) => {
                error!("event=encode_response module=router status=error error={err}");
                Self::detail(500, "Failed to encode response")
            }
        }
    }

    fn detail(status: u16, detail: &str) -> Self {
        let body = ErrorBody {
            detail: detail.to_string(),
        };
        Self {
            status,
            // ErrorBody is a single string field; encoding cannot fail.
            body: serde_json::to_string(&body).ok(),
        }
    }

    fn no_content() -> Self {
        Self {
            status: 204,
            body: None,
        }
    }
}

/// Dispatches one request against `store`.
///
/// `url` may carry a query string; it is ignored.
pub fn handle<S: IdeaStore>(store: &mut S, method: Method, url: &str, body: &[u8]) -> ApiResponse {
    let path = url.split('?').next().unwrap_or_default();
    let Some(route) = resolve(path) else {
        return ApiResponse::detail(404, "Not Found");
    };

    match (route, method) {
        (_, Method::Options) => ApiResponse::no_content(),
        (Route::Root, Method::Get) => ApiResponse::json(
            200,
            &BannerResponse {
                message: "EmalfDraw API is running!".to_string(),
            },
        ),
        (Route::Health, Method::Get) => health(store),
        (Route::Ideas, Method::Get) => list_ideas(store),
        (Route::Ideas, Method::Post) => create_idea(store, body),
        (Route::RandomIdea, Method::Get) => random_idea(store),
        _ => ApiResponse::detail(405, "Method Not Allowed"),
    }
}

fn resolve(path: &str) -> Option<Route> {
    if IDEAS_ROUTE.is_match(path) {
        Some(Route::Ideas)
    } else if RANDOM_IDEA_ROUTE.is_match(path) {
        Some(Route::RandomIdea)
    } else if HEALTH_ROUTE.is_match(path) {
        Some(Route::Health)
    } else if ROOT_ROUTE.is_match(path) {
        Some(Route::Root)
    } else {
        None
    }
}

fn list_ideas<S: IdeaStore>(store: &mut S) -> ApiResponse {
    let ideas = match store.list_all() {
        Ok(ideas) => ideas,
        Err(err) => {
            error!("event=list_ideas module=router status=error error={err}");
            return ApiResponse::detail(500, "Failed to fetch ideas");
        }
    };

    match ideas.iter().map(IdeaPayload::from_idea).collect::<Option<Vec<_>>>() {
        Some(payloads) => ApiResponse::json(200, &payloads),
        None => {
            error!("event=list_ideas module=router status=error error=missing_identity");
            ApiResponse::detail(500, "Failed to fetch ideas")
        }
    }
}

fn random_idea<S: IdeaStore>(store: &mut S) -> ApiResponse {
    match store.pick_random() {
        Ok(idea) => idea_response(&idea, "Failed to fetch random idea"),
        Err(StoreError::EmptyStore) => ApiResponse::detail(404, "No ideas available"),
        Err(err) => {
            error!("event=random_idea module=router status=error error={err}");
            ApiResponse::detail(500, "Failed to fetch random idea")
        }
    }
}

fn create_idea<S: IdeaStore>(store: &mut S, body: &[u8]) -> ApiResponse {
    let request: CreateIdeaRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(err) => {
            return ApiResponse::detail(422, &format!("Invalid request body: {err}"));
        }
    };

    match store.add(&request.text) {
        Ok(idea) => idea_response(&idea, "Failed to create idea"),
        Err(StoreError::Validation(err)) => ApiResponse::detail(400, &err.to_string()),
        Err(StoreError::DuplicateIdea(_)) => {
            ApiResponse::detail(409, "This idea already exists")
        }
        Err(err) => {
            error!("event=create_idea module=router status=error error={err}");
            ApiResponse::detail(500, "Failed to create idea")
        }
    }
}

fn health<S: IdeaStore>(store: &mut S) -> ApiResponse {
    let report = match store.count() {
        Ok(ideas_count) => HealthResponse::Healthy {
            database: "connected".to_string(),
            ideas_count,
        },
        Err(err) => HealthResponse::Unhealthy {
            error: err.to_string(),
        },
    };
    ApiResponse::json(200, &report)
}

fn idea_response(idea: &Idea, failure: &str) -> ApiResponse {
    match IdeaPayload::from_idea(idea) {
        Some(payload) => ApiResponse::json(200, &payload),
        None => {
            error!("event=encode_idea module=router status=error error=missing_identity");
            ApiResponse::detail(500, failure)
        }
    }
}
