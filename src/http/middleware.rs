//! Request sanitizer middleware.
//!
//! Projects the externally controlled parts of a request into a
//! [`RequestView`], evaluates the gate, and either rejects with a fixed
//! 400 response or hands the request on unchanged.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::{to_bytes, Body},
    extract::{ConnectInfo, FromRequestParts, RawPathParams, State},
    http::{header, request::Parts, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};

use crate::observability::metrics;
use crate::sanitize::{RequestGate, RequestView, Verdict};

/// State shared by the sanitizer middleware.
#[derive(Clone)]
pub struct SanitizerState {
    pub gate: Arc<RequestGate>,
    pub enabled: bool,
    pub max_body_bytes: usize,
}

/// Middleware function gating every request on the sanitizer verdict.
pub async fn sanitize_middleware(
    State(state): State<SanitizerState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !state.enabled {
        return next.run(request).await;
    }

    let start_time = Instant::now();
    let (mut parts, body) = request.into_parts();
    let method_str = parts.method.to_string();

    // Route params are only present once routing has happened; a request
    // without them (e.g. one headed for the fallback) simply has no
    // params to check.
    let params = RawPathParams::from_request_parts(&mut parts, &()).await.ok();

    // The body is only material for non-GET methods. Buffer it so it can
    // be inspected and then handed downstream unchanged.
    let (body, body_bytes) = if parts.method != Method::GET {
        match to_bytes(body, state.max_body_bytes).await {
            Ok(bytes) => (Body::from(bytes.clone()), Some(bytes)),
            Err(_) => {
                metrics::record_request(&method_str, 413, start_time);
                return (StatusCode::PAYLOAD_TOO_LARGE, "payload too large").into_response();
            }
        }
    } else {
        (body, None)
    };

    let view = build_view(&parts, params.as_ref(), body_bytes.as_deref());
    let client = addr.ip().to_string();

    if state.gate.evaluate(&view, &parts.method, Some(&client)) == Verdict::Invalid {
        metrics::record_request(&method_str, 400, start_time);
        return (StatusCode::BAD_REQUEST, "bad request").into_response();
    }

    let response = next.run(Request::from_parts(parts, body)).await;
    metrics::record_request(&method_str, response.status().as_u16(), start_time);
    response
}

/// Project the externally controlled request parts into a view.
///
/// Shapes the core cannot classify are omitted rather than rejected:
/// non-UTF-8 header values, bodies that are not JSON, and so on. Only a
/// confirmed forbidden character rejects a request.
fn build_view(parts: &Parts, params: Option<&RawPathParams>, body: Option<&[u8]>) -> RequestView {
    let mut headers = HashMap::new();
    for (name, value) in parts.headers.iter() {
        if let Ok(value) = value.to_str() {
            headers.insert(name.as_str().to_string(), value.to_string());
        }
    }

    let cookies = parts
        .headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(parse_cookies);

    let query = parts.uri.query().map(parse_query);

    let params = params.and_then(|params| {
        let map: Map<String, Value> = params
            .iter()
            .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
            .collect();
        if map.is_empty() {
            None
        } else {
            Some(map)
        }
    });

    let body = body
        .filter(|bytes| !bytes.is_empty())
        .and_then(|bytes| serde_json::from_slice::<Value>(bytes).ok());

    RequestView {
        headers,
        cookies,
        query,
        params,
        body,
    }
}

/// Parse a `Cookie` header into name/value pairs.
///
/// Surrounding double quotes on values are dropped, matching what cookie
/// middleware in common frameworks hands to applications.
fn parse_cookies(raw: &str) -> HashMap<String, String> {
    raw.split(';')
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

/// Parse a query string, collecting repeated keys into arrays.
fn parse_query(raw: &str) -> Map<String, Value> {
    let mut query = Map::new();
    for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
        let value = Value::String(value.into_owned());
        match query.entry(key.into_owned()) {
            serde_json::map::Entry::Vacant(slot) => {
                slot.insert(value);
            }
            serde_json::map::Entry::Occupied(mut slot) => match slot.get_mut() {
                Value::Array(items) => items.push(value),
                existing => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
            },
        }
    }
    query
}
