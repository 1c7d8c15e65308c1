//! Read-only projection of an inbound request.

use std::collections::HashMap;

use serde_json::{Map, Value};

/// The externally controlled sub-structures of a request, supplied whole
/// per invocation.
///
/// The gate never mutates a view; everything here is transient and
/// recomputed per request, so concurrent evaluations share no state.
///
/// Absent sub-structures are `None` and always pass validation; absence
/// is never evidence of attack.
#[derive(Debug, Clone, Default)]
pub struct RequestView {
    /// Header name to value. Values that could not be read as strings are
    /// omitted by the boundary layer.
    pub headers: HashMap<String, String>,

    /// Cookie name to value, if the request carried any cookies.
    pub cookies: Option<HashMap<String, String>>,

    /// Query parameter name to value. A value is a string, or an array of
    /// strings when the key was repeated.
    pub query: Option<Map<String, Value>>,

    /// Route parameter name to value. Only string values are checked.
    pub params: Option<Map<String, Value>>,

    /// Parsed request body. Only populated for non-GET methods, and only
    /// inspected when it is a keyed mapping.
    pub body: Option<Value>,
}
