use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::rewrite::Rewriter;

/// Viewer request as handed over by the edge runtime.
///
/// Only `uri` is interpreted. Every other field (method, querystring,
/// headers, cookies, ...) is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub uri: String,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl Request {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            rest: Map::new(),
        }
    }
}

/// Invocation event; fields other than `request` are ignored
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub request: Request,
}

/// Entry point invoked once per incoming request
pub fn handle(event: Event, rewriter: &Rewriter) -> Request {
    let original = event.request.uri.clone();
    let request = rewriter.rewrite(event.request);

    if request.uri != original {
        debug!(from = %original, to = %request.uri, policy = %rewriter.policy(), "Rewrote uri");
    } else {
        debug!(uri = %original, policy = %rewriter.policy(), "Uri unchanged");
    }

    request
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_handle_preserves_request_fields() {
        let event: Event = serde_json::from_value(json!({
            "version": "1.0",
            "context": { "eventType": "viewer-request" },
            "viewer": { "ip": "198.51.100.11" },
            "request": {
                "method": "GET",
                "uri": "/blog/",
                "querystring": { "page": { "value": "2" } },
                "headers": { "host": { "value": "example.com" } },
                "cookies": {}
            }
        }))
        .unwrap();

        let request = handle(event, &Rewriter::default());
        let out = serde_json::to_value(&request).unwrap();

        assert_eq!(
            out,
            json!({
                "method": "GET",
                "uri": "/blog/index.html",
                "querystring": { "page": { "value": "2" } },
                "headers": { "host": { "value": "example.com" } },
                "cookies": {}
            })
        );
    }

    #[test]
    fn test_handle_leaves_files_alone() {
        let event: Event =
            serde_json::from_value(json!({ "request": { "uri": "/app.js" } })).unwrap();
        let request = handle(event, &Rewriter::default());
        assert_eq!(request, Request::new("/app.js"));
    }

    #[test]
    fn test_missing_uri_is_rejected() {
        let result = serde_json::from_value::<Event>(json!({ "request": { "method": "GET" } }));
        assert!(result.is_err());

        let result = serde_json::from_value::<Event>(json!({ "request": { "uri": 42 } }));
        assert!(result.is_err());
    }
}
