//! HTTP semantics helpers.
//!
//! Catalog endpoints only carry a verb string, so the hints advertised for a tool are derived from
//! RFC 9110 method semantics.

use reqwest::Method;
use rmcp::model::ToolAnnotations;

/// Parse a catalog verb (`get`, `Post`, ...) into an HTTP method.
///
/// Returns `None` for strings that are not valid method tokens.
#[must_use]
pub fn parse_method(verb: &str) -> Option<Method> {
    Method::from_bytes(verb.trim().to_ascii_uppercase().as_bytes()).ok()
}

/// Generate MCP tool annotations for an endpoint.
///
/// `title` is the endpoint's human title from the catalog. Every endpoint talks to the remote API,
/// so `openWorldHint` is always set; verbs we can't classify get no other hints.
#[must_use]
pub fn annotations_for_endpoint(verb: &str, title: &str) -> ToolAnnotations {
    let (read_only, destructive, idempotent) = match parse_method(verb) {
        Some(m) if m == Method::GET || m == Method::HEAD || m == Method::OPTIONS => {
            (Some(true), Some(false), Some(true))
        }
        Some(m) if m == Method::POST => (Some(false), Some(false), Some(false)),
        Some(m) if m == Method::PUT || m == Method::DELETE => (Some(false), Some(true), Some(true)),
        // PATCH may or may not be idempotent; do not guess.
        Some(m) if m == Method::PATCH => (Some(false), Some(true), None),
        _ => (None, None, None),
    };

    ToolAnnotations {
        title: (!title.is_empty()).then(|| title.to_string()),
        read_only_hint: read_only,
        destructive_hint: destructive,
        idempotent_hint: idempotent,
        open_world_hint: Some(true),
    }
}

#[cfg(test)]
mod tests {
    use super::{annotations_for_endpoint, parse_method};
    use reqwest::Method;

    #[test]
    fn parse_method_is_case_insensitive() {
        assert_eq!(parse_method("get"), Some(Method::GET));
        assert_eq!(parse_method(" Delete "), Some(Method::DELETE));
        assert_eq!(parse_method("not a verb"), None);
    }

    #[test]
    fn get_is_readonly_and_idempotent() {
        let a = annotations_for_endpoint("get", "Get Location Details");
        assert_eq!(a.title.as_deref(), Some("Get Location Details"));
        assert_eq!(a.read_only_hint, Some(true));
        assert_eq!(a.destructive_hint, Some(false));
        assert_eq!(a.idempotent_hint, Some(true));
        assert_eq!(a.open_world_hint, Some(true));
    }

    #[test]
    fn patch_leaves_idempotence_unknown() {
        let a = annotations_for_endpoint("PATCH", "Update Person");
        assert_eq!(a.read_only_hint, Some(false));
        assert_eq!(a.destructive_hint, Some(true));
        assert_eq!(a.idempotent_hint, None);
    }

    #[test]
    fn unknown_verb_only_sets_open_world() {
        let a = annotations_for_endpoint("PROPFIND", "");
        assert_eq!(a.title, None);
        assert_eq!(a.read_only_hint, None);
        assert_eq!(a.destructive_hint, None);
        assert_eq!(a.idempotent_hint, None);
        assert_eq!(a.open_world_hint, Some(true));
    }
}
