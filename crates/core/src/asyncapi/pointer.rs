//! In-document `$ref` resolution.
//!
//! References are JSON-Pointer fragments (`#/channels/test/messages/Foo`).
//! Anything that does not start with `#` never resolves.

use serde_json::Value;

/// Resolve `reference` against `root`.
///
/// Returns `None` when the reference does not start with `#`, when a segment
/// is missing, or when a non-container node is reached with segments left.
/// A bare `#` resolves to `root` itself.
pub fn resolve<'a>(reference: &str, root: &'a Value) -> Option<&'a Value> {
    let path = reference.strip_prefix('#')?;
    let path = path.strip_prefix('/').unwrap_or(path);
    if path.is_empty() {
        return Some(root);
    }

    path.split('/').try_fold(root, |node, segment| {
        let key = unescape_segment(segment);
        match node {
            Value::Object(map) => map.get(key.as_str()),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    })
}

/// Decode `~1` to `/` first, then `~0` to `~`, so `~01` stays `~1`.
fn unescape_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// Extract the `$ref` string from a reference object, if the node is one.
pub fn reference_of(node: &Value) -> Option<&str> {
    node.get("$ref").and_then(Value::as_str)
}

/// Follow `node` through one level of `$ref` if it is a reference object.
///
/// Inline nodes are returned as-is; an unresolvable reference yields `None`.
pub fn follow<'a>(node: &'a Value, root: &'a Value) -> Option<&'a Value> {
    match reference_of(node) {
        Some(reference) => resolve(reference, root),
        None => Some(node),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "asyncapi": "3.0.0",
            "channels": {
                "test": {
                    "address": "/test/{id}",
                    "messages": {
                        "TestReceive": { "payload": { "type": "array" } }
                    }
                },
                "a/b": { "title": "slash" },
                "m~n": { "title": "tilde" },
                "~1": { "title": "literal tilde one" }
            },
            "list": [ { "name": "first" }, { "name": "second" } ]
        })
    }

    #[test]
    fn test_resolves_existing_message() {
        let doc = document();
        let result = resolve("#/channels/test/messages/TestReceive", &doc);
        assert_eq!(result, Some(&doc["channels"]["test"]["messages"]["TestReceive"]));
    }

    #[test]
    fn test_missing_path_is_none() {
        let doc = document();
        assert!(resolve("#/channels/invalid/path", &doc).is_none());
    }

    #[test]
    fn test_root_reference() {
        let doc = document();
        assert_eq!(resolve("#", &doc), Some(&doc));
        assert_eq!(resolve("#/", &doc), Some(&doc));
    }

    #[test]
    fn test_invalid_prefix_is_none() {
        let doc = document();
        assert!(resolve("", &doc).is_none());
        assert!(resolve("notaref", &doc).is_none());
        assert!(resolve("invalid#/reference", &doc).is_none());
    }

    #[test]
    fn test_escaped_segments() {
        let doc = document();
        assert_eq!(
            resolve("#/channels/a~1b/title", &doc),
            Some(&json!("slash"))
        );
        assert_eq!(
            resolve("#/channels/m~0n/title", &doc),
            Some(&json!("tilde"))
        );
        // ~01 decodes to the literal key "~1", never to "/"
        assert_eq!(
            resolve("#/channels/~01/title", &doc),
            Some(&json!("literal tilde one"))
        );
    }

    #[test]
    fn test_array_index_segments() {
        let doc = document();
        assert_eq!(resolve("#/list/1/name", &doc), Some(&json!("second")));
        assert!(resolve("#/list/2", &doc).is_none());
        assert!(resolve("#/list/first", &doc).is_none());
    }

    #[test]
    fn test_descending_into_scalar_is_none() {
        let doc = document();
        assert!(resolve("#/asyncapi/version", &doc).is_none());
    }

    #[test]
    fn test_every_channel_path_round_trips() {
        let doc = document();
        let channels = doc["channels"].as_object().unwrap();
        for (name, channel) in channels {
            let escaped = name.replace('~', "~0").replace('/', "~1");
            let reference = format!("#/channels/{escaped}");
            assert_eq!(resolve(&reference, &doc), Some(channel), "{reference}");
        }
    }

    #[test]
    fn test_follow_inline_and_reference() {
        let doc = document();
        let inline = json!({ "type": "string" });
        assert_eq!(follow(&inline, &doc), Some(&inline));

        let reference = json!({ "$ref": "#/list/0" });
        assert_eq!(follow(&reference, &doc), Some(&json!({ "name": "first" })));

        let dangling = json!({ "$ref": "#/nope" });
        assert!(follow(&dangling, &doc).is_none());
    }
}
