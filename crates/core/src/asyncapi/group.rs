//! Operation grouping by channel reference.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, warn};

use super::spec::{Document, Operation};
use crate::error::{GenerateError, Result};

/// All operations that target one channel, in document order.
#[derive(Debug, Clone)]
pub struct ChannelGroup {
    /// The raw `$ref` string the operations use for the channel.
    pub channel_ref: String,
    /// Operations in the order they appear under `operations`.
    pub operations: Vec<Operation>,
}

/// Partition the document's operations by the channel they reference.
///
/// Groups come out in the order their channel reference is first seen.
/// Operations without messages or with an inline channel are skipped.
/// A document lacking either `operations` or `channels` is rejected.
pub fn group_by_channel(doc: Document<'_>) -> Result<Vec<ChannelGroup>> {
    let operations = doc.operations().ok_or(GenerateError::MissingOperations)?;
    if doc.channels().is_none() {
        return Err(GenerateError::MissingChannels);
    }

    let mut groups: Vec<ChannelGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (id, node) in operations {
        let operation = match Operation::deserialize(node) {
            Ok(operation) => operation,
            Err(err) => {
                warn!(operation = %id, error = %err, "Skipping malformed operation");
                continue;
            }
        };

        if operation.messages.as_ref().is_none_or(Vec::is_empty) {
            debug!(operation = %id, "Operation has no messages");
            continue;
        }

        let Some(channel_ref) = operation
            .channel
            .as_ref()
            .and_then(|c| c.as_ref_path())
            .map(str::to_string)
        else {
            debug!(operation = %id, "Operation channel is not a reference");
            continue;
        };

        match index.get(&channel_ref) {
            Some(&i) => groups[i].operations.push(operation),
            None => {
                index.insert(channel_ref.clone(), groups.len());
                groups.push(ChannelGroup {
                    channel_ref,
                    operations: vec![operation],
                });
            }
        }
    }

    Ok(groups)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn group(root: &Value) -> Vec<ChannelGroup> {
        group_by_channel(Document::new(root)).unwrap()
    }

    #[test]
    fn test_missing_operations_is_fatal() {
        let root = json!({ "channels": {} });
        let err = group_by_channel(Document::new(&root)).unwrap_err();
        assert!(matches!(err, GenerateError::MissingOperations));
    }

    #[test]
    fn test_missing_channels_is_fatal() {
        let root = json!({ "operations": {} });
        let err = group_by_channel(Document::new(&root)).unwrap_err();
        assert!(matches!(err, GenerateError::MissingChannels));
    }

    #[test]
    fn test_groups_by_reference_in_first_seen_order() {
        let root = json!({
            "channels": {},
            "operations": {
                "a": { "action": "send", "channel": { "$ref": "#/channels/b" }, "messages": [{ "$ref": "#/m/1" }] },
                "b": { "action": "receive", "channel": { "$ref": "#/channels/a" }, "messages": [{ "$ref": "#/m/2" }] },
                "c": { "action": "receive", "channel": { "$ref": "#/channels/b" }, "messages": [{ "$ref": "#/m/3" }] }
            }
        });

        let groups = group(&root);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].channel_ref, "#/channels/b");
        assert_eq!(groups[1].channel_ref, "#/channels/a");

        let actions: Vec<_> = groups[0]
            .operations
            .iter()
            .map(|op| op.action.as_deref().unwrap())
            .collect();
        assert_eq!(actions, ["send", "receive"]);
    }

    #[test]
    fn test_skips_operations_without_messages_or_ref_channel() {
        let root = json!({
            "channels": {},
            "operations": {
                "none": { "action": "send", "channel": { "$ref": "#/channels/x" } },
                "empty": { "action": "send", "channel": { "$ref": "#/channels/x" }, "messages": [] },
                "inline": { "action": "send", "channel": { "address": "/x" }, "messages": [{ "$ref": "#/m" }] },
                "no_channel": { "action": "send", "messages": [{ "$ref": "#/m" }] }
            }
        });

        assert!(group(&root).is_empty());
    }

    #[test]
    fn test_skips_malformed_operation() {
        let root = json!({
            "channels": {},
            "operations": {
                "bad": { "action": 5, "channel": { "$ref": "#/channels/x" }, "messages": [{ "$ref": "#/m" }] },
                "good": { "action": "send", "channel": { "$ref": "#/channels/x" }, "messages": [{ "$ref": "#/m" }] }
            }
        });

        let groups = group(&root);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].operations.len(), 1);
    }
}
