use crate::model::{CategoryNode, IdMapping, NodeHandle};
use crate::session::RemoteSession;
use crate::tree::flatten_category_tree;
use tracing::{info, warn};

/// One node the target refused to take.
#[derive(Debug, Clone)]
pub struct NodeFailure {
    pub source_id: i64,
    pub reason: String,
}

/// What a replication run produced. Nothing is rolled back on failure, so a
/// partial run leaves `mapping` holding exactly the nodes that made it across;
/// `failures` and `skipped` account for the rest.
#[derive(Debug, Default)]
pub struct ReplicationOutcome {
    pub mapping: IdMapping,
    pub created: usize,
    pub failures: Vec<NodeFailure>,
    /// Descendants of failed nodes, never attempted.
    pub skipped: Vec<i64>,
}

impl ReplicationOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.skipped.is_empty()
    }
}

/// Replays a category tree onto the target account, preserving hierarchy and
/// sibling order, and returns the source-to-target id mapping.
///
/// Walks the flattened pre-order sequence keeping one parent handle per depth,
/// local to this run. For a node at depth d the parent is the handle at d-1;
/// after a successful create the handle vector is truncated to d and the new
/// handle pushed, so handles from a finished subtree never leak into the next
/// sibling's subtree. A node's set-data only runs after its own create
/// succeeded, and a child is only attempted after its parent exists.
///
/// On failure the node's whole subtree is skipped and replication continues
/// with its siblings; the caller decides whether a partial outcome is
/// acceptable or the tree should be replayed from scratch.
pub async fn replicate_tree<S: RemoteSession + ?Sized>(
    session: &mut S,
    roots: &[CategoryNode],
) -> ReplicationOutcome {
    let flat = flatten_category_tree(roots);
    info!(nodes = flat.len(), "starting category replication");

    let mut outcome = ReplicationOutcome::default();
    let mut parents: Vec<NodeHandle> = Vec::new();
    let mut failed_depth: Option<usize> = None;

    for (depth, node) in flat {
        if let Some(d) = failed_depth {
            if depth > d {
                outcome.skipped.push(node.source_id);
                continue;
            }
            failed_depth = None;
        }

        parents.truncate(depth);
        let parent = if depth == 0 { None } else { parents.last() };

        match create_with_data(session, parent, node).await {
            Ok(handle) => {
                outcome.mapping.insert(node.source_id, handle.target_id);
                outcome.created += 1;
                parents.push(handle);
            }
            Err(reason) => {
                warn!(source_id = node.source_id, %reason, "category not replicated");
                outcome.failures.push(NodeFailure {
                    source_id: node.source_id,
                    reason,
                });
                failed_depth = Some(depth);
            }
        }
    }

    info!(
        created = outcome.created,
        failed = outcome.failures.len(),
        skipped = outcome.skipped.len(),
        "category replication finished"
    );
    outcome
}

async fn create_with_data<S: RemoteSession + ?Sized>(
    session: &mut S,
    parent: Option<&NodeHandle>,
    node: &CategoryNode,
) -> Result<NodeHandle, String> {
    let handle = session
        .create_node(parent)
        .await
        .map_err(|e| format!("create: {}", e.reason))?;
    session
        .set_node_data(&handle, node)
        .await
        .map_err(|e| format!("set data: {}", e.reason))?;
    Ok(handle)
}
