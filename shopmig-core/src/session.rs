use crate::error::{RemoteOperationError, Result};
use crate::model::{CategoryNode, NodeHandle};
use crate::tree::build_category_tree;
use async_trait::async_trait;
use tracing::info;

/// The admin interface of one storefront account, as far as this core needs
/// it. Implementations drive the real web admin (browser automation, HTTP
/// calls, whatever) and live outside this crate.
///
/// Methods take `&mut self`: the admin UI keeps per-session state (the
/// currently selected node among it), so every call must observably complete
/// before the next one is issued. There is no safe way to pipeline these.
#[async_trait]
pub trait RemoteSession {
    /// The category tree as the admin UI lists it when fully unrolled: a
    /// pre-order sequence of nodes tagged with their depth. Returned nodes
    /// carry no children; structure is recovered by the tree builder.
    async fn list_flattened_categories(
        &mut self,
    ) -> std::result::Result<Vec<(usize, CategoryNode)>, RemoteOperationError>;

    /// Creates an empty category on the target. `None` creates a top-level
    /// category; `Some(parent)` creates a child of a previously created node.
    async fn create_node(
        &mut self,
        parent: Option<&NodeHandle>,
    ) -> std::result::Result<NodeHandle, RemoteOperationError>;

    /// Fills in the fields of a created category. `data.children` is ignored.
    async fn set_node_data(
        &mut self,
        handle: &NodeHandle,
        data: &CategoryNode,
    ) -> std::result::Result<(), RemoteOperationError>;

    /// The account's product table as the admin export produces it: one
    /// delimited byte stream with a header row.
    async fn export_products_csv(&mut self) -> std::result::Result<Vec<u8>, RemoteOperationError>;
}

/// Scrapes the source account's category tree: lists the flattened nodes and
/// rebuilds the hierarchy. The result is what gets persisted for replication.
pub async fn scrape_category_tree<S: RemoteSession + ?Sized>(
    session: &mut S,
) -> Result<Vec<CategoryNode>> {
    let items = session.list_flattened_categories().await?;
    info!(nodes = items.len(), "scraped flattened category list");
    build_category_tree(items)
}
