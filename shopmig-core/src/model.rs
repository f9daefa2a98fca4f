use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where a category is surfaced in the storefront UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayFlags {
    pub on_category_list: bool,
    pub on_main_list: bool,
    pub on_desktop: bool,
    pub on_mobile: bool,
    pub hide_when_sold_out: bool,
    pub show_child_products: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeoMeta {
    pub title: String,
    pub author: String,
    pub description: String,
    pub keywords: String,
}

/// One category as scraped from the source account. `source_id` is the id the
/// source account assigned; the target assigns a fresh id during replication.
/// `children` order is the source sibling order and must survive replication
/// verbatim: create order on the target equals array order here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub source_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub display: DisplayFlags,
    #[serde(default)]
    pub product_sector_code: String,
    #[serde(default)]
    pub seo_allow_indexing: bool,
    #[serde(default)]
    pub seo: SeoMeta,
    #[serde(default)]
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    pub fn new(source_id: i64, title: impl Into<String>) -> Self {
        Self {
            source_id,
            title: title.into(),
            description: String::new(),
            display: DisplayFlags::default(),
            product_sector_code: String::new(),
            seo_allow_indexing: false,
            seo: SeoMeta::default(),
            children: Vec::new(),
        }
    }
}

/// Handle to a node created on the target account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeHandle {
    pub target_id: i64,
}

impl NodeHandle {
    pub fn new(target_id: i64) -> Self {
        Self { target_id }
    }
}

/// Source-to-target category id translation table. An entry for a node exists
/// only after that node's create and set-data both succeeded on the target.
pub type IdMapping = BTreeMap<i64, i64>;
