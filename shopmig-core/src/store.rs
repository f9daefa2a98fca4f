use crate::error::Result;
use crate::model::{CategoryNode, IdMapping};
use std::fs;
use std::path::Path;
use tracing::info;

/// Writes the scraped category tree as one JSON document per migration run.
pub fn save_category_tree(path: &Path, roots: &[CategoryNode]) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(roots)?)?;
    info!(path = %path.display(), roots = roots.len(), "saved category tree");
    Ok(())
}

pub fn load_category_tree(path: &Path) -> Result<Vec<CategoryNode>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_id_mapping(path: &Path, mapping: &IdMapping) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(mapping)?)?;
    info!(path = %path.display(), entries = mapping.len(), "saved id mapping");
    Ok(())
}

pub fn load_id_mapping(path: &Path) -> Result<IdMapping> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CategoryNode;

    #[test]
    fn tree_survives_a_save_load_cycle() {
        let mut root = CategoryNode::new(11, "Outer");
        root.children.push(CategoryNode::new(12, "Inner"));
        let tree = vec![root, CategoryNode::new(13, "Second")];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("category.json");
        save_category_tree(&path, &tree).unwrap();
        let loaded = load_category_tree(&path).unwrap();
        assert_eq!(loaded, tree);
    }

    #[test]
    fn mapping_survives_a_save_load_cycle() {
        let mapping: IdMapping = [(24, 101), (25, 102)].into_iter().collect();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapping.json");
        save_id_mapping(&path, &mapping).unwrap();
        assert_eq!(load_id_mapping(&path).unwrap(), mapping);
    }
}
