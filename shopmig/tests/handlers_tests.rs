// Offline phase handlers driven through temp files.

use shopmig::run_catalog;
use shopmig_catalog::schema;
use shopmig_core::CancelToken;
use shopmig_core::model::IdMapping;
use shopmig_core::store::save_id_mapping;
use std::path::PathBuf;

fn write_export(dir: &std::path::Path, rows: &[Vec<(&str, &str)>]) -> PathBuf {
    let path = dir.join("export.csv");
    let mut writer = csv::Writer::from_path(&path).unwrap();
    writer.write_record(&schema::EXPORT_COLUMNS).unwrap();
    for values in rows {
        let mut row = vec![String::new(); schema::EXPORT_COLUMNS.len()];
        for (column, value) in values {
            row[schema::column_index(column).unwrap()] = (*value).to_string();
        }
        writer.write_record(&row).unwrap();
    }
    writer.flush().unwrap();
    path
}

#[test]
fn catalog_run_writes_all_three_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let export = write_export(
        dir.path(),
        &[vec![
            (schema::PRODUCT_CODE, "P000001A"),
            ("product_name", "Linen shirt"),
            (schema::IMAGE_BIG, "big/p1.jpg"),
            (schema::IMAGE_ADD, "x/a.jpg|x/b.jpg"),
        ]],
    );

    let out_dir = dir.path().join("out");
    let summary = run_catalog(&export, None, &out_dir, &CancelToken::new()).unwrap();

    assert_eq!(summary.products, 1);
    assert_eq!(summary.image_refs, 3);
    assert_eq!(summary.buckets, 2);
    assert_eq!(summary.rewritten, 0);
    assert!(summary.unmapped.is_empty());

    assert!(out_dir.join("products.csv").exists());
    assert!(out_dir.join("manifest.json").exists());
    assert!(out_dir.join("summary.json").exists());

    let table = std::fs::read_to_string(out_dir.join("products.csv")).unwrap();
    let header = table.lines().next().unwrap();
    assert!(!header.split(',').any(|c| c == schema::PRODUCT_CODE));
}

#[test]
fn catalog_run_rewrites_with_a_mapping_file() {
    let dir = tempfile::tempdir().unwrap();
    let export = write_export(
        dir.path(),
        &[
            vec![(schema::CATEGORY_REFS, "24,25")],
            vec![(schema::CATEGORY_REFS, "99")],
        ],
    );
    let mapping: IdMapping = [(24, 101), (25, 102)].into_iter().collect();
    let mapping_path = dir.path().join("mapping.json");
    save_id_mapping(&mapping_path, &mapping).unwrap();

    let out_dir = dir.path().join("out");
    let summary = run_catalog(&export, Some(&mapping_path), &out_dir, &CancelToken::new()).unwrap();

    assert_eq!(summary.rewritten, 1);
    assert_eq!(summary.unmapped, vec![99]);

    let table = std::fs::read_to_string(out_dir.join("products.csv")).unwrap();
    assert!(table.contains("101,102"));
}

#[test]
fn cancelled_catalog_run_stops_between_records() {
    let dir = tempfile::tempdir().unwrap();
    let export = write_export(dir.path(), &[vec![("product_name", "Linen shirt")]]);

    let token = CancelToken::new();
    token.cancel();

    let out_dir = dir.path().join("out");
    let err = run_catalog(&export, None, &out_dir, &token).unwrap_err();
    assert!(err.to_string().contains("cancelled"));
    assert!(!out_dir.join("products.csv").exists());
}
