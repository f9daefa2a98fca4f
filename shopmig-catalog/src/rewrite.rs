use crate::record::ProductRecord;
use crate::schema;
use shopmig_core::model::IdMapping;
use std::collections::BTreeSet;
use tracing::warn;

/// Result of rewriting category references across a product table.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RewriteOutcome {
    /// Records whose category field changed.
    pub rewritten: usize,
    /// Source ids seen in the table with no mapping entry. Left in place;
    /// expected after a partial category replication.
    pub unmapped: BTreeSet<i64>,
}

/// Replaces every mapped source category id in each record's `category_no`
/// field with its target id. Matching is whole-token: the field is split on
/// the list delimiter and only complete ids are translated, so id 12 never
/// rewrites the 12 inside 123. Unmapped ids stay untouched and are reported,
/// not failed - the caller chooses whether a partial migration is acceptable.
pub fn rewrite_category_refs(records: &mut [ProductRecord], mapping: &IdMapping) -> RewriteOutcome {
    let mut outcome = RewriteOutcome::default();

    for record in records.iter_mut() {
        let Some(value) = record.get(schema::CATEGORY_REFS) else {
            continue;
        };
        let rewritten = rewrite_reference_list(value, mapping, &mut outcome.unmapped);
        if rewritten != value {
            record.set(schema::CATEGORY_REFS, rewritten);
            outcome.rewritten += 1;
        }
    }

    if !outcome.unmapped.is_empty() {
        warn!(
            ids = ?outcome.unmapped,
            "category ids without a mapping entry were left unchanged"
        );
    }
    outcome
}

/// Rewrites one comma-delimited id list. Tokens that are not plain integers
/// pass through byte-identical.
pub fn rewrite_reference_list(
    value: &str,
    mapping: &IdMapping,
    unmapped: &mut BTreeSet<i64>,
) -> String {
    if value.is_empty() {
        return String::new();
    }
    value
        .split(',')
        .map(|token| match token.trim().parse::<i64>() {
            Ok(id) => match mapping.get(&id) {
                Some(target) => target.to_string(),
                None => {
                    unmapped.insert(id);
                    token.to_string()
                }
            },
            Err(_) => token.to_string(),
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(value: &str, mapping: &IdMapping) -> (String, BTreeSet<i64>) {
        let mut unmapped = BTreeSet::new();
        let out = rewrite_reference_list(value, mapping, &mut unmapped);
        (out, unmapped)
    }

    #[test]
    fn whole_tokens_only() {
        let mapping: IdMapping = [(12, 5)].into_iter().collect();
        let (out, unmapped) = list("12,123", &mapping);
        assert_eq!(out, "5,123");
        assert_eq!(unmapped, [123].into_iter().collect());
    }

    #[test]
    fn every_occurrence_is_replaced() {
        let mapping: IdMapping = [(24, 101), (25, 102), (28, 103)].into_iter().collect();
        let (out, unmapped) = list("24,25,28,24", &mapping);
        assert_eq!(out, "101,102,103,101");
        assert!(unmapped.is_empty());
    }

    #[test]
    fn fully_mapped_rewrite_is_idempotent() {
        // target ids deliberately disjoint from source ids
        let mapping: IdMapping = [(24, 101), (25, 102)].into_iter().collect();
        let (once, _) = list("24,25", &mapping);
        let (twice, unmapped) = list(&once, &mapping);
        assert_eq!(once, twice);
        assert_eq!(unmapped, [101, 102].into_iter().collect());
    }

    #[test]
    fn empty_and_garbage_tokens_pass_through() {
        let mapping: IdMapping = [(24, 101)].into_iter().collect();
        let (out, unmapped) = list("", &mapping);
        assert_eq!(out, "");
        assert!(unmapped.is_empty());

        let (out, _) = list("24,n/a", &mapping);
        assert_eq!(out, "101,n/a");
    }

    #[test]
    fn records_report_change_counts_and_unmapped_ids() {
        use crate::normalize::ProductReader;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&schema::EXPORT_COLUMNS).unwrap();
        for refs in ["24,25", "99", ""] {
            let mut row = vec![String::new(); schema::EXPORT_COLUMNS.len()];
            row[schema::column_index(schema::CATEGORY_REFS).unwrap()] = refs.to_string();
            writer.write_record(&row).unwrap();
        }
        let csv = writer.into_inner().unwrap();
        let mut records: Vec<_> = ProductReader::new(csv.as_slice())
            .unwrap()
            .map(|p| p.unwrap().record)
            .collect();

        let mapping: IdMapping = [(24, 101), (25, 102)].into_iter().collect();
        let outcome = rewrite_category_refs(&mut records, &mapping);

        assert_eq!(outcome.rewritten, 1);
        assert_eq!(outcome.unmapped, [99].into_iter().collect());
        assert_eq!(records[0].get(schema::CATEGORY_REFS), Some("101,102"));
        assert_eq!(records[1].get(schema::CATEGORY_REFS), Some("99"));
    }
}
