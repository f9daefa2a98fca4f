use crate::error::Result;
use crate::schema;
use std::io::Write;

/// One product row, fields ordered per [`schema::EXPORT_COLUMNS`]. Values stay
/// plain strings: the export schema is display-oriented and nothing in the
/// pipeline does arithmetic on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    fields: Vec<String>,
}

impl ProductRecord {
    /// `fields` must already be schema-aligned; the normalizer guarantees it.
    pub(crate) fn from_fields(fields: Vec<String>) -> Self {
        debug_assert_eq!(fields.len(), schema::EXPORT_COLUMNS.len());
        Self { fields }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        schema::column_index(column).map(|idx| self.fields[idx].as_str())
    }

    pub fn set(&mut self, column: &str, value: impl Into<String>) {
        if let Some(idx) = schema::column_index(column) {
            self.fields[idx] = value.into();
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

/// Writes the normalized product table: same schema as the export minus the
/// per-account product code column.
pub fn write_products<W: Write>(out: W, records: &[ProductRecord]) -> Result<()> {
    let code_idx = schema::column_index(schema::PRODUCT_CODE).unwrap_or(usize::MAX);
    let mut writer = csv::Writer::from_writer(out);

    let header: Vec<&str> = schema::EXPORT_COLUMNS
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != code_idx)
        .map(|(_, name)| *name)
        .collect();
    writer.write_record(&header)?;

    for record in records {
        let row: Vec<&str> = record
            .fields
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != code_idx)
            .map(|(_, value)| value.as_str())
            .collect();
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_record() -> ProductRecord {
        ProductRecord::from_fields(vec![String::new(); schema::EXPORT_COLUMNS.len()])
    }

    #[test]
    fn get_and_set_address_columns_by_name() {
        let mut record = blank_record();
        record.set(schema::CATEGORY_REFS, "24,25");
        assert_eq!(record.get(schema::CATEGORY_REFS), Some("24,25"));
        assert_eq!(record.get("no_such_column"), None);
    }

    #[test]
    fn written_table_drops_the_product_code_column() {
        let mut record = blank_record();
        record.set("product_name", "Linen shirt");

        let mut out = Vec::new();
        write_products(&mut out, &[record]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let header = text.lines().next().unwrap();

        assert!(!header.split(',').any(|c| c == schema::PRODUCT_CODE));
        assert_eq!(
            header.split(',').count(),
            schema::EXPORT_COLUMNS.len() - 1
        );
        assert!(header.contains("ma_product_code"));
    }
}
