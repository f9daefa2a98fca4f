use crate::error::CatalogError;

/// Column order of the admin product export. The export has no stable API
/// contract, so any drift from this list is treated as a schema change and
/// rejected up front rather than silently admitted.
pub const EXPORT_COLUMNS: [&str; 90] = [
    "product_code",
    "ma_product_code",
    "is_display",
    "is_selling",
    "category_no",
    "display_group_3",
    "display_group_2",
    "product_name",
    "eng_product_name",
    "item_name",
    "purchase_prd_name",
    "prd_model",
    "p_summary_contents",
    "p_pr_contents",
    "pa_detail_info",
    "mobile_detail_info_display",
    "mobile_detail_info",
    "product_tag",
    "product_tax_type",
    "product_custom",
    "product_buy",
    "prd_price_org",
    "product_price",
    "product_price_type",
    "product_price_content",
    "order_limit_type",
    "product_min",
    "product_max",
    "mileage_value",
    "mileage_type",
    "common_event_exposure",
    "is_adult",
    "has_option",
    "option_type",
    "item_listing_type",
    "option_set_name",
    "option_value_serial",
    "option_display_type_serial",
    "option_button_image",
    "option_color",
    "necessary",
    "soldout_display_text",
    "option_add",
    "add_option_name",
    "add_option_tf_serial",
    "text_length",
    "image_big",
    "image_medium",
    "image_tiny",
    "image_small",
    "image_add",
    "manufacturer_code",
    "supplier_id",
    "brand_code",
    "trend_code",
    "classification_code",
    "print_date",
    "release_date",
    "use_expiration_date",
    "expiration_date",
    "origin_place_no",
    "volume_size_serial",
    "payment_info",
    "shipping_info",
    "exchange_info",
    "cs_info",
    "use_individual_ship_config",
    "delivery_method",
    "delvtype",
    "delivery_place",
    "delivery_cost_prepaid",
    "delivery_period",
    "ship_type",
    "ship_fee",
    "use_store_pickup",
    "product_weight",
    "hscode",
    "clearance_category_code",
    "product_material",
    "product_material_eng",
    "cloth_fabric",
    "seo_search_engine_exposure",
    "seo_title",
    "seo_meta_author",
    "seo_meta_description",
    "meta_tag",
    "seo_alt_tag",
    "individual_payment_method",
    "supplier_trading_type_code",
    "product_memo",
];

/// Per-account product code assigned by the source shop. Never valid on the
/// target, so it is cleared on ingestion and dropped from the output table.
pub const PRODUCT_CODE: &str = "product_code";

/// Comma-delimited list of category ids the product is listed under.
pub const CATEGORY_REFS: &str = "category_no";

/// Rich-text product description; embedded editor images hide in here.
pub const DETAIL_HTML: &str = "pa_detail_info";

pub const IMAGE_BIG: &str = "image_big";
pub const IMAGE_MEDIUM: &str = "image_medium";
pub const IMAGE_SMALL: &str = "image_small";
pub const IMAGE_TINY: &str = "image_tiny";

/// Pipe-delimited list of additional product images.
pub const IMAGE_ADD: &str = "image_add";

pub fn column_index(name: &str) -> Option<usize> {
    EXPORT_COLUMNS.iter().position(|c| *c == name)
}

/// Fails fast on any header drift: wrong column count, renamed column, or
/// reordered column all reject the whole export.
pub fn validate_headers(headers: &csv::StringRecord) -> Result<(), CatalogError> {
    if headers.len() != EXPORT_COLUMNS.len() {
        return Err(CatalogError::Schema(format!(
            "expected {} columns, found {}",
            EXPORT_COLUMNS.len(),
            headers.len()
        )));
    }
    for (position, (found, expected)) in headers.iter().zip(EXPORT_COLUMNS.iter()).enumerate() {
        if found != *expected {
            return Err(CatalogError::Schema(format!(
                "column {} is '{}', expected '{}'",
                position, found, expected
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_columns_resolve() {
        assert_eq!(column_index(PRODUCT_CODE), Some(0));
        assert_eq!(column_index(CATEGORY_REFS), Some(4));
        assert!(column_index("not_a_column").is_none());
    }

    #[test]
    fn exact_header_row_validates() {
        let headers = csv::StringRecord::from(EXPORT_COLUMNS.to_vec());
        assert!(validate_headers(&headers).is_ok());
    }

    #[test]
    fn renamed_column_is_rejected() {
        let mut columns = EXPORT_COLUMNS.to_vec();
        columns[4] = "category_number";
        let headers = csv::StringRecord::from(columns);
        assert!(matches!(
            validate_headers(&headers),
            Err(CatalogError::Schema(_))
        ));
    }

    #[test]
    fn short_header_row_is_rejected() {
        let headers = csv::StringRecord::from(EXPORT_COLUMNS[..10].to_vec());
        assert!(matches!(
            validate_headers(&headers),
            Err(CatalogError::Schema(_))
        ));
    }
}
