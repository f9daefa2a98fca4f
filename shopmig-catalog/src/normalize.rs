use crate::error::Result;
use crate::manifest::{ImageRef, ReferenceClass};
use crate::record::ProductRecord;
use crate::schema;
use scraper::{Html, Selector};
use std::io::Read;
use tracing::debug;
use url::Url;

/// One export row after ingestion: the corrected record plus every image
/// reference found in it, across all reference classes.
#[derive(Debug, Clone)]
pub struct NormalizedProduct {
    pub record: ProductRecord,
    pub images: Vec<ImageRef>,
}

/// Streaming reader over a product export. Validates the header row at
/// construction and yields one normalized product per data row; restart means
/// re-reading the source, there is no mid-stream resume.
pub struct ProductReader<R: Read> {
    reader: csv::Reader<R>,
    columns: Columns,
    row: usize,
}

struct Columns {
    product_code: usize,
    detail_html: usize,
    sized: [(ReferenceClass, usize); 4],
    image_add: usize,
}

impl Columns {
    fn locate() -> Self {
        let idx = |name| schema::column_index(name).expect("schema constant");
        Self {
            product_code: idx(schema::PRODUCT_CODE),
            detail_html: idx(schema::DETAIL_HTML),
            sized: [
                (ReferenceClass::Big, idx(schema::IMAGE_BIG)),
                (ReferenceClass::Medium, idx(schema::IMAGE_MEDIUM)),
                (ReferenceClass::Small, idx(schema::IMAGE_SMALL)),
                (ReferenceClass::Tiny, idx(schema::IMAGE_TINY)),
            ],
            image_add: idx(schema::IMAGE_ADD),
        }
    }
}

impl<R: Read> ProductReader<R> {
    pub fn new(input: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(input);
        schema::validate_headers(reader.headers()?)?;
        Ok(Self {
            reader,
            columns: Columns::locate(),
            row: 0,
        })
    }

    fn normalize(&self, raw: &csv::StringRecord) -> NormalizedProduct {
        let mut fields: Vec<String> = raw.iter().map(str::to_string).collect();

        // the source account's code means nothing on the target
        fields[self.columns.product_code].clear();

        let mut images = Vec::new();
        collect_editor_images(&fields[self.columns.detail_html], &mut images);

        for (class, idx) in self.columns.sized {
            push_prefixed_ref(class, &fields[idx], &mut images);
        }
        for entry in fields[self.columns.image_add].split('|') {
            push_prefixed_ref(ReferenceClass::Extra, entry, &mut images);
        }

        NormalizedProduct {
            record: ProductRecord::from_fields(fields),
            images,
        }
    }
}

impl<R: Read> Iterator for ProductReader<R> {
    type Item = Result<NormalizedProduct>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut raw = csv::StringRecord::new();
        match self.reader.read_record(&mut raw) {
            Ok(true) => {
                self.row += 1;
                Some(Ok(self.normalize(&raw)))
            }
            Ok(false) => None,
            Err(e) => Some(Err(e.into())),
        }
    }
}

/// Collects every `img` src embedded in the rich-text description. Editor
/// uploads live under a dated directory that is the URL's 5th path segment;
/// that segment becomes the directory key.
fn collect_editor_images(html: &str, images: &mut Vec<ImageRef>) {
    if html.trim().is_empty() {
        return;
    }
    let fragment = Html::parse_fragment(html);
    let selector = Selector::parse("img[src]").unwrap();
    for element in fragment.select(&selector) {
        if let Some(src) = element.value().attr("src") {
            match editor_directory_key(src) {
                Some(key) => images.push(ImageRef::new(ReferenceClass::Editor, key, src)),
                None => debug!(src, "editor image with no dated directory, skipping"),
            }
        }
    }
}

fn editor_directory_key(src: &str) -> Option<String> {
    let path = match Url::parse(src) {
        Ok(url) => url.path().to_string(),
        Err(_) => src.to_string(),
    };
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .nth(4)
        .map(str::to_string)
}

/// Sized and extra image columns hold shop-relative paths like
/// `big/shirt.jpg`; the leading segment is the directory key. Blank values
/// and bare filenames carry nothing downloadable, so they emit no reference.
fn push_prefixed_ref(class: ReferenceClass, value: &str, images: &mut Vec<ImageRef>) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }
    match value.split_once('/') {
        Some((key, rest)) if !key.is_empty() && !rest.is_empty() => {
            images.push(ImageRef::new(class, key, value));
        }
        _ => debug!(value, class = class.as_str(), "image value with no directory prefix, skipping"),
    }
}
