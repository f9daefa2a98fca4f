use anyhow::Context;
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use shopmig_catalog::fetch::{AssetFetcher, DownloadProgress, FetchReport};
use shopmig_catalog::manifest::AssetManifest;
use shopmig_catalog::normalize::ProductReader;
use shopmig_catalog::rewrite::rewrite_category_refs;
use shopmig_catalog::write_products;
use shopmig_core::CancelToken;
use shopmig_core::store::load_id_mapping;
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use url::Url;

/// Per-run record of what the catalog phase produced, written next to the
/// normalized table as summary.json.
#[derive(Debug, Serialize)]
pub struct CatalogSummary {
    pub generated_at: String,
    pub products: usize,
    pub image_refs: usize,
    pub buckets: usize,
    pub rewritten: usize,
    pub unmapped: Vec<i64>,
    pub products_path: PathBuf,
    pub manifest_path: PathBuf,
}

/// Runs the catalog ETL phase: streams the export once, folds the asset
/// manifest, rewrites category references when a mapping is supplied, and
/// writes the normalized table, the manifest and a run summary into `out_dir`.
pub fn run_catalog(
    input: &Path,
    mapping_path: Option<&Path>,
    out_dir: &Path,
    cancel: &CancelToken,
) -> anyhow::Result<CatalogSummary> {
    let file = fs::File::open(input)
        .with_context(|| format!("cannot open export {}", input.display()))?;
    let reader = ProductReader::new(BufReader::new(file))?;

    let mut manifest = AssetManifest::new();
    let mut records = Vec::new();
    let mut image_refs = 0;
    for product in reader {
        if cancel.is_cancelled() {
            anyhow::bail!("cancelled between records");
        }
        let product = product?;
        image_refs += product.images.len();
        manifest.extend(product.images);
        records.push(product.record);
    }

    let (rewritten, unmapped) = match mapping_path {
        Some(path) => {
            let mapping = load_id_mapping(path)
                .with_context(|| format!("cannot read id mapping {}", path.display()))?;
            let outcome = rewrite_category_refs(&mut records, &mapping);
            (outcome.rewritten, outcome.unmapped.into_iter().collect())
        }
        None => (0, Vec::new()),
    };

    fs::create_dir_all(out_dir)?;
    let products_path = out_dir.join("products.csv");
    write_products(fs::File::create(&products_path)?, &records)?;
    let manifest_path = out_dir.join("manifest.json");
    manifest.save(&manifest_path)?;

    let summary = CatalogSummary {
        generated_at: chrono::Utc::now().to_rfc3339(),
        products: records.len(),
        image_refs,
        buckets: manifest.bucket_count(),
        rewritten,
        unmapped,
        products_path,
        manifest_path,
    };
    fs::write(
        out_dir.join("summary.json"),
        serde_json::to_string_pretty(&summary)?,
    )?;
    info!(
        products = summary.products,
        image_refs = summary.image_refs,
        rewritten = summary.rewritten,
        "catalog phase finished"
    );
    Ok(summary)
}

/// Runs the asset fetch phase against a saved manifest.
pub async fn run_fetch(
    manifest_path: &Path,
    root: &Path,
    base_url: Option<Url>,
    threads: usize,
    show_progress: bool,
) -> anyhow::Result<FetchReport> {
    let manifest = AssetManifest::load(manifest_path)
        .with_context(|| format!("cannot read manifest {}", manifest_path.display()))?;

    let progress_bar = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Fetching {} asset(s)...", manifest.url_count()));
        Some(pb)
    } else {
        None
    };

    let mut fetcher = AssetFetcher::new().with_bucket_concurrency(threads);
    if let Some(base) = base_url {
        fetcher = fetcher.with_base_url(base);
    }
    if let Some(ref pb) = progress_bar {
        let pb_clone = pb.clone();
        let callback: DownloadProgress = Arc::new(move |url: &str, bytes: u64| {
            pb_clone.set_message(format!("{} ({} KB)", url, bytes / 1024));
        });
        fetcher = fetcher.with_progress_callback(callback);
    }

    let report = fetcher.fetch_all(&manifest, root).await;

    if let Some(pb) = progress_bar {
        pb.finish_with_message(format!(
            "Fetch complete: {} downloaded, {} failed",
            report.downloaded,
            report.failures.len()
        ));
    }
    Ok(report)
}

pub fn handle_catalog(args: &ArgMatches) {
    let input = args.get_one::<PathBuf>("input").unwrap();
    let mapping = args.get_one::<PathBuf>("mapping");
    let out_dir = args.get_one::<PathBuf>("out-dir").unwrap();

    let cancel = CancelToken::new();
    match run_catalog(input, mapping.map(PathBuf::as_path), out_dir, &cancel) {
        Ok(summary) => print_catalog_summary(&summary),
        Err(e) => {
            eprintln!("{} catalog phase failed: {:#}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    }
}

pub async fn handle_fetch(args: &ArgMatches) {
    let manifest = args.get_one::<PathBuf>("manifest").unwrap();
    let root_arg = args.get_one::<String>("root").unwrap();
    let base_url = args.get_one::<Url>("base-url").cloned();
    let threads = *args.get_one::<usize>("threads").unwrap_or(&4);

    let expanded_root = shellexpand::tilde(root_arg);
    let root = Path::new(expanded_root.as_ref());

    match run_fetch(manifest, root, base_url, threads, true).await {
        Ok(report) => print_fetch_report(&report),
        Err(e) => {
            eprintln!("{} fetch phase failed: {:#}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn print_catalog_summary(summary: &CatalogSummary) {
    println!(
        "{} {} products normalized, {} image refs in {} bucket(s)",
        "✓".green().bold(),
        summary.products,
        summary.image_refs,
        summary.buckets
    );
    println!(
        "{} Products: {}",
        "→".blue(),
        summary.products_path.display().to_string().bright_white()
    );
    println!(
        "{} Manifest: {}",
        "→".blue(),
        summary.manifest_path.display().to_string().bright_white()
    );
    if summary.rewritten > 0 {
        println!(
            "{} Category references rewritten in {} record(s)",
            "✓".green().bold(),
            summary.rewritten
        );
    }
    if !summary.unmapped.is_empty() {
        println!(
            "{} {} category id(s) had no mapping and were left unchanged:",
            "⚠".yellow().bold(),
            summary.unmapped.len()
        );
        for id in &summary.unmapped {
            println!("  {} {}", "•".yellow(), id);
        }
    }
}

fn print_fetch_report(report: &FetchReport) {
    println!(
        "{} {} asset(s) downloaded",
        "✓".green().bold(),
        report.downloaded
    );
    if report.cancelled {
        println!("{} fetch was cancelled before completion", "⚠".yellow().bold());
    }
    if !report.failures.is_empty() {
        println!(
            "{} {} download(s) failed:",
            "✗".red().bold(),
            report.failures.len()
        );
        for failure in &report.failures {
            println!(
                "  {} {} ({})",
                "•".red(),
                failure.url.bright_white(),
                failure.reason
            );
        }
    }
}
