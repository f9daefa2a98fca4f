use crate::CLAP_STYLING;
use clap::{arg, command};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("shopmig")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("shopmig")
        .styles(CLAP_STYLING)
        .subcommand_required(true)
        .subcommand(
            command!("catalog")
                .about(
                    "Normalize a product export: clear per-account codes, rewrite category \
                references, and build the asset manifest.",
                )
                .arg(
                    arg!(-i --"input" <CSV>)
                        .required(true)
                        .help("Path to the product export CSV")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-m --"mapping" <JSON>)
                        .required(false)
                        .help("Category id mapping produced by tree replication")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-o --"out-dir" <DIR>)
                        .required(true)
                        .help("Directory for products.csv, manifest.json and summary.json")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                ),
        )
        .subcommand(
            command!("fetch")
                .about("Download every asset of a saved manifest into the target layout.")
                .arg(
                    arg!(-m --"manifest" <JSON>)
                        .required(true)
                        .help("Path to a manifest.json produced by the catalog phase")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-r --"root" <DIR>)
                        .required(true)
                        .help("Asset root; files land in <root>/<class>/<directory-key>/"),
                )
                .arg(
                    arg!(-b --"base-url" <URL>)
                        .required(false)
                        .help("Shop base URL for resolving relative image paths")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(-t --"threads" <NUM_WORKERS>)
                        .required(false)
                        .help("Number of asset buckets fetched in parallel.")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("4"),
                ),
        )
}
