use anyhow::{bail, Context, Result};
use cardledger_core::SourceConfig;
use cardledger_finance::{CompiledLedger, Decision, LedgerSummary, SourceReport};
use cardledger_ingest::infer_source;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

mod config;
mod logging;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CARDLEDGER_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "cardledger", version = VERSION, about = "Compile card exports into one categorized ledger")]
struct Cli {
    /// Debug-level logging (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize every configured source and append the rows to the ledger table
    Compile {
        /// Config file (defaults to ./cardledger.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the output table path
        #[arg(long)]
        output: Option<PathBuf>,

        /// Compile these exports instead of the configured sources; issuer and label come from the file name
        #[arg(long, num_args = 1..)]
        files: Vec<PathBuf>,

        /// Write the column header when the output table is empty
        #[arg(long)]
        header: bool,

        /// Truncate the output table instead of appending
        #[arg(long)]
        overwrite: bool,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the category for a merchant and optional issuer category
    Classify {
        merchant: String,

        #[arg(default_value = "")]
        category: String,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the configured sources and their column layouts
    Sources {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct RunReport<'a> {
    output: &'a Path,
    sources: &'a [SourceReport],
    summary: LedgerSummary,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Command::Compile {
            config,
            output,
            files,
            header,
            overwrite,
            json,
        } => {
            let mut cfg = config::load_config(config.as_deref())?;
            if let Some(output) = output {
                cfg.output = output;
            }
            cfg.write_header |= header;
            cfg.overwrite |= overwrite;

            let sources = if files.is_empty() {
                cfg.source_configs()?
            } else {
                sources_from_files(&files)?
            };
            if sources.is_empty() {
                bail!("no sources to compile");
            }

            let out = cfg.output_options();
            info!(sources = sources.len(), output = %out.path.display(), "starting ledger run");
            let ledger = cfg
                .pipeline()
                .run(&sources, &out)
                .context("ledger run aborted")?;

            print_report(&ledger, &out.path, json)?;
        }

        Command::Classify {
            merchant,
            category,
            config,
        } => {
            let cfg = config::load_config(config.as_deref())?;
            let pipeline = cfg.pipeline();
            let classifier = pipeline.normalizer().classifier();

            let label = classifier.classify(&merchant, &category);
            let how = match classifier.decide(&merchant, &category) {
                Decision::Rule(rule) => format!("rule: {}", rule.predicate),
                Decision::PassThrough => "issuer category is already a ledger category".to_string(),
                Decision::Unmatched => "no rule matched".to_string(),
            };
            println!("{label}  ({how})");
        }

        Command::Sources { config } => {
            let cfg = config::load_config(config.as_deref())?;
            let pipeline = cfg.pipeline();
            let registry = pipeline.normalizer().registry();

            for source in cfg.source_configs()? {
                let layout = match registry.lookup(source.issuer) {
                    Ok(schema) => format!(
                        "date@{} merchant@{} category@{} debit@{} credit@{} payer@{}",
                        schema.date_field,
                        schema.merchant_field,
                        fmt_index(schema.category_field),
                        fmt_index(schema.debit_field),
                        fmt_index(schema.credit_field),
                        fmt_index(schema.payer_field),
                    ),
                    Err(_) => format!("{:?} export (header-keyed)", source.issuer.export_format()),
                };
                println!(
                    "{:<32} {:<15} {}  [{}]",
                    source.label,
                    source.issuer.as_str(),
                    source.file.display(),
                    layout
                );
            }
        }
    }

    Ok(())
}

fn sources_from_files(files: &[PathBuf]) -> Result<Vec<SourceConfig>> {
    files
        .iter()
        .map(|path| {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .with_context(|| format!("not a file name: {}", path.display()))?;
            let Some(hint) = infer_source(name) else {
                bail!(
                    "cannot tell the issuer of {} from its name (use a config file)",
                    path.display()
                );
            };
            Ok(SourceConfig::new(path.clone(), hint.label, hint.issuer))
        })
        .collect()
}

fn fmt_index(index: Option<usize>) -> String {
    index.map_or_else(|| "-".to_string(), |i| i.to_string())
}

fn print_report(ledger: &CompiledLedger, output: &Path, json: bool) -> Result<()> {
    let summary = LedgerSummary::from_records(&ledger.records);

    if json {
        let report = RunReport {
            output,
            sources: &ledger.sources,
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Wrote {} records to {}\n", summary.record_count, output.display());
    for s in &ledger.sources {
        println!(
            "{:<32} rows={:<5} kept={:<5} payments={}",
            s.label, s.rows_read, s.kept, s.payments_dropped
        );
    }

    println!("\nBy category:");
    for c in &summary.by_category {
        println!("  {:<20} count={:<5} total=${:.2}", c.category.label(), c.count, c.total);
    }
    println!(
        "\nSpend ${:.2} | credits ${:.2} | net ${:.2}",
        summary.spend,
        summary.credits.abs(),
        summary.net()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardledger_core::IssuerId;

    #[test]
    fn test_sources_from_files() {
        let files = vec![
            PathBuf::from("/tmp/2025-amex-blue-cash-everyday-card.csv"),
            PathBuf::from("exports/2025-discover-card.csv"),
        ];
        let sources = sources_from_files(&files).unwrap();
        assert_eq!(sources[0].label, "Amex - Blue Cash");
        assert_eq!(sources[0].issuer, IssuerId::Amex);
        assert_eq!(sources[1].file, PathBuf::from("exports/2025-discover-card.csv"));
    }

    #[test]
    fn test_sources_from_unknown_file() {
        let err = sources_from_files(&[PathBuf::from("statement.csv")]).unwrap_err();
        assert!(err.to_string().contains("statement.csv"));
    }

    #[test]
    fn test_cli_parses_compile_flags() {
        let cli = Cli::try_parse_from([
            "cardledger", "-v", "compile", "--header", "--files", "a-discover.csv", "b-old-navy.csv",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Compile { files, header, overwrite, .. } => {
                assert_eq!(files.len(), 2);
                assert!(header);
                assert!(!overwrite);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
