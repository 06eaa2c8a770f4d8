use anyhow::{bail, Context, Result};
use cardledger_core::{IssuerId, SourceConfig, DEFAULT_PAYER};
use cardledger_finance::{Classifier, ClassifierConfig, Normalizer, OutputOptions, Pipeline};
use cardledger_ingest::{SchemaRegistry, VenmoSignPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "cardledger.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ledger table the run appends to
    pub output: PathBuf,
    /// Base directory for relative source paths
    pub data_dir: PathBuf,
    /// Payer for exports without a card-member column
    pub default_payer: String,
    pub write_header: bool,
    pub overwrite: bool,
    pub sources: Vec<SourceEntry>,
    pub classifier: ClassifierConfig,
    pub venmo: VenmoSignPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceEntry {
    pub file: PathBuf,
    pub label: String,
    /// Issuer identifier, e.g. `AMEX` or `chase-business`
    pub issuer: String,
}

impl SourceEntry {
    fn new(file: &str, label: &str, issuer: IssuerId) -> Self {
        Self {
            file: PathBuf::from(file),
            label: label.to_string(),
            issuer: issuer.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: PathBuf::from("data/2025-compiled-card-spending.csv"),
            data_dir: PathBuf::from("data"),
            default_payer: DEFAULT_PAYER.to_string(),
            write_header: false,
            overwrite: false,
            sources: vec![
                SourceEntry::new("2025-amex-gold-card.csv", "Amex - Gold", IssuerId::Amex),
                SourceEntry::new("2025-amex-blue-cash-everyday-card.csv", "Amex - Blue Cash", IssuerId::Amex),
                SourceEntry::new("2025-capital1-quicksilver-card.csv", "Capital One - Quick Silver", IssuerId::CapitalOne),
                SourceEntry::new("2025-capital1-venture-rewards-card.csv", "Capital One - Venture Rewards", IssuerId::CapitalOne),
                SourceEntry::new("2025-chase-freedom-flex-card.csv", "Chase - Freedom Flex", IssuerId::Chase),
                SourceEntry::new("2025-chase-ink-preferred-card.csv", "Chase - Ink Preferred", IssuerId::ChaseBusiness),
                SourceEntry::new("2025-chase-sapphire-preferred-card.csv", "Chase - Sapphire Preferred", IssuerId::Chase),
                SourceEntry::new("2025-discover-card.csv", "Discover", IssuerId::Discover),
                SourceEntry::new("2025-old-navy-card.csv", "Old Navy", IssuerId::OldNavy),
            ],
            classifier: ClassifierConfig::default(),
            venmo: VenmoSignPolicy::default(),
        }
    }
}

impl Config {
    /// Source list with issuers parsed and paths resolved against `data_dir`.
    pub fn source_configs(&self) -> Result<Vec<SourceConfig>> {
        self.sources
            .iter()
            .map(|entry| {
                let issuer: IssuerId = entry
                    .issuer
                    .parse()
                    .with_context(|| format!("source {:?}", entry.label))?;
                Ok(SourceConfig::new(self.resolve(&entry.file), entry.label.clone(), issuer))
            })
            .collect()
    }

    pub fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.data_dir.join(file)
        }
    }

    pub fn pipeline(&self) -> Pipeline {
        let normalizer = Normalizer::new(
            SchemaRegistry::builtin(),
            Classifier::new(&self.classifier),
            self.default_payer.clone(),
        );
        Pipeline::new(normalizer, self.venmo)
    }

    pub fn output_options(&self) -> OutputOptions {
        OutputOptions {
            path: self.output.clone(),
            write_header: self.write_header,
            overwrite: self.overwrite,
        }
    }
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config")
}

/// An explicit path must exist; otherwise `cardledger.toml` is used when present, else defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = match path {
        Some(p) => {
            if !p.exists() {
                bail!("config not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => {
            let p = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !p.exists() {
                return Ok(Config::default());
            }
            p
        }
    };
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("in {}", p.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardledger_core::LedgerError;

    #[test]
    fn test_defaults_cover_card_set() {
        let cfg = Config::default();
        let sources = cfg.source_configs().unwrap();
        assert_eq!(sources.len(), 9);
        assert_eq!(sources[0].file, PathBuf::from("data/2025-amex-gold-card.csv"));
        assert_eq!(sources[5].issuer, IssuerId::ChaseBusiness);
        assert!(!cfg.write_header);
    }

    #[test]
    fn test_parse_toml() {
        let cfg = parse_config(
            r#"
output = "out/ledger.csv"
data_dir = "/exports"
default_payer = "SAM"
write_header = true

[[sources]]
file = "venmo.csv"
label = "Venmo"
issuer = "venmo"

[[sources]]
file = "/elsewhere/ink.csv"
label = "Ink"
issuer = "chase-business"

[classifier]
subscriptions = ["SPOTIFY"]

[venmo]
negate_payments = true
"#,
        )
        .unwrap();

        assert_eq!(cfg.default_payer, "SAM");
        assert!(cfg.write_header);
        assert!(!cfg.overwrite);
        assert_eq!(cfg.classifier.subscriptions, vec!["SPOTIFY".to_string()]);
        // unspecified lists keep their defaults
        assert_eq!(cfg.classifier.transport, ClassifierConfig::default().transport);
        assert!(cfg.venmo.negate_payments);
        assert!(cfg.venmo.negate_charges);

        let sources = cfg.source_configs().unwrap();
        assert_eq!(sources[0].file, PathBuf::from("/exports/venmo.csv"));
        assert_eq!(sources[0].issuer, IssuerId::Venmo);
        assert_eq!(sources[1].file, PathBuf::from("/elsewhere/ink.csv"));

        let out = cfg.output_options();
        assert_eq!(out.path, PathBuf::from("out/ledger.csv"));
        assert!(out.write_header);
    }

    #[test]
    fn test_unknown_issuer_in_config() {
        let cfg = parse_config(
            r#"
[[sources]]
file = "x.csv"
label = "Mystery"
issuer = "WELLS_FARGO"
"#,
        )
        .unwrap();
        let err = cfg.source_configs().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LedgerError>(),
            Some(LedgerError::UnknownIssuer { .. })
        ));
        assert!(format!("{err:#}").contains("Mystery"));
    }

    #[test]
    fn test_load_missing_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(err.to_string().contains("config not found"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("cardledger.toml");
        fs::write(&p, "default_payer = \"ALEX\"\n").unwrap();
        let cfg = load_config(Some(&p)).unwrap();
        assert_eq!(cfg.default_payer, "ALEX");
        assert_eq!(cfg.sources.len(), 9);
    }
}
