//! Turn one raw issuer row into a ledger record, or drop it when it is a balance payment.

use cardledger_core::{
    Category, IssuerId, LedgerResult, NormalizedRecord, SignConvention, DEFAULT_PAYER,
};
use cardledger_ingest::{parse_amount, AmountCell, SchemaRegistry};
use csv::StringRecord;

use crate::category_rules::Classifier;

const PAYMENT_MERCHANT_MARKERS: [&str; 3] = ["Payment", "ONLINE PAYMENT", "ONLINE PYMT"];
const PAYMENT_CATEGORY_MARKERS: [&str; 2] = ["PAYMENT", "Payment"];

/// True when the row repays the card balance rather than buying something.
pub fn is_payment(merchant: &str, issuer_category: &str) -> bool {
    PAYMENT_MERCHANT_MARKERS.iter().any(|m| merchant.contains(m))
        || PAYMENT_CATEGORY_MARKERS.iter().any(|m| issuer_category.contains(m))
}

/// Apply the issuer family's sign policy to an amount read from the debit/single column.
pub fn apply_sign_convention(amount: f64, convention: SignConvention) -> f64 {
    match convention {
        SignConvention::AsExported => amount,
        SignConvention::Inverted => -amount,
    }
}

/// Schema lookup, amount resolution and classification for positional issuer rows.
#[derive(Debug, Clone)]
pub struct Normalizer {
    registry: SchemaRegistry,
    classifier: Classifier,
    default_payer: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(SchemaRegistry::builtin(), Classifier::default(), DEFAULT_PAYER)
    }
}

impl Normalizer {
    pub fn new(
        registry: SchemaRegistry,
        classifier: Classifier,
        default_payer: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            classifier,
            default_payer: default_payer.into(),
        }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn default_payer(&self) -> &str {
        &self.default_payer
    }

    /// `Ok(None)` for payment rows. Shape and amount errors are fatal to the run.
    pub fn normalize(
        &self,
        row: &StringRecord,
        issuer: IssuerId,
        source_label: &str,
    ) -> LedgerResult<Option<NormalizedRecord>> {
        let schema = self.registry.lookup(issuer)?;

        let date = schema.date(row)?;
        let merchant = schema.merchant(row)?;
        let issuer_category = schema.category(row)?;
        let payer = schema.payer(row)?.unwrap_or(self.default_payer.as_str());

        if is_payment(merchant, issuer_category) {
            return Ok(None);
        }

        let amount = match schema.amount(row)? {
            AmountCell::Debit(raw) => apply_sign_convention(parse_amount(raw)?, issuer.sign_convention()),
            // split Debit/Credit layouts write refunds as positive credits
            AmountCell::Credit(raw) => -parse_amount(raw)?.abs(),
        };

        let category = resolve_category(&self.classifier, issuer, merchant, issuer_category);

        Ok(Some(NormalizedRecord {
            source: source_label.to_string(),
            date: date.to_string(),
            merchant: merchant.to_string(),
            amount,
            category,
            payer: payer.to_string(),
        }))
    }
}

fn resolve_category(
    classifier: &Classifier,
    issuer: IssuerId,
    merchant: &str,
    issuer_category: &str,
) -> Category {
    issuer
        .pinned_category()
        .unwrap_or_else(|| classifier.classify(merchant, issuer_category))
}
