//! Ordered category rules mapping merchant text + issuer category text onto the ledger taxonomy.
//!
//! Merchant identity rules run first, then rules over the issuer's own category
//! label, then a verbatim pass-through of issuer labels that already match the
//! taxonomy. Anything left is `Other`.

use cardledger_core::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

pub const SUBSCRIPTION_NAMES: [&str; 12] = [
    "GOOGLE ONE",
    "PLANET FITNESS",
    "CHATGPT",
    "FACTOR",
    "FACTOR75",
    "CYCLEBAR",
    "HYPERBEAM_WP_BASE",
    "CRUNCHYROLL",
    "NETFLIX  INC.",
    "NETFLIX.COM",
    "HELLOINTERVIEW",
    "CARDPOINTERS.COM",
];

pub const BILL_NAMES: [&str; 1] = ["TMOBILE*AUTO PAY"];

/// Transit agency, rideshare and tap-to-pay transit tokens.
pub const TRANSPORT_KEYWORDS: [&str; 3] = ["MTA", "LYFT", "OMNY"];

/// Rules over the normalized issuer category, in evaluation order.
const ISSUER_CATEGORY_RULES: [(IssuerCategoryTest, Category); 14] = [
    (IssuerCategoryTest::Is("Business services-professional services"), Category::Travel),
    (IssuerCategoryTest::Contains(&["Transportation"]), Category::Transport),
    (IssuerCategoryTest::Contains(&["Travel"]), Category::Travel),
    (IssuerCategoryTest::Contains(&["Lodging"]), Category::Travel),
    (IssuerCategoryTest::Contains(&["Entertainment"]), Category::Entertainment),
    (IssuerCategoryTest::Contains(&["pharmacies", "Health Care"]), Category::HealthAndWellbeing),
    (IssuerCategoryTest::Contains(&["groceries"]), Category::Groceries),
    (IssuerCategoryTest::Contains(&["wholesale stores"]), Category::Groceries),
    (IssuerCategoryTest::Contains(&["Restaurant"]), Category::FoodAndDrink),
    (IssuerCategoryTest::Contains(&["Dining"]), Category::FoodAndDrink),
    (IssuerCategoryTest::Contains(&["Merchandise"]), Category::Shopping),
    (IssuerCategoryTest::Contains(&["Redeem Cash Back at Amazon.com Credit"]), Category::Shopping),
    (IssuerCategoryTest::Contains(&["BILL"]), Category::Bills),
    (IssuerCategoryTest::Contains(&["AMTRAK"]), Category::Travel),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IssuerCategoryTest {
    Is(&'static str),
    Contains(&'static [&'static str]),
}

/// What a rule looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Merchant text is exactly one of these names
    MerchantIsOneOf(BTreeSet<String>),
    /// Merchant text contains any of these keywords
    MerchantContainsAny(Vec<String>),
    /// Normalized issuer category equals this text
    IssuerCategoryIs(&'static str),
    /// Normalized issuer category contains any of these
    IssuerCategoryContainsAny(&'static [&'static str]),
}

impl Predicate {
    fn matches(&self, merchant: &str, normalized_category: &str) -> bool {
        match self {
            Predicate::MerchantIsOneOf(names) => names.contains(merchant),
            Predicate::MerchantContainsAny(keywords) => {
                keywords.iter().any(|k| merchant.contains(k.as_str()))
            }
            Predicate::IssuerCategoryIs(text) => normalized_category == *text,
            Predicate::IssuerCategoryContainsAny(needles) => {
                needles.iter().any(|n| normalized_category.contains(*n))
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::MerchantIsOneOf(names) => write!(f, "merchant is one of {} names", names.len()),
            Predicate::MerchantContainsAny(keywords) => {
                write!(f, "merchant contains any of {:?}", keywords)
            }
            Predicate::IssuerCategoryIs(text) => write!(f, "issuer category is {:?}", text),
            Predicate::IssuerCategoryContainsAny(needles) => {
                write!(f, "issuer category contains any of {:?}", needles)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub predicate: Predicate,
    pub category: Category,
}

/// Merchant lists the classifier is built from. Defaults are the built-in lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub subscriptions: Vec<String>,
    pub bills: Vec<String>,
    pub transport: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            subscriptions: SUBSCRIPTION_NAMES.iter().map(|s| s.to_string()).collect(),
            bills: BILL_NAMES.iter().map(|s| s.to_string()).collect(),
            transport: TRANSPORT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// How a category was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision<'a> {
    Rule(&'a Rule),
    /// The raw issuer category already was a taxonomy label
    PassThrough,
    Unmatched,
}

/// Deterministic, total classifier: first matching rule wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Classifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        let mut rules = vec![
            Rule {
                predicate: Predicate::MerchantIsOneOf(config.subscriptions.iter().cloned().collect()),
                category: Category::Subscriptions,
            },
            Rule {
                // an empty keyword would match every merchant
                predicate: Predicate::MerchantContainsAny(
                    config.transport.iter().filter(|k| !k.is_empty()).cloned().collect(),
                ),
                category: Category::Transport,
            },
            Rule {
                predicate: Predicate::MerchantIsOneOf(config.bills.iter().cloned().collect()),
                category: Category::Bills,
            },
        ];

        rules.extend(ISSUER_CATEGORY_RULES.iter().map(|(test, category)| Rule {
            predicate: match test {
                IssuerCategoryTest::Is(text) => Predicate::IssuerCategoryIs(*text),
                IssuerCategoryTest::Contains(needles) => Predicate::IssuerCategoryContainsAny(*needles),
            },
            category: *category,
        }));

        Self { rules }
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn classify(&self, merchant: &str, issuer_category: &str) -> Category {
        match self.decide(merchant, issuer_category) {
            Decision::Rule(rule) => rule.category,
            Decision::PassThrough => {
                Category::from_label(issuer_category).unwrap_or(Category::Other)
            }
            Decision::Unmatched => Category::Other,
        }
    }

    /// Same walk as [`Classifier::classify`], reporting which step decided.
    pub fn decide(&self, merchant: &str, issuer_category: &str) -> Decision<'_> {
        let normalized = lower_capitalize(issuer_category);
        if let Some(rule) = self
            .rules
            .iter()
            .find(|r| r.predicate.matches(merchant, &normalized))
        {
            return Decision::Rule(rule);
        }
        if Category::from_label(issuer_category).is_some() {
            Decision::PassThrough
        } else {
            Decision::Unmatched
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}

static DEFAULT_CLASSIFIER: LazyLock<Classifier> = LazyLock::new(Classifier::default);

/// Classify with the built-in merchant lists.
pub fn classify(merchant: &str, issuer_category: &str) -> Category {
    DEFAULT_CLASSIFIER.classify(merchant, issuer_category)
}

/// Lowercase everything, then uppercase the first character.
pub fn lower_capitalize(s: &str) -> String {
    let lower = s.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
