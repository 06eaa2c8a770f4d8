//! Issuer families and the per-family policies that are not part of the column layout.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;
use crate::taxonomy::Category;

/// Card products / account exports with a known layout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssuerId {
    Amex,
    CapitalOne,
    Chase,
    ChaseBusiness,
    Discover,
    OldNavy,
    Venmo,
    Fidelity,
}

/// How the rows of an export are located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Fixed column positions, one header row to skip.
    Positional,
    /// Venmo statement: header row somewhere below a preamble.
    Venmo,
    /// Fidelity activity export: contributions only.
    Fidelity,
}

/// What the issuer's native amount sign means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignConvention {
    /// Already positive = spend.
    AsExported,
    /// Negated on the way in.
    Inverted,
}

/// Issuers whose exports are negated before landing in the ledger.
pub const INVERTED_SIGN_ISSUERS: [IssuerId; 3] =
    [IssuerId::Chase, IssuerId::ChaseBusiness, IssuerId::OldNavy];

/// Issuers whose rows all land in one category, whatever the classifier says.
pub const PINNED_CATEGORIES: [(IssuerId, Category); 1] = [(IssuerId::OldNavy, Category::Shopping)];

impl IssuerId {
    pub const ALL: [IssuerId; 8] = [
        IssuerId::Amex,
        IssuerId::CapitalOne,
        IssuerId::Chase,
        IssuerId::ChaseBusiness,
        IssuerId::Discover,
        IssuerId::OldNavy,
        IssuerId::Venmo,
        IssuerId::Fidelity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssuerId::Amex => "AMEX",
            IssuerId::CapitalOne => "CAPITAL_ONE",
            IssuerId::Chase => "CHASE",
            IssuerId::ChaseBusiness => "CHASE_BUSINESS",
            IssuerId::Discover => "DISCOVER",
            IssuerId::OldNavy => "OLD_NAVY",
            IssuerId::Venmo => "VENMO",
            IssuerId::Fidelity => "FIDELITY",
        }
    }

    pub fn export_format(&self) -> ExportFormat {
        match self {
            IssuerId::Venmo => ExportFormat::Venmo,
            IssuerId::Fidelity => ExportFormat::Fidelity,
            _ => ExportFormat::Positional,
        }
    }

    pub fn sign_convention(&self) -> SignConvention {
        if INVERTED_SIGN_ISSUERS.contains(self) {
            SignConvention::Inverted
        } else {
            SignConvention::AsExported
        }
    }

    /// Fixed category for every row of this issuer, if any.
    pub fn pinned_category(&self) -> Option<Category> {
        PINNED_CATEGORIES
            .iter()
            .find(|(issuer, _)| issuer == self)
            .map(|(_, cat)| *cat)
    }
}

impl fmt::Display for IssuerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssuerId {
    type Err = LedgerError;

    /// Accepts `CHASE_BUSINESS`, `chase-business` and `Chase Business` alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c.to_ascii_uppercase() })
            .collect();
        IssuerId::ALL
            .into_iter()
            .find(|id| id.as_str() == key)
            .ok_or_else(|| LedgerError::UnknownIssuer {
                issuer: s.to_string(),
            })
    }
}
