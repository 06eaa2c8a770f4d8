//! Guess a source's display label and issuer from its export filename.

use cardledger_core::IssuerId;

/// Label and issuer inferred for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceHint {
    pub label: &'static str,
    pub issuer: IssuerId,
}

/// Filename fragments, checked in order against the lowercased name.
pub const FILENAME_HINTS: [(&str, SourceHint); 11] = [
    ("amex-gold", hint("Amex - Gold", IssuerId::Amex)),
    ("amex-blue-cash", hint("Amex - Blue Cash", IssuerId::Amex)),
    ("capital1-quicksilver", hint("Capital One - Quick Silver", IssuerId::CapitalOne)),
    ("capital1-venture", hint("Capital One - Venture Rewards", IssuerId::CapitalOne)),
    ("chase-freedom-flex", hint("Chase - Freedom Flex", IssuerId::Chase)),
    ("chase-ink-preferred", hint("Chase - Ink Preferred", IssuerId::ChaseBusiness)),
    ("chase-sapphire-preferred", hint("Chase - Sapphire Preferred", IssuerId::Chase)),
    ("discover", hint("Discover", IssuerId::Discover)),
    ("old-navy", hint("Old Navy", IssuerId::OldNavy)),
    ("venmo", hint("Venmo", IssuerId::Venmo)),
    ("fidelity", hint("Fidelity", IssuerId::Fidelity)),
];

const fn hint(label: &'static str, issuer: IssuerId) -> SourceHint {
    SourceHint { label, issuer }
}

pub fn infer_source(file_name: &str) -> Option<SourceHint> {
    let lower = file_name.to_lowercase();
    FILENAME_HINTS
        .iter()
        .find(|(fragment, _)| lower.contains(fragment))
        .map(|(_, hint)| *hint)
}
