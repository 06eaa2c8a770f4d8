//! Spend totals per category and per source for a compiled ledger.

use cardledger_core::{Category, NormalizedRecord};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub count: usize,
    /// Signed sum: refunds reduce it
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceTotal {
    pub source: String,
    pub count: usize,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerSummary {
    pub record_count: usize,
    /// Sum of positive amounts
    pub spend: f64,
    /// Sum of negative amounts
    pub credits: f64,
    /// Sorted by total descending
    pub by_category: Vec<CategoryTotal>,
    /// In first-seen source order
    pub by_source: Vec<SourceTotal>,
}

impl LedgerSummary {
    pub fn from_records(records: &[NormalizedRecord]) -> Self {
        let mut categories: HashMap<Category, (usize, f64)> = HashMap::new();
        let mut sources: Vec<SourceTotal> = Vec::new();

        for rec in records {
            let entry = categories.entry(rec.category).or_default();
            entry.0 += 1;
            entry.1 += rec.amount;

            match sources.iter_mut().find(|s| s.source == rec.source) {
                Some(s) => {
                    s.count += 1;
                    s.total += rec.amount;
                }
                None => sources.push(SourceTotal {
                    source: rec.source.clone(),
                    count: 1,
                    total: rec.amount,
                }),
            }
        }

        let mut by_category: Vec<CategoryTotal> = categories
            .into_iter()
            .map(|(category, (count, total))| CategoryTotal {
                category,
                count,
                total,
            })
            .collect();
        // ties broken by taxonomy order so output is stable
        by_category.sort_by(|a, b| {
            b.total
                .total_cmp(&a.total)
                .then_with(|| a.category.cmp(&b.category))
        });

        Self {
            record_count: records.len(),
            spend: records.iter().filter(|r| r.is_spend()).map(|r| r.amount).sum(),
            credits: records.iter().filter(|r| r.is_refund()).map(|r| r.amount).sum(),
            by_category,
            by_source: sources,
        }
    }

    /// Net of spend and credits
    pub fn net(&self) -> f64 {
        self.spend + self.credits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(source: &str, amount: f64, category: Category) -> NormalizedRecord {
        NormalizedRecord {
            source: source.to_string(),
            date: "01/01/2025".to_string(),
            merchant: "X".to_string(),
            amount,
            category,
            payer: "ME".to_string(),
        }
    }

    #[test]
    fn test_totals() {
        let records = vec![
            rec("Amex", 40.0, Category::Groceries),
            rec("Chase", 12.5, Category::FoodAndDrink),
            rec("Amex", 60.0, Category::Groceries),
            rec("Amex", -10.0, Category::Groceries),
            rec("Chase", 30.0, Category::Travel),
        ];
        let s = LedgerSummary::from_records(&records);

        assert_eq!(s.record_count, 5);
        assert_eq!(s.spend, 142.5);
        assert_eq!(s.credits, -10.0);
        assert_eq!(s.net(), 132.5);

        assert_eq!(s.by_category[0].category, Category::Groceries);
        assert_eq!(s.by_category[0].count, 3);
        assert_eq!(s.by_category[0].total, 90.0);
        assert_eq!(s.by_category[1].category, Category::Travel);

        assert_eq!(s.by_source[0].source, "Amex");
        assert_eq!(s.by_source[0].total, 90.0);
        assert_eq!(s.by_source[1].source, "Chase");
        assert_eq!(s.by_source[1].count, 2);
    }

    #[test]
    fn test_sorted_by_total() {
        let records = vec![
            rec("A", 1.0, Category::Bills),
            rec("A", 5.0, Category::Other),
            rec("A", 5.0, Category::Bills),
        ];
        let s = LedgerSummary::from_records(&records);
        for w in s.by_category.windows(2) {
            assert!(w[0].total >= w[1].total, "categories not sorted by total");
        }
    }

    #[test]
    fn test_empty() {
        let s = LedgerSummary::from_records(&[]);
        assert_eq!(s.record_count, 0);
        assert!(s.by_category.is_empty());
        assert_eq!(s.net(), 0.0);
    }
}
