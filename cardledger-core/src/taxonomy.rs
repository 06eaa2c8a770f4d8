//! The closed set of spending categories every ledger row is normalized into.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Spending categories. `Other` is the catch-all.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    #[serde(rename = "Bills")]
    Bills,
    #[serde(rename = "Subscriptions")]
    Subscriptions,
    #[serde(rename = "Entertainment")]
    Entertainment,
    #[serde(rename = "Food & Drink")]
    FoodAndDrink,
    #[serde(rename = "Groceries")]
    Groceries,
    #[serde(rename = "Health & Wellbeing")]
    HealthAndWellbeing,
    #[serde(rename = "Shopping")]
    Shopping,
    #[serde(rename = "Transport")]
    Transport,
    #[serde(rename = "Travel")]
    Travel,
    #[serde(rename = "Investments")]
    Investments,
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    /// Every category, in spreadsheet order.
    pub const ALL: [Category; 11] = [
        Category::Bills,
        Category::Subscriptions,
        Category::Entertainment,
        Category::FoodAndDrink,
        Category::Groceries,
        Category::HealthAndWellbeing,
        Category::Shopping,
        Category::Transport,
        Category::Travel,
        Category::Investments,
        Category::Other,
    ];

    /// The label written to the output table
    pub fn label(&self) -> &'static str {
        match self {
            Category::Bills => "Bills",
            Category::Subscriptions => "Subscriptions",
            Category::Entertainment => "Entertainment",
            Category::FoodAndDrink => "Food & Drink",
            Category::Groceries => "Groceries",
            Category::HealthAndWellbeing => "Health & Wellbeing",
            Category::Shopping => "Shopping",
            Category::Transport => "Transport",
            Category::Travel => "Travel",
            Category::Investments => "Investments",
            Category::Other => "Other",
        }
    }

    /// Exact, case-sensitive label lookup.
    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
