//! The fixed set of business categories documents are filed under.

use std::fmt;

/// A business category; the label doubles as the folder name under the classified root.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Invoices, budgets, payments, statements.
    Finance,
    /// Contracts, agreements, compliance.
    Legal,
    /// Hiring, payroll, employee policy.
    Hr,
    /// Specifications, architecture, engineering documents.
    Technical,
    /// Campaigns, branding, market research.
    Marketing,
    /// Logistics, procurement, process documents.
    Operations,
}

impl Category {
    /// Every category, in the order labels are offered to the classifier.
    pub const ALL: [Category; 6] = [
        Category::Finance,
        Category::Legal,
        Category::Hr,
        Category::Technical,
        Category::Marketing,
        Category::Operations,
    ];

    /// Label shown to users, sent to the classifier, and used as the folder name.
    pub const fn label(self) -> &'static str {
        match self {
            Category::Finance => "Finance",
            Category::Legal => "Legal",
            Category::Hr => "HR",
            Category::Technical => "Technical",
            Category::Marketing => "Marketing",
            Category::Operations => "Operations",
        }
    }

    /// Position within [`Category::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Resolve a label back to its category. Matching is exact.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.label() == label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
