//! Deduction categories and their static profiles.
//!
//! The category taxonomy is a closed set. Each category carries a fixed
//! profile: its display name, a short description, the ordered list of
//! subtypes a deduction in that category may have, and the placeholder text
//! shown when entering provider and plan names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, RegistryResult};

/// A deduction category.
///
/// Serialized using the stable upper-case key (e.g. `"MEDICAL"`, `"LOAN"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// Health insurance premiums.
    Medical = 0,
    /// Dental insurance premiums.
    Dental = 1,
    /// Vision insurance premiums.
    Vision = 2,
    /// Retirement plan contributions.
    Retirement = 3,
    /// FSA, HSA and commuter benefits.
    Benefits = 4,
    /// Court or agency mandated withholdings.
    Garnishment = 5,
    /// Loan repayments.
    Loan = 6,
    /// State programs and statutory withholdings.
    Statutory = 7,
    /// Anything not covered above.
    Other = 8,
}

/// Static description of a [`Category`].
#[derive(Debug, Clone, Serialize)]
pub struct CategoryProfile {
    /// The category this profile describes.
    #[serde(rename = "id")]
    pub category: Category,
    /// Human-readable category name.
    pub display_name: &'static str,
    /// One-line description of what belongs in the category.
    pub description: &'static str,
    /// Allowed subtypes, in display order.
    pub subtypes: &'static [&'static str],
    /// Placeholder text for the provider name field.
    pub example_provider: &'static str,
    /// Placeholder text for the plan name field.
    pub example_plan: &'static str,
}

/// Profiles indexed by the category discriminant.
static PROFILES: [CategoryProfile; 9] = [
    CategoryProfile {
        category: Category::Medical,
        display_name: "Medical",
        description: "Health insurance premiums and employer-sponsored health plans.",
        subtypes: &["HMO Plan", "PPO Plan", "HDHP Plan", "EPO Plan"],
        example_provider: "BlueCross or Aetna",
        example_plan: "Family - Choice HMO",
    },
    CategoryProfile {
        category: Category::Dental,
        display_name: "Dental",
        description: "Dental insurance premiums and routine care coverage.",
        subtypes: &["Dental HMO", "Dental PPO", "Dental Indemnity"],
        example_provider: "Delta Dental",
        example_plan: "Premier PPO",
    },
    CategoryProfile {
        category: Category::Vision,
        display_name: "Vision",
        description: "Vision insurance premiums and corrective lens coverage.",
        subtypes: &["Vision PPO", "Vision Discount Plan"],
        example_provider: "VSP or EyeMed",
        example_plan: "Vision Gold",
    },
    CategoryProfile {
        category: Category::Retirement,
        display_name: "Retirement Contribution",
        description: "Employee contributions to qualified retirement plans.",
        subtypes: &["401(k)", "Roth 401(k)", "403(b)", "SIMPLE IRA"],
        example_provider: "Fidelity or Vanguard",
        example_plan: "Traditional 401k",
    },
    CategoryProfile {
        category: Category::Benefits,
        display_name: "Tax-Advantaged Benefits",
        description: "FSA, HSA, and commuter benefits (Section 125).",
        subtypes: &[
            "HSA Contribution",
            "FSA Medical",
            "FSA Dependent Care",
            "Commuter Transit",
            "Commuter Parking",
        ],
        example_provider: "HealthEquity",
        example_plan: "HSA Contribution",
    },
    CategoryProfile {
        category: Category::Garnishment,
        display_name: "Garnishment / Court Order",
        description: "Withholdings mandated by a court or government agency.",
        subtypes: &[
            "Child Support",
            "Tax Levy",
            "Creditor Garnishment",
            "Other Garnishment",
        ],
        example_provider: "County Court",
        example_plan: "Case #12345",
    },
    CategoryProfile {
        category: Category::Loan,
        display_name: "Loan Repayment",
        description: "Repayment of loans borrowed against plans or company.",
        subtypes: &["401(k) Loan", "Company Loan", "Student Loan", "Other Loan"],
        example_provider: "Company HR",
        example_plan: "Education Loan",
    },
    CategoryProfile {
        category: Category::Statutory,
        display_name: "State Program / Statutory",
        description: "Mandatory state-specific withholdings (e.g., PFML).",
        subtypes: &["PFML", "SUI", "Disability Insurance", "Other Statutory"],
        example_provider: "State Dept. of Labor",
        example_plan: "Statutory Disability",
    },
    CategoryProfile {
        category: Category::Other,
        display_name: "Generic / Other",
        description: "Miscellaneous deductions not covered above.",
        subtypes: &["Life Insurance", "Gym Membership", "Dues", "Miscellaneous"],
        example_provider: "Prudential or Equinox",
        example_plan: "Life Insurance 2x",
    },
];

impl Category {
    /// Every category, in catalog order.
    pub const ALL: [Category; 9] = [
        Category::Medical,
        Category::Dental,
        Category::Vision,
        Category::Retirement,
        Category::Benefits,
        Category::Garnishment,
        Category::Loan,
        Category::Statutory,
        Category::Other,
    ];

    /// Returns the stable upper-case key for this category.
    pub fn key(self) -> &'static str {
        match self {
            Category::Medical => "MEDICAL",
            Category::Dental => "DENTAL",
            Category::Vision => "VISION",
            Category::Retirement => "RETIREMENT",
            Category::Benefits => "BENEFITS",
            Category::Garnishment => "GARNISHMENT",
            Category::Loan => "LOAN",
            Category::Statutory => "STATUTORY",
            Category::Other => "OTHER",
        }
    }

    /// Returns the static profile for this category.
    pub fn profile(self) -> &'static CategoryProfile {
        &PROFILES[self as usize]
    }

    /// Returns the human-readable name of this category.
    pub fn display_name(self) -> &'static str {
        self.profile().display_name
    }

    /// Returns the allowed subtypes, in display order.
    pub fn subtypes(self) -> &'static [&'static str] {
        self.profile().subtypes
    }

    /// Returns true if `subtype` is one of this category's subtypes.
    pub fn allows_subtype(self, subtype: &str) -> bool {
        self.subtypes().contains(&subtype)
    }

    /// Resolves a category from either its key or its display name.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use deduction_registry::models::Category;
    ///
    /// assert_eq!(Category::from_key("LOAN").unwrap(), Category::Loan);
    /// assert_eq!(Category::from_key("Loan Repayment").unwrap(), Category::Loan);
    /// assert!(Category::from_key("Payday").is_err());
    /// ```
    pub fn from_key(key: &str) -> RegistryResult<Self> {
        let needle = key.trim();
        Self::ALL
            .into_iter()
            .find(|c| {
                c.key().eq_ignore_ascii_case(needle) || c.display_name().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| RegistryError::UnknownCategory {
                key: key.to_string(),
            })
    }

    /// Checks that `subtype` is allowed for this category.
    pub fn validate_subtype(self, subtype: &str) -> RegistryResult<()> {
        if self.allows_subtype(subtype) {
            Ok(())
        } else {
            Err(RegistryError::InvalidSubtype {
                category: self.display_name().to_string(),
                subtype: subtype.to_string(),
            })
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Category {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s)
    }
}

/// Returns the profiles of every category, in catalog order.
pub fn catalog() -> &'static [CategoryProfile] {
    &PROFILES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_are_indexed_by_discriminant() {
        for category in Category::ALL {
            assert_eq!(category.profile().category, category);
        }
    }

    #[test]
    fn test_every_category_has_subtypes() {
        for profile in catalog() {
            assert!(
                !profile.subtypes.is_empty(),
                "{} has no subtypes",
                profile.display_name
            );
        }
    }

    #[test]
    fn test_from_key_accepts_key_and_title() {
        assert_eq!(Category::from_key("BENEFITS").unwrap(), Category::Benefits);
        assert_eq!(
            Category::from_key("Tax-Advantaged Benefits").unwrap(),
            Category::Benefits
        );
        assert_eq!(Category::from_key(" medical ").unwrap(), Category::Medical);
    }

    #[test]
    fn test_from_key_unknown_returns_error() {
        match Category::from_key("Payday") {
            Err(RegistryError::UnknownCategory { key }) => assert_eq!(key, "Payday"),
            other => panic!("Expected UnknownCategory, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_subtype() {
        assert!(Category::Medical.validate_subtype("PPO Plan").is_ok());
        assert!(Category::Retirement.validate_subtype("Roth 401(k)").is_ok());

        match Category::Vision.validate_subtype("PPO Plan") {
            Err(RegistryError::InvalidSubtype { category, subtype }) => {
                assert_eq!(category, "Vision");
                assert_eq!(subtype, "PPO Plan");
            }
            other => panic!("Expected InvalidSubtype, got {:?}", other),
        }
    }

    #[test]
    fn test_category_serializes_as_key() {
        assert_eq!(
            serde_json::to_string(&Category::Garnishment).unwrap(),
            "\"GARNISHMENT\""
        );
        let parsed: Category = serde_json::from_str("\"STATUTORY\"").unwrap();
        assert_eq!(parsed, Category::Statutory);
    }

    #[test]
    fn test_display_uses_display_name() {
        assert_eq!(Category::Loan.to_string(), "Loan Repayment");
    }
}
