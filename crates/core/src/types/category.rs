//! Product categories.

use serde::{Deserialize, Serialize};

/// Product category shown in the storefront category rail.
///
/// Stored in `PostgreSQL` as the `product_category` enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "product_category", rename_all = "snake_case")
)]
#[serde(rename_all = "PascalCase")]
pub enum ProductCategory {
    Electronics,
    Fashion,
    Sports,
    Books,
}

impl ProductCategory {
    /// All categories, in storefront display order.
    pub const ALL: [Self; 4] = [Self::Electronics, Self::Fashion, Self::Sports, Self::Books];
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Electronics => write!(f, "Electronics"),
            Self::Fashion => write!(f, "Fashion"),
            Self::Sports => write!(f, "Sports"),
            Self::Books => write!(f, "Books"),
        }
    }
}

impl std::str::FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Electronics" => Ok(Self::Electronics),
            "Fashion" => Ok(Self::Fashion),
            "Sports" => Ok(Self::Sports),
            "Books" => Ok(Self::Books),
            _ => Err(format!("invalid product category: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_display_from_str_roundtrip() {
        for category in ProductCategory::ALL {
            let parsed = ProductCategory::from_str(&category.to_string()).unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn test_from_str_invalid() {
        assert!(ProductCategory::from_str("Groceries").is_err());
    }

    #[test]
    fn test_serde_pascal_case() {
        let json = serde_json::to_string(&ProductCategory::Electronics).unwrap();
        assert_eq!(json, "\"Electronics\"");
    }
}
