//! Role enums for storefront accounts.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Account role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Can reach the admin screens.
    Admin,
    /// Regular shopper.
    #[default]
    #[serde(alias = "user")]
    Customer,
}

impl UserRole {
    /// Whether this role may open the admin screens.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Short label used in session tokens and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "user",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" | "customer" => Ok(Self::Customer),
            _ => Err(format!("Invalid role: {s}")),
        }
    }
}
