//! Status enums for orders, users and payment methods.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Orders move `pending -> shipped -> delivered`, or are cancelled from
/// `pending`. `delivered` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether the status admits no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    ///
    /// Self-transitions are rejected; the admin service treats them as
    /// no-ops before it gets here.
    #[must_use]
    pub const fn can_transition(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Shipped | Self::Cancelled) | (Self::Shipped, Self::Delivered)
        )
    }

    /// Spanish label shown in the storefront and admin UIs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pendiente",
            Self::Shipped => "enviado",
            Self::Delivered => "entregado",
            Self::Cancelled => "cancelado",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Shipped => write!(f, "shipped"),
            Self::Delivered => write!(f, "delivered"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Account role stored on the user profile document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular customer account.
    #[default]
    User,
    /// Back-office access.
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

/// Payment method family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    /// Manual bank transfer with out-of-band confirmation.
    BankTransfer,
    /// Hosted payment gateway (e.g. MercadoPago).
    Gateway,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_legal_transitions() {
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Shipped));
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Cancelled));
        assert!(OrderStatus::Shipped.can_transition(OrderStatus::Delivered));
    }

    #[test]
    fn test_lifecycle_illegal_transitions() {
        assert!(!OrderStatus::Pending.can_transition(OrderStatus::Delivered));
        assert!(!OrderStatus::Shipped.can_transition(OrderStatus::Cancelled));
        assert!(!OrderStatus::Shipped.can_transition(OrderStatus::Pending));
        assert!(!OrderStatus::Delivered.can_transition(OrderStatus::Pending));
        assert!(!OrderStatus::Cancelled.can_transition(OrderStatus::Shipped));
        // Self-transitions are not part of the lifecycle
        assert!(!OrderStatus::Pending.can_transition(OrderStatus::Pending));
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Shipped.is_terminal());
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).ok(),
            Some("\"pending\"".to_owned())
        );
        assert_eq!(
            serde_json::from_str::<OrderStatus>("\"cancelled\"").ok(),
            Some(OrderStatus::Cancelled)
        );
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("shipped".parse::<OrderStatus>().ok(), Some(OrderStatus::Shipped));
        assert!("unknown".parse::<OrderStatus>().is_err());
    }
}
