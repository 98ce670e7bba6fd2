use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// Where an order is in its lifecycle (`status` column).
///
/// Stock is taken when the order is placed and stays taken until the order
/// is cancelled or returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    Shipping,
    Shipped,
    Delivered,
    Returned,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipping => "shipping",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Returned => "returned",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Cancelled and returned orders no longer hold stock and never change again.
    pub fn is_closed(&self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Returned)
    }

    pub fn holds_stock(&self) -> bool {
        !self.is_closed()
    }

    /// Whether an order in this status may move to `next`.
    pub fn can_become(&self, next: OrderStatus) -> bool {
        if self.is_closed() || *self == next {
            return false;
        }
        // A delivered order comes back as a return, not a cancellation
        !(*self == OrderStatus::Delivered && next == OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "processing" => Ok(OrderStatus::Processing),
            "shipping" => Ok(OrderStatus::Shipping),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "returned" => Ok(OrderStatus::Returned),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::ValidationError(format!(
                "Unknown order status: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(OrderStatus::Pending, OrderStatus::Confirmed, true)]
    #[case(OrderStatus::Shipping, OrderStatus::Cancelled, true)]
    #[case(OrderStatus::Delivered, OrderStatus::Returned, true)]
    #[case(OrderStatus::Delivered, OrderStatus::Cancelled, false)]
    #[case(OrderStatus::Cancelled, OrderStatus::Pending, false)]
    #[case(OrderStatus::Returned, OrderStatus::Cancelled, false)]
    #[case(OrderStatus::Shipped, OrderStatus::Shipped, false)]
    fn transitions(#[case] from: OrderStatus, #[case] to: OrderStatus, #[case] allowed: bool) {
        assert_eq!(from.can_become(to), allowed);
    }

    #[test]
    fn column_text_matches_serde_name() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Shipping,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
            assert_eq!(
                serde_json::to_value(status).unwrap(),
                serde_json::Value::String(status.to_string())
            );
        }
        assert!(matches!(
            "lost".parse::<OrderStatus>(),
            Err(DomainError::ValidationError(_))
        ));
    }

    #[test]
    fn only_open_orders_hold_stock() {
        assert!(OrderStatus::default().holds_stock());
        assert!(OrderStatus::Delivered.holds_stock());
        assert!(!OrderStatus::Returned.holds_stock());
        assert!(!OrderStatus::Cancelled.holds_stock());
    }
}
