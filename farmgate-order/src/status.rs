use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status in the fulfillment lifecycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Forward lifecycle: Pending → Processing → Shipped → Delivered.
    /// Cancellation is allowed until the order has shipped.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Processing)
                | (Processing, Shipped)
                | (Shipped, Delivered)
                | (Pending, Cancelled)
                | (Processing, Cancelled)
        )
    }

    pub fn transition_to(self, next: OrderStatus) -> Result<OrderStatus, OrderError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(OrderError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "PROCESSING" => Ok(OrderStatus::Processing),
            "SHIPPED" => Ok(OrderStatus::Shipped),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(OrderError::UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Unknown order status: {0}")]
    UnknownStatus(String),

    #[error("Cannot place an empty order")]
    EmptyOrder,
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn forward_lifecycle_allowed() {
        assert_eq!(Pending.transition_to(Processing).unwrap(), Processing);
        assert_eq!(Processing.transition_to(Shipped).unwrap(), Shipped);
        assert_eq!(Shipped.transition_to(Delivered).unwrap(), Delivered);
    }

    #[test]
    fn cancellation_allowed_until_shipped() {
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Processing.can_transition_to(Cancelled));
        assert!(!Shipped.can_transition_to(Cancelled));
        assert!(!Delivered.can_transition_to(Cancelled));
    }

    #[test]
    fn skipping_states_rejected() {
        assert!(matches!(
            Pending.transition_to(Shipped),
            Err(OrderError::InvalidTransition { .. })
        ));
        assert!(Pending.transition_to(Delivered).is_err());
    }

    #[test]
    fn terminal_states_frozen() {
        for next in [Pending, Processing, Shipped, Delivered, Cancelled] {
            assert!(!Delivered.can_transition_to(next));
            assert!(!Cancelled.can_transition_to(next));
        }
        assert!(Delivered.is_terminal());
        assert!(Cancelled.is_terminal());
        assert!(!Processing.is_terminal());
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [Pending, Processing, Shipped, Delivered, Cancelled] {
            let parsed: OrderStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("PAID".parse::<OrderStatus>().is_err());
    }
}
