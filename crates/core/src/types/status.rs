//! Order lifecycle enums and the status transition machine.
//!
//! Stored as text in Postgres; the `Display`/`FromStr` impls define the
//! canonical wire and storage strings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Attempted an order status transition that the lifecycle does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid status transition: {from} -> {to}")]
pub struct InvalidTransition {
    /// Status the order was in.
    pub from: OrderStatus,
    /// Status the caller asked for.
    pub to: OrderStatus,
}

/// Order fulfillment status.
///
/// Lifecycle: `pending -> {processing, shipped}`, `processing -> {shipped,
/// completed}`, `shipped -> completed`, and any non-terminal status may be
/// canceled. `completed` and `canceled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Completed,
    Canceled,
}

impl OrderStatus {
    /// Whether no further transitions are allowed from this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Canceled)
    }

    /// The statuses this one may move to.
    #[must_use]
    pub const fn allowed_targets(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Processing, Self::Shipped, Self::Canceled],
            Self::Processing => &[Self::Shipped, Self::Completed, Self::Canceled],
            Self::Shipped => &[Self::Completed, Self::Canceled],
            Self::Completed | Self::Canceled => &[],
        }
    }

    /// Validate a transition to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] if `target` is not an allowed target of
    /// the current status, including any transition out of a terminal status.
    pub fn transition(self, target: Self) -> Result<Self, InvalidTransition> {
        if self.allowed_targets().contains(&target) {
            Ok(target)
        } else {
            Err(InvalidTransition {
                from: self,
                to: target,
            })
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Shipped => write!(f, "shipped"),
            Self::Completed => write!(f, "completed"),
            Self::Canceled => write!(f, "canceled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "completed" => Ok(Self::Completed),
            "canceled" => Ok(Self::Canceled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// How an order is fulfilled: at a table or picked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    DineIn,
    Takeaway,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DineIn => write!(f, "dine-in"),
            Self::Takeaway => write!(f, "takeaway"),
        }
    }
}

impl std::str::FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dine-in" => Ok(Self::DineIn),
            "takeaway" => Ok(Self::Takeaway),
            _ => Err(format!("invalid order type: {s}")),
        }
    }
}

/// Accepted payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Card,
    #[serde(rename = "UPI")]
    Upi,
    Online,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cash => write!(f, "Cash"),
            Self::Card => write!(f, "Card"),
            Self::Upi => write!(f, "UPI"),
            Self::Online => write!(f, "Online"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cash" => Ok(Self::Cash),
            "Card" => Ok(Self::Card),
            "UPI" => Ok(Self::Upi),
            "Online" => Ok(Self::Online),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_can_cancel() {
        let status = OrderStatus::Pending
            .transition(OrderStatus::Canceled)
            .expect("pending -> canceled is allowed");
        assert_eq!(status, OrderStatus::Canceled);
        assert!(status.is_terminal());
    }

    #[test]
    fn test_canceled_is_terminal() {
        let err = OrderStatus::Canceled
            .transition(OrderStatus::Completed)
            .expect_err("canceled is terminal");
        assert_eq!(err.from, OrderStatus::Canceled);
        assert_eq!(err.to, OrderStatus::Completed);
    }

    #[test]
    fn test_completed_is_terminal() {
        assert!(OrderStatus::Completed.allowed_targets().is_empty());
        assert!(
            OrderStatus::Completed
                .transition(OrderStatus::Canceled)
                .is_err()
        );
    }

    #[test]
    fn test_pending_cannot_skip_to_completed() {
        assert!(
            OrderStatus::Pending
                .transition(OrderStatus::Completed)
                .is_err()
        );
    }

    #[test]
    fn test_happy_path_progression() {
        let status = OrderStatus::Pending
            .transition(OrderStatus::Processing)
            .and_then(|s| s.transition(OrderStatus::Shipped))
            .and_then(|s| s.transition(OrderStatus::Completed))
            .expect("full progression is allowed");
        assert_eq!(status, OrderStatus::Completed);
    }

    #[test]
    fn test_no_self_transition() {
        assert!(
            OrderStatus::Pending
                .transition(OrderStatus::Pending)
                .is_err()
        );
    }

    #[test]
    fn test_status_string_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Completed,
            OrderStatus::Canceled,
        ] {
            let parsed: OrderStatus = status.to_string().parse().expect("roundtrip");
            assert_eq!(parsed, status);
        }
        assert!("delivered".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_order_type_strings() {
        assert_eq!("dine-in".parse::<OrderType>(), Ok(OrderType::DineIn));
        assert_eq!("takeaway".parse::<OrderType>(), Ok(OrderType::Takeaway));
        assert!("delivery".parse::<OrderType>().is_err());
        assert_eq!(OrderType::DineIn.to_string(), "dine-in");
    }

    #[test]
    fn test_payment_method_strings() {
        assert_eq!("UPI".parse::<PaymentMethod>(), Ok(PaymentMethod::Upi));
        assert!("upi".parse::<PaymentMethod>().is_err());
        assert!("".parse::<PaymentMethod>().is_err());
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Upi).expect("serialize"),
            "\"UPI\""
        );
    }
}
