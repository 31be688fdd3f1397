use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// 订单类型，区分限价单和市价单
///
/// A market order rests at price 0 by convention and adopts the
/// counterparty's price at trade time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum OrderKind {
    Limit,
    Market,
}

/// A resting order.
///
/// `priority` and `created_at` travel with the order and are serialized,
/// but matching, cancellation and pricing never consult them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Order {
    pub id: u64,
    pub kind: OrderKind,
    pub price: f64,
    pub amount: f64,
    pub priority: u32,
    pub created_at: u64,
    pub product_id: u64,
}

impl Order {
    /// Creates a limit order resting at `price`.
    pub fn limit(id: u64, product_id: u64, price: f64, amount: f64) -> Self {
        Order {
            id,
            kind: OrderKind::Limit,
            price,
            amount,
            priority: 0,
            created_at: crate::timestamp::coarse_now(),
            product_id,
        }
    }

    /// Creates a market order. Market orders carry price 0 until matched.
    pub fn market(id: u64, product_id: u64, amount: f64) -> Self {
        Order {
            id,
            kind: OrderKind::Market,
            price: 0.0,
            amount,
            priority: 0,
            created_at: crate::timestamp::coarse_now(),
            product_id,
        }
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }
}

/// 成交回报，每笔成交发出一条
///
/// `price` is the buy order's price after any market-order price adoption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct TradeReport {
    pub buy_order_id: u64,
    pub sell_order_id: u64,
    pub product_id: u64,
    pub price: f64,
    pub amount: f64,
    pub timestamp: u64,
}

/// Serializable copy of one product's resting orders, for the encoding
/// collaborator and for display.
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
pub struct BookSnapshot {
    pub product_id: u64,
    pub buys: Vec<Order>,
    pub sells: Vec<Order>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_order_rests_at_zero() {
        let order = Order::market(2, 1, 3.0);
        assert_eq!(order.kind, OrderKind::Market);
        assert_eq!(order.price, 0.0);
    }

    #[test]
    fn test_limit_order_fields() {
        let order = Order::limit(1, 7, 10.5, 4.0).with_priority(5);
        assert_eq!(order.kind, OrderKind::Limit);
        assert_eq!(order.price, 10.5);
        assert_eq!(order.amount, 4.0);
        assert_eq!(order.priority, 5);
        assert_eq!(order.product_id, 7);
        assert!(order.created_at > 0);
    }
}
