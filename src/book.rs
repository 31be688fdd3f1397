/// 订单簿门面：调用方可见的全部引擎操作
///
/// One value owns the per-product stores, the tolerance, the encoding
/// collaborator and the trade sink. Every operation locks exactly the
/// touched product's book for its whole duration, so a matching pass on a
/// product never interleaves with an add, cancel or price update on the
/// same product, while other products proceed in parallel.
///
/// Orders are owned by the store after insertion and mutated in place by
/// the matcher; callers hand them over by value and interact by id from
/// then on.

use crate::codec::{Codec, CodecError, JsonCodec};
use crate::matcher;
use crate::pricing;
use crate::protocol::{BookSnapshot, Order, TradeReport};
use crate::reporting::{LogSink, TradeSink};
use crate::store::{OrderStore, Side};
use std::sync::Arc;

pub struct OrderBook<C: Codec = JsonCodec> {
    store: OrderStore,
    tolerance: f64,
    codec: C,
    sink: Arc<dyn TradeSink>,
}

impl OrderBook<JsonCodec> {
    /// Engine with the default JSON codec and tracing-backed trade log.
    pub fn new(tolerance: f64) -> Self {
        Self::with_collaborators(tolerance, JsonCodec, Arc::new(LogSink))
    }
}

impl<C: Codec> OrderBook<C> {
    /// `tolerance` is the maximum deviation from the estimated market
    /// price an order may have and survive a price update.
    pub fn with_collaborators(tolerance: f64, codec: C, sink: Arc<dyn TradeSink>) -> Self {
        debug_assert!(tolerance >= 0.0);
        OrderBook {
            store: OrderStore::new(),
            tolerance,
            codec,
            sink,
        }
    }

    /// Rests a buy order at the tail of its product's queue. Ids are the
    /// caller's responsibility; nothing checks for duplicates.
    pub fn add_buy(&self, order: Order) {
        self.store.book(order.product_id).lock().insert(Side::Buy, order);
    }

    /// Rests a sell order at the tail of its product's queue.
    pub fn add_sell(&self, order: Order) {
        self.store.book(order.product_id).lock().insert(Side::Sell, order);
    }

    /// Removes the first resting buy with `order_id`. Silently does
    /// nothing when the order is not resting.
    pub fn cancel_buy(&self, product_id: u64, order_id: u64) {
        self.store.book(product_id).lock().remove(Side::Buy, order_id);
    }

    /// Removes the first resting sell with `order_id`.
    pub fn cancel_sell(&self, product_id: u64, order_id: u64) {
        self.store.book(product_id).lock().remove(Side::Sell, order_id);
    }

    /// Runs one blocking matching pass for `product_id` and returns the
    /// applied trades. Each applied trade also reaches the trade sink,
    /// exactly once.
    pub fn match_orders(&self, product_id: u64) -> Vec<TradeReport> {
        let book = self.store.book(product_id);
        let mut guard = book.lock();
        matcher::run_pass(product_id, &mut guard, self.sink.as_ref())
    }

    /// External price update: drops out-of-tolerance orders, then reprices
    /// the survivors to `new_price`. Filter and reprice are one critical
    /// section; no other operation can observe the state in between.
    pub fn update_price(&self, product_id: u64, new_price: f64) {
        let book = self.store.book(product_id);
        let mut guard = book.lock();
        let dropped = pricing::apply_tolerance_and_reprice(&mut guard, self.tolerance, new_price);
        if dropped > 0 {
            tracing::debug!(
                product = product_id,
                dropped,
                new_price,
                "price update dropped out-of-tolerance orders"
            );
        }
    }

    /// Current reference price, 0 when the product has no resting orders.
    pub fn market_price(&self, product_id: u64) -> f64 {
        pricing::estimate_market_price(&self.store.book(product_id).lock())
    }

    /// Copy of the product's resting orders.
    pub fn snapshot(&self, product_id: u64) -> BookSnapshot {
        let book = self.store.book(product_id);
        let guard = book.lock();
        BookSnapshot {
            product_id,
            buys: guard.buys().to_vec(),
            sells: guard.sells().to_vec(),
        }
    }

    /// Serializes the product's snapshot with the configured codec.
    pub fn encode_snapshot(&self, product_id: u64) -> Result<Vec<u8>, CodecError> {
        self.codec.encode(&self.snapshot(product_id))
    }

    /// Decodes an order previously produced by the configured codec.
    pub fn decode_order(&self, bytes: &[u8]) -> Result<Order, CodecError> {
        self.codec.decode(bytes)
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::BincodeCodec;
    use crate::reporting::MemorySink;

    #[test]
    fn test_cancel_missing_order_is_silent() {
        let engine = OrderBook::new(0.05);
        engine.cancel_buy(1, 42);
        engine.cancel_sell(1, 42);
        assert!(engine.snapshot(1).buys.is_empty());
    }

    #[test]
    fn test_market_price_uses_sentinel_for_empty_book() {
        let engine = OrderBook::new(0.05);
        assert_eq!(engine.market_price(9), 0.0);

        engine.add_buy(Order::limit(1, 9, 10.0, 5.0));
        engine.add_sell(Order::limit(4, 9, 9.5, 6.0));
        assert_eq!(engine.market_price(9), 9.75);
    }

    #[test]
    fn test_snapshot_round_trips_through_codec() {
        let sink = Arc::new(MemorySink::new());
        let engine = OrderBook::with_collaborators(0.05, BincodeCodec, sink);
        engine.add_buy(Order::limit(1, 1, 10.0, 5.0));

        let bytes = engine.encode_snapshot(1).unwrap();
        let snapshot: BookSnapshot = BincodeCodec.decode(&bytes).unwrap();
        assert_eq!(snapshot.buys.len(), 1);
        assert_eq!(snapshot.buys[0].id, 1);
    }

    #[test]
    fn test_decode_failure_does_not_disturb_state() {
        let engine = OrderBook::new(0.05);
        engine.add_buy(Order::limit(1, 1, 10.0, 5.0));

        assert!(engine.decode_order(b"garbage").is_err());
        assert_eq!(engine.snapshot(1).buys.len(), 1);
    }
}
