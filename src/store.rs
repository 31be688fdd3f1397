/// 订单存储：每个产品一条买队列和一条卖队列
///
/// Orders rest in plain insertion-ordered vectors and are located by linear
/// scan. Matching depends on that ordering: nothing here sorts by price or
/// priority, and the matcher enumerates pairs in exactly this order.
///
/// Each product has its own mutex; the outer `RwLock` only guards product
/// registration. A matching pass on product P is atomic with respect to
/// every add/cancel/price-update on P, while unrelated products proceed
/// in parallel.

use crate::protocol::Order;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// Which side of the book an order rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

/// One product's resting orders.
#[derive(Debug, Clone, Default)]
pub struct ProductBook {
    pub(crate) buys: Vec<Order>,
    pub(crate) sells: Vec<Order>,
}

impl ProductBook {
    fn side(&self, side: Side) -> &Vec<Order> {
        match side {
            Side::Buy => &self.buys,
            Side::Sell => &self.sells,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut Vec<Order> {
        match side {
            Side::Buy => &mut self.buys,
            Side::Sell => &mut self.sells,
        }
    }

    /// Appends at the tail of the side's queue.
    ///
    /// Ids are the caller's responsibility; nothing checks for duplicates,
    /// and a duplicate id makes later lookups resolve to the first entry.
    pub fn insert(&mut self, side: Side, order: Order) {
        self.side_mut(side).push(order);
    }

    /// Removes the first order with `order_id`, keeping the rest in place.
    /// Silent no-op when the id is not resting.
    pub fn remove(&mut self, side: Side, order_id: u64) {
        let orders = self.side_mut(side);
        if let Some(pos) = orders.iter().position(|o| o.id == order_id) {
            orders.remove(pos);
        }
    }

    /// Linear scan for the first order with `order_id`. "Not found" is a
    /// normal outcome (the order may have filled earlier in the same pass).
    pub fn find(&self, side: Side, order_id: u64) -> Option<&Order> {
        self.side(side).iter().find(|o| o.id == order_id)
    }

    pub fn buys(&self) -> &[Order] {
        &self.buys
    }

    pub fn sells(&self) -> &[Order] {
        &self.sells
    }

    pub fn is_empty(&self) -> bool {
        self.buys.is_empty() && self.sells.is_empty()
    }
}

/// Per-product order storage with per-product locking.
#[derive(Default)]
pub struct OrderStore {
    books: RwLock<HashMap<u64, Arc<Mutex<ProductBook>>>>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lock for `product_id`'s book, creating an empty book on
    /// first touch.
    pub fn book(&self, product_id: u64) -> Arc<Mutex<ProductBook>> {
        if let Some(book) = self.books.read().get(&product_id) {
            return Arc::clone(book);
        }
        let mut books = self.books.write();
        Arc::clone(books.entry(product_id).or_default())
    }
}
