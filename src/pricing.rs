/// 行情价格估计与容差过滤
///
/// The reference price is a crude single-sample estimate taken from the
/// head order of each side, not a volume-weighted mid. The tolerance
/// filter drops every order outside the tolerance band and reprices the
/// survivors; both steps run inside one critical section so no other
/// operation can observe the filtered-but-not-repriced state.

use crate::store::ProductBook;

/// Reference price for one product.
///
/// Mean of the two head prices when both sides are resting, the single
/// head's price when only one side is, and 0 when the book is empty.
/// Callers must treat 0 as a "no market data" sentinel, not a real price.
pub fn estimate_market_price(book: &ProductBook) -> f64 {
    match (book.buys().first(), book.sells().first()) {
        (Some(buy), Some(sell)) => (buy.price + sell.price) / 2.0,
        (Some(buy), None) => buy.price,
        (None, Some(sell)) => sell.price,
        (None, None) => 0.0,
    }
}

/// Drops every order farther than `tolerance` from the reference price,
/// then overwrites the survivors' price with `new_price`, market and limit
/// orders alike. Returns the number of dropped orders.
///
/// The reference is computed once, before any mutation. Out-of-tolerance
/// orders are discarded outright; the legacy naming suggests a move to a
/// primary queue, but nothing ever archived them.
pub fn apply_tolerance_and_reprice(book: &mut ProductBook, tolerance: f64, new_price: f64) -> usize {
    let reference = estimate_market_price(book);
    let before = book.buys.len() + book.sells.len();

    book.buys.retain(|o| (o.price - reference).abs() <= tolerance);
    book.sells.retain(|o| (o.price - reference).abs() <= tolerance);

    for order in book.buys.iter_mut().chain(book.sells.iter_mut()) {
        order.price = new_price;
    }

    before - (book.buys.len() + book.sells.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Order;
    use crate::store::Side;

    #[test]
    fn test_estimate_is_mean_of_heads() {
        let mut book = ProductBook::default();
        book.insert(Side::Buy, Order::limit(1, 1, 10.0, 5.0));
        book.insert(Side::Buy, Order::limit(2, 1, 50.0, 5.0)); // not the head
        book.insert(Side::Sell, Order::limit(4, 1, 9.5, 6.0));

        assert_eq!(estimate_market_price(&book), 9.75);
    }

    #[test]
    fn test_estimate_single_sided() {
        let mut book = ProductBook::default();
        book.insert(Side::Sell, Order::limit(4, 1, 9.5, 6.0));
        assert_eq!(estimate_market_price(&book), 9.5);

        let mut book = ProductBook::default();
        book.insert(Side::Buy, Order::limit(1, 1, 10.0, 5.0));
        assert_eq!(estimate_market_price(&book), 10.0);
    }

    #[test]
    fn test_estimate_empty_book_is_zero_sentinel() {
        assert_eq!(estimate_market_price(&ProductBook::default()), 0.0);
    }

    #[test]
    fn test_filter_drops_out_of_tolerance_orders() {
        let mut book = ProductBook::default();
        // Heads put the reference at (10.0 + 9.5) / 2 = 9.75.
        book.insert(Side::Buy, Order::limit(1, 1, 10.0, 5.0));
        book.insert(Side::Buy, Order::limit(2, 1, 9.73, 3.0));
        book.insert(Side::Buy, Order::limit(3, 1, 9.0, 4.0));
        book.insert(Side::Sell, Order::limit(4, 1, 9.5, 6.0));
        book.insert(Side::Sell, Order::limit(5, 1, 9.74, 2.0));

        let dropped = apply_tolerance_and_reprice(&mut book, 0.05, 9.8);

        // The heads themselves are outside the band and go too.
        assert_eq!(dropped, 3);
        let buy_ids: Vec<u64> = book.buys().iter().map(|o| o.id).collect();
        let sell_ids: Vec<u64> = book.sells().iter().map(|o| o.id).collect();
        assert_eq!(buy_ids, vec![2]);
        assert_eq!(sell_ids, vec![5]);
    }

    #[test]
    fn test_survivors_repriced_unconditionally() {
        let mut book = ProductBook::default();
        book.insert(Side::Buy, Order::limit(1, 1, 10.0, 5.0));
        book.insert(Side::Sell, Order::limit(4, 1, 10.0, 6.0));
        book.insert(Side::Sell, Order::market(5, 1, 2.0)); // price 0, dropped by band

        apply_tolerance_and_reprice(&mut book, 0.5, 11.0);

        assert!(book.buys().iter().chain(book.sells()).all(|o| o.price == 11.0));
        assert_eq!(book.sells().len(), 1);
    }

    #[test]
    fn test_zero_tolerance_keeps_exact_matches_only() {
        let mut book = ProductBook::default();
        book.insert(Side::Buy, Order::limit(1, 1, 10.0, 5.0));
        book.insert(Side::Sell, Order::limit(4, 1, 10.0, 6.0));

        // Reference is exactly 10.0, so both heads survive a zero band.
        let dropped = apply_tolerance_and_reprice(&mut book, 0.0, 10.5);
        assert_eq!(dropped, 0);
        assert!(book.buys().iter().chain(book.sells()).all(|o| o.price == 10.5));
    }
}
