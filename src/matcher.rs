/// 撮合核心：两阶段的枚举-应用算法
///
/// Phase one enumerates the full buy × sell cross-product in arrival order
/// and records every crossing pair as a trade intent. Phase two applies the
/// intents one at a time, in discovery order, against the live book. The
/// legacy engine routed intents through a channel to a single consumer
/// task; with one producer and one consumer that collapses to this plain
/// sequential form.
///
/// Discovery runs against the book as it stood when the pass began, while
/// application mutates live state, so an intent can go stale mid-pass when
/// an earlier trade fills or removes one of its orders. Stale intents are
/// skipped silently. Discovery order, not price or time priority, decides
/// which orders trade when one order crosses several counterparties.

use crate::protocol::{Order, OrderKind, TradeReport};
use crate::reporting::TradeSink;
use crate::store::ProductBook;
use crate::timestamp;
use smallvec::SmallVec;

/// A crossing pair discovered during enumeration. Only ids are carried;
/// both orders are re-resolved against the live book at application time.
#[derive(Debug, Clone, Copy)]
struct TradeIntent {
    buy_id: u64,
    sell_id: u64,
}

/// True when `buy` and `sell` cross.
///
/// The legacy predicate special-cased market orders after this comparison,
/// but a market order rests at price 0, so that branch never changed the
/// outcome. The bare comparison is the whole predicate; market orders do
/// not cross unconditionally.
fn crosses(buy: &Order, sell: &Order) -> bool {
    buy.price >= sell.price
}

/// Runs one full matching pass for `product_id`.
///
/// The caller holds the product's lock for the whole call, so the pass is
/// atomic with respect to every other operation on the product. Each
/// applied trade is pushed to `sink` exactly once; skipped intents emit
/// nothing. Returns the applied trades in order.
pub(crate) fn run_pass(
    product_id: u64,
    book: &mut ProductBook,
    sink: &dyn TradeSink,
) -> Vec<TradeReport> {
    // Phase 1: nothing mutates yet, so the live vectors are the entry
    // snapshot the intents are discovered against.
    let mut intents: SmallVec<[TradeIntent; 8]> = SmallVec::new();
    for buy in book.buys() {
        for sell in book.sells() {
            if crosses(buy, sell) {
                intents.push(TradeIntent {
                    buy_id: buy.id,
                    sell_id: sell.id,
                });
            }
        }
    }

    // Phase 2: apply strictly in discovery order against live state.
    let mut reports = Vec::new();
    for intent in intents {
        if let Some(report) = apply_intent(product_id, book, intent) {
            sink.on_trade(&report);
            reports.push(report);
        }
    }

    tracing::debug!(
        product = product_id,
        trades = reports.len(),
        "matching pass complete"
    );
    reports
}

/// Applies one trade intent, or skips it when either side is gone.
fn apply_intent(
    product_id: u64,
    book: &mut ProductBook,
    intent: TradeIntent,
) -> Option<TradeReport> {
    let buy_pos = book.buys.iter().position(|o| o.id == intent.buy_id);
    let sell_pos = book.sells.iter().position(|o| o.id == intent.sell_id);
    let (Some(b), Some(s)) = (buy_pos, sell_pos) else {
        tracing::trace!(
            buy = intent.buy_id,
            sell = intent.sell_id,
            "stale trade intent skipped"
        );
        return None;
    };

    // A market order adopts the counterparty's price; the buy side is
    // resolved first when both are market orders.
    if book.buys[b].kind == OrderKind::Market {
        book.buys[b].price = book.sells[s].price;
    } else if book.sells[s].kind == OrderKind::Market {
        book.sells[s].price = book.buys[b].price;
    }

    let trade_amount = book.buys[b].amount.min(book.sells[s].amount);
    book.buys[b].amount -= trade_amount;
    book.sells[s].amount -= trade_amount;

    let report = TradeReport {
        buy_order_id: intent.buy_id,
        sell_order_id: intent.sell_id,
        product_id,
        price: book.buys[b].price,
        amount: trade_amount,
        timestamp: timestamp::coarse_now(),
    };

    // An amount of exactly 0 never rests; min() guarantees the smaller
    // side lands on 0.0 with no rounding.
    if book.buys[b].amount == 0.0 {
        book.buys.remove(b);
    }
    if book.sells[s].amount == 0.0 {
        book.sells.remove(s);
    }

    Some(report)
}
