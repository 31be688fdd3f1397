/// 成交回报的分发
///
/// The matcher emits exactly one event per applied trade and none for
/// skipped intents. Sinks run inside the matching pass's critical section,
/// so they should hand work off rather than block.

use crate::protocol::TradeReport;
use crossbeam::channel::Sender;
use parking_lot::Mutex;

/// Receives one event per applied trade.
pub trait TradeSink: Send + Sync {
    fn on_trade(&self, trade: &TradeReport);
}

/// Logs each trade through `tracing`. The legacy engine printed trades to
/// stdout; structured fields replace that format string.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl TradeSink for LogSink {
    fn on_trade(&self, trade: &TradeReport) {
        tracing::info!(
            buy = trade.buy_order_id,
            sell = trade.sell_order_id,
            product = trade.product_id,
            price = trade.price,
            amount = trade.amount,
            "trade"
        );
    }
}

/// Forwards each trade over a crossbeam channel to an external consumer.
pub struct ChannelSink {
    sender: Sender<TradeReport>,
}

impl ChannelSink {
    pub fn new(sender: Sender<TradeReport>) -> Self {
        ChannelSink { sender }
    }
}

impl TradeSink for ChannelSink {
    fn on_trade(&self, trade: &TradeReport) {
        if self.sender.send(trade.clone()).is_err() {
            tracing::warn!(
                buy = trade.buy_order_id,
                sell = trade.sell_order_id,
                "trade channel closed, report dropped"
            );
        }
    }
}

/// Buffers trades in memory. Used by tests and the demo harness.
#[derive(Debug, Default)]
pub struct MemorySink {
    trades: Mutex<Vec<TradeReport>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains and returns everything reported so far.
    pub fn take(&self) -> Vec<TradeReport> {
        std::mem::take(&mut *self.trades.lock())
    }

    pub fn len(&self) -> usize {
        self.trades.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.lock().is_empty()
    }
}

impl TradeSink for MemorySink {
    fn on_trade(&self, trade: &TradeReport) {
        self.trades.lock().push(trade.clone());
    }
}
