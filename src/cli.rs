/// CLI Interface Module
///
/// Entry point for the demo harness. Seeds a small known book, runs a
/// matching pass, prints the book before and after, then cancels two
/// orders and prints again. None of this is engine logic; it only drives
/// the caller surface.

use crate::book::OrderBook;
use crate::codec::JsonCodec;
use crate::protocol::{BookSnapshot, Order};
use crate::reporting::MemorySink;
use clap::Parser;
use std::sync::Arc;

/// 撮合核心演示程序配置
#[derive(Parser, Debug, Clone)]
#[command(name = "matching-core")]
#[command(version = "0.1.0")]
#[command(about = "In-memory order matching core demo", long_about = None)]
pub struct CliConfig {
    /// Price tolerance used by update-price filtering
    #[arg(short, long, default_value_t = 0.05)]
    pub tolerance: f64,

    /// Product id the demo seeds and matches
    #[arg(short = 'P', long, default_value_t = 1)]
    pub product: u64,

    /// 日志级别
    #[arg(short, long, default_value = "info", value_parser = ["trace", "debug", "info", "warn", "error"])]
    pub log_level: String,

    /// Print the seeded book and exit without matching
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

/// Runs the demo harness.
pub fn run() {
    let config = CliConfig::parse();
    init_logging(&config.log_level);

    tracing::info!(?config, "matching core demo starting");

    let sink = Arc::new(MemorySink::new());
    let engine = OrderBook::with_collaborators(config.tolerance, JsonCodec, sink.clone());
    let product = config.product;

    // The classic five-order demo book.
    engine.add_buy(Order::limit(1, product, 10.0, 5.0).with_priority(5));
    engine.add_buy(Order::market(2, product, 3.0).with_priority(3));
    engine.add_buy(Order::limit(3, product, 12.0, 7.0).with_priority(8));
    engine.add_sell(Order::limit(4, product, 11.5, 10.0).with_priority(4));
    engine.add_sell(Order::market(5, product, 5.0).with_priority(6));

    print_book("Initial order book", &engine.snapshot(product));

    if config.dry_run {
        println!("\ndry-run: skipping the matching pass");
        return;
    }

    engine.match_orders(product);
    for trade in sink.take() {
        println!(
            "Trade: buy {} x sell {} for product {} at price {:.2}, amount {:.2}",
            trade.buy_order_id, trade.sell_order_id, trade.product_id, trade.price, trade.amount
        );
    }
    print_book("Order book after matching", &engine.snapshot(product));

    engine.cancel_buy(product, 2);
    engine.cancel_sell(product, 5);
    print_book("Order book after cancellation", &engine.snapshot(product));
}

fn print_book(title: &str, snapshot: &BookSnapshot) {
    println!("\n{title} (product {}):", snapshot.product_id);
    println!("  Buy orders:");
    for order in &snapshot.buys {
        println!(
            "    id: {}, kind: {:?}, price: {:.2}, amount: {:.2}, priority: {}",
            order.id, order.kind, order.price, order.amount, order.priority
        );
    }
    println!("  Sell orders:");
    for order in &snapshot.sells {
        println!(
            "    id: {}, kind: {:?}, price: {:.2}, amount: {:.2}, priority: {}",
            order.id, order.kind, order.price, order.amount, order.priority
        );
    }
}

/// 初始化日志系统
fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
