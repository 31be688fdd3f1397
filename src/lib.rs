// 全局内存分配器：使用 jemalloc 提升性能
#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

pub mod book;
pub mod cli;
pub mod codec;
mod matcher;
pub mod pricing;
pub mod protocol;
pub mod reporting;
pub mod store;
pub mod timestamp;

pub use book::OrderBook;
pub use codec::{BincodeCodec, Codec, CodecError, JsonCodec};
pub use protocol::{BookSnapshot, Order, OrderKind, TradeReport};
pub use reporting::{ChannelSink, LogSink, MemorySink, TradeSink};
