//! 运行快照（用于离线回放与终端日志）
//!
//! 设计目标：
//! - **结构化**：每个 tick 一条 JSON 快照，而不是解析文本日志
//! - **可对比**：同一份乘客清单的 naive/optimized 回放可以并排查看

mod types;

pub use types::{Fanout, RunTrace, SnapshotLog, TickSnapshot, TraceLogger};
