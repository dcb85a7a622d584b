//! 观察者 trait
//!
//! 每个 tick 结束后接收快照，由展示层实现（JSON 记录、终端日志等）。

use crate::viz::TickSnapshot;

pub trait TickObserver {
    fn on_tick(&mut self, _snapshot: &TickSnapshot) {}
}

/// 丢弃所有快照
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl TickObserver for NullObserver {}
