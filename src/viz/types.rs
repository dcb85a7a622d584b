use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dispatch::Decision;
use crate::lift::{Direction, LiftMode, RequestId};
use crate::sim::{RunSummary, TickObserver};

/// 单个 tick 结束时的电梯快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub tick: u64,
    pub floor: usize,
    pub mode: LiftMode,
    pub heading: Option<Direction>,
    pub decision: Decision,
    /// 轿厢内乘客（上车顺序）
    pub occupants: Vec<RequestId>,
    /// 已到达但尚未上车的请求
    pub pending: Vec<RequestId>,
    pub boarded: Vec<RequestId>,
    pub delivered: Vec<RequestId>,
    pub delivered_this_tick: usize,
    /// 尚未到达的请求数
    pub upcoming: usize,
    /// 截至本 tick 的累计行程（楼层数）
    pub total_distance: u64,
}

/// 一次运行的完整回放
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunTrace {
    pub algorithm: String,
    pub summary: RunSummary,
    pub snapshots: Vec<TickSnapshot>,
}

/// 一个简单的快照收集器（存内存，运行结束写 JSON 文件）
#[derive(Debug, Default)]
pub struct SnapshotLog {
    pub snapshots: Vec<TickSnapshot>,
}

impl SnapshotLog {
    pub fn into_trace(self, summary: RunSummary) -> RunTrace {
        RunTrace {
            algorithm: summary.algorithm.clone(),
            summary,
            snapshots: self.snapshots,
        }
    }
}

impl TickObserver for SnapshotLog {
    fn on_tick(&mut self, snapshot: &TickSnapshot) {
        self.snapshots.push(snapshot.clone());
    }
}

/// 通过 tracing 输出每个 tick 的终端日志
///
/// `realtime` 时每个 tick 打一条 info 摘要；轿厢内与候梯乘客的 id 列表始终走 debug。
#[derive(Debug, Default)]
pub struct TraceLogger {
    pub realtime: bool,
}

fn id_list(ids: &[RequestId]) -> String {
    let parts: Vec<String> = ids.iter().map(|id| id.0.to_string()).collect();
    format!("[{}]", parts.join(","))
}

impl TickObserver for TraceLogger {
    fn on_tick(&mut self, s: &TickSnapshot) {
        if self.realtime {
            info!(
                tick = s.tick,
                floor = s.floor,
                decision = %s.decision,
                in_lift = s.occupants.len(),
                pending = s.pending.len(),
                delivered = s.delivered_this_tick,
                distance = s.total_distance,
                "🛗 tick"
            );
        }
        debug!(
            tick = s.tick,
            floor = s.floor,
            in_lift = %id_list(&s.occupants),
            pending = %id_list(&s.pending),
            boarded = %id_list(&s.boarded),
            delivered = %id_list(&s.delivered),
            "乘客列表"
        );
    }
}

/// 依次转发给多个观察者
pub struct Fanout<'a> {
    pub observers: Vec<&'a mut dyn TickObserver>,
}

impl TickObserver for Fanout<'_> {
    fn on_tick(&mut self, snapshot: &TickSnapshot) {
        for o in self.observers.iter_mut() {
            o.on_tick(snapshot);
        }
    }
}
