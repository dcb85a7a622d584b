//! 调度策略
//!
//! 两种调度器实现同一个 [`Dispatcher`] trait：
//! - [`NaiveDispatcher`]：机械式往返扫描，作为基准
//! - [`OptimizedDispatcher`]：空载时比较两个扫描方向的前瞻行程，并带防饥饿，目标是减少总行程
//!
//! 调度器是纯函数：只读取电梯状态与队列，返回一个 [`Decision`]，
//! 由 `SimulationRunner` 负责应用。

mod naive;
mod optimized;

pub use naive::NaiveDispatcher;
pub use optimized::OptimizedDispatcher;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::lift::{Direction, LiftState, RequestQueue};
use crate::sim::Tick;

/// 单个 tick 的调度决策
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decision {
    /// 向 `direction` 移动一层
    Move { direction: Direction },
    /// 在当前楼层开门；只有方向为 `onward` 的候梯乘客会上车
    Stop { onward: Direction },
    /// 无事可做
    Idle,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Move { direction } => write!(f, "move {direction}"),
            Decision::Stop { onward } => write!(f, "stop (onward {onward})"),
            Decision::Idle => f.write_str("idle"),
        }
    }
}

/// 调度接口
pub trait Dispatcher: fmt::Debug {
    fn name(&self) -> &'static str;

    /// 根据当前状态给出下一步决策；不得修改任何状态。
    fn decide(&self, lift: &LiftState, queue: &RequestQueue, now: Tick) -> Decision;
}

/// 可选的调度算法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Naive,
    Optimized,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::Naive, Algorithm::Optimized];

    /// 构造调度器；`max_wait_ticks` 只对优化调度器生效
    pub fn dispatcher(self, max_wait_ticks: u64) -> Box<dyn Dispatcher> {
        match self {
            Algorithm::Naive => Box::new(NaiveDispatcher),
            Algorithm::Optimized => Box::new(OptimizedDispatcher::new(max_wait_ticks)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Naive => "naive",
            Algorithm::Optimized => "optimized",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "naive" | "mechanical" => Ok(Algorithm::Naive),
            "optimized" | "optimised" | "improved" => Ok(Algorithm::Optimized),
            other => Err(format!("unknown algorithm: {other}")),
        }
    }
}

/// 下客后仍在轿厢内的乘客的共同方向
fn carrying_direction(lift: &LiftState) -> Option<Direction> {
    lift.staying().next().map(|r| r.direction())
}
