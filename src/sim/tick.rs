//! 仿真时间类型
//!
//! 离散 tick：每个 tick 内电梯最多移动一层或停靠一次。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 仿真时间（tick 序号）。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    pub fn next(self) -> Tick {
        Tick(self.0.saturating_add(1))
    }

    /// 自 `earlier` 以来经过的 tick 数；`earlier` 在未来时返回 0。
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}
