//! 仿真配置
//!
//! 构造时确定，运行中不可修改。

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, SimError};

/// 默认防饥饿阈值：每层楼 6 个 tick，约为空载往返整栋楼三次的时间
pub const WAIT_TICKS_PER_FLOOR: u64 = 6;

fn default_tick_delay_ms() -> u64 {
    100
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    pub floors: usize,
    #[serde(default)]
    pub population: usize,
    pub capacity: usize,
    /// 界面刷新间隔，只影响展示节奏
    #[serde(default = "default_tick_delay_ms")]
    pub tick_delay_ms: u64,
    /// 防饥饿阈值；缺省时按楼层数推算
    #[serde(default)]
    pub max_wait_ticks: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            floors: 5,
            population: 10,
            capacity: 4,
            tick_delay_ms: default_tick_delay_ms(),
            max_wait_ticks: None,
        }
    }
}

impl SimConfig {
    pub fn new(floors: usize, population: usize, capacity: usize) -> Self {
        Self {
            floors,
            population,
            capacity,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.floors <= 1 {
            return Err(SimError::InvalidConfig(format!(
                "floors must be at least 2, got {}",
                self.floors
            )));
        }
        if self.capacity == 0 {
            return Err(SimError::InvalidConfig(
                "capacity must be at least 1".to_string(),
            ));
        }
        if self.tick_delay_ms == 0 {
            return Err(SimError::InvalidConfig(
                "tick delay must be at least 1 ms".to_string(),
            ));
        }
        if self.max_wait_ticks == Some(0) {
            return Err(SimError::InvalidConfig(
                "max wait ticks must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// 实际生效的防饥饿阈值
    pub fn starvation_bound(&self) -> u64 {
        self.max_wait_ticks
            .unwrap_or_else(|| WAIT_TICKS_PER_FLOOR.saturating_mul(self.floors as u64))
    }

    pub fn tick_delay(&self) -> Duration {
        Duration::from_millis(self.tick_delay_ms)
    }

    /// 完成一批请求所需 tick 的宽松上界，用作运行保护
    pub fn tick_budget(&self, requests: usize, last_arrival: u64) -> u64 {
        let floors = self.floors as u64;
        let per_request = floors.saturating_mul(4).saturating_add(4);
        last_arrival
            .saturating_add(per_request.saturating_mul(requests as u64 + 1))
            .saturating_add(self.starvation_bound())
    }
}
