//! 乘客请求
//!
//! 定义请求实体、行进方向和请求生命周期状态。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, SimError};
use crate::sim::Tick;

/// 行进方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// 从 `from` 前往 `to` 的方向；同层返回 `None`
    pub fn between(from: usize, to: usize) -> Option<Direction> {
        if to > from {
            Some(Direction::Up)
        } else if to < from {
            Some(Direction::Down)
        } else {
            None
        }
    }

    /// `floor` 是否严格位于 `from` 沿本方向的前方
    pub fn is_ahead(self, from: usize, floor: usize) -> bool {
        match self {
            Direction::Up => floor > from,
            Direction::Down => floor < from,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => f.write_str("up"),
            Direction::Down => f.write_str("down"),
        }
    }
}

/// 请求标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 一位乘客的出行请求，创建后不再修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub id: RequestId,
    pub origin: usize,
    pub destination: usize,
    pub arrival: Tick,
}

impl Request {
    pub fn new(id: u64, origin: usize, destination: usize, arrival: Tick) -> Self {
        Self {
            id: RequestId(id),
            origin,
            destination,
            arrival,
        }
    }

    pub fn direction(&self) -> Direction {
        if self.destination > self.origin {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    /// 检查楼层范围以及起止楼层不同
    pub fn validate(&self, floors: usize) -> Result<()> {
        if self.origin == self.destination {
            return Err(SimError::InvalidRequest {
                id: self.id,
                reason: format!("origin and destination are both floor {}", self.origin),
            });
        }
        let top = self.origin.max(self.destination);
        if top >= floors {
            return Err(SimError::InvalidRequest {
                id: self.id,
                reason: format!("floor {top} outside 0..{floors}"),
            });
        }
        Ok(())
    }

    /// 截至 `now` 已等待的 tick 数
    pub fn waited(&self, now: Tick) -> u64 {
        now.since(self.arrival)
    }
}

/// 请求生命周期：PENDING -> IN_LIFT -> DELIVERED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    InLift,
    Delivered,
}
