//! 电梯状态机
//!
//! 持有楼层、朝向、载客和累计行程，并按调度决策推进一个 tick。
//! 调度器只读取状态；所有修改都经过 [`LiftState::apply`]。

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::dispatch::Decision;
use crate::error::{Result, SimError};

use super::queue::RequestQueue;
use super::request::{Direction, Request};

/// 电梯运行模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiftMode {
    Idle,
    MovingUp,
    MovingDown,
    DoorsOpen,
}

/// 单个 tick 的执行结果
#[derive(Debug, Default, Clone)]
pub struct TickOutcome {
    pub moved: bool,
    pub boarded: Vec<Request>,
    pub delivered: Vec<Request>,
}

#[derive(Debug, Clone)]
pub struct LiftState {
    floors: usize,
    capacity: usize,
    floor: usize,
    heading: Option<Direction>,
    mode: LiftMode,
    occupants: Vec<Request>,
    distance: u64,
}

impl LiftState {
    /// 初始状态：0 层、空闲、空载
    pub fn new(floors: usize, capacity: usize) -> Self {
        Self {
            floors,
            capacity,
            floor: 0,
            heading: None,
            mode: LiftMode::Idle,
            occupants: Vec::new(),
            distance: 0,
        }
    }

    pub fn floor(&self) -> usize {
        self.floor
    }

    pub fn floors(&self) -> usize {
        self.floors
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 当前朝向；`None` 表示空闲
    pub fn heading(&self) -> Option<Direction> {
        self.heading
    }

    pub fn mode(&self) -> LiftMode {
        self.mode
    }

    pub fn occupants(&self) -> &[Request] {
        &self.occupants
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    /// 累计移动楼层数
    pub fn distance(&self) -> u64 {
        self.distance
    }

    /// 轿厢内是否有人要在 `floor` 下
    pub fn has_destination(&self, floor: usize) -> bool {
        self.occupants.iter().any(|r| r.destination == floor)
    }

    /// 在本层下客之后仍留在轿厢内的乘客
    pub fn staying(&self) -> impl Iterator<Item = &Request> + '_ {
        let floor = self.floor;
        self.occupants.iter().filter(move |r| r.destination != floor)
    }

    /// 本层下客后剩余的空位
    pub fn room_after_alighting(&self) -> usize {
        self.capacity.saturating_sub(self.staying().count())
    }

    /// 应用一个调度决策。
    ///
    /// 非法决策返回 [`SimError::DispatchViolation`]，此时状态保持不变。
    pub fn apply(&mut self, decision: Decision, queue: &mut RequestQueue) -> Result<TickOutcome> {
        match decision {
            Decision::Move { direction } => self.move_one(decision, direction),
            Decision::Stop { onward } => self.open_doors(decision, onward, queue),
            Decision::Idle => {
                if !self.occupants.is_empty() {
                    return Err(self.violation(decision, "passengers still on board"));
                }
                if !queue.is_empty() {
                    return Err(self.violation(decision, "requests still pending"));
                }
                self.mode = LiftMode::Idle;
                self.heading = None;
                Ok(TickOutcome::default())
            }
        }
    }

    fn move_one(&mut self, decision: Decision, direction: Direction) -> Result<TickOutcome> {
        if self
            .occupants
            .iter()
            .any(|r| r.direction() != direction)
        {
            return Err(self.violation(decision, "moving against passengers on board"));
        }
        let next = match direction {
            Direction::Up if self.floor + 1 < self.floors => self.floor + 1,
            Direction::Down if self.floor > 0 => self.floor - 1,
            _ => return Err(self.violation(decision, "move leaves the shaft")),
        };
        trace!(from = self.floor, to = next, "电梯移动");
        self.floor = next;
        self.heading = Some(direction);
        self.mode = match direction {
            Direction::Up => LiftMode::MovingUp,
            Direction::Down => LiftMode::MovingDown,
        };
        self.distance = self.distance.saturating_add(1);
        Ok(TickOutcome {
            moved: true,
            ..TickOutcome::default()
        })
    }

    fn open_doors(
        &mut self,
        decision: Decision,
        onward: Direction,
        queue: &mut RequestQueue,
    ) -> Result<TickOutcome> {
        if self.staying().any(|r| r.direction() != onward) {
            return Err(self.violation(decision, "onward plan conflicts with passengers on board"));
        }

        let floor = self.floor;
        let (delivered, staying): (Vec<Request>, Vec<Request>) = std::mem::take(&mut self.occupants)
            .into_iter()
            .partition(|r| r.destination == floor);
        self.occupants = staying;

        let room = self.capacity.saturating_sub(self.occupants.len());
        let ids: Vec<_> = queue
            .at_floor(floor)
            .filter(|r| r.direction() == onward)
            .take(room)
            .map(|r| r.id)
            .collect();
        let mut boarded = Vec::with_capacity(ids.len());
        for id in ids {
            let request = queue.remove(id)?;
            self.occupants.push(request.clone());
            boarded.push(request);
        }

        debug!(
            floor,
            %onward,
            delivered = delivered.len(),
            boarded = boarded.len(),
            occupants = self.occupants.len(),
            "开门"
        );

        self.heading = Some(onward);
        self.mode = LiftMode::DoorsOpen;
        Ok(TickOutcome {
            moved: false,
            boarded,
            delivered,
        })
    }

    fn violation(&self, decision: Decision, reason: &'static str) -> SimError {
        SimError::DispatchViolation {
            decision,
            floor: self.floor,
            reason,
        }
    }
}
