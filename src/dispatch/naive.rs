//! 机械式扫描调度（基准）
//!
//! 只要还有乘客或候梯请求，就沿当前方向一直运行到顶层或底层再掉头，
//! 中途不会因为前方没有请求而提前折返。途经楼层只接与扫描方向一致的乘客。

use tracing::trace;

use crate::lift::{Direction, LiftState, RequestQueue};
use crate::sim::Tick;

use super::{Decision, Dispatcher, carrying_direction};

#[derive(Debug, Default, Clone, Copy)]
pub struct NaiveDispatcher;

impl NaiveDispatcher {
    /// 空载时的扫描方向：保持朝向，到达井道端点才掉头
    fn sweep_direction(lift: &LiftState) -> Direction {
        let current = lift.heading().unwrap_or(Direction::Up);
        let at_end = match current {
            Direction::Up => lift.floor() + 1 >= lift.floors(),
            Direction::Down => lift.floor() == 0,
        };
        if at_end { current.reverse() } else { current }
    }
}

impl Dispatcher for NaiveDispatcher {
    fn name(&self) -> &'static str {
        "naive"
    }

    fn decide(&self, lift: &LiftState, queue: &RequestQueue, _now: Tick) -> Decision {
        if lift.is_empty() && queue.is_empty() {
            return Decision::Idle;
        }

        let floor = lift.floor();
        let sweep = carrying_direction(lift).unwrap_or_else(|| Self::sweep_direction(lift));
        let alighting = lift.has_destination(floor);
        let boarding = lift.room_after_alighting() > 0
            && queue.at_floor(floor).any(|r| r.direction() == sweep);

        trace!(floor, %sweep, alighting, boarding, "naive 扫描");
        if alighting || boarding {
            Decision::Stop { onward: sweep }
        } else {
            Decision::Move { direction: sweep }
        }
    }
}
