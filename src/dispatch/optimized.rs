//! 行程前瞻调度（带防饥饿）
//!
//! 载客时与扫描调度一致：保持乘客方向，只在下客或顺路同向上客时停靠。
//!
//! 轿厢为空时先决定扫描方向：对两个方向各推演一遍当前队列的服务过程
//! （按容量上车、前方无事掉头），取总行程较小者，相同则保持原朝向。
//! 然后在该方向下按优先级选出目标请求：
//! 1. 前方（含本层）且同向的请求
//! 2. 前方但反向的请求
//! 3. 其余请求
//!
//! 空载前往目标的途中，本层若有与前进方向一致的请求，先停下接上。
//!
//! 同一档内按距离、到达先后、id 排序。等距的两个请求先比方向（档位），再比到达先后。
//!
//! 防饥饿：等待满 `max_wait_ticks` 的请求排在所有未挨饿请求之前，
//! 不论方向都视作“前方”。此时不再比较扫描方向，沿当前朝向依次服务挨饿请求。

use tracing::trace;

use crate::lift::{Direction, LiftState, Request, RequestId, RequestQueue};
use crate::sim::Tick;

use super::{Decision, Dispatcher, carrying_direction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Tier {
    Ahead,
    Beyond,
    Behind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Urgency {
    Starving,
    Normal,
}

/// 候选请求的优先级键，越小越优先（字段顺序即比较顺序）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Priority {
    urgency: Urgency,
    tier: Tier,
    distance: usize,
    arrival: Tick,
    id: RequestId,
}

impl Priority {
    fn of(floor: usize, sweep: Direction, starving: bool, request: &Request) -> Self {
        let ahead = sweep.is_ahead(floor, request.origin);
        let tier = if request.direction() == sweep && (ahead || request.origin == floor) {
            Tier::Ahead
        } else if ahead {
            Tier::Beyond
        } else {
            Tier::Behind
        };
        Priority {
            urgency: if starving {
                Urgency::Starving
            } else {
                Urgency::Normal
            },
            tier,
            distance: floor.abs_diff(request.origin),
            arrival: request.arrival,
            id: request.id,
        }
    }
}

/// 从空轿厢出发，沿 `heading` 扫描服务完 `pending`（起点、终点）所需的行程。
///
/// 与扫描调度的行为一致：同向且有空位才上车，前方没有目的地和候梯请求时掉头。
/// 推演不考虑后续到达的请求。
fn sweep_cost(floor: usize, heading: Direction, capacity: usize, pending: &[(usize, usize)]) -> u64 {
    let mut waiting = pending.to_vec();
    let mut riding: Vec<usize> = Vec::new();
    let mut pos = floor;
    let mut dir = heading;
    let mut cost = 0u64;
    // 每个往返至少接上一位乘客
    let top = pending
        .iter()
        .map(|&(from, to)| from.max(to))
        .fold(floor, usize::max) as u64;
    let limit = (pending.len() as u64 + 1).saturating_mul(4 * (top + 1));

    for _ in 0..limit {
        riding.retain(|&to| to != pos);
        let mut room = capacity.saturating_sub(riding.len());
        waiting.retain(|&(from, to)| {
            if room > 0 && from == pos && Direction::between(from, to) == Some(dir) {
                riding.push(to);
                room -= 1;
                false
            } else {
                true
            }
        });
        if waiting.is_empty() && riding.is_empty() {
            return cost;
        }
        let ahead = !riding.is_empty() || waiting.iter().any(|&(from, _)| dir.is_ahead(pos, from));
        if !ahead {
            dir = dir.reverse();
            continue;
        }
        pos = match dir {
            Direction::Up => pos + 1,
            Direction::Down => pos.saturating_sub(1),
        };
        cost += 1;
    }
    u64::MAX
}

#[derive(Debug, Clone, Copy)]
pub struct OptimizedDispatcher {
    max_wait_ticks: u64,
}

impl OptimizedDispatcher {
    pub fn new(max_wait_ticks: u64) -> Self {
        Self { max_wait_ticks }
    }

    /// 关闭防饥饿（仅用于对照实验）
    pub fn unguarded() -> Self {
        Self {
            max_wait_ticks: u64::MAX,
        }
    }

    pub fn max_wait_ticks(&self) -> u64 {
        self.max_wait_ticks
    }

    fn is_starving(&self, request: &Request, now: Tick) -> bool {
        request.waited(now) >= self.max_wait_ticks
    }

    /// 空轿厢的扫描方向
    fn plan_sweep(&self, lift: &LiftState, queue: &RequestQueue, now: Tick) -> Direction {
        let heading = lift.heading().unwrap_or(Direction::Up);
        if queue.iter().any(|r| self.is_starving(r, now)) {
            trace!(floor = lift.floor(), %heading, "存在挨饿请求，保持扫描方向");
            return heading;
        }
        let pending: Vec<(usize, usize)> = queue
            .iter()
            .map(|r| (r.origin, r.destination))
            .collect();
        let keep = sweep_cost(lift.floor(), heading, lift.capacity(), &pending);
        let turn = sweep_cost(lift.floor(), heading.reverse(), lift.capacity(), &pending);
        trace!(floor = lift.floor(), %heading, keep, turn, "比较两个扫描方向");
        if turn < keep { heading.reverse() } else { heading }
    }

    /// 空轿厢下一步要去接的请求；队列为空时返回 `None`
    pub fn target<'q>(
        &self,
        lift: &LiftState,
        queue: &'q RequestQueue,
        now: Tick,
    ) -> Option<&'q Request> {
        let floor = lift.floor();
        let sweep = self.plan_sweep(lift, queue, now);
        queue
            .iter()
            .min_by_key(|r| Priority::of(floor, sweep, self.is_starving(r, now), r))
    }
}

impl Dispatcher for OptimizedDispatcher {
    fn name(&self) -> &'static str {
        "optimized"
    }

    fn decide(&self, lift: &LiftState, queue: &RequestQueue, now: Tick) -> Decision {
        if lift.is_empty() && queue.is_empty() {
            return Decision::Idle;
        }

        let floor = lift.floor();
        let alighting = lift.has_destination(floor);

        if let Some(d) = carrying_direction(lift) {
            let boarding = lift.room_after_alighting() > 0
                && queue.at_floor(floor).any(|r| r.direction() == d);
            return if alighting || boarding {
                Decision::Stop { onward: d }
            } else {
                Decision::Move { direction: d }
            };
        }

        // 轿厢为空，或本层下客后为空
        let Some(target) = self.target(lift, queue, now) else {
            return Decision::Stop {
                onward: lift.heading().unwrap_or(Direction::Up),
            };
        };
        trace!(
            floor,
            target = %target.id,
            origin = target.origin,
            starving = self.is_starving(target, now),
            "optimized 选定目标"
        );

        match Direction::between(floor, target.origin) {
            None => Decision::Stop {
                onward: target.direction(),
            },
            // 顺路：本层有与前进方向一致的请求就先接上
            Some(toward)
                if alighting || queue.at_floor(floor).any(|r| r.direction() == toward) =>
            {
                Decision::Stop { onward: toward }
            }
            Some(toward) => Decision::Move { direction: toward },
        }
    }
}
