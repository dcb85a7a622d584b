//! 仿真驱动
//!
//! 持有电梯状态、候梯队列和调度器，逐 tick 推进。

use std::collections::BinaryHeap;
use tracing::{debug, info, trace};

use super::config::SimConfig;
use super::ledger::{Ledger, PassengerOverview};
use super::observer::TickObserver;
use super::scheduled_arrival::ScheduledArrival;
use super::stats::{RunStats, RunSummary};
use super::tick::Tick;
use crate::dispatch::{Decision, Dispatcher};
use crate::error::{Result, SimError};
use crate::lift::{LiftState, Request, RequestQueue};
use crate::viz::TickSnapshot;

/// 单电梯仿真：一个 tick 内依次完成到达、决策、执行、记账。
#[derive(Debug)]
pub struct SimulationRunner {
    config: SimConfig,
    now: Tick,
    next_seq: u64,
    arrivals: BinaryHeap<ScheduledArrival>,
    arrivals_closed: bool,
    queue: RequestQueue,
    lift: LiftState,
    dispatcher: Box<dyn Dispatcher>,
    ledger: Ledger,
    stats: RunStats,
}

impl SimulationRunner {
    /// 校验配置并构造初始状态（0 层、空闲）
    pub fn new(config: SimConfig, dispatcher: Box<dyn Dispatcher>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            queue: RequestQueue::new(config.floors),
            lift: LiftState::new(config.floors, config.capacity),
            config,
            now: Tick::ZERO,
            next_seq: 0,
            arrivals: BinaryHeap::new(),
            arrivals_closed: false,
            dispatcher,
            ledger: Ledger::default(),
            stats: RunStats::default(),
        })
    }

    /// 一次性登记全部请求并关闭到达
    pub fn with_requests(
        config: SimConfig,
        dispatcher: Box<dyn Dispatcher>,
        requests: impl IntoIterator<Item = Request>,
    ) -> Result<Self> {
        let mut runner = Self::new(config, dispatcher)?;
        for request in requests {
            runner.schedule(request)?;
        }
        runner.close_arrivals();
        Ok(runner)
    }

    /// 登记一个将在 `request.arrival` 到达的请求
    pub fn schedule(&mut self, request: Request) -> Result<()> {
        request.validate(self.config.floors)?;
        if self.arrivals_closed {
            return Err(SimError::InvalidRequest {
                id: request.id,
                reason: "arrivals already closed".to_string(),
            });
        }
        if request.arrival < self.now {
            return Err(SimError::InvalidRequest {
                id: request.id,
                reason: format!("arrival {} is before {}", request.arrival, self.now),
            });
        }
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        trace!(id = %request.id, at = %request.arrival, seq, "登记请求");
        self.arrivals.push(ScheduledArrival {
            at: request.arrival,
            seq,
            request,
        });
        Ok(())
    }

    /// 声明不会再有新请求
    pub fn close_arrivals(&mut self) {
        self.arrivals_closed = true;
    }

    pub fn is_finished(&self) -> bool {
        self.arrivals_closed
            && self.arrivals.is_empty()
            && self.queue.is_empty()
            && self.lift.is_empty()
    }

    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn lift(&self) -> &LiftState {
        &self.lift
    }

    pub fn queue(&self) -> &RequestQueue {
        &self.queue
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn dispatcher_name(&self) -> &'static str {
        self.dispatcher.name()
    }

    pub fn upcoming(&self) -> usize {
        self.arrivals.len()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary::new(self.dispatcher.name(), &self.stats, &self.ledger)
    }

    /// 当前时刻每位已到达乘客的状态
    pub fn overview(&self) -> Vec<PassengerOverview> {
        self.ledger.overview(self.lift.floor())
    }

    fn release_arrivals(&mut self) -> Result<()> {
        while self.arrivals.peek().is_some_and(|a| a.at <= self.now) {
            let Some(item) = self.arrivals.pop() else {
                break;
            };
            trace!(id = %item.request.id, origin = item.request.origin, "请求到达");
            self.ledger.admit(item.request.clone())?;
            self.queue.insert(item.request)?;
        }
        Ok(())
    }

    /// 推进一个 tick 并返回快照
    #[tracing::instrument(skip(self), fields(now = self.now.0, dispatcher = self.dispatcher.name()))]
    pub fn step(&mut self) -> Result<TickSnapshot> {
        self.release_arrivals()?;

        let decision = self
            .dispatcher
            .decide(&self.lift, &self.queue, self.now);
        let outcome = self.lift.apply(decision, &mut self.queue)?;

        for r in &outcome.delivered {
            self.ledger.deliver(r.id, self.now)?;
        }
        for r in &outcome.boarded {
            self.ledger.board(r.id, self.now)?;
        }

        self.stats.ticks = self.stats.ticks.saturating_add(1);
        if outcome.moved {
            self.stats.total_distance = self.stats.total_distance.saturating_add(1);
        }
        if matches!(decision, Decision::Stop { .. }) {
            self.stats.stops = self.stats.stops.saturating_add(1);
        }
        self.stats.delivered = self
            .stats
            .delivered
            .saturating_add(outcome.delivered.len() as u64);
        self.stats.max_occupancy = self.stats.max_occupancy.max(self.lift.occupants().len());

        debug!(
            floor = self.lift.floor(),
            %decision,
            boarded = outcome.boarded.len(),
            delivered = outcome.delivered.len(),
            pending = self.queue.len(),
            "tick 完成"
        );

        let snapshot = TickSnapshot {
            tick: self.now.0,
            floor: self.lift.floor(),
            mode: self.lift.mode(),
            heading: self.lift.heading(),
            decision,
            occupants: self.lift.occupants().iter().map(|r| r.id).collect(),
            pending: self.queue.iter().map(|r| r.id).collect(),
            boarded: outcome.boarded.iter().map(|r| r.id).collect(),
            delivered: outcome.delivered.iter().map(|r| r.id).collect(),
            delivered_this_tick: outcome.delivered.len(),
            upcoming: self.arrivals.len(),
            total_distance: self.lift.distance(),
        };
        self.now = self.now.next();
        Ok(snapshot)
    }

    /// 关闭到达并运行到所有请求送达；超过 `max_ticks` 视为停滞。
    #[tracing::instrument(skip(self, observer), fields(dispatcher = self.dispatcher.name()))]
    pub fn run(&mut self, max_ticks: u64, observer: &mut dyn TickObserver) -> Result<RunSummary> {
        self.close_arrivals();
        info!(
            floors = self.config.floors,
            capacity = self.config.capacity,
            requests = self.arrivals.len() + self.ledger.len(),
            "▶️  开始运行仿真"
        );

        while !self.is_finished() {
            if self.stats.ticks >= max_ticks {
                return Err(SimError::Stalled {
                    ticks: self.stats.ticks,
                    pending: self.queue.len() + self.arrivals.len(),
                    in_lift: self.lift.occupants().len(),
                });
            }
            let snapshot = self.step()?;
            observer.on_tick(&snapshot);
        }

        let summary = self.summary();
        info!(
            ticks = summary.ticks,
            distance = summary.total_distance,
            delivered = summary.delivered,
            "✅ 仿真完成"
        );
        Ok(summary)
    }
}
