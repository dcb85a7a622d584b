//! 对比运行
//!
//! 在同一份乘客清单上分别运行 naive 与 optimized 调度，计算行程节省比例。

use serde::{Deserialize, Serialize};

use super::manifest::SimManifest;
use super::observer::TickObserver;
use super::runner::SimulationRunner;
use super::stats::RunSummary;
use crate::dispatch::Algorithm;
use crate::error::Result;

/// 用 `algorithm` 跑完整份清单
pub fn run_manifest(
    manifest: &SimManifest,
    algorithm: Algorithm,
    max_ticks: Option<u64>,
    observer: &mut dyn TickObserver,
) -> Result<RunSummary> {
    let config = manifest.config.clone();
    let budget = max_ticks
        .unwrap_or_else(|| config.tick_budget(manifest.passengers.len(), manifest.last_arrival()));
    let dispatcher = algorithm.dispatcher(config.starvation_bound());
    let mut runner = SimulationRunner::with_requests(config, dispatcher, manifest.requests())?;
    runner.run(budget, observer)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub naive: RunSummary,
    pub optimized: RunSummary,
}

impl Comparison {
    pub fn run(manifest: &SimManifest, max_ticks: Option<u64>) -> Result<Self> {
        let mut sink = super::observer::NullObserver;
        Ok(Self {
            naive: run_manifest(manifest, Algorithm::Naive, max_ticks, &mut sink)?,
            optimized: run_manifest(manifest, Algorithm::Optimized, max_ticks, &mut sink)?,
        })
    }

    /// 相对 naive 的行程节省百分比；naive 行程为 0 时返回 0
    pub fn reduction_pct(&self) -> f64 {
        reduction_pct(self.naive.total_distance, self.optimized.total_distance)
    }
}

pub fn reduction_pct(naive: u64, optimized: u64) -> f64 {
    if naive == 0 {
        return 0.0;
    }
    (naive as f64 - optimized as f64) / naive as f64 * 100.0
}
