//! 统计信息
//!
//! 运行中累计的计数器，以及运行结束后的汇总。

use serde::{Deserialize, Serialize};

use super::ledger::Ledger;

/// 运行统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub ticks: u64,
    pub total_distance: u64,
    pub delivered: u64,
    pub stops: u64,
    pub max_occupancy: usize,
}

/// 一次运行的汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub algorithm: String,
    pub ticks: u64,
    pub total_distance: u64,
    pub delivered: u64,
    pub stops: u64,
    pub max_occupancy: usize,
    pub mean_wait: f64,
    pub max_wait: u64,
    pub mean_journey: f64,
}

impl RunSummary {
    pub fn new(algorithm: &str, stats: &RunStats, ledger: &Ledger) -> Self {
        let waits: Vec<u64> = ledger.iter().filter_map(|r| r.wait_ticks()).collect();
        let journeys: Vec<u64> = ledger.iter().filter_map(|r| r.journey_ticks()).collect();
        Self {
            algorithm: algorithm.to_string(),
            ticks: stats.ticks,
            total_distance: stats.total_distance,
            delivered: stats.delivered,
            stops: stats.stops,
            max_occupancy: stats.max_occupancy,
            mean_wait: mean(&waits),
            max_wait: waits.iter().copied().max().unwrap_or(0),
            mean_journey: mean(&journeys),
        }
    }
}

fn mean(values: &[u64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<u64>() as f64 / values.len() as f64
}
