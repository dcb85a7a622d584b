//! 仿真核心模块
//!
//! 此模块包含逐 tick 驱动的仿真组件：仿真时间、待到达请求、运行器、
//! 乘客台账与统计，以及配置、乘客清单和对比运行。

// 子模块声明
mod compare;
mod config;
mod generator;
mod ledger;
mod manifest;
mod observer;
mod runner;
mod scheduled_arrival;
mod stats;
mod tick;

// 重新导出公共接口
pub use compare::{Comparison, reduction_pct, run_manifest};
pub use config::{SimConfig, WAIT_TICKS_PER_FLOOR};
pub use generator::PassengerGenerator;
pub use ledger::{Ledger, PassengerOverview, PassengerRecord};
pub use manifest::{MANIFEST_SCHEMA_VERSION, ManifestMeta, PassengerSpec, SimManifest};
pub use observer::{NullObserver, TickObserver};
pub use runner::SimulationRunner;
pub(crate) use scheduled_arrival::ScheduledArrival;
pub use stats::{RunStats, RunSummary};
pub use tick::Tick;
