mod runner;

use crate::dispatch::Algorithm;
use crate::lift::Request;
use crate::sim::{RunSummary, SimConfig, SimulationRunner, Tick};
use crate::viz::{SnapshotLog, TickSnapshot};

fn req(id: u64, origin: usize, destination: usize, arrival: u64) -> Request {
    Request::new(id, origin, destination, Tick(arrival))
}

fn building(floors: usize, capacity: usize) -> SimConfig {
    SimConfig::new(floors, 0, capacity)
}

/// 跑完一组请求，返回汇总、快照和结束时的运行器
fn run_all(
    algorithm: Algorithm,
    config: SimConfig,
    requests: Vec<Request>,
) -> (RunSummary, Vec<TickSnapshot>, SimulationRunner) {
    let dispatcher = algorithm.dispatcher(config.starvation_bound());
    let mut runner =
        SimulationRunner::with_requests(config, dispatcher, requests).expect("build runner");
    let mut log = SnapshotLog::default();
    let summary = runner.run(10_000, &mut log).expect("run to completion");
    (summary, log.snapshots, runner)
}
