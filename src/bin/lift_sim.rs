//! 单电梯调度仿真
//!
//! 生成（或加载）一份乘客清单，用 naive / optimized 调度运行并输出对比结果。

use clap::{Parser, ValueEnum};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use liftsim_rs::dispatch::Algorithm;
use liftsim_rs::error::Result;
use liftsim_rs::sim::{
    PassengerOverview, RunSummary, SimConfig, SimManifest, SimulationRunner, TickObserver,
    reduction_pct,
};
use liftsim_rs::viz::{Fanout, RunTrace, SnapshotLog, TickSnapshot, TraceLogger};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Naive,
    Optimized,
    Compare,
}

#[derive(Debug, Parser)]
#[command(name = "lift_sim", about = "单电梯调度仿真：naive 与 optimized 行程对比")]
struct Args {
    #[arg(long, default_value_t = 5)]
    floors: usize,
    /// 乘客人数
    #[arg(long, default_value_t = 10)]
    people: usize,
    #[arg(long, default_value_t = 4)]
    capacity: usize,
    /// 随机种子；缺省时取当前时间并打印出来便于复现
    #[arg(long)]
    seed: Option<u64>,
    /// 乘客到达时间在 [0, window) 内均匀分布；0 表示全部在开始时到达
    #[arg(long, default_value_t = 0)]
    arrival_window: u64,
    /// 防饥饿阈值（tick），缺省为 6 × 楼层数
    #[arg(long)]
    max_wait_ticks: Option<u64>,
    /// 每个 tick 的展示间隔（毫秒），仅在 --realtime 时生效
    #[arg(long, default_value_t = 100)]
    tick_delay_ms: u64,
    /// 按 tick 间隔实时推进并打印每个 tick
    #[arg(long, default_value_t = false)]
    realtime: bool,
    /// 从 JSON 清单加载配置和乘客，忽略上面的生成参数
    #[arg(long)]
    manifest: Option<PathBuf>,
    /// 把本次使用的清单写到该路径
    #[arg(long)]
    write_manifest: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = Mode::Compare)]
    algorithm: Mode,
    /// 输出逐 tick 快照（RunTrace 数组）
    #[arg(long)]
    snapshots_json: Option<PathBuf>,
    /// tick 上限，缺省按请求数推算
    #[arg(long)]
    max_ticks: Option<u64>,
    /// 运行结束后打印乘客总览
    #[arg(long, default_value_t = false)]
    overview: bool,
    /// 把每种调度结束时的乘客总览写成 JSON（按算法名分组）
    #[arg(long)]
    overview_json: Option<PathBuf>,
}

/// 实时模式下每个 tick 之后睡眠
struct Pacer {
    delay: Duration,
}

impl TickObserver for Pacer {
    fn on_tick(&mut self, _snapshot: &TickSnapshot) {
        thread::sleep(self.delay);
    }
}

fn main() -> ExitCode {
    // 初始化 tracing（写 stderr，stdout 只留结果行）
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("lift_sim: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_manifest(args: &Args) -> Result<SimManifest> {
    if let Some(path) = &args.manifest {
        return SimManifest::load(path);
    }
    let config = SimConfig {
        floors: args.floors,
        population: args.people,
        capacity: args.capacity,
        tick_delay_ms: args.tick_delay_ms,
        max_wait_ticks: args.max_wait_ticks,
    };
    let seed = args.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });
    SimManifest::generate(config, seed, args.arrival_window)
}

fn run(args: &Args) -> Result<()> {
    let manifest = load_manifest(args)?;
    if let Some(path) = &args.write_manifest {
        manifest.save(path)?;
        eprintln!("wrote manifest to {}", path.display());
    }

    let config = &manifest.config;
    let seed = manifest
        .meta
        .as_ref()
        .and_then(|m| m.seed)
        .map(|s| s.to_string())
        .unwrap_or_else(|| "none".to_string());
    println!(
        "config floors={} people={} capacity={} seed={} max_wait_ticks={}",
        config.floors,
        manifest.passengers.len(),
        config.capacity,
        seed,
        config.starvation_bound()
    );

    let algorithms: Vec<Algorithm> = match args.algorithm {
        Mode::Naive => vec![Algorithm::Naive],
        Mode::Optimized => vec![Algorithm::Optimized],
        Mode::Compare => Algorithm::ALL.to_vec(),
    };

    let mut summaries = Vec::new();
    let mut traces: Vec<RunTrace> = Vec::new();
    let mut overviews: BTreeMap<String, Vec<PassengerOverview>> = BTreeMap::new();
    for algorithm in algorithms {
        let (summary, trace, overview) = run_one(args, &manifest, algorithm)?;
        overviews.insert(summary.algorithm.clone(), overview);
        summaries.push(summary);
        if let Some(trace) = trace {
            traces.push(trace);
        }
    }

    if let [naive, optimized] = summaries.as_slice() {
        println!(
            "comparison naive_distance={} optimized_distance={} reduction_pct={:.2}",
            naive.total_distance,
            optimized.total_distance,
            reduction_pct(naive.total_distance, optimized.total_distance)
        );
    }

    if let Some(path) = &args.snapshots_json {
        fs::write(path, serde_json::to_string_pretty(&traces)?)?;
        eprintln!("wrote snapshots to {}", path.display());
    }
    if let Some(path) = &args.overview_json {
        fs::write(path, serde_json::to_string_pretty(&overviews)?)?;
        eprintln!("wrote overview to {}", path.display());
    }
    Ok(())
}

fn run_one(
    args: &Args,
    manifest: &SimManifest,
    algorithm: Algorithm,
) -> Result<(RunSummary, Option<RunTrace>, Vec<PassengerOverview>)> {
    let config = manifest.config.clone();
    let budget = args.max_ticks.unwrap_or_else(|| {
        config.tick_budget(manifest.passengers.len(), manifest.last_arrival())
    });
    let dispatcher = algorithm.dispatcher(config.starvation_bound());
    let mut pacer = Pacer {
        delay: config.tick_delay(),
    };
    let mut runner = SimulationRunner::with_requests(config, dispatcher, manifest.requests())?;

    let mut log = SnapshotLog::default();
    let mut logger = TraceLogger {
        realtime: args.realtime,
    };
    let mut fanout = Fanout {
        observers: Vec::new(),
    };
    fanout.observers.push(&mut logger);
    if args.snapshots_json.is_some() {
        fanout.observers.push(&mut log);
    }
    if args.realtime {
        fanout.observers.push(&mut pacer);
    }
    let summary = runner.run(budget, &mut fanout)?;
    drop(fanout);

    println!(
        "result algorithm={} ticks={} distance={} delivered={} stops={} max_occupancy={} mean_wait={:.2} max_wait={} mean_journey={:.2}",
        summary.algorithm,
        summary.ticks,
        summary.total_distance,
        summary.delivered,
        summary.stops,
        summary.max_occupancy,
        summary.mean_wait,
        summary.max_wait,
        summary.mean_journey
    );

    let overview = runner.overview();
    if args.overview {
        let fmt_tick = |t: Option<u64>| t.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string());
        for p in &overview {
            println!(
                "passenger algorithm={} id={} from={} to={} direction={} floor={} arrival={} boarded={} delivered={} status={:?}",
                summary.algorithm,
                p.id,
                p.start_floor,
                p.target_floor,
                p.direction,
                p.current_floor,
                p.arrival_tick,
                fmt_tick(p.boarded_tick),
                fmt_tick(p.delivered_tick),
                p.status
            );
        }
    }

    let trace = args
        .snapshots_json
        .is_some()
        .then(|| log.into_trace(summary.clone()));
    Ok((summary, trace, overview))
}
