//! 多种子对比基准
//!
//! 对一组连续种子生成乘客清单，分别用两种调度运行，汇总总行程。

use clap::Parser;
use std::process::ExitCode;

use liftsim_rs::error::Result;
use liftsim_rs::sim::{Comparison, SimConfig, SimManifest, reduction_pct};

#[derive(Debug, Parser)]
#[command(name = "lift_bench", about = "多种子基准：naive 与 optimized 的总行程对比")]
struct Args {
    #[arg(long, default_value_t = 10)]
    floors: usize,
    #[arg(long, default_value_t = 50)]
    people: usize,
    #[arg(long, default_value_t = 6)]
    capacity: usize,
    /// 种子个数
    #[arg(long, default_value_t = 20)]
    seeds: u64,
    #[arg(long, default_value_t = 1)]
    first_seed: u64,
    /// 乘客到达时间窗口；缺省 0 表示所有乘客开始时已在等候
    #[arg(long, default_value_t = 0)]
    arrival_window: u64,
    #[arg(long)]
    max_wait_ticks: Option<u64>,
    /// 汇总节省比例低于该值时以非零状态退出
    #[arg(long)]
    min_reduction_pct: Option<f64>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("lift_bench: {e}");
            ExitCode::from(2)
        }
    }
}

/// 返回汇总结果是否满足 `--min-reduction-pct`
fn run(args: &Args) -> Result<bool> {
    let config = SimConfig {
        max_wait_ticks: args.max_wait_ticks,
        ..SimConfig::new(args.floors, args.people, args.capacity)
    };
    config.validate()?;

    let mut naive_total = 0u64;
    let mut optimized_total = 0u64;
    let mut not_worse = 0u64;
    for seed in args.first_seed..args.first_seed.saturating_add(args.seeds) {
        let manifest = SimManifest::generate(config.clone(), seed, args.arrival_window)?;
        let cmp = Comparison::run(&manifest, None)?;
        naive_total += cmp.naive.total_distance;
        optimized_total += cmp.optimized.total_distance;
        if cmp.optimized.total_distance <= cmp.naive.total_distance {
            not_worse += 1;
        }
        println!(
            "seed={} naive={} optimized={} reduction_pct={:.2} naive_max_wait={} optimized_max_wait={}",
            seed,
            cmp.naive.total_distance,
            cmp.optimized.total_distance,
            cmp.reduction_pct(),
            cmp.naive.max_wait,
            cmp.optimized.max_wait
        );
    }

    let pct = reduction_pct(naive_total, optimized_total);
    println!(
        "aggregate seeds={} naive={} optimized={} reduction_pct={:.2} not_worse={}",
        args.seeds, naive_total, optimized_total, pct, not_worse
    );

    Ok(args.min_reduction_pct.is_none_or(|min| pct >= min))
}
