use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "liftsim-rs-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn write_file(dir: &PathBuf, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write temp file");
    path
}

/// 取出 `prefix` 开头那一行里 `key=value` 的值
fn field<'a>(stdout: &'a str, prefix: &str, key: &str) -> Option<&'a str> {
    stdout
        .lines()
        .filter(|line| line.starts_with(prefix))
        .flat_map(|line| line.split_whitespace())
        .find_map(|kv| kv.strip_prefix(key)?.strip_prefix('='))
}

const DETOUR_MANIFEST: &str = r#"
{
    "schema_version": 1,
    "config": { "floors": 10, "population": 3, "capacity": 4 },
    "passengers": [
        { "id": 1, "start_floor": 0, "target_floor": 5, "arrival_tick": 0 },
        { "id": 2, "start_floor": 9, "target_floor": 8, "arrival_tick": 1 },
        { "id": 3, "start_floor": 4, "target_floor": 3, "arrival_tick": 1 }
    ]
}
"#;

#[test]
fn lift_sim_compares_both_dispatchers_on_a_manifest() {
    let dir = unique_temp_dir("lift-sim-compare");
    let manifest = write_file(&dir, "people.json", DETOUR_MANIFEST);

    let output = Command::new(env!("CARGO_BIN_EXE_lift_sim"))
        .args(["--manifest", manifest.to_str().unwrap(), "--overview"])
        .output()
        .expect("run lift_sim");
    assert!(
        output.status.success(),
        "lift_sim failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(field(&stdout, "config ", "floors"), Some("10"));
    assert_eq!(field(&stdout, "comparison ", "naive_distance"), Some("15"));
    assert_eq!(field(&stdout, "comparison ", "optimized_distance"), Some("14"));
    assert_eq!(
        stdout
            .lines()
            .filter(|line| line.starts_with("result "))
            .count(),
        2
    );
    assert_eq!(
        stdout
            .lines()
            .filter(|line| line.starts_with("passenger ") && line.contains("status=Delivered"))
            .count(),
        6,
        "three passengers per dispatcher"
    );
    // 第一行是 naive 的 1 号：0→5，结束时停在 5 层
    assert_eq!(field(&stdout, "passenger ", "direction"), Some("up"));
    assert_eq!(field(&stdout, "passenger ", "floor"), Some("5"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn lift_sim_writes_final_passenger_overview() {
    let dir = unique_temp_dir("lift-sim-overview");
    let manifest = write_file(&dir, "people.json", DETOUR_MANIFEST);
    let overview = dir.join("overview.json");

    let output = Command::new(env!("CARGO_BIN_EXE_lift_sim"))
        .args([
            "--manifest",
            manifest.to_str().unwrap(),
            "--overview-json",
            overview.to_str().unwrap(),
        ])
        .output()
        .expect("run lift_sim");
    assert!(
        output.status.success(),
        "lift_sim failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let raw = fs::read_to_string(&overview).expect("read overview.json");
    let v: Value = serde_json::from_str(&raw).expect("parse overview.json");
    for algorithm in ["naive", "optimized"] {
        let people = v[algorithm].as_array().expect("per-algorithm array");
        assert_eq!(people.len(), 3, "{algorithm}");
        for p in people {
            assert_eq!(p["delivered"], true);
            assert_eq!(p["status"], "delivered");
            assert_eq!(p["current_floor"], p["target_floor"]);
        }
        assert_eq!(people[1]["id"], 2);
        assert_eq!(people[1]["direction"], "down");
    }

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn lift_sim_debug_log_lists_passengers_every_tick() {
    let dir = unique_temp_dir("lift-sim-debug");
    let manifest = write_file(&dir, "people.json", DETOUR_MANIFEST);

    let output = Command::new(env!("CARGO_BIN_EXE_lift_sim"))
        .args(["--manifest", manifest.to_str().unwrap(), "--algorithm", "naive"])
        .env("RUST_LOG", "debug")
        .output()
        .expect("run lift_sim");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let ticks: usize = field(&stdout, "result ", "ticks")
        .and_then(|t| t.parse().ok())
        .expect("ticks in result line");
    assert_eq!(stderr.matches("乘客列表").count(), ticks);
    // 不加 --realtime 时没有逐 tick 的 info 摘要
    assert_eq!(stderr.matches("🛗 tick").count(), 0);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn lift_sim_writes_snapshots_and_replayable_manifest() {
    let dir = unique_temp_dir("lift-sim-snapshots");
    let snapshots = dir.join("trace.json");
    let written = dir.join("people.json");

    let output = Command::new(env!("CARGO_BIN_EXE_lift_sim"))
        .args([
            "--floors",
            "6",
            "--people",
            "8",
            "--seed",
            "7",
            "--algorithm",
            "optimized",
            "--snapshots-json",
            snapshots.to_str().unwrap(),
            "--write-manifest",
            written.to_str().unwrap(),
        ])
        .output()
        .expect("run lift_sim");
    assert!(
        output.status.success(),
        "lift_sim failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(field(&stdout, "config ", "seed"), Some("7"));
    assert_eq!(field(&stdout, "result ", "delivered"), Some("8"));
    assert!(!stdout.contains("comparison "));

    let raw = fs::read_to_string(&snapshots).expect("read trace.json");
    let v: Value = serde_json::from_str(&raw).expect("parse trace.json");
    let runs = v.as_array().expect("trace.json must be a JSON array");
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0]["algorithm"], "optimized");
    let ticks = runs[0]["snapshots"].as_array().expect("snapshots array");
    assert_eq!(Some(ticks.len() as u64), runs[0]["summary"]["ticks"].as_u64());

    // 写出的清单重放后得到同样的结果
    let replay = Command::new(env!("CARGO_BIN_EXE_lift_sim"))
        .args([
            "--manifest",
            written.to_str().unwrap(),
            "--algorithm",
            "optimized",
        ])
        .output()
        .expect("replay lift_sim");
    assert!(replay.status.success());
    let replay_stdout = String::from_utf8_lossy(&replay.stdout);
    assert_eq!(
        field(&replay_stdout, "result ", "distance"),
        field(&stdout, "result ", "distance")
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn lift_sim_rejects_single_floor_buildings() {
    let output = Command::new(env!("CARGO_BIN_EXE_lift_sim"))
        .args(["--floors", "1", "--seed", "1"])
        .output()
        .expect("run lift_sim");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("floors must be at least 2"), "stderr={stderr}");
}

#[test]
fn lift_sim_reports_malformed_manifest_passengers() {
    let dir = unique_temp_dir("lift-sim-bad-manifest");
    let manifest = write_file(
        &dir,
        "people.json",
        r#"
{
    "schema_version": 1,
    "config": { "floors": 3, "capacity": 2 },
    "passengers": [ { "id": 4, "start_floor": 1, "target_floor": 1 } ]
}
        "#,
    );

    let output = Command::new(env!("CARGO_BIN_EXE_lift_sim"))
        .args(["--manifest", manifest.to_str().unwrap()])
        .output()
        .expect("run lift_sim");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid request #4"), "stderr={stderr}");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn lift_sim_realtime_logs_every_tick_to_stderr() {
    let dir = unique_temp_dir("lift-sim-realtime");
    let manifest = write_file(&dir, "people.json", DETOUR_MANIFEST);

    let output = Command::new(env!("CARGO_BIN_EXE_lift_sim"))
        .args([
            "--manifest",
            manifest.to_str().unwrap(),
            "--algorithm",
            "naive",
            "--realtime",
        ])
        .env("RUST_LOG", "info")
        .output()
        .expect("run lift_sim");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let ticks: usize = field(&stdout, "result ", "ticks")
        .and_then(|t| t.parse().ok())
        .expect("ticks in result line");
    assert_eq!(stderr.matches("🛗 tick").count(), ticks);
    assert!(!stdout.contains("🛗"), "logs must stay off stdout");

    let _ = fs::remove_dir_all(&dir);
}
