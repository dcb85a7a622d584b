use super::{building, req, run_all};
use crate::dispatch::{Algorithm, Decision, Dispatcher};
use crate::error::SimError;
use crate::lift::{Direction, LiftState, RequestQueue, RequestStatus};
use crate::sim::{NullObserver, SimConfig, SimManifest, SimulationRunner, Tick};
use crate::viz::SnapshotLog;

#[derive(Debug)]
struct AlwaysDown;

impl Dispatcher for AlwaysDown {
    fn name(&self) -> &'static str {
        "always_down"
    }

    fn decide(&self, _lift: &LiftState, _queue: &RequestQueue, _now: Tick) -> Decision {
        Decision::Move {
            direction: Direction::Down,
        }
    }
}

fn generated(seed: u64) -> SimManifest {
    SimManifest::generate(SimConfig::new(8, 30, 3), seed, 40).expect("generate manifest")
}

#[test]
fn occupancy_and_conservation_hold_every_tick() {
    let manifest = generated(11);
    let total = manifest.passengers.len();
    for algorithm in Algorithm::ALL {
        let (summary, snapshots, runner) =
            run_all(algorithm, manifest.config.clone(), manifest.requests());

        let mut delivered = 0;
        for s in &snapshots {
            assert!(s.occupants.len() <= 3, "{algorithm}: over capacity at {}", s.tick);
            assert!(s.floor < 8);
            delivered += s.delivered_this_tick;
            assert_eq!(
                s.occupants.len() + s.pending.len() + delivered + s.upcoming,
                total,
                "{algorithm}: passenger lost or duplicated at tick {}",
                s.tick
            );
        }

        assert_eq!(summary.delivered, total as u64);
        assert!(summary.max_occupancy <= 3);
        assert_eq!(runner.ledger().count(RequestStatus::Delivered), total);
        assert_eq!(runner.ledger().count(RequestStatus::Pending), 0);
        assert!(runner.is_finished());
    }
}

#[test]
fn repeated_runs_produce_identical_snapshots() {
    let manifest = generated(5);
    for algorithm in Algorithm::ALL {
        let (a, snaps_a, _) = run_all(algorithm, manifest.config.clone(), manifest.requests());
        let (b, snaps_b, _) = run_all(algorithm, manifest.config.clone(), manifest.requests());
        assert_eq!(a, b);
        assert_eq!(snaps_a, snaps_b);
    }
}

#[test]
fn journey_records_follow_the_request_lifecycle() {
    let (_, _, runner) = run_all(
        Algorithm::Naive,
        building(5, 4),
        vec![req(0, 0, 3, 0), req(1, 3, 0, 1), req(2, 2, 4, 2)],
    );
    for rec in runner.ledger().iter() {
        let boarded = rec.boarded_at.expect("boarded");
        let delivered = rec.delivered_at.expect("delivered");
        assert!(rec.request.arrival <= boarded);
        assert!(boarded < delivered);
        assert!(rec.wait_ticks() <= rec.journey_ticks());
    }
}

#[test]
fn requests_can_be_scheduled_while_the_run_is_live() {
    let mut runner =
        SimulationRunner::new(building(6, 4), Algorithm::Optimized.dispatcher(36)).unwrap();
    runner.schedule(req(1, 0, 5, 0)).unwrap();
    for _ in 0..3 {
        runner.step().unwrap();
    }
    assert_eq!(runner.now(), Tick(3));

    let err = runner.schedule(req(2, 4, 0, 1)).unwrap_err();
    assert!(matches!(err, SimError::InvalidRequest { .. }), "arrival in the past");

    runner.schedule(req(2, 4, 0, 3)).unwrap();
    runner.schedule(req(3, 1, 2, 9)).unwrap();
    assert_eq!(runner.upcoming(), 2);
    let summary = runner.run(1_000, &mut NullObserver).unwrap();
    assert_eq!(summary.delivered, 3);

    let err = runner.schedule(req(4, 1, 2, 50)).unwrap_err();
    assert!(matches!(err, SimError::InvalidRequest { .. }), "arrivals closed");
}

#[test]
fn runner_rejects_invalid_input_before_any_tick() {
    let err = SimulationRunner::new(building(1, 4), Algorithm::Naive.dispatcher(6)).unwrap_err();
    assert!(matches!(err, SimError::InvalidConfig(_)));

    let err = SimulationRunner::with_requests(
        building(5, 4),
        Algorithm::Naive.dispatcher(30),
        vec![req(1, 2, 7, 0)],
    )
    .unwrap_err();
    assert!(matches!(err, SimError::InvalidRequest { .. }));

    let mut runner = SimulationRunner::new(building(5, 4), Algorithm::Naive.dispatcher(30)).unwrap();
    runner.schedule(req(1, 0, 2, 4)).unwrap();
    runner.schedule(req(1, 3, 2, 4)).unwrap();
    let err = runner.run(100, &mut NullObserver).unwrap_err();
    assert!(matches!(err, SimError::InvalidRequest { .. }), "duplicate id");
}

#[test]
fn dispatch_violation_aborts_the_run() {
    let mut runner = SimulationRunner::with_requests(
        building(5, 4),
        Box::new(AlwaysDown),
        vec![req(1, 3, 1, 0)],
    )
    .unwrap();
    let mut log = SnapshotLog::default();
    let err = runner.run(100, &mut log).unwrap_err();
    assert!(matches!(
        err,
        SimError::DispatchViolation {
            floor: 0,
            decision: Decision::Move {
                direction: Direction::Down
            },
            ..
        }
    ));
    assert!(log.snapshots.is_empty());
    assert_eq!(runner.lift().distance(), 0);
}

#[test]
fn run_reports_stall_when_tick_limit_is_hit() {
    let mut runner = SimulationRunner::with_requests(
        building(10, 4),
        Algorithm::Naive.dispatcher(60),
        vec![req(1, 9, 0, 0)],
    )
    .unwrap();
    let err = runner.run(5, &mut NullObserver).unwrap_err();
    assert!(matches!(
        err,
        SimError::Stalled {
            ticks: 5,
            pending: 1,
            in_lift: 0
        }
    ));
}

#[test]
fn overview_reports_where_each_passenger_is() {
    let mut runner = SimulationRunner::with_requests(
        building(5, 4),
        Algorithm::Naive.dispatcher(30),
        vec![req(0, 0, 3, 0), req(1, 3, 0, 1)],
    )
    .unwrap();
    // tick 0 在 0 层接上 0 号，tick 1 上行到 1 层，同时 1 号到达
    runner.step().unwrap();
    runner.step().unwrap();

    let overview = runner.overview();
    assert_eq!(overview.len(), 2);
    let riding = &overview[0];
    assert_eq!(riding.status, RequestStatus::InLift);
    assert_eq!(riding.current_floor, 1);
    assert_eq!(riding.direction, Direction::Up);
    assert_eq!(riding.boarded_tick, Some(0));
    assert!(!riding.delivered);
    let waiting = &overview[1];
    assert_eq!(waiting.status, RequestStatus::Pending);
    assert_eq!(waiting.current_floor, 3);
    assert_eq!(waiting.direction, Direction::Down);
    assert_eq!(waiting.boarded_tick, None);

    runner.run(100, &mut NullObserver).unwrap();
    for p in runner.overview() {
        assert!(p.delivered);
        assert_eq!(p.current_floor, p.target_floor);
        assert!(p.delivered_tick > p.boarded_tick);
    }
}
