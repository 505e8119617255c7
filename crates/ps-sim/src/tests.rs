//! Integration tests for ps-sim.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use ps_agent::{Generation, RespawnStatus, RespawnTrigger, Snapshot};
use ps_core::{Category, Preset, SimConfig, Tick, Vec2};

use crate::{NoopObserver, SimBuilder, SimError, SimObserver, TickStats};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Small Trails population, cheap enough to step hundreds of times.
fn small_config(threads: usize) -> SimConfig {
    let mut config = Preset::Trails.config();
    config.runners.count = 20;
    config.hunters.count = 10;
    config.num_threads = Some(threads);
    config
}

/// Scenario A: 10 Hunters + 10 Runners in a world of radius 600.
fn scenario_a_config() -> SimConfig {
    let mut config = Preset::Trails.config();
    config.world_radius = 600.0;
    config.runners.count = 10;
    config.hunters.count = 10;
    config.num_threads = Some(2);
    config
}

fn wait_until(limit: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + limit;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    cond()
}

fn empty_snapshot(tick: u64) -> Snapshot {
    Snapshot { tick: Tick(tick), agents: Vec::new().into() }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_with_defaults() {
        let sim = SimBuilder::new(small_config(1)).build().unwrap();
        assert_eq!(sim.generation().len(), 30);
        assert_eq!(sim.tick(), Tick::ZERO);
        assert_eq!(sim.num_threads(), 1);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = small_config(1);
        config.world_radius = -1.0;
        let result = SimBuilder::new(config).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn position_count_mismatch_errors() {
        let result = SimBuilder::new(small_config(1))
            .initial_positions(vec![Vec2::ZERO; 2])
            .build();
        match result {
            Err(SimError::AgentCountMismatch { expected, got, .. }) => {
                assert_eq!(expected, 30);
                assert_eq!(got, 2);
            }
            Err(e) => panic!("unexpected error {e}"),
            Ok(_) => panic!("mismatched positions accepted"),
        }
    }

    #[test]
    fn non_finite_position_errors() {
        let mut positions = vec![Vec2::ZERO; 30];
        positions[7] = Vec2::new(f32::NAN, 0.0);
        let result = SimBuilder::new(small_config(1)).initial_positions(positions).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn initial_positions_are_applied() {
        let positions: Vec<_> = (0..30).map(|i| Vec2::new(i as f32 * 20.0 - 300.0, 0.0)).collect();
        let sim = SimBuilder::new(small_config(1))
            .initial_positions(positions.clone())
            .build()
            .unwrap();
        for (agent, expected) in sim.generation().agents().iter().zip(&positions) {
            assert_eq!(agent.position, *expected);
            assert_eq!(agent.previous_position, *expected);
        }
    }
}

// ── Tick scheduler ────────────────────────────────────────────────────────────

#[cfg(test)]
mod sim_tests {
    use super::*;

    #[test]
    fn step_advances_tick_by_one() {
        let mut sim = SimBuilder::new(small_config(2)).build().unwrap();
        let stats = sim.step();
        assert_eq!(stats.tick, Tick(1));
        assert_eq!(sim.tick(), Tick(1));
        assert_eq!(stats.agents, 30);
        sim.run_ticks(9, &mut NoopObserver);
        assert_eq!(sim.tick(), Tick(10));
    }

    #[test]
    fn scenario_a_bound_invariant() {
        let config = scenario_a_config();
        let limit = config.world_radius + config.max_step() + 1e-3;
        let mut sim = SimBuilder::new(config.clone()).build().unwrap();

        let mut outside_last_tick = vec![false; sim.generation().len()];
        for _ in 0..100 {
            sim.step();
            for agent in sim.generation().agents() {
                let r = agent.position.distance_to_origin();
                let outside = !agent.in_bounds(config.world_radius);
                assert!(r <= limit, "{} at distance {r} on {}", agent.id, sim.tick());
                assert!(
                    !(outside && outside_last_tick[agent.id.index()]),
                    "{} out of bounds two ticks running at {}",
                    agent.id,
                    sim.tick()
                );
                outside_last_tick[agent.id.index()] = outside;
            }
        }
        assert_eq!(sim.tick(), Tick(100));
    }

    #[test]
    fn escaped_agent_is_back_inside_next_tick() {
        let mut config = scenario_a_config();
        config.runners.count = 1;
        config.hunters.count = 0;
        let mut sim = SimBuilder::new(config.clone())
            .initial_positions(vec![Vec2::new(config.world_radius + 0.5, 0.0)])
            .build()
            .unwrap();
        let stats = sim.step();
        let agent = &sim.generation().agents()[0];
        assert_eq!(agent.respawn.trigger(), Some(RespawnTrigger::OutOfBounds));
        assert!(agent.in_bounds(config.world_radius));
        assert_eq!(stats.escaped, 1);
        assert_eq!(stats.out_of_bounds, 0);
    }

    #[test]
    fn neighbor_lists_are_bounded_and_exclude_self() {
        let config = small_config(3);
        let k = config.neighbor_count;
        let mut sim = SimBuilder::new(config).build().unwrap();
        for _ in 0..40 {
            sim.step();
            let g = sim.generation();
            for agent in g.agents() {
                assert!(agent.neighbors.len() <= k);
                for n in &agent.neighbors {
                    assert_ne!(n.id, agent.id);
                    assert_eq!(g.agents()[n.id.index()].category, agent.category);
                }
                assert!(agent.neighbors.windows(2).all(|w| w[0].distance <= w[1].distance));
            }
        }
    }

    #[test]
    fn successful_respawns_clear_the_previous_generation() {
        let mut config = Preset::Dense.config();
        config.num_threads = Some(2);
        let mut sim = SimBuilder::new(config).build().unwrap();

        let mut checked = 0;
        for _ in 0..30 {
            let prev: Generation = sim.generation().clone();
            sim.step();
            for agent in sim.generation().agents() {
                if !matches!(agent.respawn, RespawnStatus::Relocated { .. }) {
                    continue;
                }
                checked += 1;
                for other in prev.agents().iter().filter(|o| o.id != agent.id) {
                    assert!(
                        agent.position.distance(other.position) >= agent.radius + other.radius,
                        "{} respawned onto {} at {}",
                        agent.id,
                        other.id,
                        sim.tick()
                    );
                }
            }
        }
        assert!(checked > 0, "dense preset produced no respawns");
    }

    #[test]
    fn caught_runner_is_flagged_on_the_same_tick() {
        let mut config = scenario_a_config();
        config.runners.count = 1;
        config.hunters.count = 1;
        let mut sim = SimBuilder::new(config)
            .initial_positions(vec![Vec2::ZERO, Vec2::new(1.0, 0.0)])
            .build()
            .unwrap();

        let stats = sim.step();
        let runner = &sim.generation().agents()[0];
        assert_eq!(runner.category, Category::Runner);
        assert!(runner.pending_respawn());
        assert_eq!(runner.respawn.trigger(), Some(RespawnTrigger::Caught));
        assert!(runner.position.distance(Vec2::ZERO) > 1.0);
        assert_eq!(stats.caught, 1);
        // Hunters ignore contact in this preset.
        assert!(!sim.generation().agents()[1].pending_respawn());
    }

    #[test]
    fn status_resets_after_a_quiet_tick() {
        let mut config = scenario_a_config();
        config.runners.count = 1;
        config.hunters.count = 1;
        let mut sim = SimBuilder::new(config)
            .initial_positions(vec![Vec2::ZERO, Vec2::new(1.0, 0.0)])
            .build()
            .unwrap();
        sim.step();
        let relocated = sim.generation().agents()[0].position;
        if relocated.distance(sim.generation().agents()[1].position) > 20.0 {
            sim.step();
            assert_eq!(sim.generation().agents()[0].respawn, RespawnStatus::Idle);
        }
    }
}

// ── Live reconfiguration ──────────────────────────────────────────────────────

#[cfg(test)]
mod config_tests {
    use super::*;

    fn stray_runner() -> crate::Sim {
        let mut config = scenario_a_config();
        config.runners.count = 1;
        config.hunters.count = 0;
        let outside = Vec2::new(config.world_radius + 0.5, 0.0);
        SimBuilder::new(config).initial_positions(vec![outside]).build().unwrap()
    }

    #[test]
    fn zero_retry_budget_is_rejected_and_bound_still_holds() {
        let mut sim = stray_runner();
        let mut edit = sim.config().clone();
        edit.respawn_attempts = 0;
        assert!(matches!(sim.set_config(edit), Err(SimError::Config(_))));
        assert_eq!(sim.config().respawn_attempts, scenario_a_config().respawn_attempts);

        sim.step();
        let agent = &sim.generation().agents()[0];
        assert!(agent.in_bounds(sim.config().world_radius));
        assert!(matches!(agent.respawn, RespawnStatus::Relocated { .. }));
    }

    #[test]
    fn build_time_settings_are_fixed() {
        let mut sim = stray_runner();

        let mut edit = sim.config().clone();
        edit.runners.radius = 99.0;
        assert!(matches!(sim.set_config(edit), Err(SimError::Config(_))));

        let mut edit = sim.config().clone();
        edit.seed += 1;
        assert!(sim.set_config(edit).is_err());

        let mut edit = sim.config().clone();
        edit.hunters.count = 3;
        assert!(sim.set_config(edit).is_err());

        assert_eq!(sim.config().runners.radius, 3.0);
        assert_eq!(sim.generation().agents()[0].radius, 3.0);
    }

    #[test]
    fn valid_edit_takes_effect_next_tick() {
        let mut sim = SimBuilder::new(small_config(2)).build().unwrap();
        let mut edit = sim.config().clone();
        edit.jitter = 0.0;
        edit.runners.speed = 0.0;
        edit.hunters.speed = 0.0;
        sim.set_config(edit).unwrap();

        sim.step();
        for agent in sim.generation().agents() {
            if !agent.pending_respawn() {
                assert_eq!(agent.position, agent.previous_position, "{} moved", agent.id);
            }
        }
    }
}

// ── Determinism ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod determinism_tests {
    use super::*;

    fn run(config: SimConfig, ticks: u64) -> Vec<Generation> {
        let mut sim = SimBuilder::new(config).build().unwrap();
        (0..ticks)
            .map(|_| {
                sim.step();
                sim.generation().clone()
            })
            .collect()
    }

    #[test]
    fn same_seed_same_history() {
        assert_eq!(run(small_config(2), 50), run(small_config(2), 50));
    }

    #[test]
    fn thread_count_does_not_change_results() {
        let mut dense = Preset::Dense.config();
        dense.num_threads = Some(1);
        let single = run(dense.clone(), 30);
        dense.num_threads = Some(4);
        let quad = run(dense, 30);
        assert_eq!(single, quad);
    }

    #[test]
    fn different_seed_diverges() {
        let mut other = small_config(2);
        other.seed += 1;
        assert_ne!(run(small_config(2), 5), run(other, 5));
    }
}

// ── Observer hooks ────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use super::*;
    use crate::TracingObserver;

    #[derive(Default)]
    struct Recorder {
        started:     Vec<Tick>,
        ended:       Vec<TickStats>,
        generations: Vec<Tick>,
    }

    impl SimObserver for Recorder {
        fn on_tick_start(&mut self, tick: Tick) {
            self.started.push(tick);
        }
        fn on_tick_end(&mut self, _tick: Tick, stats: &TickStats) {
            self.ended.push(*stats);
        }
        fn on_generation(&mut self, generation: &Generation) {
            self.generations.push(generation.tick());
        }
    }

    #[test]
    fn hooks_fire_once_per_tick_in_order() {
        let mut sim = SimBuilder::new(small_config(2)).build().unwrap();
        let mut rec = Recorder::default();
        sim.run_ticks(5, &mut rec);

        let expected: Vec<_> = (1..=5).map(Tick).collect();
        assert_eq!(rec.started, expected);
        assert_eq!(rec.generations, expected);
        assert_eq!(rec.ended.iter().map(|s| s.tick).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn tracing_observer_runs_quietly() {
        let mut sim = SimBuilder::new(small_config(1)).build().unwrap();
        sim.run_ticks(3, &mut TracingObserver::new(0));
        assert_eq!(sim.tick(), Tick(3));
    }
}

// ── Snapshot channel ──────────────────────────────────────────────────────────

#[cfg(test)]
mod channel_tests {
    use super::*;
    use crate::snapshot_channel;

    #[test]
    fn fifo_and_non_blocking() {
        let (tx, rx) = snapshot_channel(4);
        assert!(rx.try_consume().unwrap().is_none());
        for t in 1..=3 {
            tx.publish(empty_snapshot(t)).unwrap();
        }
        let ticks: Vec<_> = (0..3).map(|_| rx.try_consume().unwrap().unwrap().tick).collect();
        assert_eq!(ticks, vec![Tick(1), Tick(2), Tick(3)]);
        assert!(rx.try_consume().unwrap().is_none());
    }

    #[test]
    fn full_channel_blocks_until_drained() {
        let (tx, rx) = snapshot_channel(2);
        let sent = Arc::new(AtomicUsize::new(0));
        let producer = {
            let sent = Arc::clone(&sent);
            thread::spawn(move || {
                for t in 1..=3 {
                    tx.publish(empty_snapshot(t)).unwrap();
                    sent.fetch_add(1, Ordering::SeqCst);
                }
            })
        };

        assert!(wait_until(Duration::from_secs(5), || sent.load(Ordering::SeqCst) == 2));
        thread::sleep(Duration::from_millis(50));
        assert_eq!(sent.load(Ordering::SeqCst), 2, "producer did not block on a full channel");

        assert_eq!(rx.try_consume().unwrap().map(|s| s.tick), Some(Tick(1)));
        assert!(wait_until(Duration::from_secs(5), || sent.load(Ordering::SeqCst) == 3));
        producer.join().unwrap();
    }

    #[test]
    fn latest_skips_to_newest() {
        let (tx, rx) = snapshot_channel(8);
        for t in 1..=5 {
            tx.publish(empty_snapshot(t)).unwrap();
        }
        let (snapshot, skipped) = rx.try_latest().unwrap().unwrap();
        assert_eq!(snapshot.tick, Tick(5));
        assert_eq!(skipped, 4);
        assert!(rx.try_latest().unwrap().is_none());
    }

    #[test]
    fn disconnection_is_reported_both_ways() {
        let (tx, rx) = snapshot_channel(1);
        tx.publish(empty_snapshot(1)).unwrap();
        drop(tx);
        // Queued data is still delivered before the disconnect.
        assert!(rx.try_consume().unwrap().is_some());
        assert!(matches!(rx.try_consume(), Err(SimError::Disconnected)));

        let (tx, rx) = snapshot_channel(1);
        drop(rx);
        assert!(matches!(tx.publish(empty_snapshot(1)), Err(SimError::Disconnected)));
    }

    #[test]
    fn recv_timeout_times_out_on_empty() {
        let (_tx, rx) = snapshot_channel(1);
        assert!(rx.recv_timeout(Duration::from_millis(10)).unwrap().is_none());
    }
}

// ── Background engine ─────────────────────────────────────────────────────────

#[cfg(test)]
mod engine_tests {
    use super::*;
    use crate::{start, start_with_observer};

    #[test]
    fn snapshots_match_a_reference_run_in_order() {
        let mut config = small_config(4);
        config.channel_depth = 5;
        let handle = start(config.clone()).unwrap();

        config.num_threads = Some(1);
        let mut reference = SimBuilder::new(config).build().unwrap();

        let mut last = Tick::ZERO;
        for _ in 0..25 {
            let snapshot = handle
                .recv_timeout(Duration::from_secs(10))
                .unwrap()
                .expect("engine stalled");
            assert!(snapshot.tick > last, "{} after {}", snapshot.tick, last);
            last = snapshot.tick;

            reference.step();
            assert_eq!(snapshot, reference.snapshot());
        }
        handle.stop().unwrap();
    }

    #[test]
    fn polled_ticks_are_strictly_increasing() {
        let handle = start(small_config(2)).unwrap();
        let mut seen = Vec::new();
        let deadline = Instant::now() + Duration::from_secs(10);
        while seen.len() < 10 && Instant::now() < deadline {
            if let Some((snapshot, _)) = handle.try_latest().unwrap() {
                seen.push(snapshot.tick);
            }
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(seen.len(), 10);
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        handle.stop().unwrap();
    }

    #[test]
    fn scenario_c_backpressure() {
        let mut config = small_config(2);
        config.channel_depth = 20;
        let handle = start(config).unwrap();

        assert!(wait_until(Duration::from_secs(10), || handle.published() == 20));
        thread::sleep(Duration::from_millis(100));
        assert_eq!(handle.published(), 20, "producer ran past a full channel");

        let first = handle.try_consume().unwrap().unwrap();
        assert_eq!(first.tick, Tick(1));

        assert!(wait_until(Duration::from_secs(10), || handle.published() == 21));
        thread::sleep(Duration::from_millis(100));
        assert_eq!(handle.published(), 21);

        handle.stop().unwrap();
    }

    #[test]
    fn stop_releases_a_blocked_producer() {
        let mut config = small_config(2);
        config.channel_depth = 1;
        let handle = start(config).unwrap();
        assert!(wait_until(Duration::from_secs(10), || handle.published() == 1));
        thread::sleep(Duration::from_millis(20));
        assert!(!handle.is_finished());

        let final_tick = handle.stop().unwrap();
        assert!(final_tick >= Tick(1));
    }

    struct EndFlag(Arc<AtomicBool>);

    impl SimObserver for EndFlag {
        fn on_sim_end(&mut self, _final_tick: Tick) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[test]
    fn dropping_the_handle_stops_the_engine() {
        let ended = Arc::new(AtomicBool::new(false));
        let handle = start_with_observer(small_config(2), EndFlag(Arc::clone(&ended))).unwrap();
        assert!(wait_until(Duration::from_secs(10), || handle.published() > 0));
        drop(handle);
        assert!(ended.load(Ordering::SeqCst));
    }

    #[test]
    fn observer_runs_on_the_engine_thread() {
        struct Ticks(Arc<Mutex<Vec<Tick>>>);
        impl SimObserver for Ticks {
            fn on_tick_end(&mut self, tick: Tick, _stats: &TickStats) {
                self.0.lock().unwrap().push(tick);
            }
        }

        let ticks = Arc::new(Mutex::new(Vec::new()));
        let handle = start_with_observer(small_config(1), Ticks(Arc::clone(&ticks))).unwrap();
        assert!(wait_until(Duration::from_secs(10), || handle.published() >= 3));
        handle.stop().unwrap();

        let ticks = ticks.lock().unwrap();
        assert!(ticks.len() >= 3);
        assert_eq!(ticks[0], Tick(1));
        assert!(ticks.windows(2).all(|w| w[1] == w[0].next()));
    }

    #[test]
    fn start_rejects_invalid_config() {
        let mut config = small_config(1);
        config.channel_depth = 0;
        assert!(matches!(start(config), Err(SimError::Config(_))));
    }
}
