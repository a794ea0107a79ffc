//! Background render loop: ticking, redraw requests, shutdown and
//! concurrent mutation from the input path

use driftlab_core::tests::test_helpers::{counting_hook, fast_config};
use driftlab_core::{RenderLoop, SimError, Simulation, SimulationConfig};
use glam::DVec2;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_loop_advances_particles_and_requests_redraws() {
    let (redraws, hook) = counting_hook();
    let sim = Simulation::with_redraw(fast_config(), hook);
    sim.add_particle(0.0, 0.0, 0.0, 10.0);

    let render_loop = RenderLoop::spawn(sim.clone()).expect("spawn loop");
    thread::sleep(Duration::from_millis(50));
    let ticks = render_loop.shutdown().expect("clean shutdown");

    assert!(ticks > 0);
    // Each tick moves the particle by dt * velocity = 1.0
    let x = sim.snapshot().particles()[0].pos.x;
    assert_eq!(x, ticks as f64);
    assert_eq!(redraws.load(Ordering::SeqCst) as u64, ticks);
}

#[test]
fn test_shutdown_is_prompt_with_default_cadence() {
    let sim = Simulation::new(SimulationConfig::default());
    let render_loop = RenderLoop::spawn(sim).expect("spawn loop");
    assert!(render_loop.is_running());

    let started = Instant::now();
    render_loop.shutdown().expect("clean shutdown");
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn test_dropping_the_handle_stops_the_loop() {
    let (redraws, hook) = counting_hook();
    let sim = Simulation::with_redraw(fast_config(), hook);
    {
        let _render_loop = RenderLoop::spawn(sim.clone()).expect("spawn loop");
        thread::sleep(Duration::from_millis(10));
    }

    let after_drop = redraws.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(30));
    assert_eq!(redraws.load(Ordering::SeqCst), after_drop);
}

#[test]
fn test_panicking_tick_is_reported_on_shutdown() {
    let sim = Simulation::with_redraw(fast_config(), || panic!("redraw target vanished"));
    let render_loop = RenderLoop::spawn(sim.clone()).expect("spawn loop");

    let deadline = Instant::now() + Duration::from_secs(5);
    while render_loop.is_running() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(1));
    }

    match render_loop.shutdown() {
        Err(SimError::LoopPanicked(message)) => assert_eq!(message, "redraw target vanished"),
        other => panic!("expected a panic report, got {:?}", other),
    }

    // The panic happened outside the lock; the state is still usable
    sim.add_particle(1.0, 1.0, 0.0, 0.0);
    assert_eq!(sim.particle_count(), 1);
}

#[test]
fn test_redraw_hook_runs_after_the_lock_is_released() {
    // The hook reads the same simulation; it would deadlock if the lock
    // were still held while requesting the redraw.
    let slot: Arc<OnceLock<Simulation>> = Arc::new(OnceLock::new());
    let counts = Arc::new(AtomicUsize::new(0));
    let hook_slot = Arc::clone(&slot);
    let hook_counts = Arc::clone(&counts);
    let sim = Simulation::with_redraw(SimulationConfig::default(), move || {
        if let Some(sim) = hook_slot.get() {
            hook_counts.fetch_add(sim.particle_count(), Ordering::SeqCst);
        }
    });
    slot.set(sim.clone()).expect("slot is empty");
    sim.add_particle(0.0, 0.0, 0.0, 1.0);
    sim.add_particle(5.0, 5.0, 1.0, 1.0);

    let (done_tx, done_rx) = mpsc::channel();
    let worker = sim.clone();
    thread::spawn(move || {
        worker.tick();
        worker.set_explorer(10.0, 10.0);
        let _ = done_tx.send(());
    });

    done_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("tick and set_explorer must not hold the lock while redrawing");
    // Two redraws, each seeing both particles
    assert_eq!(counts.load(Ordering::SeqCst), 4);
}

#[test]
fn test_fps_is_published() {
    let mut config = fast_config();
    config.fps_window = Duration::from_millis(20);
    let sim = Simulation::new(config);
    let render_loop = RenderLoop::spawn(sim).expect("spawn loop");
    let gauge = render_loop.fps_gauge();

    let deadline = Instant::now() + Duration::from_secs(5);
    while gauge.current() == 0 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }

    assert!(gauge.current() > 0);
    assert_eq!(render_loop.current_fps(), gauge.current());
    render_loop.shutdown().expect("clean shutdown");
}

#[test]
fn test_concurrent_adds_while_ticking() {
    const WRITERS: usize = 8;
    const ADDS_PER_WRITER: usize = 250;
    const FAN: usize = 5;

    let sim = Simulation::new(fast_config());
    for i in 0..10 {
        sim.add_particle(0.0, 0.0, 0.0, -(i as f64) - 1.0);
    }
    let existing = sim.particle_count();

    let render_loop = RenderLoop::spawn(sim.clone()).expect("spawn loop");

    let writers: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let sim = sim.clone();
            thread::spawn(move || {
                for n in 0..ADDS_PER_WRITER {
                    // Velocity doubles as a unique tag
                    let tag = (writer * ADDS_PER_WRITER + n) as f64 * 10.0;
                    if n % 2 == 0 {
                        sim.add_particle(0.0, 0.0, 0.0, tag);
                    } else {
                        sim.add_velocity_fan(FAN, DVec2::ZERO, 0.0, tag, tag + (FAN - 1) as f64)
                            .expect("valid fan");
                    }
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().expect("writer thread");
    }
    let ticks = render_loop.shutdown().expect("clean shutdown");
    assert!(ticks > 0);

    let singles = WRITERS * ADDS_PER_WRITER.div_ceil(2);
    let fans = WRITERS * (ADDS_PER_WRITER / 2);
    let state = sim.snapshot();
    assert_eq!(state.particles().len(), existing + singles + fans * FAN);

    let tags: HashSet<u64> = state
        .particles()
        .iter()
        .map(|p| p.velocity.to_bits())
        .collect();
    assert_eq!(tags.len(), state.particles().len(), "duplicate entries");

    for writer in 0..WRITERS {
        for n in 0..ADDS_PER_WRITER {
            let tag = (writer * ADDS_PER_WRITER + n) as f64 * 10.0;
            assert!(tags.contains(&tag.to_bits()), "missing tag {}", tag);
        }
    }

    // Each fan is contiguous even though writers interleave
    let particles = state.particles();
    for (i, particle) in particles.iter().enumerate() {
        let tag = particle.velocity;
        let base = (tag / 10.0).floor() * 10.0;
        let offset = tag - base;
        if tag > 0.0 && offset > 0.0 {
            assert_eq!(particles[i - 1].velocity, tag - 1.0);
        }
    }
}
