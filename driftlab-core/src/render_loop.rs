//! Background task driving the simulation at a fixed cadence.

use crate::error::SimError;
use crate::metrics::{FpsGauge, FrameCounter};
use crate::state::Simulation;
use std::any::Any;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Handle to the running update loop.
///
/// Each iteration ticks the simulation (which requests a redraw), records the
/// frame and then waits `tick_interval` on the stop channel. Waiting after the
/// tick means a slow tick delays the next one instead of queueing it.
///
/// The loop runs until [`RenderLoop::shutdown`] is called or the handle is
/// dropped; both stop and join the thread.
#[derive(Debug)]
pub struct RenderLoop {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<u64>>,
    fps: FpsGauge,
}

impl RenderLoop {
    pub fn spawn(simulation: Simulation) -> Result<Self, SimError> {
        let (stop_tx, stop_rx) = mpsc::channel();
        let fps = FpsGauge::new();
        let gauge = fps.clone();

        let handle = thread::Builder::new()
            .name("render-loop".to_string())
            .spawn(move || run(simulation, stop_rx, gauge))?;

        Ok(Self {
            stop: Some(stop_tx),
            handle: Some(handle),
            fps,
        })
    }

    /// Last published frame rate
    pub fn current_fps(&self) -> u32 {
        self.fps.current()
    }

    pub fn fps_gauge(&self) -> FpsGauge {
        self.fps.clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stop the loop and wait for it, returning the number of ticks run
    pub fn shutdown(mut self) -> Result<u64, SimError> {
        self.stop_and_join()
    }

    fn stop_and_join(&mut self) -> Result<u64, SimError> {
        if let Some(stop) = self.stop.take() {
            // The loop may already be gone (panicked); joining reports that.
            let _ = stop.send(());
        }

        let Some(handle) = self.handle.take() else {
            return Ok(0);
        };

        handle.join().map_err(|payload| {
            let message = panic_message(payload.as_ref());
            log::error!("render loop panicked: {}", message);
            SimError::LoopPanicked(message)
        })
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        if self.handle.is_some() {
            if let Err(e) = self.stop_and_join() {
                log::error!("render loop ended abnormally: {}", e);
            }
        }
    }
}

fn run(simulation: Simulation, stop: Receiver<()>, fps: FpsGauge) -> u64 {
    let config = simulation.config().clone();
    let mut frames = FrameCounter::new(Instant::now(), config.fps_window);
    let mut ticks: u64 = 0;

    log::info!(
        "render loop started: interval {:?}, dt {}",
        config.tick_interval,
        config.dt
    );

    loop {
        simulation.tick();
        ticks += 1;

        frames.record_tick();
        if let Some(sample) = frames.sample(Instant::now()) {
            fps.publish(sample);
            log::trace!("fps: {}", sample);
        }

        match stop.recv_timeout(config.tick_interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) => {
                log::info!("render loop stopped after {} ticks", ticks);
                break;
            }
            Err(RecvTimeoutError::Disconnected) => {
                log::warn!("render loop handle went away; stopping after {} ticks", ticks);
                break;
            }
        }
    }

    ticks
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
