// Copyright 2025-2026 Ladder Archive Authors.
// This file is part of ladder-archive.

// ladder-archive is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// ladder-archive is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with ladder-archive.  If not, see <http://www.gnu.org/licenses/>.

//! Recurring execution of the pipeline stages with a signal-aware sleep.
//! A successful cycle sleeps the configured interval; a failed cycle backs
//! off starting at 60s, doubling up to 15 minutes, and resets on success.

use std::time::Duration;

use tokio::{sync::watch, time::Instant};

use crate::{error::Result, stages::Stage};

const INITIAL_BACKOFF: Duration = Duration::from_secs(60);
const MAX_BACKOFF: Duration = Duration::from_secs(15 * 60);

/// Cooperative stop flag. Cloned into every sleeper; set once by the signal
/// handler task.
#[derive(Clone)]
pub struct Shutdown {
	rx: watch::Receiver<bool>,
}

impl Shutdown {
	pub fn is_set(&self) -> bool {
		*self.rx.borrow()
	}

	/// Resolve once the stop flag is raised.
	pub async fn wait(&mut self) {
		while !*self.rx.borrow() {
			if self.rx.changed().await.is_err() {
				return;
			}
		}
	}

	/// Sleep that returns early when the stop flag is raised.
	pub async fn sleep(&mut self, duration: Duration) {
		if duration.is_zero() || self.is_set() {
			return;
		}
		tokio::select! {
			_ = tokio::time::sleep(duration) => {}
			_ = self.wait() => {}
		}
	}

	/// A pre-raised handle, for driving a single cycle programmatically.
	pub fn already_stopped() -> Shutdown {
		let (tx, rx) = watch::channel(true);
		drop(tx);
		Shutdown { rx }
	}

	pub fn manual() -> (watch::Sender<bool>, Shutdown) {
		let (tx, rx) = watch::channel(false);
		(tx, Shutdown { rx })
	}
}

/// Install SIGINT/SIGTERM handlers that raise the stop flag. Sleeps and the
/// inter-stage checks exit at the next cooperative point; in-flight stages
/// run to completion.
pub fn install_signal_handlers() -> Shutdown {
	let (tx, rx) = watch::channel(false);
	tokio::spawn(async move {
		let interrupted = shutdown_signal().await;
		log::info!("received {} signal, stopping after the current stage", interrupted);
		let _ = tx.send(true);
		// keep the sender alive so receivers observe the flag, not a close
		std::future::pending::<()>().await;
	});
	Shutdown { rx }
}

#[cfg(unix)]
async fn shutdown_signal() -> &'static str {
	use tokio::signal::unix::{signal, SignalKind};
	let mut sigterm = match signal(SignalKind::terminate()) {
		Ok(sigterm) => sigterm,
		Err(e) => {
			log::error!("failed to install SIGTERM handler: {}", e);
			let _ = tokio::signal::ctrl_c().await;
			return "interrupt";
		}
	};
	tokio::select! {
		_ = tokio::signal::ctrl_c() => "interrupt",
		_ = sigterm.recv() => "terminate",
	}
}

#[cfg(not(unix))]
async fn shutdown_signal() -> &'static str {
	let _ = tokio::signal::ctrl_c().await;
	"interrupt"
}

/// Cycle the stages in order until stopped.
pub struct RecurringRunner {
	stages: Vec<Box<dyn Stage>>,
	interval: Duration,
	shutdown: Shutdown,
}

impl RecurringRunner {
	pub fn new(stages: Vec<Box<dyn Stage>>, interval: Duration, shutdown: Shutdown) -> Self {
		Self { stages, interval, shutdown }
	}

	async fn run_cycle(&self) -> Result<()> {
		for stage in &self.stages {
			if self.shutdown.is_set() {
				log::info!("stop requested, skipping remaining stages");
				return Ok(());
			}
			log::info!("step start: {}", stage.name());
			let started = Instant::now();
			stage.run().await?;
			log::info!("step done: {} ({:.2?})", stage.name(), started.elapsed());
		}
		Ok(())
	}

	pub async fn run(mut self) -> Result<()> {
		let mut backoff = INITIAL_BACKOFF;

		while !self.shutdown.is_set() {
			let cycle_started = Instant::now();
			log::info!("pipeline cycle start");

			match self.run_cycle().await {
				Ok(()) => {
					log::info!("pipeline cycle success");
					backoff = INITIAL_BACKOFF;
					let elapsed = cycle_started.elapsed();
					let sleep_for = self.interval.saturating_sub(elapsed);
					log::info!("sleeping {:.1?}", sleep_for);
					self.shutdown.sleep(sleep_for).await;
				}
				Err(e) => {
					log::error!("pipeline cycle failed, backing off {:.1?}: {}", backoff, e);
					self.shutdown.sleep(backoff).await;
					backoff = (backoff * 2).min(MAX_BACKOFF);
				}
			}
		}
		log::info!("pipeline runner stopped");
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use std::sync::{
		atomic::{AtomicUsize, Ordering},
		Arc,
	};

	struct CountingStage {
		runs: Arc<AtomicUsize>,
		fail_first: bool,
	}

	#[async_trait]
	impl Stage for CountingStage {
		fn name(&self) -> &'static str {
			"counting"
		}

		async fn run(&self) -> Result<()> {
			let run = self.runs.fetch_add(1, Ordering::SeqCst);
			if self.fail_first && run == 0 {
				return Err(crate::error::ArchiveError::Channel);
			}
			Ok(())
		}
	}

	#[tokio::test(start_paused = true)]
	async fn failed_cycle_backs_off_then_recovers() {
		let runs = Arc::new(AtomicUsize::new(0));
		let (stop_tx, shutdown) = Shutdown::manual();
		let stage = CountingStage { runs: Arc::clone(&runs), fail_first: true };

		let runner =
			RecurringRunner::new(vec![Box::new(stage)], Duration::from_secs(21_600), shutdown);
		let handle = tokio::spawn(runner.run());

		// first cycle fails and sleeps the 60s backoff; the second succeeds
		// and sleeps the interval. Stop while it sleeps.
		tokio::time::sleep(Duration::from_secs(120)).await;
		assert_eq!(runs.load(Ordering::SeqCst), 2);
		stop_tx.send(true).unwrap();
		handle.await.unwrap().unwrap();
	}

	#[tokio::test(start_paused = true)]
	async fn stop_flag_ends_the_loop_during_sleep() {
		let runs = Arc::new(AtomicUsize::new(0));
		let (stop_tx, shutdown) = Shutdown::manual();
		let stage = CountingStage { runs: Arc::clone(&runs), fail_first: false };

		let runner = RecurringRunner::new(vec![Box::new(stage)], Duration::from_secs(3600), shutdown);
		let handle = tokio::spawn(runner.run());

		tokio::time::sleep(Duration::from_secs(10)).await;
		assert_eq!(runs.load(Ordering::SeqCst), 1);
		stop_tx.send(true).unwrap();
		handle.await.unwrap().unwrap();
	}

	#[tokio::test]
	async fn pre_raised_shutdown_skips_the_loop() {
		let runs = Arc::new(AtomicUsize::new(0));
		let stage = CountingStage { runs: Arc::clone(&runs), fail_first: false };
		let runner = RecurringRunner::new(
			vec![Box::new(stage)],
			Duration::from_secs(1),
			Shutdown::already_stopped(),
		);
		runner.run().await.unwrap();
		assert_eq!(runs.load(Ordering::SeqCst), 0);
	}
}
