// Ceasefire reconciliation loop
//
// Cycle shape: refresh the change feed, drain the batch through the
// chain one identifier at a time, sleep a jittered pause, repeat. The
// cancellation token is observed once per cycle at the boundary before
// the next refresh, so an in-flight batch always drains fully.

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::chain::ReconcileChain;
use crate::config::SleepRange;
use crate::watcher::ChangeQueue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Running,
    Stopping,
}

pub struct CeasefireRunner {
    queue: Box<dyn ChangeQueue>,
    chain: ReconcileChain,
    sleep_range: SleepRange,
    state: RunnerState,
}

impl CeasefireRunner {
    pub fn new(queue: Box<dyn ChangeQueue>, chain: ReconcileChain, sleep_range: SleepRange) -> Self {
        Self {
            queue,
            chain,
            sleep_range,
            state: RunnerState::Running,
        }
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    /// Drives cycles until the token is cancelled. The token is checked
    /// only here, never mid-batch or mid-sleep.
    pub async fn run(&mut self, shutdown: CancellationToken) {
        info!("🚀 Ceasefire reconciliation loop started");
        loop {
            if shutdown.is_cancelled() {
                self.state = RunnerState::Stopping;
                break;
            }
            self.run_cycle().await;

            let pause = self.sleep_range.draw();
            info!("⏰ Sleeping {}s until the next cycle", pause.as_secs());
            tokio::time::sleep(pause).await;
        }
        info!("🛑 Reconciliation loop stopped");
    }

    async fn run_cycle(&mut self) {
        info!("🔄 Looking into the contracts feed");
        let count = match self.queue.refresh().await {
            Ok(count) => count,
            Err(e) => {
                error!("❌ Change feed refresh failed, retrying next cycle: {}", e);
                return;
            }
        };
        info!("📬 {} contracts fetched", count);

        for _ in 0..count {
            let Some(contract_id) = self.queue.next() else {
                break;
            };
            info!("Processing contract {}", contract_id);
            match self.chain.dispatch(&contract_id).await {
                Ok(()) => info!("✓ Finished contract {}", contract_id),
                Err(e) => error!("❌ Pass aborted for contract {}: {}", contract_id, e),
            }
        }
    }
}
