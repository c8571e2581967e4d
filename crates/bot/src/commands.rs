use engine::scheduler::Scheduler;
use tokio::sync::mpsc;
use tracing::info;

/// Control signals from the outer surface (startup, shutdown hooks, future
/// chat commands). The engine itself only ever sees activate/deactivate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Activate,
    Deactivate,
}

/// Applies commands to the scheduler until every sender is dropped.
pub async fn run_command_loop(mut rx: mpsc::Receiver<Command>, scheduler: Scheduler) {
    while let Some(command) = rx.recv().await {
        info!("Command received: {:?}", command);
        match command {
            Command::Activate => scheduler.activate().await,
            Command::Deactivate => scheduler.deactivate().await,
        }
    }
    info!("Command channel closed, stopping command loop");
}
