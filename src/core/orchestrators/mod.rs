mod batch_orchestrator;
mod cancellation;

pub use batch_orchestrator::BatchOrchestrator;
pub use cancellation::{cancellation_pair, CancellationHandle, CancellationToken};
