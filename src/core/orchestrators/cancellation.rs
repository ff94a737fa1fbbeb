use tokio::sync::watch;

/// Owner side of a batch cancellation signal.
#[derive(Debug)]
pub struct CancellationHandle {
    sender: watch::Sender<bool>,
}

/// Observer side; cheap to clone into every in-flight extraction.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    receiver: watch::Receiver<bool>,
}

pub fn cancellation_pair() -> (CancellationHandle, CancellationToken) {
    let (sender, receiver) = watch::channel(false);
    (CancellationHandle { sender }, CancellationToken { receiver })
}

impl CancellationHandle {
    pub fn cancel(&self) {
        log::info!("[CANCELLATION] batch cancellation requested");
        self.sender.send_replace(true);
    }
}

impl CancellationToken {
    /// A token that is never cancelled.
    pub fn never() -> Self {
        let (_, token) = cancellation_pair();
        token
    }

    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once cancellation is requested. Pends forever if the handle is
    /// dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        if receiver.wait_for(|cancelled| *cancelled).await.is_err() {
            futures::future::pending::<()>().await;
        }
    }
}
