//! Launches the backend executable and reports when it dies.

use std::process::Stdio;

use anyhow::Context;
use dioxus_logger::tracing::error;
use dioxus_logger::tracing::info;
use dioxus_logger::tracing::warn;
use tokio::process::Child;
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::sync::oneshot;

use crate::ApiError;

/// The backend process is gone. Fatal for the session.
///
/// The receiver must call [BackendFailure::acknowledge] once the failure is
/// on screen; the supervisor waits for that before it returns.
#[derive(Debug)]
pub struct BackendFailure {
    message: String,
    ack: Option<oneshot::Sender<()>>,
}

impl BackendFailure {
    pub fn new(message: impl Into<String>) -> (Self, oneshot::Receiver<()>) {
        let (ack, ack_rx) = oneshot::channel();
        (
            Self {
                message: message.into(),
                ack: Some(ack),
            },
            ack_rx,
        )
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_acknowledged(&self) -> bool {
        self.ack.is_none()
    }

    /// Confirms receipt. Returns false if already acknowledged.
    pub fn acknowledge(&mut self) -> bool {
        match self.ack.take() {
            Some(ack) => {
                // the supervisor may have stopped waiting; nothing to do then.
                let _ = ack.send(());
                true
            }
            None => false,
        }
    }
}

pub struct BackendProcess {
    program: String,
    child: Child,
}

impl BackendProcess {
    /// Spawns `command_line` (program followed by whitespace separated
    /// arguments). The process is killed when this handle is dropped.
    pub fn spawn(command_line: &str) -> Result<Self, ApiError> {
        let mut parts = command_line.split_whitespace();
        let program = parts
            .next()
            .context("empty backend command line")?
            .to_string();

        let child = Command::new(&program)
            .args(parts)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn backend `{program}`"))?;

        info!("started backend `{}` (pid {:?})", program, child.id());
        Ok(Self { program, child })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Waits for the process to exit, then sends a [BackendFailure] on
    /// `failures` and waits until it is acknowledged.
    pub async fn supervise(mut self, failures: mpsc::UnboundedSender<BackendFailure>) {
        let message = match self.child.wait().await {
            Ok(status) => format!("The backend process `{}` exited ({}).", self.program, status),
            Err(e) => format!("Lost track of the backend process `{}`: {}", self.program, e),
        };
        error!("{}", message);

        let (failure, ack_rx) = BackendFailure::new(message);
        if failures.send(failure).is_err() {
            warn!("nobody is listening for backend failures");
            return;
        }
        match ack_rx.await {
            Ok(()) => info!("backend failure acknowledged"),
            Err(_) => warn!("backend failure dropped without acknowledgment"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acknowledge_once() {
        let (mut failure, mut ack_rx) = BackendFailure::new("gone");
        assert_eq!(failure.message(), "gone");
        assert!(!failure.is_acknowledged());

        assert!(failure.acknowledge());
        assert!(!failure.acknowledge());
        assert!(failure.is_acknowledged());
        assert!(ack_rx.try_recv().is_ok());
    }

    #[test]
    fn test_empty_command_line() {
        assert!(BackendProcess::spawn("   ").is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_is_reported_and_acknowledged() {
        let process = BackendProcess::spawn("sh -c exit").unwrap();
        assert_eq!(process.program(), "sh");

        let (tx, mut rx) = mpsc::unbounded_channel();
        let supervisor = tokio::spawn(process.supervise(tx));

        let mut failure = rx.recv().await.unwrap();
        assert!(failure.message().contains("`sh` exited"));
        assert!(failure.acknowledge());

        supervisor.await.unwrap();
    }
}
