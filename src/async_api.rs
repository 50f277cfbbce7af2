use crate::{ContentService, Error, GeneratedDocument, Result};
use log::debug;
use std::sync::mpsc::{self, Sender};
use std::thread;
use tokio::sync::oneshot;

enum Command {
    Generate(oneshot::Sender<Result<GeneratedDocument>>),
    Close(oneshot::Sender<()>),
}

/// An async-friendly generator backed by a dedicated worker thread.
///
/// The worker thread owns the (blocking) content service and runs requests
/// sent from async tasks, so callers can await generation without blocking
/// the runtime. Requests are served one at a time in arrival order.
#[derive(Clone)]
pub struct Studio {
    cmd_tx: Sender<Command>,
}

impl Studio {
    /// Spawn the worker thread and move `service` onto it.
    ///
    /// Build the service outside any async runtime: blocking HTTP clients
    /// must not be created or dropped on runtime threads.
    pub fn new(service: impl ContentService + 'static) -> Self {
        let service: Box<dyn ContentService> = Box::new(service);
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();

        thread::spawn(move || {
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Generate(resp) => {
                        let res = service.generate();
                        let _ = resp.send(res);
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(());
                        break;
                    }
                }
            }
            debug!("studio worker stopped");
        });

        Self { cmd_tx }
    }

    /// Request one generated document.
    pub async fn generate(&self) -> Result<GeneratedDocument> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Generate(tx))
            .map_err(|_| Error::Other("Studio worker is gone".into()))?;
        rx.await
            .map_err(|e| Error::Other(format!("Generate canceled: {}", e)))?
    }

    /// Stop the worker thread once queued requests have been served.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Close(tx))
            .map_err(|_| Error::Other("Studio worker is gone".into()))?;
        rx.await
            .map_err(|e| Error::Other(format!("Close canceled: {}", e)))
    }
}
