use crate::config::CodecConfig;
use crate::format::{ImageFormats, ImageFrame, ImageInfo};
use crate::{Error, Result};
use std::sync::mpsc::{self, Sender};
use std::thread;
use tokio::sync::oneshot;

enum Command {
    Sniff(Vec<u8>, oneshot::Sender<Option<(String, ImageInfo)>>),
    Decode(Vec<u8>, oneshot::Sender<Result<Vec<ImageFrame>>>),
    Encode(String, Vec<ImageFrame>, oneshot::Sender<Result<Vec<u8>>>),
    Close(oneshot::Sender<()>),
}

/// An async-friendly codec front end backed by a dedicated worker thread.
///
/// The worker owns an `ImageFormats` registry and runs every decode and
/// encode to completion, so async callers never block their executor on
/// pixel work. Handles are cheap to clone and share the same worker.
#[derive(Clone)]
pub struct AsyncCodec {
    cmd_tx: Sender<Command>,
}

impl AsyncCodec {
    /// Spawn the worker with the built-in formats and `config` (or defaults).
    pub async fn new(config: Option<CodecConfig>) -> Result<Self> {
        let config = config.unwrap_or_default();

        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx) = oneshot::channel::<Result<()>>();

        thread::spawn(move || {
            let formats = match ImageFormats::with_config(config) {
                Ok(f) => f,
                Err(err) => {
                    let _ = init_tx.send(Err(err));
                    return;
                }
            };
            let _ = init_tx.send(Ok(()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Sniff(data, resp) => {
                        let res = formats.sniff(&data).map(|(f, info)| (f.name().to_string(), info));
                        let _ = resp.send(res);
                    }
                    Command::Decode(data, resp) => {
                        let _ = resp.send(formats.read_frames(&data));
                    }
                    Command::Encode(name, frames, resp) => {
                        let _ = resp.send(formats.encode(&name, &frames));
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(());
                        break;
                    }
                }
            }
            log::debug!("codec worker exiting");
        });

        init_rx
            .await
            .map_err(|e| Error::Worker(format!("init canceled: {}", e)))??;

        Ok(Self { cmd_tx })
    }

    fn send(&self, cmd: Command) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| Error::Worker("worker has shut down".to_string()))
    }

    /// Name and header of the first registered format that recognizes `data`
    pub async fn sniff(&self, data: Vec<u8>) -> Result<Option<(String, ImageInfo)>> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Sniff(data, tx))?;
        rx.await.map_err(|e| Error::Worker(format!("sniff canceled: {}", e)))
    }

    pub async fn decode(&self, data: Vec<u8>) -> Result<Vec<ImageFrame>> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Decode(data, tx))?;
        rx.await
            .map_err(|e| Error::Worker(format!("decode canceled: {}", e)))?
    }

    /// Encode `frames` with the format registered as `format`.
    pub async fn encode(&self, format: &str, frames: Vec<ImageFrame>) -> Result<Vec<u8>> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Encode(format.to_string(), frames, tx))?;
        rx.await
            .map_err(|e| Error::Worker(format!("encode canceled: {}", e)))?
    }

    /// Stop the worker. Other clones of this handle fail with `Worker` afterwards.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Close(tx))?;
        rx.await.map_err(|e| Error::Worker(format!("close canceled: {}", e)))
    }
}
