use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::api::ApiClient;

use super::types::{NetCmd, NetEvent};

/// Handle to the network worker thread.
///
/// Requests run one at a time in submission order; the per-action
/// in-flight flags in the app model prevent duplicate submissions, so a
/// single worker is enough and doubles as the "no concurrent mutation"
/// guarantee of the design.
pub struct NetWorker {
    tx: Sender<NetCmd>,
}

impl NetWorker {
    pub fn send(&self, cmd: NetCmd) {
        // A send can only fail once the worker is gone, i.e. during
        // shutdown; nothing useful is lost then.
        let _ = self.tx.send(cmd);
    }
}

/// Spawn the worker; the returned receiver is drained by the event loop.
pub fn spawn_net_worker(api: ApiClient, downloads_dir: PathBuf) -> (NetWorker, Receiver<NetEvent>) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<NetCmd>();
    let (event_tx, event_rx) = mpsc::channel::<NetEvent>();

    thread::spawn(move || run_worker(api, downloads_dir, cmd_rx, event_tx));

    (NetWorker { tx: cmd_tx }, event_rx)
}

fn run_worker(
    api: ApiClient,
    downloads_dir: PathBuf,
    rx: Receiver<NetCmd>,
    tx: Sender<NetEvent>,
) {
    // Exits when the command sender is dropped on shutdown.
    while let Ok(cmd) = rx.recv() {
        match cmd {
            NetCmd::LoadLibrary { epoch } => {
                let result = api.songs();
                if let Err(e) = &result {
                    log::warn!("library fetch failed: {e}");
                }
                let _ = tx.send(NetEvent::Library { epoch, result });
            }

            NetCmd::Convert { url, epoch } => {
                let result = api.convert(&url);
                if let Err(e) = &result {
                    log::warn!("convert failed for {url}: {e}");
                }
                let _ = tx.send(NetEvent::Converted { epoch, result });
            }

            NetCmd::Save { request, epoch } => {
                let result = api.save_to_library(&request);
                if let Err(e) = &result {
                    log::warn!("save to library failed for {}: {e}", request.file_id);
                }
                let _ = tx.send(NetEvent::Saved { epoch, result });
            }

            NetCmd::Delete { id, epoch } => {
                let result = api.delete_song(id);
                if let Err(e) = &result {
                    log::warn!("delete failed for song {id}: {e}");
                }
                let _ = tx.send(NetEvent::Deleted { epoch, id, result });
            }

            NetCmd::Download { url, file_name } => {
                // No event: the download changes no view state.
                match api.download_file(&url, &downloads_dir, &file_name) {
                    Ok(path) => log::info!("downloaded {url} to {}", path.display()),
                    Err(e) => log::warn!("download failed for {url}: {e}"),
                }
            }
        }
    }
}
