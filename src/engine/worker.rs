use super::{ContentEngine, EngineEvent, Target};
use crate::state::TabId;
use bytesize::ByteSize;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use tracing::{debug, warn};

const CHUNK_SIZE: usize = 64 * 1024;
const MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

enum WorkerCommand {
    Load { tab: TabId, target: Target },
}

/// Loads queued per tab and the tabs whose loads were stopped.
/// A tab is only remembered while it has a load queued or running.
#[derive(Default, Debug)]
struct LoadBook {
    pending: HashMap<TabId, usize>,
    cancelled: HashSet<TabId>,
}

impl LoadBook {
    fn queued(&mut self, tab: TabId) {
        *self.pending.entry(tab).or_default() += 1;
        self.cancelled.remove(&tab);
    }

    fn cancel(&mut self, tab: TabId) -> bool {
        if self.pending.contains_key(&tab) {
            self.cancelled.insert(tab);
            true
        } else {
            false
        }
    }

    fn is_cancelled(&self, tab: TabId) -> bool {
        self.cancelled.contains(&tab)
    }

    fn finished(&mut self, tab: TabId) {
        if let Some(count) = self.pending.get_mut(&tab) {
            *count -= 1;
            if *count == 0 {
                self.pending.remove(&tab);
                self.cancelled.remove(&tab);
            }
        }
    }
}

/// Handle to the loader thread.
#[derive(Clone)]
pub struct WorkerEngine {
    command_tx: Sender<WorkerCommand>,
    loads: Arc<Mutex<LoadBook>>,
}

impl ContentEngine for WorkerEngine {
    fn load(&self, tab: TabId, target: Target) {
        if let Ok(mut loads) = self.loads.lock() {
            loads.queued(tab);
        }
        if self.command_tx.send(WorkerCommand::Load { tab, target }).is_err() {
            warn!(?tab, "content worker is gone");
            if let Ok(mut loads) = self.loads.lock() {
                loads.finished(tab);
            }
        }
    }

    fn stop(&self, tab: TabId) {
        if let Ok(mut loads) = self.loads.lock() {
            if loads.cancel(tab) {
                debug!(?tab, "stopping load");
            }
        }
    }
}

/// Start the loader thread. `wake` runs after every batch of events so the
/// UI can repaint.
pub fn spawn_worker<W>(wake: W) -> (WorkerEngine, Receiver<EngineEvent>)
where
    W: Fn() + Send + 'static,
{
    let (cmd_tx, cmd_rx) = channel();
    let (res_tx, res_rx) = channel();
    let loads = Arc::new(Mutex::new(LoadBook::default()));

    let worker_loads = Arc::clone(&loads);
    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                WorkerCommand::Load { tab, target } => {
                    let _ = res_tx.send(EngineEvent::LoadStarted(tab));
                    let event = match target {
                        Target::Blank => EngineEvent::LoadFinished {
                            tab,
                            path: PathBuf::new(),
                            content: String::new(),
                        },
                        Target::Web(url) => EngineEvent::LoadFailed {
                            tab,
                            reason: format!("cannot render {url}: no web engine attached"),
                        },
                        Target::File(path) => {
                            let is_cancelled = || {
                                worker_loads
                                    .lock()
                                    .map(|loads| loads.is_cancelled(tab))
                                    .unwrap_or(false)
                            };
                            match read_file(&path, &is_cancelled, |percent| {
                                let _ = res_tx.send(EngineEvent::LoadProgress { tab, percent });
                            }) {
                                Ok(content) => EngineEvent::LoadFinished { tab, path, content },
                                Err(e) => EngineEvent::LoadFailed {
                                    tab,
                                    reason: format!("{}: {e}", path.display()),
                                },
                            }
                        }
                    };
                    debug!(?event, "load done");
                    if let Ok(mut loads) = worker_loads.lock() {
                        loads.finished(tab);
                    }
                    let _ = res_tx.send(event);
                }
            }
            wake();
        }
    });

    (
        WorkerEngine {
            command_tx: cmd_tx,
            loads,
        },
        res_rx,
    )
}

fn read_file(
    path: &Path,
    is_cancelled: &dyn Fn() -> bool,
    mut progress: impl FnMut(u8),
) -> io::Result<String> {
    let mut file = File::open(path)?;
    let total = file.metadata()?.len();
    if total > MAX_FILE_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "file is too large ({}, limit {})",
                ByteSize::b(total),
                ByteSize::b(MAX_FILE_SIZE)
            ),
        ));
    }

    let mut bytes = Vec::with_capacity(total as usize);
    let mut chunk = vec![0u8; CHUNK_SIZE];
    loop {
        if is_cancelled() {
            return Err(io::Error::new(io::ErrorKind::Interrupted, "load stopped"));
        }
        let n = file.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..n]);
        if total > 0 {
            progress(((bytes.len() as u64 * 100) / total).min(100) as u8);
        }
    }

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn collect_until_done(rx: &Receiver<EngineEvent>) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.recv_timeout(Duration::from_secs(5)) {
            let done = matches!(
                event,
                EngineEvent::LoadFinished { .. } | EngineEvent::LoadFailed { .. }
            );
            events.push(event);
            if done {
                break;
            }
        }
        events
    }

    #[test]
    fn test_loads_local_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("page.txt");
        std::fs::write(&path, "hello kiri").expect("write");

        let (engine, rx) = spawn_worker(|| {});
        engine.load(TabId(7), Target::File(path.clone()));
        let events = collect_until_done(&rx);

        assert_eq!(events.first(), Some(&EngineEvent::LoadStarted(TabId(7))));
        assert!(events.contains(&EngineEvent::LoadProgress {
            tab: TabId(7),
            percent: 100
        }));
        assert_eq!(
            events.last(),
            Some(&EngineEvent::LoadFinished {
                tab: TabId(7),
                path,
                content: "hello kiri".into()
            })
        );
    }

    #[test]
    fn test_missing_file_fails() {
        let (engine, rx) = spawn_worker(|| {});
        engine.load(TabId(1), Target::File(PathBuf::from("/definitely/not/here.txt")));
        let events = collect_until_done(&rx);
        assert!(matches!(events.last(), Some(EngineEvent::LoadFailed { tab: TabId(1), .. })));
    }

    #[test]
    fn test_remote_urls_are_reported_as_failures() {
        let (engine, rx) = spawn_worker(|| {});
        let url = url::Url::parse("https://example.org").expect("valid url");
        engine.load(TabId(2), Target::Web(url));
        let events = collect_until_done(&rx);
        assert!(matches!(events.last(), Some(EngineEvent::LoadFailed { .. })));
    }

    #[test]
    fn test_stop_without_running_load_is_forgotten() {
        let (engine, rx) = spawn_worker(|| {});
        engine.stop(TabId(3));
        assert!(engine.loads.lock().expect("lock").cancelled.is_empty());

        engine.load(TabId(4), Target::Blank);
        let events = collect_until_done(&rx);
        assert!(matches!(events.last(), Some(EngineEvent::LoadFinished { .. })));
        let loads = engine.loads.lock().expect("lock");
        assert!(loads.pending.is_empty());
        assert!(loads.cancelled.is_empty());
    }

    #[test]
    fn test_load_book_clears_after_last_load() {
        let mut book = LoadBook::default();
        book.queued(TabId(1));
        book.queued(TabId(1));
        assert!(book.cancel(TabId(1)));
        assert!(book.is_cancelled(TabId(1)));

        book.finished(TabId(1));
        assert!(book.is_cancelled(TabId(1)));
        book.finished(TabId(1));
        assert!(!book.is_cancelled(TabId(1)));
        assert!(!book.cancel(TabId(1)));
    }

    #[test]
    fn test_read_file_stops_when_cancelled() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("big.txt");
        std::fs::write(&path, "x".repeat(10)).expect("write");
        let err = read_file(&path, &|| true, |_| {}).expect_err("cancelled read");
        assert_eq!(err.kind(), io::ErrorKind::Interrupted);
    }
}
