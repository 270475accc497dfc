/// Application state management.
///
/// Everything the UI reads and writes lives here. The update runs on a
/// worker thread and reports back over two channels: pipeline progress
/// (mirrored into the log pane) and the final outcome. Both are drained in
/// `process_messages()`, once per frame.
use chrono::{DateTime, Local};
use crossbeam_channel::{bounded, Receiver, Sender};
use drivedoc_core::pipeline::{self, UpdateOutcome};
use drivedoc_core::platform;
use drivedoc_core::scanner::progress::ScanProgress;
use drivedoc_core::settings::Settings;
use drivedoc_core::store::credentials::{self, InstallOutcome, SERVICE_ACCOUNT_FILE};
use drivedoc_core::store::{GoogleSheetsClient, RemoteCatalog};
use drivedoc_core::worker::UpdateWorker;
use drivedoc_core::{PipelineError, WorkerError};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Maximum number of progress messages drained from the channel per frame.
const MAX_MESSAGES_PER_FRAME: usize = 300;

/// Oldest log lines are dropped beyond this.
pub const MAX_LOG_LINES: usize = 5_000;

pub const PROGRESS_CHANNEL_CAPACITY: usize = 1_024;

/// The work started by the "Scan Drives & Update Documentation" button.
///
/// Production uses [`spreadsheet_job`]; tests inject their own.
pub type UpdateJob =
    Arc<dyn Fn(Sender<ScanProgress>) -> Result<UpdateOutcome, PipelineError> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Success,
}

#[derive(Debug, Clone)]
pub struct LogLine {
    pub time: DateTime<Local>,
    pub level: LogLevel,
    pub text: String,
}

/// Scan every attached drive and sync it into the named spreadsheet.
pub fn spreadsheet_job(spreadsheet: String) -> UpdateJob {
    Arc::new(move |progress: Sender<ScanProgress>| -> Result<UpdateOutcome, PipelineError> {
        let remote = RemoteCatalog::new(GoogleSheetsClient::open(&spreadsheet)?);
        let platform = platform::native();
        pipeline::run_update(&remote, platform.as_ref(), Some(progress))
    })
}

pub struct AppState {
    pub settings: Settings,
    settings_path: PathBuf,

    pub log: Vec<LogLine>,

    worker: UpdateWorker,
    job: UpdateJob,
    /// An update was started and its outcome has not been processed yet.
    pub running: bool,
    /// Label of the most recent pipeline stage, for the status bar.
    pub current_stage: Option<String>,
    progress_tx: Sender<ScanProgress>,
    progress_rx: Receiver<ScanProgress>,
    done_tx: Sender<Result<UpdateOutcome, String>>,
    done_rx: Receiver<Result<UpdateOutcome, String>>,
    /// Outcome received but not yet reported; progress is still draining.
    pending_outcome: Option<Result<UpdateOutcome, String>>,

    // ── Installer ──────────────────────────────────────
    /// Directory the installer looks for the key in.
    pub install_source: PathBuf,
    /// Where the installer puts the key; `None` means the standard location.
    pub install_target: Option<PathBuf>,
    /// The installer succeeded during this session; the button is disabled.
    pub installer_finished: bool,

    // ── Window ─────────────────────────────────────────
    pub show_quit_confirm: bool,
    quit_confirmed: bool,
}

impl AppState {
    pub fn new(settings: Settings, settings_path: PathBuf, job: UpdateJob) -> Self {
        let (progress_tx, progress_rx) = bounded(PROGRESS_CHANNEL_CAPACITY);
        let (done_tx, done_rx) = bounded(1);
        let install_source = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        let mut state = Self {
            settings,
            settings_path,
            log: Vec::new(),
            worker: UpdateWorker::new(),
            job,
            running: false,
            current_stage: None,
            progress_tx,
            progress_rx,
            done_tx,
            done_rx,
            pending_outcome: None,
            install_source,
            install_target: None,
            installer_finished: false,
            show_quit_confirm: false,
            quit_confirmed: false,
        };
        if !state.settings.installed {
            state.log_instructions();
        }
        state
    }

    pub fn push_log(&mut self, level: LogLevel, text: impl Into<String>) {
        let text = text.into();
        match level {
            LogLevel::Error => tracing::error!("{text}"),
            LogLevel::Warning => tracing::warn!("{text}"),
            LogLevel::Info | LogLevel::Success => tracing::info!("{text}"),
        }
        if self.log.len() >= MAX_LOG_LINES {
            let excess = self.log.len() + 1 - MAX_LOG_LINES;
            self.log.drain(..excess);
        }
        self.log.push(LogLine {
            time: Local::now(),
            level,
            text,
        });
    }

    pub fn is_busy(&self) -> bool {
        self.running
    }

    /// Updates need an installed key, and a restart after installing one.
    pub fn can_update(&self) -> bool {
        self.settings.installed && !self.installer_finished
    }

    /// Start an update on the worker thread. Returns whether one was started.
    pub fn start_update(&mut self) -> bool {
        if !self.can_update() {
            self.push_log(
                LogLevel::Warning,
                "Install the program before updating the documentation.",
            );
            return false;
        }
        if self.running {
            self.push_log(LogLevel::Warning, WorkerError::AlreadyRunning.to_string());
            return false;
        }

        let job = Arc::clone(&self.job);
        let progress_tx = self.progress_tx.clone();
        let done_tx = self.done_tx.clone();
        let spawned = self.worker.spawn("drivedoc-update", move || {
            let result = job(progress_tx).map_err(|e| e.to_string());
            let _ = done_tx.send(result);
        });

        match spawned {
            Ok(_) => {
                self.running = true;
                self.current_stage = None;
                self.push_log(LogLevel::Info, "Starting process...");
                true
            }
            Err(e) => {
                self.push_log(LogLevel::Warning, e.to_string());
                false
            }
        }
    }

    /// Drain worker messages into the log. Returns `true` if anything changed.
    pub fn process_messages(&mut self) -> bool {
        // The outcome is sent after the last progress message.
        if self.pending_outcome.is_none() {
            self.pending_outcome = self.done_rx.try_recv().ok();
        }

        let mut changed = false;
        let mut messages_this_frame = 0usize;
        while messages_this_frame < MAX_MESSAGES_PER_FRAME {
            let msg = match self.progress_rx.try_recv() {
                Ok(m) => m,
                Err(_) => break,
            };
            messages_this_frame += 1;
            changed = true;
            let level = match msg {
                ScanProgress::Inaccessible { .. } => LogLevel::Warning,
                ScanProgress::Stage(_) => {
                    self.current_stage = Some(msg.to_string());
                    LogLevel::Info
                }
                _ => LogLevel::Info,
            };
            self.push_log(level, msg.to_string());
        }

        if messages_this_frame < MAX_MESSAGES_PER_FRAME {
            if let Some(result) = self.pending_outcome.take() {
                self.finish(result);
                changed = true;
            }
        }
        changed
    }

    fn finish(&mut self, result: Result<UpdateOutcome, String>) {
        self.running = false;
        self.current_stage = None;
        match result {
            Ok(UpdateOutcome::NothingToUpdate) => {
                self.push_log(
                    LogLevel::Warning,
                    "No valid drives are found (they may be blacklisted)",
                );
                self.push_log(LogLevel::Warning, "Documentation is not updated.");
            }
            Ok(UpdateOutcome::Updated { drives, projects }) => {
                self.push_log(
                    LogLevel::Success,
                    format!(
                        "Documentation successfully updated! ({drives} drive(s), {projects} project(s))"
                    ),
                );
            }
            Err(message) => self.push_log(LogLevel::Error, format!("ERROR: {message}")),
        }
    }

    pub fn set_autostart(&mut self, autostart: bool) {
        self.settings.autostart = autostart;
        self.save_settings();
    }

    fn save_settings(&mut self) {
        if let Err(e) = self.settings.save(&self.settings_path) {
            self.push_log(LogLevel::Error, format!("ERROR: {e}"));
        }
    }

    fn log_instructions(&mut self) {
        let folder = self.install_source.display().to_string();
        self.push_log(
            LogLevel::Info,
            format!("To access the Google Spreadsheet {SERVICE_ACCOUNT_FILE} is needed."),
        );
        self.push_log(
            LogLevel::Info,
            format!(
                "To move {SERVICE_ACCOUNT_FILE} to its correct location, put it in this folder:\n{folder}\nand click \"Install Program\""
            ),
        );
    }

    /// Move the service account key into place and mark the program installed.
    pub fn run_installer(&mut self) {
        let source = self.install_source.clone();
        let outcome = match &self.install_target {
            Some(target) => credentials::install_credentials_to(&source, target),
            None => credentials::install_credentials(&source),
        };

        match outcome {
            Ok(InstallOutcome::AlreadyInstalled(path)) => self.push_log(
                LogLevel::Info,
                format!(
                    "{SERVICE_ACCOUNT_FILE} is already in the correct location: {}",
                    path.display()
                ),
            ),
            Ok(InstallOutcome::Moved(path)) => self.push_log(
                LogLevel::Success,
                format!(
                    "{SERVICE_ACCOUNT_FILE} has been successfully moved to {}",
                    parent_or_self(&path).display()
                ),
            ),
            Ok(InstallOutcome::NotFound { looked_in }) => {
                self.push_log(LogLevel::Warning, format!("{SERVICE_ACCOUNT_FILE} not found."));
                self.push_log(
                    LogLevel::Info,
                    format!(
                        "Put it in this folder:\n{}\nand try again",
                        looked_in.display()
                    ),
                );
                return;
            }
            Err(e) => {
                self.push_log(LogLevel::Error, format!("ERROR: {e}"));
                return;
            }
        }

        self.settings.installed = true;
        self.save_settings();
        self.installer_finished = true;
        self.push_log(LogLevel::Info, "Restart the App to use it.");
    }

    /// Whether the window may close now. While an update runs this asks for
    /// confirmation first.
    pub fn request_close(&mut self) -> bool {
        if !self.running || self.quit_confirmed {
            return true;
        }
        self.show_quit_confirm = true;
        false
    }

    pub fn confirm_quit(&mut self) {
        self.quit_confirmed = true;
        self.show_quit_confirm = false;
    }

    pub fn cancel_quit(&mut self) {
        self.show_quit_confirm = false;
    }
}

fn parent_or_self(path: &Path) -> &Path {
    path.parent().unwrap_or(path)
}
