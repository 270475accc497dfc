/// End-to-end tests for `AppState`: the GUI application state machine.
///
/// These exercise the real worker thread, channels, settings file and
/// installer without spinning up an egui window. The update job is
/// injected so no spreadsheet is needed.
use crossbeam_channel::Sender;
use drivedoc_core::pipeline::UpdateOutcome;
use drivedoc_core::scanner::progress::{ScanProgress, Stage};
use drivedoc_core::settings::{Settings, SETTINGS_FILE};
use drivedoc_core::{PipelineError, StoreError};
use drivedoc_gui::state::{AppState, LogLevel, UpdateJob};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn installed() -> Settings {
    Settings {
        installed: true,
        ..Settings::default()
    }
}

fn job(result: fn() -> Result<UpdateOutcome, PipelineError>) -> UpdateJob {
    Arc::new(move |tx: Sender<ScanProgress>| -> Result<UpdateOutcome, PipelineError> {
        let _ = tx.send(ScanProgress::Stage(Stage::Scanning));
        let _ = tx.send(ScanProgress::Inaccessible {
            path: PathBuf::from("/media/A/locked"),
        });
        result()
    })
}

/// A job that runs until something is sent on `release`.
fn blocking_job(release: crossbeam_channel::Receiver<()>) -> UpdateJob {
    Arc::new(move |_tx: Sender<ScanProgress>| -> Result<UpdateOutcome, PipelineError> {
        let _ = release.recv();
        Ok(UpdateOutcome::NothingToUpdate)
    })
}

fn state_in(dir: &TempDir, settings: Settings, job: UpdateJob) -> AppState {
    AppState::new(settings, dir.path().join(SETTINGS_FILE), job)
}

/// Pump `process_messages()` until the update finishes or the deadline hits.
fn pump_until_idle(state: &mut AppState) {
    let deadline = Instant::now() + Duration::from_secs(30);
    while state.is_busy() {
        assert!(Instant::now() < deadline, "update did not finish within 30 seconds");
        state.process_messages();
        std::thread::sleep(Duration::from_millis(10));
    }
}

fn texts(state: &AppState) -> Vec<&str> {
    state.log.iter().map(|l| l.text.as_str()).collect()
}

// ── Update lifecycle ───────────────────────────────────────────────────────────

#[test]
fn successful_update_logs_progress_then_success() {
    let dir = TempDir::new().unwrap();
    let mut state = state_in(
        &dir,
        installed(),
        job(|| {
            Ok(UpdateOutcome::Updated {
                drives: 2,
                projects: 5,
            })
        }),
    );

    assert!(state.start_update());
    assert!(state.is_busy());
    pump_until_idle(&mut state);

    let log = texts(&state);
    assert_eq!(log[0], "Starting process...");
    assert!(log.contains(&"Scanning drives..."));
    let last = state.log.last().unwrap();
    assert_eq!(last.level, LogLevel::Success);
    assert!(last.text.contains("2 drive(s), 5 project(s)"));
    assert!(state
        .log
        .iter()
        .any(|l| l.level == LogLevel::Warning && l.text.contains("permission denied")));
}

#[test]
fn nothing_to_update_is_reported() {
    let dir = TempDir::new().unwrap();
    let mut state = state_in(&dir, installed(), job(|| Ok(UpdateOutcome::NothingToUpdate)));
    state.start_update();
    pump_until_idle(&mut state);

    let log = texts(&state);
    assert!(log.contains(&"No valid drives are found (they may be blacklisted)"));
    assert_eq!(*log.last().unwrap(), "Documentation is not updated.");
}

#[test]
fn failed_update_logs_error_and_unlocks() {
    let dir = TempDir::new().unwrap();
    let mut state = state_in(
        &dir,
        installed(),
        job(|| Err(StoreError::SpreadsheetNotFound("external_drives_docu".into()).into())),
    );
    state.start_update();
    pump_until_idle(&mut state);

    let last = state.log.last().unwrap();
    assert_eq!(last.level, LogLevel::Error);
    assert!(last.text.starts_with("ERROR: "));
    assert!(last.text.contains("external_drives_docu"));
    assert!(!state.is_busy());
}

#[test]
fn second_start_while_running_is_rejected() {
    let dir = TempDir::new().unwrap();
    let (release_tx, release_rx) = crossbeam_channel::bounded::<()>(0);
    let mut state = state_in(&dir, installed(), blocking_job(release_rx));

    assert!(state.start_update());
    assert!(!state.start_update());
    assert_eq!(*texts(&state).last().unwrap(), "A process is already running.");

    release_tx.send(()).unwrap();
    pump_until_idle(&mut state);
}

// ── Window close ───────────────────────────────────────────────────────────────

#[test]
fn closing_while_busy_needs_confirmation() {
    let dir = TempDir::new().unwrap();
    let (release_tx, release_rx) = crossbeam_channel::bounded::<()>(0);
    let mut state = state_in(&dir, installed(), blocking_job(release_rx));
    assert!(state.request_close());

    state.start_update();
    assert!(!state.request_close());
    assert!(state.show_quit_confirm);
    state.cancel_quit();
    assert!(!state.show_quit_confirm);

    state.confirm_quit();
    assert!(state.request_close());

    release_tx.send(()).unwrap();
    pump_until_idle(&mut state);
}

// ── Settings & installer ───────────────────────────────────────────────────────

#[test]
fn autostart_checkbox_is_persisted() {
    let dir = TempDir::new().unwrap();
    let mut state = state_in(&dir, installed(), job(|| Ok(UpdateOutcome::NothingToUpdate)));
    state.set_autostart(true);

    let saved = Settings::load_or_create(&dir.path().join(SETTINGS_FILE)).unwrap();
    assert!(saved.autostart);
    assert!(saved.installed);
}

#[test]
fn uninstalled_state_explains_the_installer() {
    let dir = TempDir::new().unwrap();
    let state = state_in(&dir, Settings::default(), job(|| Ok(UpdateOutcome::NothingToUpdate)));
    assert!(texts(&state)
        .iter()
        .any(|t| t.contains("service_account.json is needed")));
}

#[test]
fn updates_wait_for_installation() {
    let dir = TempDir::new().unwrap();
    let settings = Settings {
        autostart: true,
        ..Settings::default()
    };
    let mut state = state_in(&dir, settings, job(|| Ok(UpdateOutcome::NothingToUpdate)));

    assert!(!state.can_update());
    assert!(!state.start_update());
    assert!(!state.is_busy());
    assert_eq!(
        *texts(&state).last().unwrap(),
        "Install the program before updating the documentation."
    );
}

#[test]
fn installer_moves_key_and_marks_installed() {
    let dir = TempDir::new().unwrap();
    let source = TempDir::new().unwrap();
    let config = TempDir::new().unwrap();
    let target = config.path().join("gspread").join("service_account.json");

    let mut state = state_in(&dir, Settings::default(), job(|| Ok(UpdateOutcome::NothingToUpdate)));
    state.install_source = source.path().to_path_buf();
    state.install_target = Some(target.clone());

    // Nothing to move yet.
    state.run_installer();
    assert!(!state.installer_finished);
    assert!(!state.settings.installed);
    assert!(texts(&state).contains(&"service_account.json not found."));

    fs::write(source.path().join("service_account.json"), "{}").unwrap();
    state.run_installer();
    assert!(state.installer_finished);
    assert!(target.exists());
    assert_eq!(*texts(&state).last().unwrap(), "Restart the App to use it.");

    let saved = Settings::load_or_create(&dir.path().join(SETTINGS_FILE)).unwrap();
    assert!(saved.installed);

    // The new key is only picked up after a restart.
    assert!(!state.can_update());
    assert!(!state.start_update());
}
