mod clipboard;
mod help;
mod state;
mod view;

use crate::cli::{build_config, Cli};
use crate::engine::PredictEngine;
use crate::model::PredictEvent;
use crate::orchestrator::{self, UiCommand};
use crate::{picker, preview};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use state::{apply_event, UiState};
use std::path::Path;
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

pub async fn run(args: Cli) -> Result<()> {
    // Unbounded channels avoid backpressure between the UI thread and the runtime.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<PredictEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();

    let engine = PredictEngine::new(&build_config(&args))?;

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let ui_args = args.clone();
    let ui_handle = std::thread::spawn(move || run_threaded(ui_args, event_rx, cmd_tx));

    let res = orchestrator::run_controller(engine, event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res
}

/// Run the TUI loop on a dedicated thread.
pub fn run_threaded(
    args: Cli,
    mut event_rx: UnboundedReceiver<PredictEvent>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    // UiState is owned by the UI thread only; no cross-thread mutation.
    let mut state = UiState {
        picker_dir: args.dir.clone(),
        service_url: args.service_url.clone(),
        ..Default::default()
    };

    // A photo on the command line starts the first cycle immediately.
    if let Some(path) = args.image.as_deref() {
        select_photo(&mut state, path, &cmd_tx);
    } else {
        state.info = "Press o to choose a photo".into();
    }

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    let res = loop {
        // Drain events without blocking to keep UI responsive; unbounded channel avoids backpressure.
        while let Ok(ev) = event_rx.try_recv() {
            apply_event(&mut state, ev);
        }

        if last_tick.elapsed() >= tick_rate {
            terminal.draw(|f| view::draw(f.area(), f, &state)).ok();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                match (k.modifiers, k.code) {
                    (_, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
                        let _ = cmd_tx.send(UiCommand::Quit);
                        break Ok(());
                    }
                    (_, KeyCode::Char('o')) => {
                        open_picker(&mut state);
                    }
                    (_, KeyCode::Esc) => {
                        if state.picker_open {
                            state.picker_open = false;
                        } else if state.tab != 0 {
                            state.tab = 0;
                        }
                    }
                    (_, KeyCode::Enter) => {
                        if state.picker_open && !state.picker_entries.is_empty() {
                            let path = state.picker_entries[state.picker_selected].clone();
                            state.picker_open = false;
                            select_photo(&mut state, &path, &cmd_tx);
                        }
                    }
                    (_, KeyCode::Up) | (_, KeyCode::Char('k')) => {
                        if state.picker_open {
                            state.picker_selected = state.picker_selected.saturating_sub(1);
                        }
                    }
                    (_, KeyCode::Down) | (_, KeyCode::Char('j')) => {
                        if state.picker_open
                            && state.picker_selected + 1 < state.picker_entries.len()
                        {
                            state.picker_selected += 1;
                        }
                    }
                    (_, KeyCode::Char('r')) => {
                        // A fresh cycle for the current photo. An older
                        // request still in flight is not cancelled; its
                        // completion will arrive stale and be ignored.
                        if let Some(photo) = state.photo.clone() {
                            let _ = cmd_tx.send(UiCommand::Predict(photo));
                        } else {
                            state.info = "No photo selected yet".into();
                        }
                    }
                    (_, KeyCode::Char('y')) => {
                        if let Some(p) = state.preview.as_ref() {
                            match clipboard::copy_to_clipboard(&p.data_uri) {
                                Ok(()) => {
                                    state.info = "Copied photo data URI to clipboard".into();
                                }
                                Err(e) => {
                                    state.info = format!("Clipboard copy failed: {e:#}");
                                }
                            }
                        } else {
                            state.info = "No photo selected yet".into();
                        }
                    }
                    (_, KeyCode::PageUp) => {
                        state.analysis_scroll = state.analysis_scroll.saturating_sub(4);
                    }
                    (_, KeyCode::PageDown) => {
                        state.analysis_scroll = state.analysis_scroll.saturating_add(4);
                    }
                    (_, KeyCode::Tab) => {
                        state.tab = (state.tab + 1) % 2;
                    }
                    (_, KeyCode::Char('?')) => {
                        state.tab = 1;
                    }
                    _ => {}
                }
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();

    res
}

/// Load a photo, synchronously derive its preview, then ask the
/// controller for a prediction cycle.
fn select_photo(state: &mut UiState, path: &Path, cmd_tx: &UnboundedSender<UiCommand>) {
    let photo = match picker::load_photo(path) {
        Ok(p) => p,
        Err(e) => {
            tracing::debug!("photo selection failed: {e:#}");
            state.info = format!("{e:#}");
            return;
        }
    };

    match preview::build_preview(&photo) {
        Ok(p) => state.preview = Some(p),
        Err(e) => {
            // An undecodable preview does not block the upload; the
            // service may still accept the file.
            state.preview = None;
            state.info = format!("Preview unavailable: {e:#}");
        }
    }

    state.photo = Some(photo.clone());
    let _ = cmd_tx.send(UiCommand::Predict(photo));
}

fn open_picker(state: &mut UiState) {
    match picker::list_photos(&state.picker_dir) {
        Ok(entries) => {
            if entries.is_empty() {
                state.info = format!(
                    "No images in {} (jpg/jpeg/png)",
                    state.picker_dir.display()
                );
            }
            state.picker_entries = entries;
            state.picker_selected = 0;
            state.picker_open = true;
        }
        Err(e) => {
            state.info = format!("{e:#}");
        }
    }
}
