use std::io::{BufRead, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use installer_app_core::{
    CommandSpec, OutputEvent, SessionController, SessionState, SystemLauncher,
};
use installer_config::{DRAIN_INTERVAL_MS, MAX_LINE_BYTES};
use installer_core::classify;
use installer_infra::LineSplitter;
use installer_pipeline::clean_line;

use crate::RunOptions;

/// Runs the installer with this terminal acting as the UI context and
/// returns how the session ended.
pub fn cmd_run(command: CommandSpec, opts: RunOptions) -> Result<SessionState> {
    let mut controller = SessionController::new(SystemLauncher::new(), command)
        .with_log_capacity(opts.log_capacity);
    if let Some(path) = &opts.transcript {
        controller = controller.with_transcript(path);
    }

    println!(":: Running: {}", controller.display_command());
    if let Some(t) = controller.transcript() {
        println!(":: Transcript: {}", t.path());
    }

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")?
            .progress_chars("=>-"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Preparing installation...");

    controller.start()?.into_result()?;

    while !controller.session().state().is_terminal() {
        for ev in controller.drain() {
            render_event(&pb, &ev);
        }
        std::thread::sleep(Duration::from_millis(DRAIN_INTERVAL_MS));
    }

    let state = controller.session().state();
    match state {
        SessionState::Succeeded => pb.finish_with_message("Installation complete!"),
        _ => pb.abandon_with_message("Installation failed"),
    }

    if let Some(out) = &opts.export_log {
        std::fs::write(out, controller.progress().log.to_text())
            .with_context(|| format!("Failed to write log to {out}"))?;
        println!(":: Saved log to {out}");
    }

    Ok(state)
}

fn render_event(pb: &ProgressBar, ev: &OutputEvent) {
    match ev {
        OutputEvent::LogLine { text } => pb.println(text),
        // Transfer lines overwrite each other; keep them on the bar.
        OutputEvent::LogLineReplace { text } => pb.set_message(text.clone()),
        OutputEvent::ProgressUpdate { percent, message } => {
            pb.set_position(u64::from(*percent));
            pb.set_message(message.clone());
        }
        OutputEvent::StatusUpdate { message } => pb.set_message(message.clone()),
        OutputEvent::ErrorNotice { message } => pb.println(format!("ERROR: {message}")),
        OutputEvent::MarkComplete | OutputEvent::InstallSucceeded { .. } => pb.set_position(100),
        OutputEvent::InstallFailed { .. } => {}
    }
}

/// Replays captured installer output through the same line splitting,
/// cleanup and classification the worker uses, writing one JSON event per
/// line of output. Returns the number of events written.
pub fn cmd_classify(mut input: impl BufRead, mut out: impl Write) -> Result<usize> {
    let mut splitter = LineSplitter::new(MAX_LINE_BYTES);
    let mut count = 0;
    loop {
        let chunk = input.fill_buf().context("Failed to read installer output")?;
        if chunk.is_empty() {
            break;
        }
        let len = chunk.len();
        let lines = splitter.push(chunk);
        input.consume(len);
        for raw in lines {
            count += write_events(&raw, &mut out)?;
        }
    }
    if let Some(raw) = splitter.finish() {
        count += write_events(&raw, &mut out)?;
    }
    out.flush()?;
    Ok(count)
}

fn write_events(raw: &str, mut out: impl Write) -> Result<usize> {
    let Some(line) = clean_line(raw) else {
        return Ok(0);
    };
    let events = classify(line);
    for ev in &events {
        serde_json::to_writer(&mut out, ev)?;
        writeln!(out)?;
    }
    Ok(events.len())
}
