//! File watcher: runs locate on startup, then re-runs it on graph or
//! sidecar changes. Keeps a highlight current while the file is edited.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use notify::{RecursiveMode, Watcher as _};

use crate::commands::{self, LocateArgs};
use crate::error::Error;
use crate::highlight::{EditorSurface, HighlightApplier, ScrollScheduler};
use crate::types::{Position, TextRange};

/// Debounce delay between filesystem events and re-locate.
const DEBOUNCE_MS: u64 = 100;

/// Stands in for an editor widget in watch mode: prints what a host would
/// do with each result instead of drawing it.
struct LogSurface;

impl EditorSurface for LogSurface {
    fn add_mark(&mut self, range: &TextRange) {
        eprintln!(
            "watch: mark {}..{}",
            commands::fmt_position(range.start),
            commands::fmt_position(range.end)
        );
    }
    fn clear_marks(&mut self) {
        eprintln!("watch: marks cleared");
    }
    fn set_caret(&mut self, position: Position) {
        eprintln!("watch: caret at {}", commands::fmt_position(position));
    }
    fn scroll_to_line(&mut self, line: usize, margin: usize) {
        let shown = line.saturating_add(1);
        eprintln!("watch: scroll to line {shown} (margin {margin})");
    }
}

/// Parent directories of the graph file and its sidecars. Watching the
/// directory rather than the file survives editors that replace on save.
fn collect_watch_dirs(args: &LocateArgs) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    for path in [Some(&args.file), args.quads.as_ref(), args.prefix_file.as_ref()]
        .into_iter()
        .flatten()
    {
        let parent = path.parent().filter(|p| return !p.as_os_str().is_empty());
        let dir = parent.map_or_else(|| return PathBuf::from("."), Path::to_path_buf);
        if !dirs.contains(&dir) {
            dirs.push(dir);
        }
    }
    return dirs;
}

/// Create a filesystem watcher that sends events on the given channel.
///
/// # Errors
///
/// Returns `Error::WatchSetup` if the watcher cannot be created.
fn create_watcher(
    tx: crossbeam_channel::Sender<()>,
) -> Result<notify::RecommendedWatcher, Error> {
    return notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        if let Ok(event) = res
            && matches!(
                event.kind,
                notify::EventKind::Create(_)
                    | notify::EventKind::Modify(_)
                    | notify::EventKind::Remove(_)
            )
        {
            let _ = tx.send(());
        }
    })
    .map_err(|e| {
        return Error::WatchSetup {
            reason: e.to_string(),
        };
    });
}

/// Entry point for the watch command.
///
/// Locates once, then watches the graph file's directory (and sidecar
/// directories) and re-locates on changes.
///
/// # Errors
///
/// Returns errors from watcher setup. Locate errors are printed and
/// watching continues — a transiently broken file should not end the
/// session.
pub fn run(args: &LocateArgs) -> Result<ExitCode, Error> {
    let mut applier = HighlightApplier::new();
    let scheduler = ScrollScheduler::new();

    eprintln!("watch: initial locate");
    let mut last_code = run_locate(args, &mut applier, &scheduler);

    let (tx, rx) = crossbeam_channel::unbounded();
    let mut watcher = create_watcher(tx)?;

    let watch_dirs = collect_watch_dirs(args);
    for dir in &watch_dirs {
        if dir.exists() {
            let _ = watcher.watch(dir, RecursiveMode::NonRecursive);
        }
    }

    let dir_count = watch_dirs.len();
    eprintln!("watch: monitoring {dir_count} directories, press Ctrl+C to stop");

    while rx.recv().is_ok() {
        let debounce = Duration::from_millis(DEBOUNCE_MS);
        while rx.recv_timeout(debounce).is_ok() {}
        eprintln!("watch: change detected, re-locating...");
        last_code = run_locate(args, &mut applier, &scheduler);
    }

    return Ok(last_code);
}

/// Run locate once, print the result, and replay it through the highlight
/// applier. Locate errors are printed, not propagated.
fn run_locate(
    args: &LocateArgs,
    applier: &mut HighlightApplier,
    scheduler: &ScrollScheduler,
) -> ExitCode {
    let result = match commands::locate_result(args) {
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(3_u8);
        },
        Ok(r) => r,
    };

    if let Err(e) = commands::print_locate_result(&result, args.json) {
        eprintln!("error: {e}");
    }

    let mut surface = LogSurface;
    if let Some(plan) = applier.apply(&mut surface, &result) {
        scheduler.submit(plan);
        scheduler.run_pending(&mut surface);
    }
    let marks = applier.applied().len();
    eprintln!("watch: {marks} marks applied");
    return commands::exit_code_for(result.outcome);
}
