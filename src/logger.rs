//! Terminal output: tagged log lines and the page counter.
//!
//! Everything goes to stderr so that `lookup` can print markup on stdout
//! and be piped.
//!
//! ```ignore
//! log!("icons"; "{} -> #{}", selector, key);
//! debug!("page"; "{} rewritten", url);   // only with --verbose
//!
//! let progress = PageProgress::new(pages.len());
//! progress.tick();
//! progress.finish();
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{IsTerminal, Write, stderr},
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set when a progress line currently occupies the terminal row.
static PROGRESS_ACTIVE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Print `[tag] message` with a colored tag.
///
/// ```ignore
/// log!("build"; "{} pages", count);
/// ```
#[macro_export]
macro_rules! log {
    ($tag:expr; $($arg:tt)*) => {{
        $crate::logger::log($tag, &format!($($arg)*))
    }};
}

/// Like `log!`, but silent unless `--verbose` was given.
#[macro_export]
macro_rules! debug {
    ($tag:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($tag, &format!($($arg)*))
        }
    }};
}

pub fn log(tag: &str, message: &str) {
    let mut err = stderr().lock();
    if PROGRESS_ACTIVE.load(Ordering::Relaxed) {
        clear_row(&mut err);
    }
    writeln!(err, "{} {message}", paint_tag(tag)).ok();
    err.flush().ok();
}

fn paint_tag(tag: &str) -> String {
    let label = format!("[{tag}]");
    match tag.to_ascii_lowercase().as_str() {
        "icons" | "page" => label.bright_blue().bold().to_string(),
        "done" => label.bright_green().bold().to_string(),
        "error" => label.bright_red().bold().to_string(),
        _ => label.bright_yellow().bold().to_string(),
    }
}

fn clear_row(out: &mut impl Write) {
    execute!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
}

// ============================================================================
// page counter
// ============================================================================

/// `[build] pages 12/40`, redrawn in place from rayon workers.
///
/// Redraws use `try_lock` so workers never wait on the terminal; a skipped
/// frame is caught up by the next tick. Nothing is drawn when stderr is not
/// a terminal.
pub struct PageProgress {
    total: usize,
    done: AtomicUsize,
    draw: Mutex<()>,
    live: bool,
}

impl PageProgress {
    pub fn new(total: usize) -> Self {
        let live = stderr().is_terminal();
        PROGRESS_ACTIVE.store(live, Ordering::Relaxed);

        let progress = Self {
            total,
            done: AtomicUsize::new(0),
            draw: Mutex::new(()),
            live,
        };
        progress.redraw(false);
        progress
    }

    /// Count one finished page.
    pub fn tick(&self) {
        self.done.fetch_add(1, Ordering::Relaxed);
        if let Some(_guard) = self.draw.try_lock() {
            self.redraw(false);
        }
    }

    fn status(&self) -> String {
        format!("pages {}/{}", self.done.load(Ordering::Relaxed), self.total)
    }

    fn redraw(&self, keep: bool) {
        if !self.live {
            return;
        }
        let mut err = stderr().lock();
        clear_row(&mut err);
        write!(err, "{} {}", paint_tag("build"), self.status()).ok();
        if keep {
            writeln!(err).ok();
        }
        err.flush().ok();
    }

    /// Leave the final count on screen.
    pub fn finish(self) {
        PROGRESS_ACTIVE.store(false, Ordering::Relaxed);
        let _guard = self.draw.lock();
        self.redraw(true);
    }
}
