//! Terminal output: colored log lines and in-place progress bars.
//!
//! ```ignore
//! log!("build"; "reading {} documents", count);
//!
//! let progress = ProgressBars::new(&[("content", 12), ("assets", 40)]);
//! progress.inc("content");
//! progress.finish();
//! ```
//!
//! While bars are active, `log!` prints above them and redraws the reserved
//! lines, so messages from parallel stages never tear a bar.

use colored::{ColoredString, Colorize};
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType, size},
};
use std::{
    io::{Write, stdout},
    sync::{
        Mutex, OnceLock,
        atomic::{AtomicUsize, Ordering},
    },
};

/// Cached terminal width (fetched once on first use)
static TERMINAL_WIDTH: OnceLock<u16> = OnceLock::new();

/// Lines currently reserved by progress bars
static BAR_COUNT: AtomicUsize = AtomicUsize::new(0);

// ============================================================================
// Layout Constants
// ============================================================================
//
// Progress bar format: "[module] [████░░░░] 42/100"
//                       ^------^ ^-------^ ^----^
//                       prefix   bar       count

/// `[`, `]` and the space after the prefix
const PREFIX_OVERHEAD: usize = 3;
/// " []" around the bar plus the space before the count
const BAR_OVERHEAD: usize = 4;
const MIN_BAR_WIDTH: usize = 10;
const MAX_BAR_WIDTH: usize = 40;

#[inline]
const fn prefix_len(module_len: usize) -> usize {
    module_len + PREFIX_OVERHEAD
}

/// Falls back to 120 columns if detection fails.
fn terminal_width() -> usize {
    *TERMINAL_WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(120)) as usize
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix.
///
/// ```ignore
/// log!("warn"; "cannot parse `{}`", path.display());
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Print one log line, truncated to the terminal width unless multiline.
#[allow(clippy::cast_possible_truncation)] // bar count is always small
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let mut stdout = stdout().lock();

    let bar_count = BAR_COUNT.load(Ordering::SeqCst);
    if bar_count > 0 {
        execute!(stdout, cursor::MoveUp(bar_count as u16)).ok();
        execute!(stdout, Clear(ClearType::FromCursorDown)).ok();
    }

    let message = if message.contains('\n') {
        message
    } else {
        truncate_str(message, terminal_width().saturating_sub(prefix_len(module.len())))
    };
    writeln!(stdout, "{prefix} {message}").ok();

    // Give the bars their lines back; they redraw on the next increment
    for _ in 0..bar_count {
        writeln!(stdout).ok();
    }
    stdout.flush().ok();
}

// ============================================================================
// Progress Bars
// ============================================================================

/// Several progress bars, one terminal line each, updated from any thread.
pub struct ProgressBars {
    bars: Vec<ProgressBar>,
    lock: Mutex<()>,
}

struct ProgressBar {
    name: &'static str,
    prefix: ColoredString,
    total: usize,
    current: AtomicUsize,
    /// Row within the progress area, 0 is the top bar
    row: usize,
}

impl ProgressBars {
    /// Reserve one line per `(module, total)` pair.
    pub fn new(modules: &[(&'static str, usize)]) -> Self {
        let mut stdout = stdout().lock();
        for _ in modules {
            writeln!(stdout).ok();
        }
        stdout.flush().ok();

        BAR_COUNT.store(modules.len(), Ordering::SeqCst);

        let bars = modules
            .iter()
            .enumerate()
            .map(|(row, &(name, total))| ProgressBar {
                name,
                prefix: colorize_prefix(name),
                total,
                current: AtomicUsize::new(0),
                row,
            })
            .collect();

        Self {
            bars,
            lock: Mutex::new(()),
        }
    }

    /// Like [`ProgressBars::new`], dropping empty modules.
    ///
    /// Returns `None` when there is at most one item in total.
    pub fn new_filtered(modules: &[(&'static str, usize)]) -> Option<Self> {
        let filtered: Vec<_> = modules.iter().copied().filter(|&(_, n)| n > 0).collect();
        let total: usize = filtered.iter().map(|(_, n)| n).sum();
        (total > 1).then(|| Self::new(&filtered))
    }

    /// Advance the bar named `name` by one. Unknown names are ignored.
    pub fn inc(&self, name: &str) {
        if let Some(bar) = self.bars.iter().find(|bar| bar.name == name) {
            let current = bar.current.fetch_add(1, Ordering::Relaxed) + 1;
            self.display(bar, current);
        }
    }

    #[allow(clippy::cast_possible_truncation)] // bar count is always small
    fn display(&self, bar: &ProgressBar, current: usize) {
        let _guard = self.lock.lock().ok();

        let count = format!("{current}/{}", bar.total);
        let line = format!("{} [{}] {count}", bar.prefix, render_bar(bar, current, &count));

        let mut stdout = stdout().lock();
        let lines_up = (self.bars.len() - bar.row) as u16;
        execute!(stdout, cursor::MoveUp(lines_up)).ok();
        execute!(stdout, Clear(ClearType::CurrentLine)).ok();
        write!(stdout, "{line}").ok();
        execute!(stdout, cursor::MoveDown(lines_up)).ok();
        write!(stdout, "\r").ok();
        stdout.flush().ok();
    }

    /// Clear the bars from the terminal. Also runs on drop.
    #[allow(clippy::cast_possible_truncation)] // bar count is always small
    pub fn finish(&self) {
        if BAR_COUNT.swap(0, Ordering::SeqCst) == 0 {
            return;
        }
        let _guard = self.lock.lock().ok();

        let mut stdout = stdout().lock();
        let rows = self.bars.len() as u16;
        execute!(stdout, cursor::MoveUp(rows)).ok();
        execute!(stdout, Clear(ClearType::FromCursorDown)).ok();
        stdout.flush().ok();
    }
}

impl Drop for ProgressBars {
    fn drop(&mut self) {
        self.finish();
    }
}

fn render_bar(bar: &ProgressBar, current: usize, count: &str) -> String {
    let overhead = prefix_len(bar.name.len()) + BAR_OVERHEAD + count.len();
    let width = terminal_width()
        .saturating_sub(overhead)
        .clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH);

    let filled = (current * width).checked_div(bar.total).unwrap_or(0).min(width);
    "█".repeat(filled) + &"░".repeat(width - filled)
}

// ============================================================================
// Helper Functions
// ============================================================================

fn colorize_prefix(module: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "build" => prefix.bright_green().bold(),
        "init" | "new" | "delete" => prefix.bright_blue().bold(),
        "warn" => prefix.bright_magenta().bold(),
        "error" => prefix.bright_red().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

/// Truncate to at most `max_len` bytes on a UTF-8 boundary.
fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(name: &'static str, total: usize) -> ProgressBar {
        ProgressBar {
            name,
            prefix: colorize_prefix(name),
            total,
            current: AtomicUsize::new(0),
            row: 0,
        }
    }

    #[test]
    fn test_prefix_len() {
        // "content" -> "[content] "
        assert_eq!(prefix_len(7), 10);
        assert_eq!(prefix_len(0), 3);
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 5), "hello");
        assert_eq!(truncate_str("hello", 0), "");
    }

    #[test]
    fn test_truncate_str_unicode_boundary() {
        // "€" is 3 bytes
        assert_eq!(truncate_str("€€", 4), "€");
        assert_eq!(truncate_str("a€b", 3), "a");
        assert_eq!(truncate_str("a€b", 4), "a€");
    }

    #[test]
    fn test_render_bar_bounds() {
        let rendered = render_bar(&bar("content", 4), 2, "2/4");
        let width = rendered.chars().count();
        assert!((MIN_BAR_WIDTH..=MAX_BAR_WIDTH).contains(&width));
        assert_eq!(rendered.chars().filter(|&c| c == '█').count(), width / 2);
    }

    #[test]
    fn test_render_bar_empty_total() {
        let rendered = render_bar(&bar("assets", 0), 0, "0/0");
        assert!(rendered.chars().all(|c| c == '░'));
    }
}
