//! Terminal presentation: progress-line throttling, ANSI color control, and
//! interactive confirmation. Kept free of orchestration logic so it can be
//! tested as pure functions wherever possible.

use std::io::{self, Write};

/// POSIX "erase line + carriage return" prefix; bare `\r` on Windows.
#[cfg(not(windows))]
const LINE_RESET: &str = "\u{1b}[2K\r";
#[cfg(windows)]
const LINE_RESET: &str = "\r";

/// Render a throttled progress line, or `None` if this `done` count falls
/// between the throttled checkpoints and should not be printed. Checkpoints
/// are every 100th item up to 2,000, every 1,000th thereafter, and the final
/// item.
pub fn render_progress(label: &str, done: usize, total: usize) -> Option<String> {
    if done == 0 {
        return None;
    }
    let at_checkpoint = if done <= 2_000 {
        done % 100 == 0
    } else {
        done % 1_000 == 0
    };
    if !at_checkpoint && done != total {
        return None;
    }

    let suffix = if done != total { "+" } else { "" };
    Some(format!(
        "{LINE_RESET}{label} {} of {} items{suffix}",
        grouped(done),
        grouped(total)
    ))
}

fn grouped(n: usize) -> String {
    use num_format::{Locale, ToFormattedString};
    n.to_formatted_string(&Locale::en)
}

/// Whether color output should be used: never under `--mono`, and only when
/// stdout looks like a terminal.
pub fn color_enabled(mono: bool) -> bool {
    !mono && atty::is(atty::Stream::Stdout)
}

/// Ask the user a yes/no question on stderr, returning their answer. Not
/// called at all when `assume_yes` is set; callers check that first.
pub fn confirm(prompt: &str) -> io::Result<bool> {
    eprint!("{prompt} [y/N] ");
    io::stderr().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
