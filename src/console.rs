use colored::{Color, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal};
use std::time::Duration;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const FALLBACK_WIDTH: usize = 80;
const MIN_WIDTH: usize = 20;
const MAX_WIDTH: usize = 120;

/// Where the orchestrator sends everything the user sees.
pub trait Console {
    /// Show a busy indicator until the returned guard is dropped.
    fn show_status(&self, message: &str) -> Status;

    fn print_panel(&self, content: &str, title: &str);

    /// Short message for failures the user can act on.
    fn print_error_panel(&self, message: &str);

    /// Full diagnostic output for unexpected failures.
    fn print_traceback_panel(&self, trace: &str);
}

/// Busy indicator; cleared from the terminal on drop.
pub struct Status(ProgressBar);

impl Status {
    pub fn hidden() -> Self {
        Status(ProgressBar::hidden())
    }
}

impl Drop for Status {
    fn drop(&mut self) {
        self.0.finish_and_clear();
    }
}

/// Console drawing boxed panels on stdout and the spinner on stderr.
pub struct TerminalConsole {
    /// Terminal width, or `None` when stdout is redirected.
    width: Option<usize>,
    spinner: bool,
}

impl TerminalConsole {
    /// With `spinner` off the busy indicator is not drawn, which keeps
    /// verbose log output readable.
    pub fn new(spinner: bool) -> Self {
        let width = if io::stdout().is_terminal() {
            let cols = crossterm::terminal::size()
                .map(|(cols, _)| cols as usize)
                .unwrap_or(FALLBACK_WIDTH);
            Some(cols.clamp(MIN_WIDTH, MAX_WIDTH))
        } else {
            None
        };

        TerminalConsole { width, spinner }
    }

    /// Redirected output is never wrapped, so it stays greppable.
    fn panel_width(&self, content: &str) -> usize {
        match self.width {
            Some(width) => width,
            None => content
                .lines()
                .map(|l| l.replace('\t', "    ").width() + 4)
                .max()
                .unwrap_or(0)
                .max(FALLBACK_WIDTH),
        }
    }

    fn print(&self, content: &str, title: &str, border: Color) {
        let width = self.panel_width(content);
        println!("{}", render_panel(content, title, width, border));
    }
}

impl Console for TerminalConsole {
    fn show_status(&self, message: &str) -> Status {
        if !self.spinner {
            return Status::hidden();
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✔"])
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.cyan().to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        Status(spinner)
    }

    fn print_panel(&self, content: &str, title: &str) {
        self.print(content, title, Color::Blue);
    }

    fn print_error_panel(&self, message: &str) {
        self.print(message, "Error", Color::Red);
    }

    fn print_traceback_panel(&self, trace: &str) {
        self.print(trace, "Internal Error", Color::Red);
    }
}

/// Draw `content` inside a rounded box `width` columns wide with `title` in
/// the top border. Lines longer than the box are wrapped. Widths are terminal
/// columns, so wide characters take two.
pub fn render_panel(content: &str, title: &str, width: usize, border: Color) -> String {
    let inner = width.saturating_sub(4).max(1);

    let title_len = title.width();
    let top_fill = width.saturating_sub(title_len + 4);
    let left_fill = top_fill / 2;
    let right_fill = top_fill - left_fill;

    let mut out = String::new();
    out.push_str(&format!(
        "{} {} {}\n",
        format!("╭{}", "─".repeat(left_fill)).color(border),
        title.color(border).bold(),
        format!("{}╮", "─".repeat(right_fill)).color(border)
    ));

    for line in content.lines().flat_map(|l| wrap_line(l, inner)) {
        let pad = inner.saturating_sub(line.width());
        out.push_str(&format!(
            "{} {}{} {}\n",
            "│".color(border),
            line,
            " ".repeat(pad),
            "│".color(border)
        ));
    }

    let bottom = format!("╰{}╯", "─".repeat(width.saturating_sub(2)));
    out.push_str(&bottom.color(border).to_string());
    out
}

/// Split `line` into chunks of at most `width` columns, breaking at spaces
/// where possible. Tabs are expanded so the right border stays aligned.
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let line = line.replace('\t', "    ");
    if line.width() <= width {
        return vec![line];
    }

    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in line.split(' ') {
        let word_len = word.width();
        let needed = if current_len == 0 { word_len } else { current_len + 1 + word_len };

        if needed <= width {
            if current_len > 0 {
                current.push(' ');
            }
            current.push_str(word);
            current_len = needed;
            continue;
        }

        if current_len > 0 {
            rows.push(std::mem::take(&mut current));
            current_len = 0;
        }

        // Hard-split words that do not fit on a row of their own.
        for c in word.chars() {
            let c_len = c.width().unwrap_or(0);
            if current_len > 0 && current_len + c_len > width {
                rows.push(std::mem::take(&mut current));
                current_len = 0;
            }
            current.push(c);
            current_len += c_len;
        }
    }

    if current_len > 0 || rows.is_empty() {
        rows.push(current);
    }
    rows
}
