// src/render/mod.rs

//! Terminal presentation.
//!
//! Every renderer writes to an `io::Write` so the output can be captured in
//! tests; colour goes through [`Painter`] and is dropped entirely when
//! disabled.

use std::fmt;

use owo_colors::OwoColorize;

pub mod reports;
pub mod tasks;

/// Applies colours when enabled, passes text through otherwise.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    fn style(&self, text: impl fmt::Display, paint: impl FnOnce(&str) -> String) -> String {
        let text = text.to_string();
        if self.enabled { paint(&text) } else { text }
    }

    pub fn bold(&self, text: impl fmt::Display) -> String {
        self.style(text, |s| s.bold().to_string())
    }

    pub fn green(&self, text: impl fmt::Display) -> String {
        self.style(text, |s| s.green().to_string())
    }

    pub fn yellow(&self, text: impl fmt::Display) -> String {
        self.style(text, |s| s.yellow().to_string())
    }

    pub fn red(&self, text: impl fmt::Display) -> String {
        self.style(text, |s| s.red().to_string())
    }

    pub fn blue(&self, text: impl fmt::Display) -> String {
        self.style(text, |s| s.blue().to_string())
    }

    pub fn cyan(&self, text: impl fmt::Display) -> String {
        self.style(text, |s| s.cyan().to_string())
    }

    pub fn magenta(&self, text: impl fmt::Display) -> String {
        self.style(text, |s| s.magenta().to_string())
    }

    pub fn dimmed(&self, text: impl fmt::Display) -> String {
        self.style(text, |s| s.dimmed().to_string())
    }
}

/// `width` cells, `round(percent / 100 * width)` of them filled.
pub fn progress_bar(painter: Painter, percent: u32, width: usize) -> String {
    let filled = (f64::from(percent.min(100)) / 100.0 * width as f64 + 0.5).floor() as usize;
    cells(painter, filled, width)
}

/// A bar of `filled` out of `width` cells.
pub(crate) fn cells(painter: Painter, filled: usize, width: usize) -> String {
    let filled = filled.min(width);
    format!(
        "{}{}",
        painter.green("█".repeat(filled)),
        painter.dimmed("░".repeat(width - filled))
    )
}

pub(crate) fn rule(width: usize) -> String {
    "=".repeat(width)
}

/// A heading block: blank line, bold title, blank line, rule.
pub(crate) fn heading(
    w: &mut impl std::io::Write,
    painter: Painter,
    title: &str,
    width: usize,
) -> std::io::Result<()> {
    writeln!(w)?;
    writeln!(w, "{}", painter.bold(title))?;
    writeln!(w)?;
    writeln!(w, "{}", rule(width))
}
