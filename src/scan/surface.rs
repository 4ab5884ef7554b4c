//! Display surfaces the scanner draws on.

use std::io::Write;

use super::query::{RESULTS_GRID, STATUS_REGION};
use super::render::{escape_html, Card};
use super::status::Status;

/// Where status text and cards end up.
pub trait Surface: Send {
    /// Remove every card.
    fn clear(&mut self);

    /// Append a card after the existing ones.
    fn append(&mut self, card: Card);

    /// Replace the status line.
    fn set_status(&mut self, status: &Status);
}

/// Surface that keeps everything in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    cards: Vec<Card>,
    status: Status,
    /// Total number of clears, for ordering checks.
    clears: usize,
}

impl MemorySurface {
    /// Create an empty surface with an idle status.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cards currently shown.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Current status.
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Number of times the surface has been cleared.
    pub fn clear_count(&self) -> usize {
        self.clears
    }
}

impl Surface for MemorySurface {
    fn clear(&mut self) {
        self.cards.clear();
        self.clears += 1;
    }

    fn append(&mut self, card: Card) {
        self.cards.push(card);
    }

    fn set_status(&mut self, status: &Status) {
        self.status = status.clone();
    }
}

/// Surface that prints plain text to a writer.
///
/// Printed output cannot be taken back, so `clear` only prints a separator.
#[derive(Debug)]
pub struct TerminalSurface<W: Write + Send> {
    out: W,
    shown: usize,
}

impl TerminalSurface<std::io::Stdout> {
    /// Print to stdout.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalSurface<W> {
    /// Print to the given writer.
    pub fn new(out: W) -> Self {
        Self { out, shown: 0 }
    }

    /// Consume the surface and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            tracing::warn!(error = %e, "Failed to write to terminal");
        }
    }
}

impl<W: Write + Send> Surface for TerminalSurface<W> {
    fn clear(&mut self) {
        if self.shown > 0 {
            self.emit(&format!("{}\n", "=".repeat(40)));
        }
        self.shown = 0;
    }

    fn append(&mut self, card: Card) {
        self.emit(&format!("{}{}\n", card, "-".repeat(40)));
        self.shown += 1;
    }

    fn set_status(&mut self, status: &Status) {
        if !status.message.is_empty() {
            self.emit(&format!("[{}] {}\n", status.tone, status.message));
        }
    }
}

/// Surface that builds the status region and results grid as HTML.
#[derive(Debug, Clone, Default)]
pub struct HtmlSurface {
    cards: Vec<String>,
    status: Status,
}

impl HtmlSurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Markup of the status region.
    pub fn status_html(&self) -> String {
        format!(
            "<p id=\"{}\" class=\"status\" style=\"color: {}\">{}</p>",
            STATUS_REGION,
            self.status.tone.color(),
            escape_html(&self.status.message)
        )
    }

    /// Markup of the results grid.
    pub fn grid_html(&self) -> String {
        format!(
            "<section id=\"{}\" class=\"grid\">{}</section>",
            RESULTS_GRID,
            self.cards.concat()
        )
    }
}

impl Surface for HtmlSurface {
    fn clear(&mut self) {
        self.cards.clear();
    }

    fn append(&mut self, card: Card) {
        self.cards.push(card.to_html());
    }

    fn set_status(&mut self, status: &Status) {
        self.status = status.clone();
    }
}
