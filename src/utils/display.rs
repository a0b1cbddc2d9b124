//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::tiling::{Tiling, TilingOutcome};
use anyhow::{Context, Result};
use std::path::Path;

const LABELS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Format tilings for display
pub struct TilingFormatter;

impl TilingFormatter {
    /// Single-character label for a piece, cycling when pieces outnumber labels
    pub fn label(piece: usize) -> char {
        LABELS[piece % LABELS.len()] as char
    }

    /// The table with each cell showing its piece's label, `.` when empty
    pub fn format_grid(tiling: &Tiling, colored: bool) -> String {
        let board = tiling.board();
        let mut output = String::new();

        for y in 0..tiling.table.height {
            let row: Vec<String> = (0..tiling.table.width)
                .map(|x| match board.get(x, y) {
                    Some(piece) => {
                        let label = Self::label(piece).to_string();
                        if colored {
                            ColorOutput::colored(&label, Color::for_piece(piece))
                        } else {
                            label
                        }
                    }
                    None => ".".to_string(),
                })
                .collect();
            output.push_str(&row.join(" "));
            output.push('\n');
        }

        output
    }

    /// One line per piece: label, index, shape, rotation, offset, cell count
    pub fn format_summary(tiling: &Tiling) -> String {
        let mut output = String::new();
        output.push_str("Piece | Shape      | Rotation | Offset   | Cells\n");
        output.push_str("------|------------|----------|----------|------\n");

        for placed in &tiling.pieces {
            output.push_str(&format!(
                "{} {:3} | {:10} | {:>8} | {:8} | {}\n",
                Self::label(placed.piece),
                placed.piece,
                placed.shape,
                placed.rotation.to_string(),
                format!("({}, {})", placed.offset.0, placed.offset.1),
                placed.cells.len()
            ));
        }

        output
    }

    /// `true` plus the tiling, or `false` plus the reason
    pub fn format_outcome(outcome: &TilingOutcome, colored: bool) -> String {
        match outcome {
            TilingOutcome::Tiled(tiling) => format!(
                "true\n{}\n{}",
                Self::format_grid(tiling, colored),
                Self::format_summary(tiling)
            ),
            TilingOutcome::Infeasible(reason) => format!("false\nNo tiling exists: {}\n", reason),
        }
    }

    /// Write a tiling in the configured format
    pub fn save_tiling<P: AsRef<Path>>(tiling: &Tiling, path: P, format: OutputFormat) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        match format {
            OutputFormat::Text => {
                let content = format!(
                    "{}\n{}",
                    Self::format_grid(tiling, false),
                    Self::format_summary(tiling)
                );
                std::fs::write(path, content)
                    .with_context(|| format!("Failed to write tiling to {}", path.display()))?;
            }
            OutputFormat::Json => {
                tiling
                    .save_to_file(path)
                    .with_context(|| format!("Failed to write tiling to {}", path.display()))?;
            }
        }

        Ok(())
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() &&
        (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    /// Format success message
    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
}

impl Color {
    const PALETTE: [Color; 6] = [
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
    ];

    /// Distinct neighbours for consecutive pieces
    pub fn for_piece(piece: usize) -> Self {
        Self::PALETTE[piece % Self::PALETTE.len()]
    }

    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
            Color::Magenta => 35,
            Color::Cyan => 36,
        }
    }
}
