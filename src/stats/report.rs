//! Stats report types and terminal formatting.
//!
//! Reports serialize as JSON for programmatic use and render as a boxed
//! histogram for the terminal.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::catalog::CatalogStats;
use crate::model::CellClass;

const BAR_WIDTH: usize = 20;

/// Annotation counts per cell class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassDistribution {
    /// Count per class; every class is present.
    pub counts: BTreeMap<CellClass, usize>,
    /// Sum of all counts.
    pub total_annotations: usize,
    /// Annotation files parsed.
    pub files_scanned: usize,
    /// Annotation files skipped as unreadable or malformed.
    pub skipped: usize,
}

/// Catalog totals together with the class distribution.
#[derive(Clone, Debug, Serialize)]
pub struct CurrentStats {
    #[serde(flatten)]
    pub catalog: CatalogStats,
    pub class_distribution: ClassDistribution,
}

impl fmt::Display for ClassDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "┌─ Class Distribution ──────────────────────────────────────┐"
        )?;
        writeln!(
            f,
            "│                                                           │"
        )?;

        let max_count = self.counts.values().copied().max().unwrap_or(0);

        for (class, &count) in &self.counts {
            let bar = render_bar(count, max_count, BAR_WIDTH);
            writeln!(
                f,
                "│   {:<14} {:>7} {:>7}  {}   │",
                class.as_str(),
                format_number(count),
                fmt_percent(count, self.total_annotations),
                pad_bar(&bar, BAR_WIDTH)
            )?;
        }

        writeln!(
            f,
            "│                                                           │"
        )?;
        writeln!(
            f,
            "│   Total:         {:>8}                                 │",
            format_number(self.total_annotations)
        )?;
        writeln!(
            f,
            "│   Files:         {:>8} parsed, {:>5} skipped             │",
            format_number(self.files_scanned),
            format_number(self.skipped)
        )?;
        writeln!(
            f,
            "└───────────────────────────────────────────────────────────┘"
        )
    }
}

impl fmt::Display for CurrentStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.catalog;

        writeln!(
            f,
            "┌─ Summary ─────────────────────────────────────────────────┐"
        )?;
        writeln!(
            f,
            "│   Images:        {:>8}                                 │",
            format_number(c.total_images)
        )?;
        writeln!(
            f,
            "│   Annotated:     {:>8} ({:>6})                        │",
            format_number(c.annotated_images),
            fmt_percent(c.annotated_images, c.total_images)
        )?;
        writeln!(
            f,
            "│   Annotations:   {:>8}                                 │",
            format_number(c.total_annotations)
        )?;
        writeln!(
            f,
            "└───────────────────────────────────────────────────────────┘"
        )?;
        writeln!(f)?;
        write!(f, "{}", self.class_distribution)
    }
}

/// Format a number with thousands separators.
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a percentage, handling zero denominators.
fn fmt_percent(numerator: usize, denominator: usize) -> String {
    if denominator == 0 {
        "n/a".to_string()
    } else {
        format!("{:.1}%", (numerator as f64 / denominator as f64) * 100.0)
    }
}

/// Render a horizontal bar using Unicode block characters.
fn render_bar(count: usize, max_count: usize, width: usize) -> String {
    if max_count == 0 || width == 0 {
        return "░".repeat(width);
    }

    let filled = ((count * width) / max_count).min(width);
    "█".repeat(filled) + &"░".repeat(width - filled)
}

/// Pad a bar string to a fixed visual width.
fn pad_bar(bar: &str, width: usize) -> String {
    let padding = width.saturating_sub(bar.chars().count());
    format!("{}{}", bar, " ".repeat(padding))
}
