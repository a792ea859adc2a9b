//! Report formatting: one header line per comparison, one fixed-width data
//! row per driver iteration.

use crate::clock::Timespec;
use std::io::{self, Write};

/// One timed pass result, labeled with its report column.
#[derive(Debug, Clone)]
pub struct RowCell {
    pub label: &'static str,
    pub elapsed: Timespec,
}

/// The durations of one full driver iteration, in pass execution order.
/// Created per iteration and consumed immediately by the reporter.
#[derive(Debug, Clone, Default)]
pub struct ResultRow {
    pub cells: Vec<RowCell>,
}

impl ResultRow {
    pub fn push(&mut self, label: &'static str, elapsed: Timespec) {
        self.cells.push(RowCell { label, elapsed });
    }
}

/// Writes result rows to a sink, emitting the column header once before the
/// first row. Pure formatting; a failed write is logged and swallowed so it
/// never alters the driver's state.
pub struct Reporter<W: Write> {
    out: W,
    header_written: bool,
}

impl Reporter<io::Stdout> {
    pub fn stdout() -> Self {
        Reporter::new(io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            header_written: false,
        }
    }

    /// Consume the reporter and return its sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Format and write one row, preceded by the header on first use.
    pub fn emit(&mut self, row: &ResultRow) {
        if let Err(e) = self.write_row(row) {
            log::warn!("report write failed: {e}");
        }
    }

    fn write_row(&mut self, row: &ResultRow) -> io::Result<()> {
        if !self.header_written {
            let mut header = String::new();
            for cell in &row.cells {
                header.push_str(&format!("{:<12} ", cell.label));
            }
            writeln!(self.out, "{}", header.trim_end())?;
            self.header_written = true;
        }

        let mut line = String::new();
        for cell in &row.cells {
            line.push_str(&format!("{:<13}", cell.elapsed.to_string()));
        }
        writeln!(self.out, "{}", line.trim_end())?;
        self.out.flush()
    }
}
