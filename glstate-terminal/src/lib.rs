/// Terminal front end: decodes raw Khronos call traces into readable lines
use glstate_core::LogContext;
use log::warn;
use std::io::{self, BufRead, Write};

pub mod options;
pub mod printer;
pub mod trace;

pub use options::TraceOptions;
pub use printer::TracePrinter;
pub use trace::{parse_call, TraceCall};

/// Line counts of a decoding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceSummary {
    pub decoded: usize,
    pub skipped: usize,
}

/// Decode every call in `input` and print it.
///
/// Blank lines and `#` comments are ignored. Lines that do not parse are
/// reported through the printer and counted as skipped.
pub fn run<R: BufRead, W: Write>(
    context: &LogContext,
    input: R,
    printer: &mut TracePrinter<W>,
) -> io::Result<TraceSummary> {
    let mut summary = TraceSummary::default();

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let formatted = parse_call(text).and_then(|call| {
            context
                .format_command(&call.name, call.return_value.as_ref(), &call.args)
                .map(|formatted| (call.name, formatted))
                .map_err(|e| e.to_string())
        });

        match formatted {
            Ok((name, formatted)) => {
                printer.print_call(&name, &formatted)?;
                summary.decoded += 1;
            }
            Err(message) => {
                warn!("skipping trace line {}: {}", index + 1, message);
                printer.print_error(index + 1, &message)?;
                summary.skipped += 1;
            }
        }
    }

    printer.flush()?;
    Ok(summary)
}
