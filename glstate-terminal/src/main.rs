/// gltrace - Khronos call trace decoder
///
/// Reads raw calls such as `glClear(0x4100)` from a file or standard input and
/// prints them with enumeration values replaced by their names.
///
/// Usage: gltrace <header.h> [--map <log-map>] [--no-color] [trace-file]

use clap::Parser;
use glstate_core::LogContext;
use glstate_terminal::{run, TraceOptions, TracePrinter};
use log::info;
use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::process;

fn main() -> io::Result<()> {
    env_logger::init();

    let mut options = TraceOptions::parse();
    if env::var_os("NO_COLOR").is_some() {
        options.no_color = true;
    }

    let context = match LogContext::load(&options.header, options.log_map.as_deref()) {
        Ok(context) => context,
        Err(e) => {
            eprintln!("Failed to load {}: {}", options.header.display(), e);
            process::exit(1);
        }
    };
    info!(
        "loaded {} enumeration names, {} bitmask groups",
        context.registry().len(),
        context.registry().bitmask_groups().count()
    );

    let input: Box<dyn BufRead> = match &options.trace {
        Some(path) => Box::new(BufReader::new(File::open(path).map_err(|e| {
            io::Error::new(e.kind(), format!("Failed to open trace {}: {}", path.display(), e))
        })?)),
        None => Box::new(io::stdin().lock()),
    };

    let mut printer = TracePrinter::new(io::stdout().lock(), options.color());
    let summary = run(&context, input, &mut printer)?;
    info!("decoded {} calls, skipped {} lines", summary.decoded, summary.skipped);

    Ok(())
}
