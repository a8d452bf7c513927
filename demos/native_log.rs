//! Native Log Demo: a simulated native test runner logging into the terminal.
//!
//! The "native" side runs on its own thread, prints a header, then rewrites
//! a progress line in place with `pop_last_message` while the designated
//! thread renders the log.
//!
//! Set `RUST_LOG=logbridge=debug` and redirect stderr to a file to watch
//! the drain passes.

use crossbeam_channel::bounded;
use logbridge::{LogBridge, LogHandle, MessageLogger, TerminalSurface};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const TEST_NAMES: &[&str] = &[
    "FileSystem::Enumerate",
    "MemoryMappedFile::Map",
    "VirtualMemory::Reserve",
    "NativeConsole::CursorPosition",
    "SystemInfo::LogicalCores",
    "FileToCFile::Read",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let bridge = LogBridge::start(TerminalSurface::new()?)?;
    let (done_tx, done_rx) = bounded::<()>(1);

    bridge.launch_native(
        move |app_path: PathBuf, log: LogHandle| {
            let mut logger = MessageLogger::new(log);
            logger.message_fmt(format_args!("app path: {}\n", app_path.display()));

            let total = TEST_NAMES.len();
            for (i, name) in TEST_NAMES.iter().enumerate() {
                for step in 0..=10 {
                    if step > 0 {
                        logger.pop_last_message();
                    }
                    logger.message_fmt(format_args!("[{}/{total}] {name} {}%", i + 1, step * 10));
                    std::thread::sleep(Duration::from_millis(40));
                }
                logger.message("\n");
            }

            logger.message("all tests passed\n");
            let _ = done_tx.send(());
        },
        std::env::temp_dir(),
    );

    let _ = done_rx.recv();
    std::thread::sleep(Duration::from_secs(2));

    let sink = bridge.shutdown()?;
    drop(sink);
    Ok(())
}
