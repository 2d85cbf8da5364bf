use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Writer that mirrors every log line to stdout and an append-mode file.
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        self.file.flush()
    }
}

/// Initialize process-wide logging.
///
/// Level comes from RUST_LOG, defaulting to info. Output goes to stdout and to
/// the given log file; library code only uses the log macros and never calls
/// this, so tests stay isolated.
pub fn init(log_file: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(Tee { file })))
        .init();

    Ok(())
}
