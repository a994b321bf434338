use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Fan-out sink: every line goes to a console stream and, when configured,
/// to an append-only log file. One sink serves both the tracing layer and
/// raw git subprocess output, so console and log always agree.
#[derive(Clone, Default)]
pub struct OutputSink {
    log: Option<Arc<Mutex<File>>>,
}

impl OutputSink {
    /// Sink with no log file; output goes to the console only.
    pub fn console_only() -> Self {
        Self { log: None }
    }

    /// Sink that duplicates output into the append-only log at `path`.
    pub fn with_log_file(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            log: Some(Arc::new(Mutex::new(file))),
        })
    }

    /// Write one line to stdout and the log.
    pub fn stdout_line(&self, line: &str) {
        println!("{line}");
        self.log_line(line);
    }

    /// Write one line to stderr and the log.
    pub fn stderr_line(&self, line: &str) {
        eprintln!("{line}");
        self.log_line(line);
    }

    fn log_line(&self, line: &str) {
        if let Some(log) = &self.log {
            if let Ok(mut file) = log.lock() {
                // A broken log file must not take down console output.
                let _ = writeln!(file, "{line}");
            }
        }
    }

    /// Writer handle for the tracing subscriber: stderr plus the log file.
    pub fn stderr_writer(&self) -> SinkWriter {
        SinkWriter {
            log: self.log.clone(),
        }
    }
}

/// `Write` adapter fanning bytes out to stderr and the log file.
pub struct SinkWriter {
    log: Option<Arc<Mutex<File>>>,
}

impl Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        if let Some(log) = &self.log {
            if let Ok(mut file) = log.lock() {
                let _ = file.write_all(buf);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        if let Some(log) = &self.log {
            if let Ok(mut file) = log.lock() {
                let _ = file.flush();
            }
        }
        Ok(())
    }
}
