use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    time::Duration,
};

/// A snapshot of a running training session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Share of all scheduled samples processed so far, in `[0, 1]`.
    pub fraction: f64,
    /// Mean loss over the samples processed so far.
    pub mean_error: f64,
    /// Wall time since training started.
    pub elapsed: Duration,
}

/// Receives progress reports from the trainer. Reports are delivered synchronously from
/// inside the training loop.
pub trait Logger {
    fn progress(&mut self, progress: &Progress);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MockLogger;

impl Logger for MockLogger {
    fn progress(&mut self, _progress: &Progress) {}
}

/// Emits every report as a `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn progress(&mut self, progress: &Progress) {
        tracing::info!(
            fraction = progress.fraction,
            mean_error = progress.mean_error,
            elapsed_ms = progress.elapsed.as_millis() as u64,
            "training progress"
        );
    }
}

/// Writes reports as `fraction,mean_error,elapsed_secs` lines.
#[derive(Debug)]
pub struct LogFile {
    file: PathBuf,
    writer: BufWriter<File>,
}

impl LogFile {
    pub fn new<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(Self {
            file: path.as_ref().to_owned(),
            writer: BufWriter::new(File::create(path)?),
        })
    }
}

impl Logger for LogFile {
    fn progress(&mut self, progress: &Progress) {
        let written = writeln!(
            self.writer,
            "{},{},{}",
            progress.fraction,
            progress.mean_error,
            progress.elapsed.as_secs_f64()
        )
        .and_then(|_| self.writer.flush());
        if let Err(e) = written {
            eprintln!(
                "Error while logging progress to file: {}\nError: {}",
                self.file.display(),
                e
            );
        }
    }
}

impl<F> Logger for F
where
    F: FnMut(&Progress),
{
    fn progress(&mut self, progress: &Progress) {
        self(progress)
    }
}
