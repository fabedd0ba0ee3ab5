//! A progress bar for reading input files.
//!
//! Built on the `indicatif` crate, see <https://docs.rs/indicatif>

use std::io::Read;

use indicatif::{HumanBytes, HumanDuration, ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::debug;

/// Wraps a reader and tracks how many of the expected `total` bytes were read.
pub struct ProgressMonitor<R: Read> {
    pub total: usize,
    pub read: usize,
    reader: R,
    progress_bar: ProgressBar,
}

impl<R: Read> ProgressMonitor<R> {
    pub fn new(reader: R, size: usize) -> Self {
        let style = ProgressStyle::with_template(
            "{wide_bar} {binary_bytes}/{binary_total_bytes}  \n[est. {eta} remaining]",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar());
        let progress_bar = ProgressBar::new(size as u64).with_style(style);
        // redraw at 8hz instead of the default 20hz
        progress_bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(8));
        Self {
            reader,
            total: size,
            read: 0,
            progress_bar,
        }
    }

    fn update(&mut self, delta: u64) {
        self.progress_bar.inc(delta);
        if self.read >= self.total && !self.progress_bar.is_finished() {
            self.progress_bar.finish_and_clear();
            let elapsed = self.progress_bar.elapsed();
            let rate = self.read as f64 / elapsed.as_secs_f64().max(1e-9);
            debug!(
                "read {} in {} ({}/s)",
                HumanBytes(self.read as u64),
                HumanDuration(elapsed),
                HumanBytes(rate as u64)
            );
        }
    }
}

impl<R: Read> Read for ProgressMonitor<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let out = self.reader.read(buf)?;
        self.read += out;
        self.update(out as u64);
        Ok(out)
    }
}
