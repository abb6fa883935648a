use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use crate::pipeline::batch_sheets_use_case::FileOutcome;

/// Cross-cutting observer for sheet generation events.
///
/// Keeps the use cases free of any particular output mechanism (stdout,
/// log crate, test capture).
pub trait SheetLogger {
    /// An input file is about to be processed.
    fn file_started(&mut self, _input: &Path) {}

    /// An input file finished, successfully or not.
    fn file_finished(&mut self, _input: &Path, _outcome: &FileOutcome) {}

    /// Report cell-level progress within the current sheet.
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long a named stage took for one cell or step.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullSheetLogger;

impl SheetLogger for NullSheetLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Console logger: per-file status lines on standard output, progress and
/// per-stage timing through the `log` facade.
pub struct StdoutSheetLogger {
    throttle_cells: usize,
    timings: HashMap<String, Vec<f64>>,
    start_time: Instant,
    generated: usize,
    failed: usize,
}

impl StdoutSheetLogger {
    pub fn new(throttle_cells: usize) -> Self {
        Self {
            throttle_cells: throttle_cells.max(1),
            timings: HashMap::new(),
            start_time: Instant::now(),
            generated: 0,
            failed: 0,
        }
    }

    /// Returns the formatted summary string, or `None` if nothing ran.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.generated + self.failed == 0 {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "Run summary ({} generated, {} failed, {:.1}s total):",
            self.generated,
            self.failed,
            elapsed_ms / 1000.0
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = if durations.is_empty() {
                0.0
            } else {
                total_ms / durations.len() as f64
            };
            lines.push(format!(
                "  {stage:8}: avg {avg_ms:6.1}ms  total {total_ms:7.0}ms  ({} calls)",
                durations.len()
            ));
        }

        Some(lines.join("\n"))
    }
}

impl Default for StdoutSheetLogger {
    fn default() -> Self {
        Self::new(10)
    }
}

impl SheetLogger for StdoutSheetLogger {
    fn file_started(&mut self, input: &Path) {
        println!("Generating screens for {}", input.display());
    }

    fn file_finished(&mut self, input: &Path, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Generated(report) => {
                self.generated += 1;
                log::info!(
                    "Wrote {} ({}x{})",
                    report.output_path.display(),
                    report.canvas_size.0,
                    report.canvas_size.1
                );
            }
            FileOutcome::Missing => {
                self.failed += 1;
                println!("File: {} does not exist!", input.display());
            }
            FileOutcome::Failed(e) => {
                self.failed += 1;
                match e.operation() {
                    Some(op) => println!("Error processing {} [{op}]: {e}", input.display()),
                    None => println!("Error processing {}: {e}", input.display()),
                }
            }
        }
    }

    fn progress(&mut self, current: usize, total: usize) {
        if total > 0 && (current % self.throttle_cells == 0 || current == total) {
            log::info!("Sampling: {current}/{total} cells");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
