use std::path::{Path, PathBuf};

use crate::media::domain::media_source::MediaOpener;
use crate::pipeline::generate_sheet_use_case::{GenerateSheetUseCase, SheetReport};
use crate::pipeline::sheet_error::SheetError;
use crate::pipeline::sheet_logger::SheetLogger;

/// How one input of a batch ended.
#[derive(Debug)]
pub enum FileOutcome {
    Generated(SheetReport),
    /// The path did not exist; nothing was opened.
    Missing,
    Failed(SheetError),
}

impl FileOutcome {
    pub fn is_generated(&self) -> bool {
        matches!(self, FileOutcome::Generated(_))
    }
}

#[derive(Debug)]
pub struct FileResult {
    pub input: PathBuf,
    pub outcome: FileOutcome,
}

/// Runs [`GenerateSheetUseCase`] over a list of inputs in order. A failure
/// on one input is reported and the batch moves on.
pub struct BatchSheetsUseCase<O: MediaOpener> {
    generator: GenerateSheetUseCase<O>,
}

impl<O: MediaOpener> BatchSheetsUseCase<O> {
    pub fn new(generator: GenerateSheetUseCase<O>) -> Self {
        Self { generator }
    }

    pub fn execute<P: AsRef<Path>>(
        &self,
        inputs: &[P],
        logger: &mut dyn SheetLogger,
    ) -> Vec<FileResult> {
        let mut results = Vec::with_capacity(inputs.len());

        for input in inputs {
            let input = input.as_ref();
            logger.file_started(input);
            let outcome = if input.exists() {
                match self.generator.execute(input, logger) {
                    Ok(report) => FileOutcome::Generated(report),
                    Err(e) => {
                        log::debug!("{}: {e:?}", input.display());
                        FileOutcome::Failed(e)
                    }
                }
            } else {
                FileOutcome::Missing
            };

            logger.file_finished(input, &outcome);
            results.push(FileResult {
                input: input.to_path_buf(),
                outcome,
            });
        }

        logger.summary();
        results
    }
}
