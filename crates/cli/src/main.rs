use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use vidsheet_core::media::infrastructure::ffmpeg_media_source::FfmpegOpener;
use vidsheet_core::pipeline::batch_sheets_use_case::BatchSheetsUseCase;
use vidsheet_core::pipeline::generate_sheet_use_case::GenerateSheetUseCase;
use vidsheet_core::pipeline::sheet_logger::StdoutSheetLogger;
use vidsheet_core::shared::constants::{
    DEFAULT_COL_COUNT, DEFAULT_FRAME_HEIGHT, DEFAULT_FRAME_WIDTH, DEFAULT_ROW_COUNT,
};
use vidsheet_core::sheet::domain::layout::LayoutParams;
use vidsheet_core::sheet::domain::sheet_options::{EndOfStreamPolicy, SheetOptions};

/// Generate a PNG contact sheet of thumbnails for each input video.
#[derive(Parser, Debug)]
#[command(name = "vidsheet", disable_help_flag = true)]
struct Cli {
    /// Input video files, processed in order.
    inputs: Vec<PathBuf>,

    /// Thumbnail width (0 = derive from the source aspect ratio).
    #[arg(short = 'w', long, default_value_t = DEFAULT_FRAME_WIDTH)]
    frame_width: u32,

    /// Thumbnail height (0 = derive from the source aspect ratio).
    #[arg(short = 'h', long, default_value_t = DEFAULT_FRAME_HEIGHT)]
    frame_height: u32,

    /// Thumbnails laid out across the sheet.
    #[arg(short = 'r', long, default_value_t = DEFAULT_ROW_COUNT)]
    row_count: u32,

    /// Thumbnails laid out down the sheet.
    #[arg(short = 'c', long, default_value_t = DEFAULT_COL_COUNT)]
    col_count: u32,

    /// Directory the PNG sheets are written to.
    #[arg(short = 'o', long, default_value = ".")]
    output_dir: PathBuf,

    /// TTF/OTF font used for the header text instead of a system lookup.
    #[arg(long)]
    font: Option<PathBuf>,

    /// What to do when a cell's seek lands past the last frame.
    #[arg(long, value_enum, default_value_t = EndOfStream::Skip)]
    on_end_of_stream: EndOfStream,

    /// Print help.
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum EndOfStream {
    Skip,
    Reuse,
    Fail,
}

impl From<EndOfStream> for EndOfStreamPolicy {
    fn from(value: EndOfStream) -> Self {
        match value {
            EndOfStream::Skip => EndOfStreamPolicy::Skip,
            EndOfStream::Reuse => EndOfStreamPolicy::ReusePrevious,
            EndOfStream::Fail => EndOfStreamPolicy::Fail,
        }
    }
}

impl Cli {
    fn sheet_options(&self) -> SheetOptions {
        SheetOptions {
            layout: LayoutParams {
                frame_width: self.frame_width,
                frame_height: self.frame_height,
                row_count: self.row_count,
                col_count: self.col_count,
                ..LayoutParams::default()
            },
            end_of_stream: self.on_end_of_stream.into(),
            font_path: self.font.clone(),
            output_dir: self.output_dir.clone(),
            ..SheetOptions::default()
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let options = cli.sheet_options();
    log::debug!("{options:?}");

    let batch = BatchSheetsUseCase::new(GenerateSheetUseCase::new(FfmpegOpener, options));
    let mut logger = StdoutSheetLogger::default();
    let results = batch.execute(&cli.inputs, &mut logger);

    let generated = results.iter().filter(|r| r.outcome.is_generated()).count();
    log::debug!("{generated}/{} sheets written", results.len());
}
