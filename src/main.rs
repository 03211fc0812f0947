//! # Impacto CLI
//!
//! Command-line interface for rendering printer streams to paper.
//!
//! ## Usage
//!
//! ```bash
//! # Render an Epson stream to PDF
//! impacto render -o listing.pdf listing.prn
//!
//! # Line printer on green bar paper with tractor edges
//! impacto render --head line-hammer -e -g -o report.pdf report.txt
//!
//! # Read from a pipe, worn ribbon, one SVG per page
//! cat job.prn | impacto render -s -v --svg -o job.svg
//!
//! # Turn a picture into a bit-image stream
//! impacto convert --dpi 120 logo.png logo.prn
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use impacto::{
    Document, ImpactoError, Interpreter, PrinterConfig,
    engine::{DEFAULT_SEED, GraphicsDensity, HeadWear, NoWear, WornHead},
    interpreter::ReaderSource,
    output::{FontResource, OutputFormat, PdfOptions, PdfWriter, svg},
    page::{BandColor, Decorations, GuideBands},
    printer::WrapPolicy,
    render::bitimage::{self, Binarize, Bitmap},
};

/// File written instead of dumping binary output to a terminal
const TTY_FALLBACK: &str = "out";

/// Impacto - Impact printer emulator
#[derive(Parser, Debug)]
#[command(name = "impacto")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Head {
    /// Epson LX-80 style 9-pin dot matrix
    DotMatrix,
    /// IBM 1403 style line printer
    LineHammer,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Dpi {
    #[value(name = "60")]
    Sixty,
    #[value(name = "120")]
    OneTwenty,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a printer byte stream to PDF or SVG
    Render {
        /// Input stream (omit with --stdin)
        input: Option<PathBuf>,

        /// Print head to emulate
        #[arg(long, value_enum, default_value = "dot-matrix")]
        head: Head,

        /// Line feed also returns the carriage
        #[arg(short = 'a', long = "autocr")]
        auto_cr: bool,

        /// Draw perforated tractor edges (0.5in each side)
        #[arg(short = 'e', long)]
        edge: bool,

        /// Draw guide bands (green bar paper)
        #[arg(short = 'g', long)]
        guides: bool,

        /// One guide band per print line
        #[arg(short = '1', long, requires = "guides")]
        single: bool,

        /// Blue guide bands instead of green
        #[arg(short = 'b', long, requires = "guides")]
        blue: bool,

        /// Output file (stdout if omitted)
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Wide carriage (13.875in printable)
        #[arg(short = 'w', long)]
        wide: bool,

        /// Read the stream from standard input (takes precedence over INPUT)
        #[arg(short = 's', long)]
        stdin: bool,

        /// Wrap long lines instead of discarding overflow
        #[arg(short = 'r', long)]
        wrap: bool,

        /// TrueType font for struck characters
        #[arg(short = 'f', long, value_name = "TTF")]
        font: Option<PathBuf>,

        /// Enable debug messages
        #[arg(short = 'd', long)]
        debug: bool,

        /// Emulate a worn head and ribbon
        #[arg(short = 'v', long)]
        vintage: bool,

        /// Write SVG instead of PDF (one file per page)
        #[arg(long)]
        svg: bool,

        /// With --svg, stack every page in a single file
        #[arg(long, requires = "svg")]
        concat: bool,

        /// Deflate PDF content streams
        #[arg(long)]
        compress: bool,

        /// Also dump the buffered draw ops as JSON
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
    },

    /// Convert an image or ASCII art into a bit-image printer stream
    Convert {
        /// Input .png/.jpg image or .txt ASCII art
        input: PathBuf,

        /// Output printer file
        output: PathBuf,

        /// Graphics resolution
        #[arg(short = 'd', long, value_enum, default_value = "60")]
        dpi: Dpi,

        /// Maximum width in dots (images only)
        #[arg(short = 'w', long, default_value_t = bitimage::DEFAULT_MAX_WIDTH)]
        width: u32,

        /// Black/white threshold 0-255 (images only)
        #[arg(short = 't', long, default_value_t = bitimage::DEFAULT_THRESHOLD)]
        threshold: u8,

        /// Ordered dithering instead of a threshold (images only)
        #[arg(long, conflicts_with = "threshold")]
        dither: bool,

        /// Integer scale factor (ASCII art only)
        #[arg(short = 's', long, default_value_t = 1,
              value_parser = clap::value_parser!(u8).range(1..=bitimage::MAX_SCALE as i64))]
        scale: u8,

        /// Frame the picture (ASCII art only)
        #[arg(short = 'b', long)]
        border: bool,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), ImpactoError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            head,
            auto_cr,
            edge,
            guides,
            single,
            blue,
            output,
            wide,
            stdin,
            wrap,
            font,
            debug,
            vintage,
            svg,
            concat,
            compress,
            json,
        } => {
            init_logging(debug);

            let mut config = match head {
                Head::DotMatrix => PrinterConfig::LX80,
                Head::LineHammer => PrinterConfig::IBM1403,
            }
            .with_wide_carriage(wide);
            if auto_cr {
                config = config.with_auto_cr(true);
            }
            if wrap {
                config = config.with_wrap(WrapPolicy::Wrap);
            }

            let decorations = Decorations {
                guide_bands: guides.then_some(GuideBands {
                    color: if blue { BandColor::Blue } else { BandColor::Green },
                    single_line: single,
                }),
                tractor_edges: edge,
            };

            let wear: Box<dyn HeadWear> = if vintage {
                let columns = config.columns();
                log::info!("worn head emulation on ({} columns)", columns);
                Box::new(WornHead::seeded(DEFAULT_SEED, columns))
            } else {
                Box::new(NoWear)
            };

            let reader: Box<dyn Read> = match (stdin, input) {
                (true, _) => Box::new(io::stdin().lock()),
                (false, Some(path)) => Box::new(File::open(&path)?),
                (false, None) => {
                    return Err(ImpactoError::InvalidCommand(
                        "no input file given (use --stdin to read a pipe)".to_string(),
                    ));
                }
            };

            log::info!("rendering with {} profile", config.name);
            let mut source = ReaderSource::new(reader);
            let mut interpreter = Interpreter::new(config, decorations, wear);
            interpreter.run(&mut source);
            if let Some(e) = source.take_error() {
                log::warn!("input ended early: {}", e);
            }
            let document = interpreter.finish();
            log::info!("{} pages", document.pages().len());

            if let Some(path) = json {
                std::fs::write(&path, document.to_json()?)?;
                log::info!("wrote draw ops to {}", path.display());
            }

            let font = match font {
                Some(path) => FontResource::from_file(path),
                None => FontResource::Builtin,
            };

            let format = if svg { OutputFormat::Svg } else { OutputFormat::Pdf };
            match format {
                OutputFormat::Pdf => {
                    let options = PdfOptions { compress };
                    let sink = open_output(output.as_deref(), format)?;
                    PdfWriter::new(&document, &font)
                        .with_options(options)
                        .write(sink)?;
                }
                OutputFormat::Svg => write_svg(&document, &font, output.as_deref(), concat)?,
            }
            Ok(())
        }

        Commands::Convert {
            input,
            output,
            dpi,
            width,
            threshold,
            dither,
            scale,
            border,
        } => {
            init_logging(false);

            let is_text = input
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));

            let bitmap = if is_text {
                let text = std::fs::read_to_string(&input)?;
                let mut bitmap = Bitmap::from_ascii(&text)?;
                if border {
                    bitmap = bitmap.bordered();
                }
                bitmap.scaled(scale as usize)
            } else {
                let binarize = if dither {
                    Binarize::Bayer
                } else {
                    Binarize::Threshold(threshold)
                };
                Bitmap::from_image(&bitimage::load_image(&input)?, width, binarize)
            };

            let density = match dpi {
                Dpi::Sixty => GraphicsDensity::Single,
                Dpi::OneTwenty => GraphicsDensity::Double,
            };
            let stream = bitimage::to_escp(&bitmap, density);
            std::fs::write(&output, &stream)?;

            println!(
                "Converted {} ({}x{} dots) to {} ({} bytes)",
                input.display(),
                bitmap.width(),
                bitmap.height(),
                output.display(),
                stream.len()
            );
            Ok(())
        }
    }
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Open the output file, or stdout unless stdout is a terminal.
fn open_output(path: Option<&Path>, format: OutputFormat) -> Result<Box<dyn Write>, ImpactoError> {
    match path {
        Some(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
        None if io::stdout().is_terminal() => {
            let fallback = format!("{}.{}", TTY_FALLBACK, format.extension());
            eprintln!(
                "Stdout is a terminal, writing to '{}' instead. Use -o to choose a file.",
                fallback
            );
            Ok(Box::new(BufWriter::new(File::create(fallback)?)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

fn write_svg(
    document: &Document,
    font: &FontResource,
    output: Option<&Path>,
    concat: bool,
) -> Result<(), ImpactoError> {
    let pages = if concat {
        vec![svg::concatenated_svg(document, font)]
    } else {
        svg::pages_svg(document, font)
    };

    if pages.len() == 1 {
        let mut sink = open_output(output, OutputFormat::Svg)?;
        sink.write_all(pages[0].as_bytes())?;
        sink.flush()?;
        return Ok(());
    }

    // One file per page: name-1.svg, name-2.svg, ...
    let base = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(format!("{}.svg", TTY_FALLBACK)));
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| TTY_FALLBACK.to_string());
    for (index, page) in pages.iter().enumerate() {
        let path = base.with_file_name(format!("{}-{}.svg", stem, index + 1));
        std::fs::write(&path, page)?;
        log::info!("wrote {}", path.display());
    }
    Ok(())
}
