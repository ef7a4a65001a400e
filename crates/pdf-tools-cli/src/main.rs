use anyhow::{Result, anyhow, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pdf_async_runtime::{ConversionOptions, PdfCommand, PdfUpdate, WorkerHandle, spawn_worker};
use pdf_img2pdf::{MARGIN_OPTIONS, Orientation, PAGE_FORMATS, PageFormat, parse_margin};
use std::io::Write;
use std::path::PathBuf;

mod logger;

#[derive(Parser)]
#[command(name = "img2pdf", about = "Convert images to a PDF with one image per page", version)]
struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert images into a PDF, one page per image, in the order given
    Convert {
        /// Input image file(s)
        #[arg(required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// JSON options preset; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        flags: OptionFlags,

        /// Write the effective options to this JSON file
        #[arg(long)]
        save_config: Option<PathBuf>,

        /// Show the size estimate only, don't generate the PDF
        #[arg(long)]
        estimate_only: bool,
    },

    /// List available page formats and margins
    Formats,
}

/// Option overrides applied on top of the defaults or a `--config` preset
#[derive(Args, Debug)]
struct OptionFlags {
    /// JPEG quality (1-100) [default: 90]
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: Option<u8>,

    /// Page format [default: a4]
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Keep the format's listed dimensions instead of swapping them (`--portrait=false` swaps)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    portrait: Option<bool>,

    /// Convert pages to greyscale (`--greyscale=false` keeps colour)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    greyscale: Option<bool>,

    /// Margin in inches: 0, 0.25, 0.50, 0.75, 1.00, 1.25, 1.50, 1.75 or 2.00 [default: 0]
    #[arg(long)]
    margin: Option<String>,

    /// Enlarge small images to fill the printable area (`--scale-up=false` disables)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    scale_up: Option<bool>,
}

impl OptionFlags {
    /// Overwrite every option that was given on the command line
    fn apply(&self, options: &mut ConversionOptions) -> Result<()> {
        if let Some(quality) = self.quality {
            options.quality = quality;
        }
        if let Some(format) = self.format {
            options.page_format = format.into();
        }
        if let Some(portrait) = self.portrait {
            options.orientation = Orientation::from_portrait_flag(portrait);
        }
        if let Some(greyscale) = self.greyscale {
            options.greyscale = greyscale;
        }
        if let Some(margin) = &self.margin {
            options.margin_in = parse_margin(margin)?;
        }
        if let Some(scale_up) = self.scale_up {
            options.scale_up = scale_up;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    A4,
    Letter,
    Legal,
    A3,
    A5,
    Tabloid,
    Executive,
    #[value(name = "4x6")]
    Photo4x6,
    #[value(name = "5x7")]
    Photo5x7,
    #[value(name = "8x8")]
    Square8x8,
}

impl From<FormatArg> for PageFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::A4 => Self::A4,
            FormatArg::Letter => Self::Letter,
            FormatArg::Legal => Self::Legal,
            FormatArg::A3 => Self::A3,
            FormatArg::A5 => Self::A5,
            FormatArg::Tabloid => Self::Tabloid,
            FormatArg::Executive => Self::Executive,
            FormatArg::Photo4x6 => Self::Photo4x6,
            FormatArg::Photo5x7 => Self::Photo5x7,
            FormatArg::Square8x8 => Self::Square8x8,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::CliLogger::from_verbosity(cli.verbose).init()?;

    match cli.command {
        Commands::Convert {
            input,
            output,
            config,
            flags,
            save_config,
            estimate_only,
        } => {
            let mut handle = spawn_worker();

            let mut options = match config {
                Some(path) => load_config(&mut handle, path).await?,
                None => ConversionOptions::default(),
            };
            flags.apply(&mut options)?;
            options.validate()?;

            if let Some(path) = save_config {
                options.save(&path).await?;
                println!("Saved options → {}", path.display());
            }

            handle.commands.send(PdfCommand::Estimate {
                input_paths: input.clone(),
                options: options.clone(),
            })?;
            match next_result(&mut handle).await? {
                PdfUpdate::EstimateReady { estimate } => {
                    println!("Estimated size: ~{} for {} image(s)", estimate, estimate.image_count);
                }
                other => bail!("Unexpected update: {:?}", other),
            }

            if estimate_only {
                return Ok(());
            }

            handle.commands.send(PdfCommand::Convert {
                input_paths: input,
                options,
                output_path: output,
            })?;
            match next_result(&mut handle).await? {
                PdfUpdate::ConvertComplete {
                    path,
                    page_count,
                    bytes_written,
                } => {
                    println!(
                        "Converted {} image(s) → {} ({})",
                        page_count,
                        path.display(),
                        pdf_img2pdf::format_file_size(bytes_written as u64)
                    );
                }
                PdfUpdate::Cancelled => bail!("Conversion cancelled, no PDF written"),
                other => bail!("Unexpected update: {:?}", other),
            }
        }

        Commands::Formats => {
            println!("Page formats (portrait dimensions):");
            for format in PAGE_FORMATS {
                let (w, h) = format.dimensions_in();
                println!("  {:<10} {:<12} {:.2} x {:.2} in", format.value(), format.label(), w, h);
            }
            println!("Margins:");
            for option in MARGIN_OPTIONS {
                println!("  {:<5} {}", option.value, option.label);
            }
        }
    }

    Ok(())
}

async fn load_config(handle: &mut WorkerHandle, path: PathBuf) -> Result<ConversionOptions> {
    handle.commands.send(PdfCommand::LoadConfig { path })?;
    match next_result(handle).await? {
        PdfUpdate::ConfigLoaded { options } => Ok(options),
        other => bail!("Unexpected update: {:?}", other),
    }
}

/// Wait for the worker's answer to the last command, printing progress and
/// cancelling on Ctrl-C.
async fn next_result(handle: &mut WorkerHandle) -> Result<PdfUpdate> {
    let mut ctrl_c = std::pin::pin!(tokio::signal::ctrl_c());
    let mut cancelling = false;

    loop {
        tokio::select! {
            update = handle.updates.recv() => {
                let update = update.ok_or_else(|| anyhow!("Worker stopped unexpectedly"))?;
                match update {
                    PdfUpdate::Progress { operation, current, total, percent } => {
                        eprint!("\r{} {}/{} ({}%)", operation, current, total, percent);
                        if current == total {
                            eprintln!();
                        }
                        let _ = std::io::stderr().flush();
                    }
                    PdfUpdate::Error { message } => bail!(message),
                    other => return Ok(other),
                }
            }
            _ = &mut ctrl_c, if !cancelling => {
                cancelling = true;
                eprintln!("\nCancelling after the current image...");
                handle.cancel.cancel();
            }
        }
    }
}
