use anyhow::{ensure, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use eink_convert::{buffer_to_rgb, convert, image_to_buffer, open_image};
use epd7in3e::binding::{script::serve, Binding};
use epd7in3e::color::color_constants;
use epd7in3e::display_constants::{BUFFER_SIZE, HEIGHT, WIDTH};
use epd7in3e::{Color, EpdDevice, SimulatedDriver, VendorDriver};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing::level_filters::LevelFilter;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Run against the simulated driver instead of the panel
    #[arg(long, env = "EPD_SIMULATE", global = true)]
    simulate: bool,
    /// Save what the simulated panel shows to this PNG afterwards
    #[arg(long, global = true, requires = "simulate")]
    preview: Option<PathBuf>,
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print panel geometry and color codes
    Info,
    /// Fill the panel with one color
    Clear {
        #[arg(long, value_enum, default_value_t = ColorArg::White)]
        color: ColorArg,
    },
    /// Send a packed frame, or any image with --convert
    Display {
        file: PathBuf,
        #[arg(long)]
        convert: bool,
    },
    /// Vendor color test pattern
    Show,
    /// Vendor 7-block test pattern
    #[command(name = "show-7block")]
    Show7Block,
    /// Convert an image to a packed frame file
    Convert {
        file: PathBuf,
        out_file: PathBuf,
        #[arg(long)]
        dithered_file: Option<PathBuf>,
    },
    /// Answer JSON-line calls on stdin until EOF
    Serve,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum ColorArg {
    Black,
    White,
    Yellow,
    Red,
    Blue,
    Green,
}

impl From<ColorArg> for Color {
    fn from(value: ColorArg) -> Self {
        match value {
            ColorArg::Black => Color::Black,
            ColorArg::White => Color::White,
            ColorArg::Yellow => Color::Yellow,
            ColorArg::Red => Color::Red,
            ColorArg::Blue => Color::Blue,
            ColorArg::Green => Color::Green,
        }
    }
}

/// One init → operation → sleep → exit cycle on the panel.
#[derive(Debug)]
enum Job {
    Clear(Color),
    Display(Vec<u8>),
    Show,
    Show7Block,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = match args.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    // stdout belongs to `serve`
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let job = match &args.command {
        Command::Info => {
            print_info();
            return Ok(());
        }
        Command::Convert {
            file,
            out_file,
            dithered_file,
        } => {
            convert(file, out_file, dithered_file.as_deref())
                .with_context(|| format!("converting {}", file.display()))?;
            return Ok(());
        }
        Command::Serve => None,
        Command::Clear { color } => Some(Job::Clear((*color).into())),
        Command::Display { file, convert } => Some(Job::Display(load_frame(file, *convert)?)),
        Command::Show => Some(Job::Show),
        Command::Show7Block => Some(Job::Show7Block),
    };

    if args.simulate {
        let device = run(SimulatedDriver::new(), job)?;
        if let Some(path) = &args.preview {
            buffer_to_rgb(device.driver().frame())?
                .save(path)
                .with_context(|| format!("saving preview {}", path.display()))?;
            info!("Preview saved to {}", path.display());
        }
        Ok(())
    } else {
        run_on_panel(job)
    }
}

#[cfg(feature = "vendor")]
fn run_on_panel(job: Option<Job>) -> Result<()> {
    use epd7in3e::e_paper_display_driver::waveshare::WaveshareDriver;

    let driver = WaveshareDriver::take().context("e-Paper driver already claimed")?;
    run(driver, job).map(drop)
}

#[cfg(not(feature = "vendor"))]
fn run_on_panel(_job: Option<Job>) -> Result<()> {
    anyhow::bail!("built without the `vendor` feature; pass --simulate to use the simulated panel")
}

fn run<D: VendorDriver>(driver: D, job: Option<Job>) -> Result<EpdDevice<D>> {
    let Some(job) = job else {
        let mut binding = Binding::new(driver);
        serve(&mut binding, io::stdin().lock(), io::stdout().lock())?;
        return Ok(binding.into_device());
    };

    let mut device = EpdDevice::new(driver);
    device.init()?;
    match job {
        Job::Clear(color) => device.clear(color),
        Job::Display(frame) => device.display(&frame)?,
        Job::Show => device.show(),
        Job::Show7Block => device.show_7block(),
    }
    device.sleep();
    device.exit();
    info!("Complete");
    Ok(device)
}

fn load_frame(file: &Path, convert: bool) -> Result<Vec<u8>> {
    let frame = if convert {
        image_to_buffer(open_image(file).with_context(|| format!("opening {}", file.display()))?)
    } else {
        fs::read(file).with_context(|| format!("reading {}", file.display()))?
    };
    ensure!(
        frame.len() == BUFFER_SIZE,
        "{} is {} bytes, a frame is {BUFFER_SIZE}; pass --convert for images",
        file.display(),
        frame.len()
    );
    Ok(frame)
}

fn print_info() {
    println!("width: {WIDTH}");
    println!("height: {HEIGHT}");
    println!("buffer size: {BUFFER_SIZE}");
    for (name, code) in color_constants() {
        println!("{name}: {code}");
    }
}
