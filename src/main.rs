//
// ZPL_PRINTER_HOST=192.168.0.243 cargo run -- label_capture_bw.png
//
use std::{env, path::Path, process};

use log::{error, info};
use zpl_label::{DebugSink, NoopSink, PngDirSink, Printer, RasterImage, Result, Settings};

fn print_usage() {
    println!("Usage: zpl-label <IMAGE> [--dry-run]");
    println!("Options:");
    println!("  --dry-run  Print the ZPL command instead of sending it");
    println!("  -h, --help Show this message");
    println!("\nSettings are read from the environment (or a .env file):");
    println!("  ZPL_PRINTER_HOST, ZPL_PRINTER_PORT, ZPL_CONNECT_TIMEOUT_SECS,");
    println!("  ZPL_SCALE, ZPL_LABEL_WIDTH, ZPL_LABEL_HEIGHT, ZPL_CENTERED,");
    println!("  ZPL_FIT_PROPORTIONALLY, ZPL_ORIGIN_X, ZPL_ORIGIN_Y, ZPL_DEBUG_DIR");
}

fn main() {
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{}:{}] {} - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.level(),
                record.args()
            )
        })
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        return;
    }

    let dry_run = args.iter().any(|a| a == "--dry-run");
    let paths: Vec<&String> = args.iter().filter(|a| !a.starts_with("--")).collect();

    let path = match paths.as_slice() {
        [path] => Path::new(path.as_str()),
        _ => {
            eprintln!("Error: expected exactly one image path");
            print_usage();
            process::exit(2);
        }
    };

    if let Err(err) = run(path, dry_run) {
        error!("Failed to print label: {}", err);
        process::exit(1);
    }
}

fn run(path: &Path, dry_run: bool) -> Result<()> {
    let settings = Settings::from_env()?;

    let image = RasterImage::open(path)?;
    info!(
        "Loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );

    let mut sink: Box<dyn DebugSink> = match &settings.debug_dir {
        Some(dir) => Box::new(PngDirSink::new(dir)),
        None => Box::new(NoopSink),
    };

    let command = settings.job.render(&image, sink.as_mut())?;
    info!("ZPL command is {} bytes", command.len());

    if dry_run {
        println!("{}", command);
        return Ok(());
    }

    match settings.printer_config() {
        Some(config) => Printer::new(config).print(&command),
        None => Err(zpl_label::Error::InvalidConfig(
            "ZPL_PRINTER_HOST is not set (use --dry-run to only render)".to_string(),
        )),
    }
}
