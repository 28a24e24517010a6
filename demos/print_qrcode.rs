//! Render a QR code as a label and send it (or print the ZPL with `--dry-run`).
//!
//! ```text
//! ZPL_PRINTER_HOST=192.168.0.243 cargo run --example print_qrcode -- "12345-1"
//! ```
use qrcode::{Color, QrCode};
use std::env;
use zpl_label::{Job, NoopSink, Printer, RasterImage, Settings, BLACK};

fn print_usage() {
    println!("Usage: cargo run --example print_qrcode -- [TEXT] [--dry-run]");
    println!("\nThe printer is configured like the main binary: ZPL_PRINTER_HOST,");
    println!("ZPL_PRINTER_PORT, ZPL_CONNECT_TIMEOUT_SECS (environment or .env file).");
}

/// One pixel per QR module, with a four module quiet zone.
fn qr_image(text: &str) -> RasterImage {
    let code = QrCode::new(text.as_bytes()).unwrap();
    let modules = code.width() as u32;
    let quiet = 4;
    let side = modules + 2 * quiet;

    let mut image = RasterImage::new(side, side).unwrap();
    for (i, color) in code.to_colors().into_iter().enumerate() {
        if color == Color::Dark {
            let x = i as u32 % modules + quiet;
            let y = i as u32 / modules + quiet;
            image.put_pixel(x, y, BLACK);
        }
    }
    image
}

fn main() {
    dotenvy::dotenv().ok();

    env_logger::Builder::from_default_env()
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
    let text = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .cloned()
        .unwrap_or_else(|| "12345-1".to_string());

    let image = qr_image(&text);

    // 1 dot per module is far too small to scan, blow it up before fitting.
    let job = Job::new(400, 400)
        .scale(8.0)
        .fit_proportionally(false)
        .origin(10, 10);
    let command = job.render(&image, &mut NoopSink).unwrap();

    if dry_run {
        println!("{}", command);
        return;
    }

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Error: {}", err);
            return;
        }
    };
    let config = match settings.printer_config() {
        Some(config) => config,
        None => {
            eprintln!("Error: ZPL_PRINTER_HOST is not set");
            print_usage();
            return;
        }
    };

    match Printer::new(config).print(&command) {
        Ok(()) => println!("Sent QR label for {:?}", text),
        Err(err) => println!("ERROR {:#?}", err),
    }
}
