use clap::Parser;
use deal_capture::viewers::snapshot::SnapshotViewer;
use deal_capture::viewers::webdriver::WebDriverViewer;
use deal_capture::{CaptureReport, Deal, DealCapture, Result};
use std::process::ExitCode;

mod args;
use args::{Args, Command};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let capture = match build(&args) {
        Ok(capture) => capture,
        Err(e) => {
            ::log::error!("{}", e);
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&args.command, &capture).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ::log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Layer configuration: defaults, config file, WEBDRIVER_URL, then flags
fn build(args: &Args) -> Result<DealCapture> {
    let mut capture = DealCapture::from_config(Default::default());
    if let Some(path) = &args.config {
        capture = capture.with_config_file(path)?;
    }

    // Override the WebDriver URL with an environment variable if provided
    if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
        if !webdriver_url.is_empty() {
            capture = capture.with_webdriver_url(webdriver_url);
        }
    }

    let mut config = capture.config().clone();
    if let Some(url) = args.command.viewer_url() {
        config.viewer_url = Some(url.to_string());
    }
    if let Some(url) = &args.webdriver_url {
        config.webdriver_url = url.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(name) = &args.manifest {
        config.manifest_name = name.clone();
    }
    if let Some(fallback) = args.title_fallback {
        config.title_fallback = fallback;
    }
    if let Command::Select { thumbnails: true, .. } = args.command {
        config.with_thumbnails = true;
    }

    Ok(DealCapture::from_config(config))
}

async fn run(command: &Command, capture: &DealCapture) -> Result<()> {
    if let Command::Scan {
        snapshot: Some(path),
        base_url,
        json,
        ..
    } = command
    {
        let selectors = &capture.config().selectors;
        let viewer = SnapshotViewer::from_file(path, base_url.as_deref(), selectors)?;
        let deals = capture.scan(&viewer).await?;
        print_deals(&deals, *json)?;
        return Ok(());
    }

    println!("Note: capturing requires a WebDriver server (e.g., ChromeDriver).");

    let viewer = capture.connect().await?;
    let result = run_live(command, capture, &viewer).await;

    if let Err(e) = viewer.close().await {
        ::log::warn!("Failed to close WebDriver session: {}", e);
    }
    result
}

async fn run_live(
    command: &Command,
    capture: &DealCapture,
    viewer: &WebDriverViewer,
) -> Result<()> {
    capture.activate(viewer).await?;
    let start_time = std::time::Instant::now();

    let deals = capture.scan(viewer).await?;
    match command {
        Command::Scan { json, .. } => print_deals(&deals, *json)?,
        _ if deals.is_empty() => println!("No deals found."),
        Command::Capture { .. } => {
            let report = capture.capture(viewer, &deals).await?;
            print_report(&report);
        }
        Command::Select { .. } => {
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            match capture
                .select_and_capture(viewer, deals, stdin.lock(), &mut stdout)
                .await?
            {
                Some(report) if report.captured > 0 => print_report(&report),
                Some(_) => println!("No deals selected."),
                None => println!("Selection cancelled."),
            }
        }
    }

    ::log::info!(
        "Finished in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}

fn print_report(report: &CaptureReport) {
    println!("{} deals captured and exported.", report.captured);
    if let Some(manifest) = &report.manifest {
        println!("Manifest: {}", manifest.display());
    }
}

fn print_deals<P>(deals: &[Deal<P>], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(deals)?);
        return Ok(());
    }

    if deals.is_empty() {
        println!("No deals found.");
        return Ok(());
    }
    for (index, deal) in deals.iter().enumerate() {
        println!("{:>3}. p{:<4} {}  <{}>", index + 1, deal.page, deal.text, deal.href);
    }
    Ok(())
}
