use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qrpayload::error::InvalidRequest;
use qrpayload::output;
use qrpayload::payload::encode;
use qrpayload::render::{self, RasterRenderer, RenderRequest, RenderedImage, Renderer, SvgRenderer};

mod cli;

use cli::{Cli, Format};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            if err.downcast_ref::<InvalidRequest>().is_some() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let request = cli.command.into_request()?;
    debug!(content_type = %request.content_type(), "building payload");
    let payload = encode(&request)?;

    if cli.format == Format::Payload {
        println!("{}", payload);
        return Ok(());
    }

    let render_request = RenderRequest::from(payload)
        .with_colors(cli.bg, cli.fg)
        .with_error_correction(cli.ecc)
        .with_border(cli.border);

    if cli.preview {
        // Keep stdout clean when it carries the SVG document.
        if cli.stdout {
            let ansi = std::io::stderr().is_terminal();
            eprint!("{}", render::to_console_string(&render_request, ansi)?);
        } else {
            let ansi = std::io::stdout().is_terminal();
            print!("{}", render::to_console_string(&render_request, ansi)?);
        }
    }

    let renderer: Box<dyn Renderer> = match cli.format {
        Format::Png => Box::new(RasterRenderer { scale: cli.scale }),
        _ => Box::new(SvgRenderer),
    };
    let image = renderer.render(&render_request)?;

    match (&image, cli.stdout) {
        (RenderedImage::Svg(svg), true) => print!("{}", svg),
        _ => {
            let path = output::save(&image, &cli.out_dir, &cli.name)?;
            println!("saved {}", path.display());
        }
    }
    Ok(())
}
