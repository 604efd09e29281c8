// SPDX-License-Identifier: MIT OR Apache-2.0
//! Vintage Postcard command line.
//!
//! - `stamps` lists the stamp catalog
//! - `create` runs the builder flow and prints a share link, optionally
//!   emailing it
//! - `open` decodes a share link and plays the reveal in the terminal

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use vintage_postcard_app::{
    photo, AppConfig, AppError, ContactDetails, EmailJsDelivery, NarrationCallbacks, PostcardApp,
    Result, TranscriptNarrator, View, ViewerFrame, CONFIG_FILE_NAME,
};
use vintage_postcard_codec::StampCatalog;

#[derive(Parser, Debug)]
#[command(name = "vintage_postcard", version, about = "Build, share and open animated postcards")]
struct Cli {
    /// Configuration file (RON).
    #[arg(long, global = true, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available stamps.
    Stamps,
    /// Build a postcard and print its share link.
    Create(CreateArgs),
    /// Open a share link and play the reveal.
    Open(OpenArgs),
}

#[derive(Parser, Debug)]
struct CreateArgs {
    /// Image file, http(s) URL, or data URI.
    #[arg(long)]
    photo: String,

    /// Message for the letter.
    #[arg(long)]
    message: String,

    /// Stamp id (see `stamps`).
    #[arg(long)]
    stamp: u32,

    /// Sender name.
    #[arg(long)]
    from: String,

    /// Recipient name.
    #[arg(long)]
    to: String,

    /// Recipient email address.
    #[arg(long)]
    email: String,

    /// Email the link to the recipient.
    #[arg(long, default_value_t = false)]
    send: bool,
}

#[derive(Parser, Debug)]
struct OpenArgs {
    /// Share link containing a `postcard` parameter.
    link: String,

    /// Read the message aloud once the letter is revealed.
    #[arg(long, default_value_t = false)]
    narrate: bool,
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("vintage_postcard_app=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    tracing::debug!("Starting Vintage Postcard v{}", env!("CARGO_PKG_VERSION"));

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start runtime: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run(cli)) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load_or_default(&cli.config)?;
    match cli.cmd {
        Command::Stamps => {
            cmd_stamps(&StampCatalog::classic());
            Ok(())
        }
        Command::Create(args) => cmd_create(config, args).await,
        Command::Open(args) => cmd_open(config, args).await,
    }
}

fn cmd_stamps(catalog: &StampCatalog) {
    for stamp in catalog.iter() {
        println!("{:>3}  {}  {:<10} {}", stamp.id, stamp.emoji, stamp.label, stamp.color);
    }
}

async fn cmd_create(config: AppConfig, args: CreateArgs) -> Result<()> {
    let delivery = if args.send {
        let delivery_config = config
            .delivery
            .clone()
            .ok_or_else(|| AppError::Config("no delivery section configured".to_string()))?;
        Some(EmailJsDelivery::new(delivery_config)?)
    } else {
        None
    };

    let mut app = PostcardApp::new(config);
    if let Some(delivery) = delivery {
        app = app.with_delivery(Arc::new(delivery));
    }

    let catalog = app.catalog().clone();
    let builder = app.builder_mut();
    builder.set_photo(photo::resolve(&args.photo)?);
    builder.next()?;

    builder.set_message(args.message);
    if builder.draft().is_over_soft_limit() {
        tracing::warn!(
            "Message is {} characters, over the suggested limit",
            builder.draft().message_len()
        );
    }
    builder.next()?;

    builder.select_stamp(&catalog, args.stamp)?;
    builder.next()?;

    let contact = ContactDetails::new(args.from, args.to, args.email);
    let link = if args.send {
        app.send(contact).await?
    } else {
        app.builder_mut().finalize(contact)?;
        app.create_link()?
    };

    println!("{link}");
    Ok(())
}

async fn cmd_open(config: AppConfig, args: OpenArgs) -> Result<()> {
    let mut app =
        PostcardApp::new(config).with_narrator(|| Box::new(TranscriptNarrator::new()));

    if app.load(&args.link) != View::Viewer {
        return Err(AppError::InvalidLink(
            "link does not carry a readable postcard".to_string(),
        ));
    }
    let Some(viewer) = app.viewer_mut() else {
        return Ok(());
    };

    print_frame(&viewer.frame());
    if let Some(mut events) = viewer.take_events() {
        while let Some(activation) = events.recv().await {
            tracing::debug!(stage = activation.stage.index(), "Stage reached");
            print_frame(&viewer.frame());
        }
    }

    if args.narrate {
        let callbacks = NarrationCallbacks::new()
            .on_end(|| tracing::debug!("Narration finished"))
            .on_error(|reason| tracing::warn!("Narration failed: {reason}"));
        viewer.play_narration(callbacks)?;
    }

    app.back_to_builder();
    Ok(())
}

fn print_frame(frame: &ViewerFrame<'_>) {
    println!("-- {} --", frame.stage.display_name());

    if let Some(photo) = frame.photo {
        if photo::is_data_uri(photo) {
            println!("Photo: (embedded image, {} bytes)", photo.len());
        } else {
            println!("Photo: {photo}");
        }
    }
    if let Some(stamp) = frame.stamp {
        println!("Stamp: {} {}", stamp.emoji, stamp.label);
    }
    if let Some(letter) = &frame.letter {
        println!("To: {}", letter.to);
        println!("From: {}", letter.from);
        println!();
        println!("{}", letter.message);
        println!();
        println!("{}", letter.closing);
        println!("{}", letter.signature);
    }
}
