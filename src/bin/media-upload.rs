//! Terminal front end for the relay: picks a file, shows what would be
//! previewed, uploads it and renders progress while the transfer runs.

use std::{path::PathBuf, process::ExitCode, sync::Arc, time::Duration};

use clap::Parser;
use media_relay::{
    adapters::relay_client::HttpRelayClient,
    application::session::{BeginOutcome, TransferState, UploadSession},
    domain::{
        config::SessionConfig,
        models::CandidateFile,
        validation::{mime_for_extension, ValidationResult},
    },
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "media-upload", about = "Upload an image or video through a media relay")]
struct Args {
    /// File to upload
    path: PathBuf,

    /// Base URL of the relay
    #[arg(long, default_value = "http://localhost:8080")]
    relay: String,

    /// Declared MIME type; guessed from the extension when omitted
    #[arg(long)]
    mime: Option<String>,

    /// Give up on the transfer after this many seconds
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,
}

async fn read_candidate(args: &Args) -> std::io::Result<CandidateFile> {
    let content = tokio::fs::read(&args.path).await?;
    let name = args
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let mime_type = args.mime.clone().unwrap_or_else(|| {
        args.path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(mime_for_extension)
            .unwrap_or("application/octet-stream")
            .to_string()
    });

    Ok(CandidateFile::new(content, name, mime_type))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let timeout = Duration::from_secs(args.timeout_secs);
    let transport = match HttpRelayClient::new(&args.relay, Some(timeout)) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Cannot create relay client: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let session = UploadSession::new(Arc::new(transport), SessionConfig::default());

    let file = match read_candidate(&args).await {
        Ok(file) => Some(file),
        Err(e) => {
            tracing::warn!("Cannot read {}: {}", args.path.display(), e);
            None
        }
    };

    if let ValidationResult::Rejected(reason) = session.select_file(file).await {
        eprintln!("{}", reason);
        return ExitCode::FAILURE;
    }

    let snapshot = session.snapshot();
    if let (Some(file), Some(preview)) = (&snapshot.candidate, &snapshot.preview) {
        println!(
            "Preview: {} {} ({} bytes, data URI of {} chars)",
            preview.kind,
            file.name,
            file.size(),
            preview.data_uri().len()
        );
    }

    let mut updates = session.subscribe();
    let renderer = tokio::spawn(async move {
        let mut last = None;
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            if matches!(snapshot.transfer, TransferState::Failed(_)) {
                break;
            }
            if last != Some(snapshot.progress) {
                println!("Uploading... {}%", snapshot.progress);
                last = Some(snapshot.progress);
            }
            if !snapshot.transfer.is_in_flight() {
                break;
            }
        }
    });

    let outcome = session.begin_upload().await;
    let _ = renderer.await;

    match outcome {
        BeginOutcome::Succeeded(descriptor) => {
            println!("Uploaded {} as {}", descriptor.public_id, descriptor.resource_type);
            println!("{}", descriptor.secure_url);
            ExitCode::SUCCESS
        }
        BeginOutcome::Failed(e) => {
            tracing::debug!("Transfer error: {}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
        BeginOutcome::AlreadyInFlight | BeginOutcome::NoCandidate => ExitCode::FAILURE,
    }
}
