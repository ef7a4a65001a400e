use pdf_img2pdf::{
    CancelToken, ConversionOptions, ConversionRequest, ConvertError, convert_with_cancel,
    estimate_pdf_size, load_images, save_pdf,
};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::{PdfCommand, PdfUpdate};

/// Channels and controls for a spawned worker
pub struct WorkerHandle {
    pub commands: mpsc::UnboundedSender<PdfCommand>,
    pub updates: mpsc::UnboundedReceiver<PdfUpdate>,
    /// Stops the running conversion before its next image
    pub cancel: CancelToken,
    pub task: JoinHandle<()>,
}

/// Spawn a worker on the current tokio runtime.
///
/// The worker exits once every command sender has been dropped.
pub fn spawn_worker() -> WorkerHandle {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, update_rx) = mpsc::unbounded_channel();
    let cancel = CancelToken::new();

    let task = tokio::spawn(worker_task(command_rx, update_tx, cancel.clone()));

    WorkerHandle {
        commands: command_tx,
        updates: update_rx,
        cancel,
        task,
    }
}

/// Async worker task that processes conversion commands and sends updates
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<PdfCommand>,
    update_tx: mpsc::UnboundedSender<PdfUpdate>,
    cancel: CancelToken,
) {
    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &cancel, &update_tx).await;
    }
    log::debug!("Command channel closed, worker exiting");
}

async fn process_command(
    cmd: PdfCommand,
    cancel: &CancelToken,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    match cmd {
        PdfCommand::Convert {
            input_paths,
            options,
            output_path,
        } => {
            handle_convert(input_paths, options, output_path, cancel, update_tx).await;
            // A cancel aimed at this run must not leak into the next one
            cancel.reset();
        }
        PdfCommand::Estimate {
            input_paths,
            options,
        } => {
            handle_estimate(input_paths, options, update_tx).await;
        }
        PdfCommand::LoadConfig { path } => {
            handle_load_config(path, update_tx).await;
        }
    }
}

async fn handle_convert(
    input_paths: Vec<PathBuf>,
    options: ConversionOptions,
    output_path: PathBuf,
    cancel: &CancelToken,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    let images = match load_images(&input_paths).await {
        Ok(images) => images,
        Err(e) => {
            send_error(update_tx, format!("Failed to load images: {}", e));
            return;
        }
    };

    let total = images.len();
    let request = ConversionRequest::new(images, options);

    let mut current = 0;
    let progress_tx = update_tx.clone();
    let mut report = |percent: u8| {
        current += 1;
        let _ = progress_tx.send(PdfUpdate::Progress {
            operation: "Converting images".to_string(),
            current,
            total,
            percent,
        });
    };

    let conversion = match convert_with_cancel(&request, &mut report, cancel).await {
        Ok(conversion) => conversion,
        Err(ConvertError::Cancelled) => {
            let _ = update_tx.send(PdfUpdate::Cancelled);
            return;
        }
        Err(e) => {
            send_error(update_tx, e.to_string());
            return;
        }
    };

    match save_pdf(&conversion.pdf, &output_path).await {
        Ok(()) => {
            log::info!(
                "Wrote {} page(s) to {}",
                conversion.page_count(),
                output_path.display()
            );
            let _ = update_tx.send(PdfUpdate::ConvertComplete {
                path: output_path,
                page_count: conversion.page_count(),
                bytes_written: conversion.pdf.len(),
            });
        }
        Err(e) => send_error(update_tx, format!("Failed to save PDF: {}", e)),
    }
}

async fn handle_estimate(
    input_paths: Vec<PathBuf>,
    options: ConversionOptions,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    let images = match load_images(&input_paths).await {
        Ok(images) => images,
        Err(e) => {
            send_error(update_tx, format!("Failed to load images: {}", e));
            return;
        }
    };

    let request = ConversionRequest::new(images, options);
    match estimate_pdf_size(&request).await {
        Ok(estimate) => {
            let _ = update_tx.send(PdfUpdate::EstimateReady { estimate });
        }
        Err(e) => send_error(update_tx, e.to_string()),
    }
}

async fn handle_load_config(path: PathBuf, update_tx: &mpsc::UnboundedSender<PdfUpdate>) {
    match ConversionOptions::load(&path).await {
        Ok(options) => {
            let _ = update_tx.send(PdfUpdate::ConfigLoaded { options });
        }
        Err(e) => send_error(update_tx, format!("Failed to load config: {}", e)),
    }
}

fn send_error(update_tx: &mpsc::UnboundedSender<PdfUpdate>, message: String) {
    log::error!("{}", message);
    let _ = update_tx.send(PdfUpdate::Error { message });
}
