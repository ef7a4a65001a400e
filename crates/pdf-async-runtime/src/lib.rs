use std::path::PathBuf;

mod worker;

pub use worker::{WorkerHandle, spawn_worker, worker_task};

// Re-export types from library crates
pub use pdf_img2pdf::{CancelToken, ConversionOptions, SizeEstimate};

/// Commands sent from the front end to the worker
#[derive(Debug)]
pub enum PdfCommand {
    Convert {
        input_paths: Vec<PathBuf>,
        options: ConversionOptions,
        output_path: PathBuf,
    },
    Estimate {
        input_paths: Vec<PathBuf>,
        options: ConversionOptions,
    },
    LoadConfig {
        path: PathBuf,
    },
}

/// Updates sent from the worker to the front end
#[derive(Debug, Clone)]
pub enum PdfUpdate {
    Progress {
        operation: String,
        current: usize,
        total: usize,
        percent: u8,
    },
    ConvertComplete {
        path: PathBuf,
        page_count: usize,
        bytes_written: usize,
    },
    EstimateReady {
        estimate: SizeEstimate,
    },
    ConfigLoaded {
        options: ConversionOptions,
    },
    Cancelled,
    Error {
        message: String,
    },
}
