use crate::api::{ApiError, ConversionResult, SaveRequest, Track};

#[derive(Debug, Clone)]
pub enum NetCmd {
    /// Refetch the whole library.
    LoadLibrary { epoch: u64 },
    /// `POST /convert` for a submitted URL.
    Convert { url: String, epoch: u64 },
    /// Promote a conversion result into the library.
    Save { request: SaveRequest, epoch: u64 },
    /// Delete a library track by id.
    Delete { id: i64, epoch: u64 },
    /// Fire-and-forget file download; the outcome is only logged.
    Download { url: String, file_name: String },
}

#[derive(Debug)]
pub enum NetEvent {
    Library {
        epoch: u64,
        result: Result<Vec<Track>, ApiError>,
    },
    Converted {
        epoch: u64,
        result: Result<ConversionResult, ApiError>,
    },
    Saved {
        epoch: u64,
        result: Result<(), ApiError>,
    },
    Deleted {
        epoch: u64,
        id: i64,
        result: Result<(), ApiError>,
    },
}
