// Error types for lapdeck

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
pub enum LapdeckError {
    // Errors talking to the telemetry API service
    #[snafu(display("Unable to reach telemetry service at {url}"))]
    NetworkError { url: String, source: reqwest::Error },
    #[snafu(display("Telemetry service returned {status}: {body}"))]
    ServiceError { status: u16, body: String },
    #[snafu(display("Error decoding telemetry service response"))]
    MalformedResponse { source: reqwest::Error },

    // Config management errors
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },
}
