use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Fixed taxonomy of outcomes for every operation in the API.
///
/// The harness buckets results by code, so implementations must report the
/// most specific code that applies and never collapse distinct codes into
/// `VendorError`. In particular, an elective refusal (the implementation
/// *chose* not to process the input) is not the same thing as an involuntary
/// failure (processing was attempted and genuinely failed); the harness may
/// apply different retry and statistics policies to each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReturnCode {
    /// Operation fully succeeded
    Success,
    /// Error reading configuration files
    ConfigError,
    /// Image type (e.g. sketches) is not supported by the implementation
    ImageTypeNotSupported,
    /// Elective refusal to process the input
    RefuseInput,
    /// Involuntary failure to process the image
    ExtractError,
    /// Cannot parse the input data
    ParseError,
    /// Failure to produce a template
    TemplateCreationError,
    /// An operation on the enrollment directory failed (permission, space)
    EnrollDirError,
    /// The implementation cannot support the number of input images
    NumDataError,
    /// One or more template files are in an incorrect format or defective
    TemplateFormatError,
    /// Cannot locate the input data - the input files or names seem incorrect
    InputLocationError,
    /// Vendor-defined failure
    VendorError,
    /// The operation is not implemented
    NotImplemented,
}

impl ReturnCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnCode::Success => "success",
            ReturnCode::ConfigError => "config error",
            ReturnCode::ImageTypeNotSupported => "image type not supported",
            ReturnCode::RefuseInput => "refused input",
            ReturnCode::ExtractError => "extract error",
            ReturnCode::ParseError => "parse error",
            ReturnCode::TemplateCreationError => "template creation error",
            ReturnCode::EnrollDirError => "enrollment directory error",
            ReturnCode::NumDataError => "unsupported number of inputs",
            ReturnCode::TemplateFormatError => "template format error",
            ReturnCode::InputLocationError => "input location error",
            ReturnCode::VendorError => "vendor error",
            ReturnCode::NotImplemented => "not implemented",
        }
    }

    /// True for codes signalling that the implementation declined the input
    /// rather than failed on it. `ImageTypeNotSupported` is elective because
    /// sketch support is optional by contract.
    pub fn is_elective(self) -> bool {
        matches!(
            self,
            ReturnCode::RefuseInput | ReturnCode::ImageTypeNotSupported
        )
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status returned by every fallible API operation: a fixed code plus a
/// free-text diagnostic string.
///
/// Operations in this API return `Result<_, ReturnStatus>`, so a status only
/// travels through the error arm when the code is not `Success` - the
/// "code == Success iff the operation fully succeeded" invariant holds by
/// construction for conforming implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code}: {info}")]
pub struct ReturnStatus {
    /// Return status code
    pub code: ReturnCode,
    /// Diagnostic information for debugging; not interpreted by the harness
    pub info: String,
}

impl ReturnStatus {
    pub fn new(code: ReturnCode, info: impl Into<String>) -> Self {
        Self {
            code,
            info: info.into(),
        }
    }

    /// Wrap an IO error under the given code, keeping its message as the
    /// diagnostic text.
    pub fn from_io(code: ReturnCode, err: std::io::Error) -> Self {
        Self::new(code, err.to_string())
    }
}
