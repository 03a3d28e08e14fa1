// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the Sengled library.
//!
//! This module provides the error hierarchy used across the library: value
//! validation, cloud communication (HTTP and MQTT), JSON parsing of cloud
//! responses, and device operations.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while talking to the Sengled cloud.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a cloud response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred during device operations.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// No session has been established with the cloud.
    #[error("not logged in to the Sengled cloud")]
    NotConnected,
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },

    /// An invalid power state string was provided.
    #[error("invalid power state: {0}")]
    InvalidPowerState(String),

    /// A color string could not be parsed as an RGB triple.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// An effect label or code is not known.
    #[error("unknown effect: {0}")]
    InvalidEffect(String),
}

/// Errors related to cloud communication (HTTP/MQTT).
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// MQTT client failed to queue a request.
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// Connection to the cloud failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The response body was not valid JSON.
    #[error("invalid response body: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

/// Errors related to parsing Sengled cloud responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// Unexpected response format.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),
}

/// Errors related to device operations.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Device does not support the requested capability.
    #[error("device does not support {capability}")]
    UnsupportedCapability {
        /// The capability that is not supported.
        capability: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 0,
            max: 255,
            actual: 300,
        };
        assert_eq!(err.to_string(), "value 300 is out of range [0, 255]");
    }

    #[test]
    fn error_from_value_error() {
        let value_err = ValueError::InvalidColor("1,2".to_string());
        let err: Error = value_err.into();
        assert!(matches!(err, Error::Value(ValueError::InvalidColor(_))));
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::MissingField("deviceList".to_string());
        assert_eq!(err.to_string(), "missing field in response: deviceList");
    }

    #[test]
    fn device_error_display() {
        let err = DeviceError::UnsupportedCapability {
            capability: "effects".to_string(),
        };
        assert_eq!(err.to_string(), "device does not support effects");
    }

    #[test]
    fn protocol_error_from_authentication() {
        let err: Error = ProtocolError::AuthenticationFailed.into();
        assert_eq!(err.to_string(), "protocol error: authentication failed");
    }
}
