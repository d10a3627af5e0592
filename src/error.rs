//! LEDFanBox error types.

use bytes::Bytes;
use hidapi::HidError;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// No attached HID device matches the vendor/product ID.
    #[error("could not find {name} ({vendor_id:04x}:{product_id:04x})")]
    DeviceNotFound { name: &'static str, vendor_id: u16, product_id: u16 },

    #[error("unable to access HID")]
    HidApi(#[source] HidError),

    #[error("unable to open device at {path}")]
    Open {
        path: String,
        #[source]
        source: HidError,
    },

    #[error("{0}")]
    InvalidArgument(String),

    #[error("unknown color '{0}'")]
    UnknownColor(String),

    /// Device accepted zero bytes of the packet.
    #[error("unable to write packet {packet:x}")]
    WriteFailed { packet: Bytes },

    /// HID transport error while writing a packet.
    #[error("HID error writing packet {packet:x}")]
    DeviceIo {
        packet: Bytes,
        #[source]
        source: HidError,
    },

    #[error("interrupted by user")]
    Interrupted,

    #[error("unable to install interrupt handler")]
    InterruptHandler(#[from] ctrlc::Error),
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn device_not_found_message() {
        let err = Error::DeviceNotFound {
            name: "Thermaltake LEDFanBox",
            vendor_id: 0x264a,
            product_id: 0x232b,
        };
        assert_eq!(err.to_string(), "could not find Thermaltake LEDFanBox (264a:232b)");
    }

    #[test]
    fn write_failure_message() {
        let err = Error::WriteFailed { packet: Bytes::from_static(&[0x01, 0x19]) };
        assert_eq!(err.to_string(), "unable to write packet 0119");
        assert!(err.source().is_none());
    }

    #[test]
    fn device_io_keeps_source() {
        let source = HidError::HidApiError { message: "broken pipe".into() };
        let err = Error::DeviceIo { packet: Bytes::from_static(&[0x03]), source };

        assert_eq!(err.to_string(), "HID error writing packet 03");
        assert!(err.source().is_some());
    }
}
