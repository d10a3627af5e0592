//! HID device access.

use bytes::Bytes;
use hidapi::{HidApi, HidDevice, HidError};
use tracing::{debug, trace, warn};

use crate::controller::HidController;
use crate::error::Error;

/// Raw packet channel to an open device.
pub(crate) trait Transport {
    /// Write a packet, returning the number of bytes accepted.
    fn write(&mut self, packet: &[u8]) -> Result<usize, HidError>;

    /// Release the device.
    fn close(&mut self);
}

/// Open HID connection.
pub struct HidTransport {
    device: Option<HidDevice>,
}

impl Transport for HidTransport {
    fn write(&mut self, packet: &[u8]) -> Result<usize, HidError> {
        match &self.device {
            Some(device) => device.write(packet),
            None => Err(HidError::HidApiError { message: "device already closed".into() }),
        }
    }

    fn close(&mut self) {
        // Dropping the handle closes it.
        self.device.take();
    }
}

/// Open the first attached device matching the controller's vendor and product ID.
pub(crate) fn find_device(controller: &dyn HidController) -> Result<HidTransport, Error> {
    let (name, vendor_id, product_id) =
        (controller.name(), controller.vendor_id(), controller.product_id());

    let api = HidApi::new().map_err(Error::HidApi)?;
    let info = api
        .device_list()
        .find(|info| info.vendor_id() == vendor_id && info.product_id() == product_id)
        .ok_or(Error::DeviceNotFound { name, vendor_id, product_id })?;

    let path = info.path().to_string_lossy().into_owned();
    let device = match info.open_device(&api) {
        Ok(device) => device,
        Err(source) => return Err(Error::Open { path, source }),
    };

    debug!(%path, "opened device {vendor_id:04x}:{product_id:04x}");

    Ok(HidTransport { device: Some(device) })
}

/// Exclusive owner of an open device, closing it exactly once on drop.
pub(crate) struct DeviceGuard<T: Transport> {
    transport: T,
}

impl<T: Transport> DeviceGuard<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Write a packet, failing unless the device accepted at least one byte.
    ///
    /// A zero byte count is a [`Error::WriteFailed`], a transport error is a
    /// [`Error::DeviceIo`].
    pub fn write_packet(&mut self, packet: Bytes) -> Result<(), Error> {
        trace!("writing packet {packet:x}");

        match self.transport.write(&packet) {
            Ok(written) if written > 0 => Ok(()),
            Ok(_) => {
                warn!("device accepted no bytes of packet {packet:x}");
                Err(Error::WriteFailed { packet })
            },
            Err(source) => {
                warn!("write of packet {packet:x} failed: {source}");
                Err(Error::DeviceIo { packet, source })
            },
        }
    }
}

impl<T: Transport> Drop for DeviceGuard<T> {
    fn drop(&mut self) {
        self.transport.close();
        debug!("device closed");
    }
}
