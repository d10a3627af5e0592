//! Fan/RGB controller abstraction.

use bytes::Bytes;

use crate::error::Error;
use crate::Mode;

/// HID fan and RGB controller.
pub(crate) trait HidController {
    /// Product name shown to the user.
    fn name(&self) -> &'static str;

    /// HID vendor ID.
    fn vendor_id(&self) -> u16;

    /// HID product ID.
    fn product_id(&self) -> u16;

    /// Convert a fan speed in percent to controller-specific bytes.
    fn fan_speed_bytes(&self, percent: i64) -> Result<Bytes, Error>;

    /// Convert RGB components to controller-specific bytes.
    fn color_bytes(&self, r: i64, g: i64, b: i64) -> Result<Bytes, Error>;

    /// Convert a lighting mode to controller-specific bytes.
    fn mode_bytes(&self, mode: Mode) -> Result<Bytes, Error>;
}
