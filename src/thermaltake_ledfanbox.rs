//! Thermaltake LEDFanBox fan and lighting control.

use bytes::{BufMut, Bytes, BytesMut};

use crate::controller::HidController;
use crate::error::Error;
use crate::{Mode, Rgb};

/// Tag byte of the fan speed packet.
const FAN_SPEED_TAG: u8 = 0x01;

/// Raw speed units per percent.
const FAN_SPEED_SCALE: i64 = 0x19;

pub struct ThermaltakeLedFanBox;

impl HidController for ThermaltakeLedFanBox {
    fn name(&self) -> &'static str {
        "Thermaltake LEDFanBox"
    }

    fn vendor_id(&self) -> u16 {
        0x264a
    }

    fn product_id(&self) -> u16 {
        0x232b
    }

    fn fan_speed_bytes(&self, percent: i64) -> Result<Bytes, Error> {
        if !(0..=100).contains(&percent) {
            return Err(Error::InvalidArgument(format!(
                "speed must be between 0 and 100, got {percent}"
            )));
        }

        let mut buf = BytesMut::with_capacity(2);
        buf.put_u8(FAN_SPEED_TAG);

        // The firmware wraps the scaled speed into a single byte, so 11% and
        // above alias to lower raw values. Reproduced as the device expects.
        buf.put_u8((percent * FAN_SPEED_SCALE % 256) as u8);

        Ok(buf.freeze())
    }

    fn color_bytes(&self, r: i64, g: i64, b: i64) -> Result<Bytes, Error> {
        let color = Rgb::try_from([r, g, b])?;

        // Color packets carry no tag byte.
        Ok(Bytes::copy_from_slice(&[color.r, color.g, color.b]))
    }

    fn mode_bytes(&self, mode: Mode) -> Result<Bytes, Error> {
        Ok(Bytes::copy_from_slice(&[u8::from(mode)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_speed_wraps_into_single_byte() {
        for percent in 0..=100 {
            let bytes = ThermaltakeLedFanBox.fan_speed_bytes(percent).unwrap();
            assert_eq!(bytes.len(), 2);
            assert_eq!(bytes[0], 0x01);
            assert_eq!(bytes[1] as i64, percent * 25 % 256);
        }

        assert_eq!(&ThermaltakeLedFanBox.fan_speed_bytes(10).unwrap()[..], &[0x01, 0xfa]);
        assert_eq!(&ThermaltakeLedFanBox.fan_speed_bytes(11).unwrap()[..], &[0x01, 0x13]);
        assert_eq!(&ThermaltakeLedFanBox.fan_speed_bytes(100).unwrap()[..], &[0x01, 0xc4]);
    }

    #[test]
    fn fan_speed_out_of_range() {
        for percent in [-1, 101, 255, i64::MIN, i64::MAX] {
            assert!(matches!(
                ThermaltakeLedFanBox.fan_speed_bytes(percent),
                Err(Error::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn color_bytes_have_no_tag() {
        let bytes = ThermaltakeLedFanBox.color_bytes(10, 20, 30).unwrap();
        assert_eq!(&bytes[..], &[10, 20, 30]);

        let bytes = ThermaltakeLedFanBox.color_bytes(0, 255, 128).unwrap();
        assert_eq!(&bytes[..], &[0, 255, 128]);
    }

    #[test]
    fn color_out_of_range() {
        assert!(matches!(
            ThermaltakeLedFanBox.color_bytes(256, 0, 0),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            ThermaltakeLedFanBox.color_bytes(0, -1, 0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn mode_ordinals() {
        let expected = [("off", 0), ("static", 1), ("breathing", 2), ("rainbow", 3)];
        for (name, ordinal) in expected {
            let mode = name.parse::<Mode>().unwrap();
            assert_eq!(&ThermaltakeLedFanBox.mode_bytes(mode).unwrap()[..], &[ordinal]);
        }
    }

    #[test]
    fn unknown_mode() {
        assert!(matches!("unknown".parse::<Mode>(), Err(Error::InvalidArgument(_))));
        assert!(matches!("Rainbow".parse::<Mode>(), Err(Error::InvalidArgument(_))));
    }
}
