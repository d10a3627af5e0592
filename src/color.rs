//! Color names and conversions.

use std::str::FromStr;

use crate::error::Error;
use crate::Rgb;

/// Named colors accepted by `--rgb`.
pub const COLORS: [(&str, Rgb); 10] = [
    ("red", Rgb { r: 255, g: 0, b: 0 }),
    ("green", Rgb { r: 0, g: 255, b: 0 }),
    ("blue", Rgb { r: 0, g: 0, b: 255 }),
    ("yellow", Rgb { r: 255, g: 255, b: 0 }),
    ("magenta", Rgb { r: 255, g: 0, b: 255 }),
    ("cyan", Rgb { r: 0, g: 255, b: 255 }),
    ("white", Rgb { r: 255, g: 255, b: 255 }),
    ("orange", Rgb { r: 255, g: 165, b: 0 }),
    ("purple", Rgb { r: 128, g: 0, b: 128 }),
    ("pink", Rgb { r: 255, g: 192, b: 203 }),
];

/// Look up a color by name, ignoring case.
pub fn named_color(name: &str) -> Option<Rgb> {
    COLORS.iter().find(|(color, _)| color.eq_ignore_ascii_case(name)).map(|(_, rgb)| *rgb)
}

/// Resolve `--rgb` tokens to unchecked RGB components.
///
/// A single token is a color name, three tokens are the R, G and B components.
/// Component ranges are checked when the color is encoded.
pub fn resolve_color<S: AsRef<str>>(tokens: &[S]) -> Result<[i64; 3], Error> {
    match tokens {
        [name] => {
            let name = name.as_ref();
            named_color(name).map(Into::into).ok_or_else(|| Error::UnknownColor(name.into()))
        },
        [r, g, b] => Ok([component(r.as_ref())?, component(g.as_ref())?, component(b.as_ref())?]),
        _ => Err(Error::InvalidArgument(
            "RGB requires a color name or three values (R G B)".into(),
        )),
    }
}

fn component(token: &str) -> Result<i64, Error> {
    i64::from_str(token)
        .map_err(|_| Error::InvalidArgument(format!("invalid RGB component '{token}'")))
}

/// Convert HSV in the range `0.0..=1.0` to RGB.
///
/// Channels are scaled to `0..=255` by truncation. Not used by the CLI; kept
/// as a conversion helper for callers building their own colors.
#[allow(dead_code)]
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let (h, s, v) = (h.clamp(0., 1.), s.clamp(0., 1.), v.clamp(0., 1.));

    let (r, g, b) = if s == 0. {
        (v, v, v)
    } else {
        let sector = (h * 6.).floor();
        let f = h * 6. - sector;
        let p = v * (1. - s);
        let q = v * (1. - s * f);
        let t = v * (1. - s * (1. - f));

        match sector as u8 % 6 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        }
    };

    Rgb { r: (r * 255.) as u8, g: (g * 255.) as u8, b: (b * 255.) as u8 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_ignore_case() {
        assert_eq!(resolve_color(&["red"]).unwrap(), [255, 0, 0]);
        assert_eq!(resolve_color(&["RED"]).unwrap(), [255, 0, 0]);
        assert_eq!(resolve_color(&["Pink"]).unwrap(), [255, 192, 203]);
    }

    #[test]
    fn components_skip_lookup() {
        assert_eq!(resolve_color(&["10", "20", "30"]).unwrap(), [10, 20, 30]);

        // Range is checked on encode, not here.
        assert_eq!(resolve_color(&["300", "-1", "0"]).unwrap(), [300, -1, 0]);
    }

    #[test]
    fn unknown_name() {
        assert!(matches!(
            resolve_color(&["notacolor"]),
            Err(Error::UnknownColor(name)) if name == "notacolor"
        ));
    }

    #[test]
    fn wrong_token_count() {
        assert!(matches!(resolve_color(&["1", "2"]), Err(Error::InvalidArgument(_))));
        assert!(matches!(resolve_color(&["1", "2", "3", "4"]), Err(Error::InvalidArgument(_))));
        assert!(matches!(resolve_color::<&str>(&[]), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn non_numeric_component() {
        assert!(matches!(resolve_color(&["1", "red", "3"]), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn hsv_primaries() {
        assert_eq!(hsv_to_rgb(0., 1., 1.), Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(hsv_to_rgb(1. / 3., 1., 1.), Rgb { r: 0, g: 255, b: 0 });
        assert_eq!(hsv_to_rgb(2. / 3., 1., 1.), Rgb { r: 0, g: 0, b: 255 });
        assert_eq!(hsv_to_rgb(1., 1., 1.), Rgb { r: 255, g: 0, b: 0 });
    }

    #[test]
    fn hsv_grey_and_truncation() {
        assert_eq!(hsv_to_rgb(0.7, 0., 0.5), Rgb { r: 127, g: 127, b: 127 });
        assert_eq!(hsv_to_rgb(0.25, 0., 0.), Rgb::default());
    }
}
