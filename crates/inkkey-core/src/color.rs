//! RGB to CMYK conversion with gray component replacement

use crate::types::Cmyk;

/// Convert an 8-bit RGB sample to CMYK coverage percentages.
///
/// Black is generated from the gray component shared by all three
/// subtractive primaries, scaled by `black_generation` (0.0 leaves all
/// gray in CMY, 1.0 replaces as much of it with black as possible). The
/// remaining C, M and Y are renormalized against the chosen black.
///
/// This is a device-independent approximation, not an ICC transform.
pub fn rgb_to_cmyk(r: u8, g: u8, b: u8, black_generation: f32) -> Cmyk {
    let c = 1.0 - f64::from(r) / 255.0;
    let m = 1.0 - f64::from(g) / 255.0;
    let y = 1.0 - f64::from(b) / 255.0;
    let k = c.min(m).min(y) * f64::from(black_generation);

    // Only reachable for pure black with full GCR; avoids dividing by zero
    if k >= 1.0 {
        return Cmyk::new(0, 0, 0, 100);
    }

    let scale = 1.0 - k;
    Cmyk {
        c: to_percent((c - k) / scale),
        m: to_percent((m - k) / scale),
        y: to_percent((y - k) / scale),
        k: to_percent(k),
    }
}

#[inline]
fn to_percent(fraction: f64) -> u8 {
    (fraction * 100.0).round().clamp(0.0, 100.0) as u8
}
