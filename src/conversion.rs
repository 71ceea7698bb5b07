//! Numeric conversion helpers.
//!
//! Timestamp-to-seconds rescaling, `%f`-style seconds rendering, rational
//! reduction, and fourcc rendering. Each helper reproduces the arithmetic of
//! the FFmpeg utility it replaces so that the emitted text is identical.

use crate::metadata::Rational;

/// Largest numerator or denominator of a reduced display aspect ratio.
pub const MAX_ASPECT_COMPONENT: i64 = 1024 * 1024;

/// Rescale a tick count to seconds (`ticks * av_q2d(time_base)`).
pub fn ticks_to_seconds(ticks: i64, time_base: Rational) -> f64 {
    ticks as f64 * time_base.to_f64()
}

/// Render seconds the way C's `%f` does: six decimals, `inf`/`nan` for
/// non-finite values.
pub fn format_seconds(seconds: f64) -> String {
    if seconds.is_nan() {
        "nan".to_string()
    } else if seconds == f64::NEG_INFINITY {
        "-inf".to_string()
    } else if seconds == f64::INFINITY {
        "inf".to_string()
    } else {
        format!("{seconds:.6}")
    }
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        let remainder = a % b;
        a = b;
        b = remainder;
    }
    a
}

/// Reduce `numerator/denominator` to a fraction whose parts do not exceed
/// `max`, following `av_reduce` (continued fractions, closest convergent).
///
/// Inputs are expected to be non-negative products of 32-bit values.
pub fn reduce(numerator: i64, denominator: i64, max: i64) -> Rational {
    let negative = (numerator < 0) ^ (denominator < 0);
    let mut num = numerator.unsigned_abs() as i64;
    let mut den = denominator.unsigned_abs() as i64;

    let divisor = gcd(num, den);
    if divisor != 0 {
        num /= divisor;
        den /= divisor;
    }

    // Convergents a0 = 0/1 and a1 = 1/0.
    let (mut a0_num, mut a0_den) = (0i64, 1i64);
    let (mut a1_num, mut a1_den) = (1i64, 0i64);

    if num <= max && den <= max {
        a1_num = num;
        a1_den = den;
        den = 0;
    }

    while den != 0 {
        let mut x = num / den;
        let next_den = num - den * x;
        let a2_num = x * a1_num + a0_num;
        let a2_den = x * a1_den + a0_den;

        if a2_num > max || a2_den > max {
            if a1_num != 0 {
                x = (max - a0_num) / a1_num;
            }
            if a1_den != 0 {
                x = x.min((max - a0_den) / a1_den);
            }
            if den * (2 * x * a1_den + a0_den) > num * a1_den {
                a1_num = x * a1_num + a0_num;
                a1_den = x * a1_den + a0_den;
            }
            break;
        }

        a0_num = a1_num;
        a0_den = a1_den;
        a1_num = a2_num;
        a1_den = a2_den;
        num = den;
        den = next_den;
    }

    let a1_num = if negative { -a1_num } else { a1_num };
    Rational::new(a1_num as i32, a1_den as i32)
}

/// Display aspect ratio of a `width`×`height` picture with the given sample
/// aspect ratio.
pub fn display_aspect_ratio(width: i32, height: i32, sample_aspect_ratio: Rational) -> Rational {
    reduce(
        i64::from(width) * i64::from(sample_aspect_ratio.numerator),
        i64::from(height) * i64::from(sample_aspect_ratio.denominator),
        MAX_ASPECT_COMPONENT,
    )
}

/// Render a fourcc tag as `av_fourcc2str` does: printable bytes verbatim,
/// anything else as `[N]`, least significant byte first.
pub fn fourcc_to_string(tag: u32) -> String {
    let mut rendered = String::with_capacity(4);
    for shift in [0, 8, 16, 24] {
        let byte = ((tag >> shift) & 0xff) as u8;
        if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b' ' | b'-' | b'_') {
            rendered.push(byte as char);
        } else {
            rendered.push_str(&format!("[{byte}]"));
        }
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_use_six_decimals() {
        assert_eq!(format_seconds(ticks_to_seconds(1000, Rational::new(1, 1000))), "1.000000");
        assert_eq!(format_seconds(ticks_to_seconds(-1024, Rational::new(1, 44100))), "-0.023220");
        assert_eq!(format_seconds(ticks_to_seconds(1, Rational::new(1, 0))), "inf");
        assert_eq!(format_seconds(ticks_to_seconds(0, Rational::new(0, 0))), "nan");
    }

    #[test]
    fn reduces_common_aspect_ratios() {
        assert_eq!(display_aspect_ratio(1920, 1080, Rational::new(1, 1)), Rational::new(16, 9));
        assert_eq!(display_aspect_ratio(720, 576, Rational::new(64, 45)), Rational::new(16, 9));
        assert_eq!(display_aspect_ratio(720, 480, Rational::new(8, 9)), Rational::new(4, 3));
        assert_eq!(display_aspect_ratio(1280, 720, Rational::new(1, 1)), Rational::new(16, 9));
    }

    #[test]
    fn reduce_bounds_large_components() {
        let reduced = reduce(3_000_000_007, 1_000_000_000, MAX_ASPECT_COMPONENT);
        assert!(i64::from(reduced.numerator) <= MAX_ASPECT_COMPONENT);
        assert!(i64::from(reduced.denominator) <= MAX_ASPECT_COMPONENT);
        assert_eq!(reduced, Rational::new(3, 1));
    }

    #[test]
    fn reduce_degenerate_inputs() {
        assert_eq!(reduce(0, 0, MAX_ASPECT_COMPONENT), Rational::new(0, 0));
        assert_eq!(reduce(5, 0, MAX_ASPECT_COMPONENT), Rational::new(1, 0));
        assert_eq!(reduce(-4, 6, MAX_ASPECT_COMPONENT), Rational::new(-2, 3));
    }

    #[test]
    fn fourcc_rendering() {
        assert_eq!(fourcc_to_string(u32::from_le_bytes(*b"avc1")), "avc1");
        assert_eq!(fourcc_to_string(u32::from_le_bytes(*b"mp4a")), "mp4a");
        assert_eq!(fourcc_to_string(0), "[0][0][0][0]");
        assert_eq!(fourcc_to_string(0x001b), "[27][0][0][0]");
    }
}
