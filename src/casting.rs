//! Numeric conversions between angle space and pixel space.
//!
//! # Assumptions
//!
//! ## Image Dimensions (`usize` ↔ `f64`)
//! Panorama and tile dimensions are converted to `f64` without checks. `f64`
//! represents every integer up to 2^53 exactly, far beyond any panorama.
//!
//! ## Pixel Coordinates (`f64` → `usize`)
//! Mapped coordinates are floored. Rows saturate at the last row, columns wrap
//! around the panorama's horizontal seam.
//!
//! ## Raster Dimensions (`usize` → `u32`)
//! The `image` crate addresses pixels with `u32`, so tile sizes are checked.

/// Convert a `usize` to `u32`, failing on 64-bit overflow.
///
/// # Errors
/// Returns an error string if the value exceeds `u32::MAX`.
#[inline]
pub fn usize_to_u32(value: usize) -> Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("Value {value} exceeds u32 maximum"))
}

/// Floor a coordinate into `0..max_value`, saturating at both ends.
///
/// NaN and negative values map to 0, values at or past `max_value` map to the
/// last index.
#[inline]
#[must_use]
pub fn f64_to_clamped_pixel(value: f64, max_value: usize) -> usize {
    if value.is_nan() || value < 0.0 {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = value as usize;
    if index >= max_value {
        max_value.saturating_sub(1)
    } else {
        index
    }
}

/// Floor a coordinate and wrap it into `0..period`.
///
/// Used for longitudes, where column `period` is the same meridian as column 0.
#[inline]
#[must_use]
pub fn f64_to_wrapped_pixel(value: f64, period: usize) -> usize {
    if value.is_nan() || period == 0 {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let index = (value.floor() as i64).rem_euclid(period as i64);
    #[allow(clippy::cast_sign_loss)]
    {
        index as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usize_to_u32() {
        assert_eq!(usize_to_u32(0), Ok(0));
        assert_eq!(usize_to_u32(4096), Ok(4096));
        #[cfg(target_pointer_width = "64")]
        assert!(usize_to_u32(usize::MAX).is_err());
    }

    #[test]
    fn test_f64_to_clamped_pixel() {
        assert_eq!(f64_to_clamped_pixel(0.0, 64), 0);
        assert_eq!(f64_to_clamped_pixel(31.9, 64), 31);
        assert_eq!(f64_to_clamped_pixel(64.0, 64), 63);
        assert_eq!(f64_to_clamped_pixel(-0.5, 64), 0);
        assert_eq!(f64_to_clamped_pixel(f64::NAN, 64), 0);
    }

    #[test]
    fn test_f64_to_wrapped_pixel() {
        assert_eq!(f64_to_wrapped_pixel(0.0, 128), 0);
        assert_eq!(f64_to_wrapped_pixel(127.99, 128), 127);
        assert_eq!(f64_to_wrapped_pixel(128.0, 128), 0);
        assert_eq!(f64_to_wrapped_pixel(130.5, 128), 2);
        assert_eq!(f64_to_wrapped_pixel(-0.5, 128), 127);
        assert_eq!(f64_to_wrapped_pixel(f64::NAN, 128), 0);
    }
}
