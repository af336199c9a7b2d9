//! Destination-pixel to source-pixel mapping for each cube face.
//!
//! A face pixel is first resolved to a (theta, phi) pair on the sphere using
//! the shared [`AngleCache`], then converted to a row/column on the
//! equirectangular panorama. The tables only hold azimuths within a single
//! quadrant, so each face shifts or replaces phi depending on which side of
//! the tile midline the pixel sits. That tie-break is what keeps adjacent
//! faces continuous along their shared edges.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::angle_cache::AngleCache;
use crate::casting::{f64_to_clamped_pixel, f64_to_wrapped_pixel};
use crate::error::{ConvertError, Result};
use crate::face::Face;
use crate::panorama::{Pixel, SourcePanorama};

/// Azimuth offsets applied on each side of a face's midline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seam {
    /// Added to phi when the major coordinate is below the midline
    pub major_minus: f64,
    /// Added to phi when the major coordinate is above the midline
    pub major_plus: f64,
    /// Replaces phi on the midline when the minor coordinate is below it
    pub minor_minus: f64,
    /// Replaces phi on the midline otherwise
    pub minor_plus: f64,
}

const UP_SEAM: Seam = Seam {
    major_minus: PI,
    major_plus: 0.0,
    minor_minus: -FRAC_PI_2,
    minor_plus: FRAC_PI_2,
};

const DOWN_SEAM: Seam = Seam {
    major_minus: 0.0,
    major_plus: PI,
    minor_minus: -FRAC_PI_2,
    minor_plus: FRAC_PI_2,
};

const FRONT_SEAM: Seam = Seam {
    major_minus: 0.0,
    major_plus: 0.0,
    minor_minus: -FRAC_PI_2,
    minor_plus: FRAC_PI_2,
};

const RIGHT_SEAM: Seam = Seam {
    major_minus: 0.0,
    major_plus: PI,
    minor_minus: FRAC_PI_2,
    minor_plus: FRAC_PI_2,
};

const LEFT_SEAM: Seam = Seam {
    major_minus: PI,
    major_plus: 0.0,
    minor_minus: -FRAC_PI_2,
    minor_plus: -FRAC_PI_2,
};

/// Shift or replace `phi` depending on where (major, minor) sits relative to
/// the tile midline `half_size`.
///
/// The midline branches only trigger for odd tile sizes, where `half_size` is
/// a whole number.
#[inline]
#[must_use]
pub fn azimuth_correct(half_size: f64, phi: f64, major: usize, minor: usize, seam: &Seam) -> f64 {
    let major = major as f64;
    let minor = minor as f64;

    if major < half_size {
        phi + seam.major_minus
    } else if major > half_size {
        phi + seam.major_plus
    } else if minor < half_size {
        seam.minor_minus
    } else {
        seam.minor_plus
    }
}

/// Resolve the (theta, phi) sphere angles seen through a face pixel.
///
/// `tile_x` and `tile_y` must both be below `cache.tile_size()`.
#[must_use]
pub fn face_angles(face: Face, cache: &AngleCache, tile_x: usize, tile_y: usize) -> (f64, f64) {
    let last = cache.tile_size() - 1;
    let half = cache.half_size();

    match face {
        Face::Up => {
            let theta = cache.zp.at(tile_y, tile_x);
            let phi = cache.phi.at(tile_x, tile_y);
            (theta, azimuth_correct(half, phi, tile_y, tile_x, &UP_SEAM))
        }
        Face::Down => {
            let theta = cache.zm.at(tile_y, tile_x);
            let phi = cache.phi.at(tile_x, last - tile_y);
            (theta, azimuth_correct(half, phi, tile_y, tile_x, &DOWN_SEAM))
        }
        Face::Front => {
            let theta = cache.xypm.at(last - tile_y, last - tile_x);
            let phi = cache.phi.at(tile_x, last);
            (theta, azimuth_correct(half, phi, tile_y, tile_x, &FRONT_SEAM))
        }
        Face::Right => {
            let theta = cache.xypm.at(last - tile_y, last - tile_x);
            let phi = cache.phi.at(last, last - tile_x);
            (theta, azimuth_correct(half, phi, tile_x, tile_y, &RIGHT_SEAM))
        }
        Face::Back => {
            // Flat half-turn, no midline tie-break
            let theta = cache.xypm.at(last - tile_y, last - tile_x);
            let phi = cache.phi.at(tile_x, last) + PI;
            (theta, phi)
        }
        Face::Left => {
            let theta = cache.xypm.at(last - tile_y, last - tile_x);
            let phi = cache.phi.at(last, last - tile_x);
            (theta, azimuth_correct(half, phi, tile_x, tile_y, &LEFT_SEAM))
        }
    }
}

/// Panorama column for azimuth `phi`, wrapped into `0..width`
#[inline]
#[must_use]
pub fn phi_to_column(width: usize, phi: f64) -> usize {
    let w = width as f64;
    let mut x = 0.5 * w * (phi / PI + 1.0);

    if x < 1.0 {
        x += w;
    } else if x > w {
        x -= w;
    }

    // x == w is the same meridian as column 0
    f64_to_wrapped_pixel(x, width)
}

/// Panorama row for zenith `theta`, with the nadir (theta = π) on the last row
#[inline]
#[must_use]
pub fn theta_to_row(height: usize, theta: f64) -> usize {
    f64_to_clamped_pixel(height as f64 * theta / PI, height)
}

/// Sample the panorama pixel seen through (tile_x, tile_y) on `face`.
///
/// # Errors
/// Returns [`ConvertError::SampleOutOfBounds`] if the mapped coordinate is
/// outside the panorama.
pub fn sample(
    face: Face,
    cache: &AngleCache,
    panorama: &SourcePanorama,
    tile_x: usize,
    tile_y: usize,
) -> Result<Pixel> {
    let (theta, phi) = face_angles(face, cache, tile_x, tile_y);
    let (width, height) = (panorama.width(), panorama.height());
    let row = theta_to_row(height, theta);
    let col = phi_to_column(width, phi);

    panorama
        .pixel(row, col)
        .ok_or_else(|| ConvertError::SampleOutOfBounds {
            face,
            row,
            col,
            width,
            height,
        })
}
