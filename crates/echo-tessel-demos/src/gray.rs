// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! RGB to grayscale conversion over horizontal bands.

use echo_tessel::split_horizontal;
use image::{GrayImage, RgbImage};
use tracing::instrument;

use crate::grid::SharedU8Buffer;
use crate::DemoError;

/// ITU-R BT.601 luma of an 8-bit RGB triple.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    // Weights sum to 1.0, so the rounded result stays within 0..=255.
    (0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)).round() as u8
}

/// Converts `img` to grayscale with `parallel` column bands.
#[instrument(level = "debug", skip(img), fields(width = img.width(), height = img.height()))]
pub fn to_gray_parallel(img: &RgbImage, parallel: usize) -> Result<GrayImage, DemoError> {
    let (width, height) = (img.width(), img.height());
    let (w, h) = (width as usize, height as usize);
    let src = img.as_raw();
    let out = SharedU8Buffer::zeros(w * h);

    split_horizontal(w, h, parallel, |r| {
        for (x, y) in r.cells() {
            let idx = y * w + x;
            let px = &src[idx * 3..idx * 3 + 3];
            out.set(idx, luma(px[0], px[1], px[2]));
        }
    })?;

    GrayImage::from_raw(width, height, out.into_vec())
        .ok_or(DemoError::ImageBuffer { width, height })
}

/// Sequential reference for [`to_gray_parallel`].
pub fn to_gray(img: &RgbImage) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b] = img.get_pixel(x, y).0;
        image::Luma([luma(r, g, b)])
    })
}
