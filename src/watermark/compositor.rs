//! Compositing primitives for blending watermark sprites onto surfaces.
//!
//! Two paint paths share one Porter-Duff "over" blend:
//!
//! - [`overlay`] pastes an axis-aligned sprite, clipped to the target.
//! - [`overlay_rotated`] resamples the sprite through an inverse-mapped
//!   rotation about an arbitrary pivot (bilinear interpolation), so a
//!   text run can spin about its own center while its anchor stays put.
//!
//! Opacity is expected to be baked into sprite alpha before either call;
//! the compositor applies no additional opacity of its own.

use image::{Rgba, RgbaImage};

/// Blend two RGBA pixels with the Porter-Duff "over" operator.
pub fn blend(bottom: Rgba<u8>, top: Rgba<u8>) -> Rgba<u8> {
    let top_alpha = top[3] as f32 / 255.0;
    let bottom_alpha = bottom[3] as f32 / 255.0;

    let out_alpha = top_alpha + bottom_alpha * (1.0 - top_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |t: u8, b: u8| -> u8 {
        let t = t as f32 / 255.0;
        let b = b as f32 / 255.0;
        let result = (t * top_alpha + b * bottom_alpha * (1.0 - top_alpha)) / out_alpha;
        (result * 255.0).clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(top[0], bottom[0]),
        blend_channel(top[1], bottom[1]),
        blend_channel(top[2], bottom[2]),
        (out_alpha * 255.0) as u8,
    ])
}

/// Paste a sprite onto the target at an integer offset, clipped to the
/// target bounds. Negative offsets clip the sprite's leading edge.
pub fn overlay(target: &mut RgbaImage, sprite: &RgbaImage, x: i64, y: i64) {
    let target_w = target.width() as i64;
    let target_h = target.height() as i64;
    let sprite_w = sprite.width() as i64;
    let sprite_h = sprite.height() as i64;

    let x_start = x.max(0);
    let y_start = y.max(0);
    let x_end = (x + sprite_w).min(target_w);
    let y_end = (y + sprite_h).min(target_h);

    for ty in y_start..y_end {
        for tx in x_start..x_end {
            let sx = (tx - x) as u32;
            let sy = (ty - y) as u32;

            let top = sprite.get_pixel(sx, sy);
            if top[3] == 0 {
                continue;
            }

            let bottom = target.get_pixel(tx as u32, ty as u32);
            let blended = blend(*bottom, *top);
            target.put_pixel(tx as u32, ty as u32, blended);
        }
    }
}

/// Paint a sprite rotated clockwise by `degrees` about `(pivot_x,
/// pivot_y)` in target coordinates, with the sprite's unrotated top-left
/// at `(origin_x, origin_y)`.
///
/// Each target pixel inside the rotated sprite's bounding box is
/// inverse-mapped into sprite space and bilinearly sampled, so the
/// result is deterministic for a given (sprite, transform) pair.
pub fn overlay_rotated(
    target: &mut RgbaImage,
    sprite: &RgbaImage,
    origin_x: f32,
    origin_y: f32,
    pivot_x: f32,
    pivot_y: f32,
    degrees: f32,
) {
    let radians = degrees.to_radians();
    let (sin, cos) = radians.sin_cos();

    let src_w = sprite.width() as f32;
    let src_h = sprite.height() as f32;

    // Forward-map the sprite corners to bound the affected target region.
    let corners = [
        (origin_x, origin_y),
        (origin_x + src_w, origin_y),
        (origin_x, origin_y + src_h),
        (origin_x + src_w, origin_y + src_h),
    ];

    let mut min_x = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for (cx, cy) in corners {
        let rx = cx - pivot_x;
        let ry = cy - pivot_y;
        let dx = rx * cos - ry * sin + pivot_x;
        let dy = rx * sin + ry * cos + pivot_y;
        min_x = min_x.min(dx);
        max_x = max_x.max(dx);
        min_y = min_y.min(dy);
        max_y = max_y.max(dy);
    }

    let x_start = min_x.floor().max(0.0) as u32;
    let y_start = min_y.floor().max(0.0) as u32;
    let x_end = (max_x.ceil().max(0.0) as u32 + 1).min(target.width());
    let y_end = (max_y.ceil().max(0.0) as u32 + 1).min(target.height());

    // Inverse rotation for sampling.
    let (inv_sin, inv_cos) = (-radians).sin_cos();

    for ty in y_start..y_end {
        for tx in x_start..x_end {
            let rx = tx as f32 - pivot_x;
            let ry = ty as f32 - pivot_y;

            let sx = rx * inv_cos - ry * inv_sin + pivot_x - origin_x;
            let sy = rx * inv_sin + ry * inv_cos + pivot_y - origin_y;

            if sx >= 0.0 && sx < src_w - 1.0 && sy >= 0.0 && sy < src_h - 1.0 {
                let x0 = sx.floor() as u32;
                let y0 = sy.floor() as u32;
                let fx = sx - x0 as f32;
                let fy = sy - y0 as f32;

                let p00 = sprite.get_pixel(x0, y0);
                let p10 = sprite.get_pixel(x0 + 1, y0);
                let p01 = sprite.get_pixel(x0, y0 + 1);
                let p11 = sprite.get_pixel(x0 + 1, y0 + 1);

                let interpolate = |c: usize| -> u8 {
                    let v = p00[c] as f32 * (1.0 - fx) * (1.0 - fy)
                        + p10[c] as f32 * fx * (1.0 - fy)
                        + p01[c] as f32 * (1.0 - fx) * fy
                        + p11[c] as f32 * fx * fy;
                    v.clamp(0.0, 255.0) as u8
                };

                let top = Rgba([
                    interpolate(0),
                    interpolate(1),
                    interpolate(2),
                    interpolate(3),
                ]);
                if top[3] == 0 {
                    continue;
                }

                let bottom = target.get_pixel(tx, ty);
                let blended = blend(*bottom, top);
                target.put_pixel(tx, ty, blended);
            }
        }
    }
}
