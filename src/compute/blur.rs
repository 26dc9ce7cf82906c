use crate::foundation::error::{SvgfxError, SvgfxResult};

/// Kernel radius used for a given standard deviation: three sigmas, capped at `max_radius`.
pub fn kernel_radius(sigma: f32, max_radius: u32) -> u32 {
    if !sigma.is_finite() || sigma <= 0.0 {
        return 0;
    }
    let r = (sigma * 3.0).ceil();
    if r >= max_radius as f32 {
        max_radius
    } else {
        r as u32
    }
}

/// Separable gaussian blur over premultiplied RGBA8; edges clamp.
pub fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> SvgfxResult<Vec<u8>> {
    let expected_len = crate::surface::buffer::byte_len(width, height)?;
    if src.len() != expected_len {
        return Err(SvgfxError::evaluation(
            "blur_rgba8_premul expects src matching width*height*4",
        ));
    }
    if radius == 0 || width == 0 || height == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    convolve(src, &mut tmp, width, height, &kernel, Axis::Horizontal);
    convolve(&tmp, &mut out, width, height, &kernel, Axis::Vertical);
    Ok(out)
}

/// Normalized gaussian weights in Q16; the taps sum to exactly `1 << 16`.
fn gaussian_kernel_q16(radius: u32, sigma: f32) -> SvgfxResult<Vec<u32>> {
    const ONE: i64 = 1 << 16;
    if radius == 0 {
        return Ok(vec![ONE as u32]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(SvgfxError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let two_sigma_sq = 2.0 * f64::from(sigma).powi(2);
    let raw: Vec<f64> = (-r..=r)
        .map(|i| (-f64::from(i).powi(2) / two_sigma_sq).exp())
        .collect();
    let total: f64 = raw.iter().sum();
    if total <= 0.0 {
        return Err(SvgfxError::evaluation("gaussian kernel sum is zero"));
    }

    let mut taps: Vec<i64> = raw
        .iter()
        .map(|w| ((w / total) * ONE as f64).round().clamp(0.0, ONE as f64) as i64)
        .collect();
    // Rounding drift goes to the center tap.
    let drift = ONE - taps.iter().sum::<i64>();
    let mid = taps.len() / 2;
    taps[mid] = (taps[mid] + drift).clamp(0, ONE);

    Ok(taps.into_iter().map(|t| t as u32).collect())
}

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

/// One 1D convolution pass along `axis`, clamping samples at the edges.
fn convolve(src: &[u8], dst: &mut [u8], width: u32, height: u32, kernel: &[u32], axis: Axis) {
    let (w, h) = (width as usize, height as usize);
    let radius = kernel.len() / 2;
    let limit = match axis {
        Axis::Horizontal => w - 1,
        Axis::Vertical => h - 1,
    };

    for (i, out) in dst.chunks_exact_mut(4).enumerate() {
        let (x, y) = (i % w, i / w);
        let pos = match axis {
            Axis::Horizontal => x,
            Axis::Vertical => y,
        };
        let mut acc = [0u64; 4];
        for (k, &weight) in kernel.iter().enumerate() {
            let sample = (pos + k).saturating_sub(radius).min(limit);
            let idx = match axis {
                Axis::Horizontal => y * w + sample,
                Axis::Vertical => sample * w + x,
            } * 4;
            for (a, &c) in acc.iter_mut().zip(&src[idx..idx + 4]) {
                *a += u64::from(weight) * u64::from(c);
            }
        }
        for (o, a) in out.iter_mut().zip(acc) {
            *o = q16_to_u8(a);
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + (1 << 15)) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/compute/blur.rs"]
mod tests;
