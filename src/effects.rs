// src/effects.rs
//! Post-processing support: convolution kernel construction.
//!
//! The blur/bloom pass drives the library's `convolution` shader with a
//! discrete Gaussian kernel. Kernel size is derived from sigma and capped at
//! [`MAX_KERNEL_SIZE`], matching the `KERNEL_SIZE_INT` define the shader is
//! compiled with.

/// Hard cap on kernel taps; keeps the kernel within the shader's fixed-size
/// uniform array.
pub const MAX_KERNEL_SIZE: usize = 25;

// The 1/(sigma*sqrt(2*pi)) term is dropped since the kernel is normalized
// afterwards anyway.
fn gauss(x: f32, sigma: f32) -> f32 {
    (-(x * x) / (2.0 * sigma * sigma)).exp()
}

/// Build a normalized Gaussian kernel for the given sigma.
///
/// Size is `min(25, 2*ceil(3*sigma) + 1)` — always odd. The result sums to
/// 1.0 within floating-point tolerance. A sigma of zero or below degenerates
/// to the single-tap identity kernel.
pub fn build_gaussian_kernel(sigma: f32) -> Vec<f32> {
    // Guard the division in the exponent; sigma <= 0 would produce NaNs.
    if sigma <= 0.0 {
        log::warn!("gaussian kernel requested with sigma {sigma}; using identity kernel");
        return vec![1.0];
    }

    let size = (2 * (sigma * 3.0).ceil() as usize + 1).min(MAX_KERNEL_SIZE);
    let half_width = (size - 1) as f32 * 0.5;

    let mut values = Vec::with_capacity(size);
    let mut sum = 0.0;
    for i in 0..size {
        let value = gauss(i as f32 - half_width, sigma);
        sum += value;
        values.push(value);
    }

    for value in &mut values {
        *value /= sum;
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_is_odd_capped_and_normalized() {
        for sigma in [0.5, 1.0, 2.0, 4.0, 10.0] {
            let kernel = build_gaussian_kernel(sigma);
            assert!(kernel.len() % 2 == 1, "even kernel for sigma {sigma}");
            assert!(kernel.len() <= MAX_KERNEL_SIZE);
            let sum: f32 = kernel.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "sum {sum} for sigma {sigma}");
        }
    }

    #[test]
    fn kernel_for_sigma_one() {
        let kernel = build_gaussian_kernel(1.0);
        assert_eq!(kernel.len(), 7);
        // Symmetric around the center tap.
        for i in 0..kernel.len() / 2 {
            let mirror = kernel.len() - 1 - i;
            assert!((kernel[i] - kernel[mirror]).abs() < 1e-6);
        }
        // Center tap dominates.
        let center = kernel[kernel.len() / 2];
        assert!(kernel.iter().all(|&v| v <= center));
    }

    #[test]
    fn large_sigma_hits_the_cap() {
        assert_eq!(build_gaussian_kernel(100.0).len(), MAX_KERNEL_SIZE);
    }

    #[test]
    fn degenerate_sigma_is_identity() {
        assert_eq!(build_gaussian_kernel(0.0), vec![1.0]);
        assert_eq!(build_gaussian_kernel(-3.0), vec![1.0]);
    }
}
