use crate::layer::color::Argb;

/// Alpha at or above which a color is left untouched.
pub const VISIBILITY_ALPHA: u8 = 220;

/// Multiplier applied to alpha values below [`VISIBILITY_ALPHA`].
pub const ALPHA_BOOST: f32 = 1.5;

/// Boost a semi-transparent color so it stays legible once flattened into video.
///
/// Alpha `>= 220` is returned unchanged. Lower alpha is multiplied by 1.5 and clamped to 220.
/// RGB channels are preserved.
pub fn normalize_alpha(color: Argb) -> Argb {
    let a = color.alpha();
    if a >= VISIBILITY_ALPHA {
        return color;
    }
    let boosted = (f32::from(a) * ALPHA_BOOST).min(f32::from(VISIBILITY_ALPHA)) as u8;
    color.with_alpha(boosted)
}
