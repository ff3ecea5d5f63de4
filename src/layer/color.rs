use serde::{Deserialize, Serialize};

/// 8-bit-per-channel color packed as `0xAARRGGBB` with straight (non-premultiplied) alpha.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Argb(pub u32);

impl Argb {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self(0x0000_0000);
    /// Opaque black.
    pub const BLACK: Self = Self(0xFF00_0000);
    /// Opaque white.
    pub const WHITE: Self = Self(0xFFFF_FFFF);
    /// Opaque red.
    pub const RED: Self = Self(0xFFFF_0000);

    /// Pack four channels into a color.
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    /// Alpha channel.
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Red channel.
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green channel.
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue channel.
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Same RGB channels with a replaced alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::from_argb(a, self.red(), self.green(), self.blue())
    }

    /// Straight-alpha `[r, g, b, a]` bytes.
    pub const fn to_rgba8(self) -> [u8; 4] {
        [self.red(), self.green(), self.blue(), self.alpha()]
    }

    /// Build from straight-alpha `[r, g, b, a]` bytes.
    pub const fn from_rgba8(rgba: [u8; 4]) -> Self {
        Self::from_argb(rgba[3], rgba[0], rgba[1], rgba[2])
    }
}

impl std::fmt::Debug for Argb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Argb(#{:08X})", self.0)
    }
}

impl Serialize for Argb {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("#{:08X}", self.0))
    }
}

impl<'de> Deserialize<'de> for Argb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Int(i64),
            Hex(String),
        }

        match Repr::deserialize(deserializer)? {
            // Signed 32-bit values are accepted so that colors exported as platform ints
            // (e.g. `0xFF101214` stored as a negative number) round-trip.
            Repr::Int(v) if (i64::from(i32::MIN)..=i64::from(u32::MAX)).contains(&v) => {
                Ok(Self(v as u32))
            }
            Repr::Int(v) => Err(serde::de::Error::custom(format!(
                "color integer {v} does not fit in 32 bits"
            ))),
            Repr::Hex(s) => parse_hex(&s).map_err(serde::de::Error::custom),
        }
    }
}

fn parse_hex(s: &str) -> Result<Argb, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    if !s.is_ascii() {
        return Err("hex color must be ASCII".to_owned());
    }

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    match s.len() {
        6 => Ok(Argb::from_argb(
            255,
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        )),
        8 => Ok(Argb::from_argb(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        )),
        _ => Err("hex color must be #RRGGBB or #AARRGGBB (case-insensitive)".to_owned()),
    }
}
