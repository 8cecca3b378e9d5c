/// An RGBA color with 8 bits per channel.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, 255 is opaque.
    pub a: u8,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Mid grey.
    pub const GREY: Self = Self::rgb(128, 128, 128);
    /// Light grey.
    pub const LIGHT_GREY: Self = Self::rgb(211, 211, 211);
    /// Dark grey.
    pub const DARK_GREY: Self = Self::rgb(64, 64, 64);
    /// Opaque blue.
    pub const BLUE: Self = Self::rgb(38, 139, 210);
    /// Opaque green.
    pub const GREEN: Self = Self::rgb(133, 153, 0);

    /// Construct an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Construct a color with an explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Is this color fully transparent?
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from(v: (u8, u8, u8)) -> Self {
        Self::rgb(v.0, v.1, v.2)
    }
}
