#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` (the leading `#` is optional).
    pub fn parse_hex(s: &str) -> Option<Rgb> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    pub fn from_u32(v: u32) -> Rgb {
        Rgb::new(((v >> 16) & 0xff) as u8, ((v >> 8) & 0xff) as u8, (v & 0xff) as u8)
    }

    pub fn blend_over(self, bg: Rgb, alpha: u8) -> Rgb {
        let a = alpha as u16;
        let ia = 255u16.saturating_sub(a);
        let blend = |fg: u8, bg: u8| -> u8 { (((fg as u16) * a + (bg as u16) * ia) / 255) as u8 };
        Rgb::new(
            blend(self.r, bg.r),
            blend(self.g, bg.g),
            blend(self.b, bg.b),
        )
    }
}

pub const DEFAULT_FG: Rgb = Rgb {
    r: 0xcd,
    g: 0xd6,
    b: 0xf4,
};
pub const DEFAULT_BG: Rgb = Rgb {
    r: 0x1e,
    g: 0x1e,
    b: 0x2e,
};
pub const DEFAULT_LINK: Rgb = Rgb {
    r: 0x89,
    g: 0xb4,
    b: 0xfa,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(Rgb::parse_hex("#89b4fa"), Some(DEFAULT_LINK));
        assert_eq!(Rgb::parse_hex("FFFFFF"), Some(Rgb::new(255, 255, 255)));
        assert_eq!(Rgb::parse_hex("#fff"), None);
        assert_eq!(Rgb::parse_hex("#gg0000"), None);
        assert_eq!(Rgb::parse_hex("#ééé"), None);
    }

    #[test]
    fn blend_extremes() {
        let fg = Rgb::new(200, 100, 50);
        assert_eq!(fg.blend_over(DEFAULT_BG, 255), fg);
        assert_eq!(fg.blend_over(DEFAULT_BG, 0), DEFAULT_BG);
        assert_eq!(Rgb::from_u32(fg.to_u32()), fg);
    }
}
