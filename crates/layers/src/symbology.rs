use foundation::Rgb;

/// Fixed colors of the globe viewer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlobePalette {
    pub background: Rgb,
    pub globe: Rgb,
    pub ambient_light: Rgb,
    pub polygon: Rgb,
    pub emission_light: Rgb,
    pub highlight_min: Rgb,
    pub highlight_max: Rgb,
    pub inactive_polygon: Rgb,
    pub atmosphere_level: f32,
}

impl GlobePalette {
    pub const fn new() -> Self {
        Self {
            background: Rgb::new(0x21, 0x21, 0x21),
            globe: Rgb::new(0x13, 0x3d, 0x6d),
            ambient_light: Rgb::new(0x0a, 0x0a, 0x0a),
            polygon: Rgb::new(0x9b, 0xb5, 0x79),
            emission_light: Rgb::new(0xde, 0xff, 0xd9),
            highlight_min: Rgb::new(0xed, 0xff, 0xc9),
            highlight_max: Rgb::new(0xff, 0xab, 0x50),
            inactive_polygon: Rgb::new(0x62, 0x6e, 0x64),
            atmosphere_level: 0.2,
        }
    }

    pub fn gradient(&self) -> Gradient {
        Gradient::new(self.highlight_min, self.highlight_max, self.inactive_polygon)
    }
}

impl Default for GlobePalette {
    fn default() -> Self {
        Self::new()
    }
}

/// Two-stop linear gradient plus the color of unmatched shapes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Gradient {
    pub min: Rgb,
    pub max: Rgb,
    pub inactive: Rgb,
}

impl Gradient {
    pub const fn new(min: Rgb, max: Rgb, inactive: Rgb) -> Self {
        Self { min, max, inactive }
    }

    /// Color at `position`; positions outside `[0, 1]` saturate.
    pub fn sample(&self, position: f64) -> Rgb {
        self.min.lerp(self.max, position)
    }
}

impl Default for Gradient {
    fn default() -> Self {
        GlobePalette::new().gradient()
    }
}

#[cfg(test)]
mod tests {
    use super::{GlobePalette, Gradient};
    use foundation::Rgb;

    #[test]
    fn palette_matches_hex_constants() {
        let p = GlobePalette::default();
        assert_eq!(p.polygon, Rgb::from_hex("#9BB579").unwrap());
        assert_eq!(p.highlight_min.to_hex(), "#edffc9");
        assert_eq!(p.highlight_max.to_hex(), "#ffab50");
        assert_eq!(p.inactive_polygon.to_hex(), "#626e64");
    }

    #[test]
    fn gradient_endpoints_and_saturation() {
        let g = Gradient::default();
        assert_eq!(g.sample(0.0), g.min);
        assert_eq!(g.sample(1.0), g.max);
        assert_eq!(g.sample(1.05), g.max);
        assert_ne!(g.sample(0.5), g.inactive);
    }
}
