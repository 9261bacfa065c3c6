use std::fmt;

/// 8-bit per channel RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const RED: Rgb = Rgb::new(0xff, 0x00, 0x00);
    pub const YELLOW: Rgb = Rgb::new(0xff, 0xff, 0x00);
    pub const GREEN: Rgb = Rgb::new(0x00, 0xff, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packs the color as `0xRRGGBB`.
    pub fn to_u32(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GradientStop {
    pub pos: f64,
    pub color: Rgb,
}

/// Red when empty, yellow at half capacity, green when full.
pub const OCCUPANCY_GRADIENT: [GradientStop; 3] = [
    GradientStop {
        pos: 0.0,
        color: Rgb::RED,
    },
    GradientStop {
        pos: 0.5,
        color: Rgb::YELLOW,
    },
    GradientStop {
        pos: 1.0,
        color: Rgb::GREEN,
    },
];

/// Maps an occupancy ratio onto [`OCCUPANCY_GRADIENT`].
pub fn occupancy_color(ratio: f64) -> Rgb {
    gradient_at(&OCCUPANCY_GRADIENT, ratio)
}

/// Linear RGB interpolation between sorted stops.
/// NaN is treated as 0 and positions outside the stop range take the nearest end color.
pub fn gradient_at(stops: &[GradientStop], position: f64) -> Rgb {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Rgb::RED;
    };

    let position = if position.is_nan() { 0.0 } else { position };
    if position <= first.pos {
        return first.color;
    }
    if position >= last.pos {
        return last.color;
    }

    for pair in stops.windows(2) {
        let (lower, upper) = (pair[0], pair[1]);
        if position > upper.pos {
            continue;
        }
        let span = upper.pos - lower.pos;
        if span <= f64::EPSILON {
            return upper.color;
        }
        let t = (position - lower.pos) / span;
        return Rgb::new(
            lerp_channel(lower.color.r, upper.color.r, t),
            lerp_channel(lower.color.g, upper.color.g, t),
            lerp_channel(lower.color.b, upper.color.b, t),
        );
    }

    last.color
}

fn lerp_channel(from: u8, to: u8, t: f64) -> u8 {
    let value = f64::from(from) + (f64::from(to) - f64::from(from)) * t;
    value.round().clamp(0.0, 255.0) as u8
}
