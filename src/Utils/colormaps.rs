use plotters::style::RGBColor;

/// Piecewise linear gradient through evenly spaced control colours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMap {
    Viridis,
    Plasma,
    Coolwarm,
}

const VIRIDIS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];
const PLASMA: [(u8, u8, u8); 5] = [
    (13, 8, 135),
    (126, 3, 168),
    (204, 71, 120),
    (248, 149, 64),
    (240, 249, 33),
];
const COOLWARM: [(u8, u8, u8); 5] = [
    (59, 76, 192),
    (141, 176, 254),
    (221, 221, 221),
    (244, 154, 123),
    (180, 4, 38),
];

impl ColorMap {
    fn stops(&self) -> &'static [(u8, u8, u8)] {
        match self {
            ColorMap::Viridis => &VIRIDIS,
            ColorMap::Plasma => &PLASMA,
            ColorMap::Coolwarm => &COOLWARM,
        }
    }

    /// colour of t in [0, 1], clamped; NaN maps to the low end
    pub fn color(&self, t: f64) -> RGBColor {
        let stops = self.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let pos = t * (stops.len() - 1) as f64;
        let k = (pos.floor() as usize).min(stops.len() - 2);
        let s = pos - k as f64;
        let (a, b) = (stops[k], stops[k + 1]);
        let lerp = |x: u8, y: u8| (x as f64 + s * (y as f64 - x as f64)).round() as u8;
        RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
    }

    /// control points as (position, r, g, b) in [0, 1], the layout of a gnuplot defined palette
    pub fn palette(&self) -> Vec<(f32, f32, f32, f32)> {
        let stops = self.stops();
        let last = (stops.len() - 1) as f32;
        stops
            .iter()
            .enumerate()
            .map(|(k, &(r, g, b))| {
                (k as f32 / last, r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
            })
            .collect()
    }

    /// `bands` flat colours: every band repeats its colour at both of its edges
    pub fn banded_palette(&self, bands: usize) -> Vec<(f32, f32, f32, f32)> {
        let bands = bands.max(1);
        let mut points = Vec::with_capacity(2 * bands);
        for k in 0..bands {
            let t = k as f64 / (bands - 1).max(1) as f64;
            let RGBColor(r, g, b) = self.color(t);
            let (r, g, b) = (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
            points.push((k as f32 / bands as f32, r, g, b));
            points.push(((k + 1) as f32 / bands as f32, r, g, b));
        }
        points
    }

    /// colour of `value` after mapping [min, max] onto [0, 1]
    pub fn color_normalized(&self, value: f64, min: f64, max: f64) -> RGBColor {
        if max > min {
            self.color((value - min) / (max - min))
        } else {
            self.color(0.5)
        }
    }
}
