use crate::model::{MeasurementPoint, Severity};

/// RGB color used by the marker palette; the GUI converts to its own
/// color type at draw time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub const HIGH_RED: Rgb = Rgb {
    r: 0xdc,
    g: 0x35,
    b: 0x45,
};
pub const MEDIUM_ORANGE: Rgb = Rgb {
    r: 0xfd,
    g: 0x7e,
    b: 0x14,
};
pub const LOW_GREEN: Rgb = Rgb {
    r: 0x28,
    g: 0xa7,
    b: 0x45,
};
pub const STROKE_WHITE: Rgb = Rgb {
    r: 0xff,
    g: 0xff,
    b: 0xff,
};
pub const HIGHLIGHT_YELLOW: Rgb = Rgb {
    r: 0xff,
    g: 0xff,
    b: 0x00,
};

pub fn severity_color(severity: Severity) -> Rgb {
    match severity {
        Severity::High => HIGH_RED,
        Severity::Medium => MEDIUM_ORANGE,
        Severity::Low => LOW_GREEN,
    }
}

/// Visual style of a circle marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub radius: f32,
    pub stroke: Rgb,
    pub weight: f32,
    pub fill: Rgb,
    pub fill_opacity: f32,
}

impl MarkerStyle {
    pub fn base(severity: Severity) -> Self {
        Self {
            radius: 8.0,
            stroke: STROKE_WHITE,
            weight: 2.0,
            fill: severity_color(severity),
            fill_opacity: 0.8,
        }
    }

    /// Pulse style: yellow stroke, heavier weight, slightly larger radius.
    /// Fill stays unchanged so the severity color remains readable.
    pub fn highlighted(original: &MarkerStyle) -> Self {
        Self {
            radius: original.radius + 3.0,
            stroke: HIGHLIGHT_YELLOW,
            weight: 5.0,
            ..*original
        }
    }
}

/// One rendered point with its current style. Markers have no identity
/// across renders; the lifecycle is create-all / clear-all.
#[derive(Debug, Clone)]
pub struct Marker {
    pub point: MeasurementPoint,
    pub style: MarkerStyle,
}

impl Marker {
    pub fn new(point: MeasurementPoint) -> Self {
        let style = MarkerStyle::base(point.severity);
        Self { point, style }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_style_follows_severity_palette() {
        assert_eq!(MarkerStyle::base(Severity::High).fill, HIGH_RED);
        assert_eq!(MarkerStyle::base(Severity::Low).fill, LOW_GREEN);
        assert_eq!(MarkerStyle::base(Severity::Medium).stroke, STROKE_WHITE);
    }

    #[test]
    fn highlight_style_keeps_the_fill() {
        let base = MarkerStyle::base(Severity::High);
        let pulsed = MarkerStyle::highlighted(&base);
        assert_eq!(pulsed.fill, base.fill);
        assert_eq!(pulsed.stroke, HIGHLIGHT_YELLOW);
        assert_eq!(pulsed.radius, base.radius + 3.0);
        assert_eq!(pulsed.weight, 5.0);
    }
}
