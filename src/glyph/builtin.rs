//! Bundled stroke faces.
//!
//! Each glyph is a centerline path on a 4 x 8 grid: ascenders start at row 0, the x-height sits
//! on row 2, the baseline on row 6 and descenders reach row 8. Paths are stroked with round caps
//! at draw time, so the same table serves every weight.

use kurbo::{Affine, BezPath, Cap, Join, Stroke, StrokeOpts};

use crate::foundation::error::{CaptchaError, CaptchaResult};

/// Grid columns covered by a glyph, plus half a column of side bearing on each side.
pub(crate) const ADVANCE_UNITS: f64 = 5.0;
/// Grid rows from the ascender line to the descender line.
pub(crate) const HEIGHT_UNITS: f64 = 8.0;
/// Font size to grid unit ratio.
pub(crate) const UNITS_PER_EM: f64 = 10.0;

const BASELINE_ROW: f64 = 6.0;
const FLATTEN_TOLERANCE: f64 = 0.05;

/// Weight and posture of a bundled stroke face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinStyle {
    /// Thin strokes.
    Light,
    /// Medium strokes.
    Regular,
    /// Heavy strokes.
    Bold,
    /// Medium strokes sheared to the right.
    Slanted,
}

impl BuiltinStyle {
    /// Every bundled face, in library order.
    pub const ALL: [Self; 4] = [Self::Light, Self::Regular, Self::Bold, Self::Slanted];

    /// Stable face name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Light => "builtin-light",
            Self::Regular => "builtin-regular",
            Self::Bold => "builtin-bold",
            Self::Slanted => "builtin-slanted",
        }
    }

    fn stroke_units(self) -> f64 {
        match self {
            Self::Light => 0.5,
            Self::Regular | Self::Slanted => 0.7,
            Self::Bold => 0.95,
        }
    }

    fn shear(self) -> f64 {
        match self {
            Self::Slanted => -0.22,
            _ => 0.0,
        }
    }
}

fn centerline(ch: char) -> &'static str {
    match ch.to_ascii_lowercase() {
        'a' => "M4,2 L4,6 M4,4 C4,2.9 3.1,2 2,2 C0.9,2 0,2.9 0,4 C0,5.1 0.9,6 2,6 C3.1,6 4,5.1 4,4",
        'b' => "M0,0 L0,6 M0,4 C0,2.9 0.9,2 2,2 C3.1,2 4,2.9 4,4 C4,5.1 3.1,6 2,6 C0.9,6 0,5.1 0,4",
        'c' => "M4,2.6 C3.6,2.2 2.9,2 2,2 C0.9,2 0,2.9 0,4 C0,5.1 0.9,6 2,6 C2.9,6 3.6,5.8 4,5.4",
        'd' => "M4,0 L4,6 M4,4 C4,2.9 3.1,2 2,2 C0.9,2 0,2.9 0,4 C0,5.1 0.9,6 2,6 C3.1,6 4,5.1 4,4",
        'e' => "M0,4 L4,4 C4,2.9 3.1,2 2,2 C0.9,2 0,2.9 0,4 C0,5.1 0.9,6 2,6 C2.9,6 3.6,5.8 4,5.4",
        'f' => "M3.5,0.2 C2.2,-0.2 1.5,0.5 1.5,1.5 L1.5,6 M0,2 L3,2",
        'g' => {
            "M4,2 L4,7 C4,7.7 3.3,8 2,8 C1.1,8 0.4,7.8 0,7.4 \
             M4,4 C4,2.9 3.1,2 2,2 C0.9,2 0,2.9 0,4 C0,5.1 0.9,6 2,6 C3.1,6 4,5.1 4,4"
        }
        'h' => "M0,0 L0,6 M0,3.8 C0,2.8 0.9,2 2,2 C3.1,2 4,2.8 4,3.8 L4,6",
        'i' => "M2,2 L2,6 M2,0.4 L2,0.6",
        'j' => "M2.5,2 L2.5,7 C2.5,7.7 2,8 1.2,8 C0.8,8 0.4,7.9 0,7.6 M2.5,0.4 L2.5,0.6",
        'k' => "M0,0 L0,6 M4,2 L0,4.6 M1.4,3.8 L4,6",
        'l' => "M1.5,0 L1.5,5 C1.5,5.7 2,6 2.8,6",
        'm' => {
            "M0,2 L0,6 M0,3.4 C0,2.6 0.5,2 1,2 C1.5,2 2,2.6 2,3.4 L2,6 \
             M2,3.4 C2,2.6 2.5,2 3,2 C3.5,2 4,2.6 4,3.4 L4,6"
        }
        'n' => "M0,2 L0,6 M0,3.8 C0,2.8 0.9,2 2,2 C3.1,2 4,2.8 4,3.8 L4,6",
        'o' => "M2,2 C0.9,2 0,2.9 0,4 C0,5.1 0.9,6 2,6 C3.1,6 4,5.1 4,4 C4,2.9 3.1,2 2,2 Z",
        'p' => "M0,2 L0,8 M0,4 C0,2.9 0.9,2 2,2 C3.1,2 4,2.9 4,4 C4,5.1 3.1,6 2,6 C0.9,6 0,5.1 0,4",
        'q' => "M4,2 L4,8 M4,4 C4,2.9 3.1,2 2,2 C0.9,2 0,2.9 0,4 C0,5.1 0.9,6 2,6 C3.1,6 4,5.1 4,4",
        'r' => "M0.5,2 L0.5,6 M0.5,3.8 C0.5,2.8 1.4,2 2.5,2 C3.1,2 3.6,2.2 4,2.5",
        's' => {
            "M4,2.5 C3.5,2.1 2.8,2 2,2 C0.9,2 0.2,2.5 0.2,3.1 C0.2,4.6 3.8,3.5 3.8,4.9 \
             C3.8,5.6 3,6 2,6 C1.1,6 0.4,5.8 0,5.4"
        }
        't' => "M1.5,0.5 L1.5,5 C1.5,5.7 2,6 3,6 C3.4,6 3.7,5.9 4,5.8 M0,2 L3.5,2",
        'u' => "M0,2 L0,4.2 C0,5.2 0.9,6 2,6 C3.1,6 4,5.2 4,4.2 M4,2 L4,6",
        'v' => "M0,2 L2,6 L4,2",
        'w' => "M0,2 L1,6 L2,3 L3,6 L4,2",
        'x' => "M0,2 L4,6 M4,2 L0,6",
        'y' => "M0,2 L2,6 M4,2 L1.5,7.2 C1.2,7.8 0.7,8 0,8",
        'z' => "M0,2 L4,2 L0,6 L4,6",
        '0' => "M2,0 C0.9,0 0,1.3 0,3 C0,4.7 0.9,6 2,6 C3.1,6 4,4.7 4,3 C4,1.3 3.1,0 2,0 Z M3.4,1 L0.6,5",
        '1' => "M0.8,1.2 L2.4,0 L2.4,6 M0.8,6 L4,6",
        '2' => "M0.2,1.2 C0.6,0.4 1.3,0 2.1,0 C3.2,0 3.9,0.7 3.9,1.6 C3.9,3 0,4.4 0,6 L4,6",
        '3' => "M0.2,0 L3.8,0 L1.8,2.4 C3.1,2.4 4,3.1 4,4.2 C4,5.3 3.1,6 2,6 C1.1,6 0.4,5.7 0,5.2",
        '4' => "M3,6 L3,0 L0,4.2 L4,4.2",
        '5' => {
            "M3.8,0 L0.6,0 L0.3,2.7 C0.8,2.4 1.4,2.3 2,2.3 C3.2,2.3 4,3.1 4,4.1 \
             C4,5.2 3.1,6 2,6 C1.1,6 0.4,5.7 0,5.2"
        }
        '6' => {
            "M3.6,0.3 C3.2,0.1 2.7,0 2.2,0 C0.9,0 0,1.5 0,3.6 C0,5 0.8,6 2,6 \
             C3.1,6 4,5.2 4,4.1 C4,3 3.1,2.3 2,2.3 C1,2.3 0.2,2.9 0,3.8"
        }
        '7' => "M0,0 L4,0 L1.4,6",
        '8' => {
            "M2,2.8 C1,2.8 0.3,2.2 0.3,1.4 C0.3,0.6 1,0 2,0 C3,0 3.7,0.6 3.7,1.4 \
             C3.7,2.2 3,2.8 2,2.8 C0.9,2.8 0,3.5 0,4.4 C0,5.3 0.9,6 2,6 \
             C3.1,6 4,5.3 4,4.4 C4,3.5 3.1,2.8 2,2.8 Z"
        }
        '9' => {
            "M0.4,5.7 C0.8,5.9 1.3,6 1.8,6 C3.1,6 4,4.5 4,2.4 C4,1 3.2,0 2,0 \
             C0.9,0 0,0.8 0,1.9 C0,3 0.9,3.7 2,3.7 C3,3.7 3.8,3.1 4,2.2"
        }
        '-' => "M0.5,4 L3.5,4",
        '+' => "M0.5,4 L3.5,4 M2,2.5 L2,5.5",
        '=' => "M0.5,3.2 L3.5,3.2 M0.5,4.8 L3.5,4.8",
        '!' => "M2,0 L2,4.2 M2,5.8 L2,6",
        '?' => "M0.3,1.2 C0.6,0.4 1.3,0 2.1,0 C3.2,0 3.9,0.7 3.9,1.6 C3.9,2.8 2,3 2,4.3 M2,5.8 L2,6",
        '#' => "M1.3,1 L0.8,6 M3.2,1 L2.7,6 M0,2.6 L4,2.6 M0,4.4 L4,4.4",
        '*' => "M2,1 L2,5 M0.3,2 L3.7,4 M3.7,2 L0.3,4",
        ' ' => "",
        _ => "M0,0 L4,0 L4,6 L0,6 Z",
    }
}

/// Filled outline of `ch` for a face drawn at `unit` pixels per grid step.
///
/// The result sits in a box `ADVANCE_UNITS * unit` wide and `HEIGHT_UNITS * unit` tall with its
/// origin at the top-left corner.
pub(crate) fn outline(ch: char, style: BuiltinStyle, unit: f64) -> CaptchaResult<BezPath> {
    let src = centerline(ch);
    if src.is_empty() {
        return Ok(BezPath::new());
    }
    let mut path = BezPath::from_svg(src)
        .map_err(|e| CaptchaError::font_load(format!("builtin glyph {ch:?}: {e}")))?;

    let shear = style.shear();
    let to_box = Affine::scale(unit)
        * Affine::translate((0.5, 0.0))
        * Affine::translate((0.0, BASELINE_ROW))
        * Affine::skew(shear, 0.0)
        * Affine::translate((0.0, -BASELINE_ROW));
    path.apply_affine(to_box);

    let stroke = Stroke::new(style.stroke_units() * unit)
        .with_caps(Cap::Round)
        .with_join(Join::Round);
    Ok(kurbo::stroke(
        path.iter(),
        &stroke,
        &StrokeOpts::default(),
        FLATTEN_TOLERANCE * unit.max(1.0),
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/glyph/builtin.rs"]
mod tests;
