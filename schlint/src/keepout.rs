//! Circular keepout zones for `kicad_pcb` files.
//!
//! Pcbnew can only draw polygon zones, so a round keepout is approximated by
//! points on a circle.

use std::f64::consts::PI;

/// Point count used when none is given.
pub const DEFAULT_POINT_COUNT: usize = 32;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KeepoutError {
    #[error("Invalid radius: {0}")]
    InvalidRadius(f64),
    #[error("Invalid center: ({0}, {1})")]
    InvalidCenter(f64, f64),
}

/// `count` points on a circle around the origin, at angles spread evenly over
/// `[0, 2π]` with both ends included, so the first and last points coincide.
pub fn circle_points(radius: f64, count: usize) -> Vec<(f64, f64)> {
    match count {
        0 => Vec::new(),
        1 => vec![(radius, 0.0)],
        _ => {
            let step = 2.0 * PI / (count - 1) as f64;
            (0..count)
                .map(|i| {
                    let angle = step * i as f64;
                    (radius * angle.cos(), radius * angle.sin())
                })
                .collect()
        }
    }
}

pub fn offset(points: &[(f64, f64)], dx: f64, dy: f64) -> Vec<(f64, f64)> {
    points.iter().map(|(x, y)| (dx + x, dy + y)).collect()
}

/// `(xy X Y) (xy X Y) ...`
pub fn points_to_sexp(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("(xy {} {})", x, y))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keepout that forbids tracks, vias and copper pours inside a circle.
#[derive(Debug, Clone, PartialEq)]
pub struct KeepoutZone {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub point_count: usize,
    pub layer: String,
}

impl KeepoutZone {
    pub fn new(x: f64, y: f64, radius: f64) -> Result<Self, KeepoutError> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(KeepoutError::InvalidRadius(radius));
        }
        if !x.is_finite() || !y.is_finite() {
            return Err(KeepoutError::InvalidCenter(x, y));
        }

        Ok(Self {
            x,
            y,
            radius,
            point_count: DEFAULT_POINT_COUNT,
            layer: "F.Cu".to_string(),
        })
    }

    pub fn with_points(mut self, point_count: usize) -> Self {
        self.point_count = point_count;
        self
    }

    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = layer.into();
        self
    }

    pub fn points(&self) -> Vec<(f64, f64)> {
        offset(
            &circle_points(self.radius, self.point_count),
            self.x,
            self.y,
        )
    }

    /// Just the polygon points, ready to paste into an existing zone.
    pub fn points_sexp(&self) -> String {
        points_to_sexp(&self.points())
    }

    /// Complete `(zone ...)` block.
    pub fn to_sexp(&self) -> String {
        format!(
            r#"(zone (net 0) (net_name "") (layer {layer}) (tstamp 0) (hatch edge 0.508)
  (connect_pads (clearance 0.508))
  (min_thickness 0.254)
  (keepout (tracks not_allowed) (vias not_allowed) (copperpour not_allowed))
  (fill yes (arc_segments 16) (thermal_gap 0.508) (thermal_bridge_width 0.508))
  (polygon
    (pts
     {points}
    )
  )
)"#,
            layer = self.layer,
            points = self.points_sexp()
        )
    }
}
