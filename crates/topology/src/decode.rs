use serde_json::Value;

use crate::geometry::{DatasetLevel, FeatureSet, GeoPoint, RegionFeature, RegionGeometry, Ring};

/// Errors from decoding a compact topology document.
#[derive(Debug, Clone, PartialEq)]
pub enum TopologyError {
    Parse(String),
    NotATopology,
    MissingObject { key: &'static str },
    InvalidArc { index: usize, reason: String },
    InvalidGeometry { index: usize, reason: String },
}

impl std::fmt::Display for TopologyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopologyError::Parse(msg) => write!(f, "JSON parse error: {msg}"),
            TopologyError::NotATopology => write!(f, "expected a Topology document"),
            TopologyError::MissingObject { key } => {
                write!(f, "topology has no object named {key:?}")
            }
            TopologyError::InvalidArc { index, reason } => {
                write!(f, "invalid arc at index {index}: {reason}")
            }
            TopologyError::InvalidGeometry { index, reason } => {
                write!(f, "invalid geometry at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for TopologyError {}

/// Decodes one topology document into the feature set for `level`.
///
/// The document must contain a single named geometry collection under
/// `level.object_key()`. Arcs are delta-encoded when a quantization
/// transform is present; a negative arc index `~i` references arc `i`
/// reversed. Decoding happens once per dataset; the result is immutable.
pub fn decode_topology(level: DatasetLevel, payload: &str) -> Result<FeatureSet, TopologyError> {
    let value: Value =
        serde_json::from_str(payload).map_err(|e| TopologyError::Parse(e.to_string()))?;
    decode_topology_value(level, &value)
}

pub fn decode_topology_value(
    level: DatasetLevel,
    value: &Value,
) -> Result<FeatureSet, TopologyError> {
    let obj = value.as_object().ok_or(TopologyError::NotATopology)?;
    if obj.get("type").and_then(|v| v.as_str()) != Some("Topology") {
        return Err(TopologyError::NotATopology);
    }

    let transform = parse_transform(obj.get("transform"))?;
    let arcs = parse_arcs(obj.get("arcs"), transform)?;

    let key = level.object_key();
    let named = obj
        .get("objects")
        .and_then(|v| v.as_object())
        .and_then(|objects| objects.get(key))
        .ok_or(TopologyError::MissingObject { key })?;

    let geometries = match named.get("type").and_then(|v| v.as_str()) {
        Some("GeometryCollection") => named
            .get("geometries")
            .and_then(|v| v.as_array())
            .ok_or(TopologyError::MissingObject { key })?,
        _ => return Err(TopologyError::MissingObject { key }),
    };

    let mut features = Vec::with_capacity(geometries.len());
    for (index, geom) in geometries.iter().enumerate() {
        features.push(decode_feature(index, geom, &arcs)?);
    }

    Ok(FeatureSet::new(level, features))
}

#[derive(Debug, Copy, Clone)]
struct Transform {
    scale: [f64; 2],
    translate: [f64; 2],
}

fn parse_transform(value: Option<&Value>) -> Result<Option<Transform>, TopologyError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let obj = value
        .as_object()
        .ok_or_else(|| TopologyError::Parse("transform must be an object".to_string()))?;
    let pair = |key: &str| -> Result<[f64; 2], TopologyError> {
        let arr = obj
            .get(key)
            .and_then(|v| v.as_array())
            .ok_or_else(|| TopologyError::Parse(format!("transform missing {key}")))?;
        let x = arr.first().and_then(|v| v.as_f64());
        let y = arr.get(1).and_then(|v| v.as_f64());
        match (x, y) {
            (Some(x), Some(y)) => Ok([x, y]),
            _ => Err(TopologyError::Parse(format!("transform {key} malformed"))),
        }
    };
    Ok(Some(Transform {
        scale: pair("scale")?,
        translate: pair("translate")?,
    }))
}

/// Decodes the shared arc table into absolute lon/lat positions.
fn parse_arcs(
    value: Option<&Value>,
    transform: Option<Transform>,
) -> Result<Vec<Vec<GeoPoint>>, TopologyError> {
    let raw = value.and_then(|v| v.as_array()).ok_or(TopologyError::Parse(
        "topology missing arcs array".to_string(),
    ))?;

    let mut arcs = Vec::with_capacity(raw.len());
    for (index, arc_val) in raw.iter().enumerate() {
        let positions = arc_val
            .as_array()
            .ok_or_else(|| TopologyError::InvalidArc {
                index,
                reason: "arc must be an array of positions".to_string(),
            })?;

        let mut points: Vec<GeoPoint> = Vec::with_capacity(positions.len());
        let mut cx = 0.0;
        let mut cy = 0.0;
        for pos in positions {
            let pair = pos.as_array().ok_or_else(|| TopologyError::InvalidArc {
                index,
                reason: "position must be a [x, y] pair".to_string(),
            })?;
            let x = pair.first().and_then(|v| v.as_f64());
            let y = pair.get(1).and_then(|v| v.as_f64());
            let (Some(x), Some(y)) = (x, y) else {
                return Err(TopologyError::InvalidArc {
                    index,
                    reason: "position coordinates must be numbers".to_string(),
                });
            };
            let point = match transform {
                Some(t) => {
                    // Quantized arcs are delta-encoded from the arc start.
                    cx += x;
                    cy += y;
                    GeoPoint::new(
                        cx * t.scale[0] + t.translate[0],
                        cy * t.scale[1] + t.translate[1],
                    )
                }
                None => GeoPoint::new(x, y),
            };
            points.push(point);
        }
        arcs.push(points);
    }
    Ok(arcs)
}

fn decode_feature(
    index: usize,
    value: &Value,
    arcs: &[Vec<GeoPoint>],
) -> Result<RegionFeature, TopologyError> {
    let obj = value
        .as_object()
        .ok_or_else(|| TopologyError::InvalidGeometry {
            index,
            reason: "geometry must be an object".to_string(),
        })?;

    let properties = obj
        .get("properties")
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default();

    let geometry = match obj.get("type").and_then(|v| v.as_str()) {
        Some("Polygon") => {
            let rings = obj.get("arcs").and_then(|v| v.as_array()).ok_or_else(|| {
                TopologyError::InvalidGeometry {
                    index,
                    reason: "Polygon missing arcs".to_string(),
                }
            })?;
            Some(RegionGeometry::Polygon(decode_rings(index, rings, arcs)?))
        }
        Some("MultiPolygon") => {
            let polys = obj.get("arcs").and_then(|v| v.as_array()).ok_or_else(|| {
                TopologyError::InvalidGeometry {
                    index,
                    reason: "MultiPolygon missing arcs".to_string(),
                }
            })?;
            let mut out = Vec::with_capacity(polys.len());
            for poly in polys {
                let rings =
                    poly.as_array()
                        .ok_or_else(|| TopologyError::InvalidGeometry {
                            index,
                            reason: "MultiPolygon member must be a ring list".to_string(),
                        })?;
                out.push(decode_rings(index, rings, arcs)?);
            }
            Some(RegionGeometry::MultiPolygon(out))
        }
        // Null or unsupported geometry: keep the feature, render nothing.
        _ => None,
    };

    Ok(RegionFeature {
        properties,
        geometry,
    })
}

fn decode_rings(
    index: usize,
    rings: &[Value],
    arcs: &[Vec<GeoPoint>],
) -> Result<Vec<Ring>, TopologyError> {
    let mut out = Vec::with_capacity(rings.len());
    for ring_val in rings {
        let arc_refs = ring_val
            .as_array()
            .ok_or_else(|| TopologyError::InvalidGeometry {
                index,
                reason: "ring must be an array of arc indices".to_string(),
            })?;

        let mut ring: Ring = Vec::new();
        for arc_ref in arc_refs {
            let raw = arc_ref
                .as_i64()
                .ok_or_else(|| TopologyError::InvalidGeometry {
                    index,
                    reason: "arc index must be an integer".to_string(),
                })?;
            // Ones' complement marks a reversed traversal.
            let (arc_index, reversed) = if raw < 0 {
                ((-1 - raw) as usize, true)
            } else {
                (raw as usize, false)
            };
            let arc = arcs
                .get(arc_index)
                .ok_or_else(|| TopologyError::InvalidGeometry {
                    index,
                    reason: format!("arc index {arc_index} out of range"),
                })?;

            let mut points: Vec<GeoPoint> = arc.clone();
            if reversed {
                points.reverse();
            }
            // Consecutive arcs share their junction point; drop the
            // duplicate when stitching.
            let skip = usize::from(!ring.is_empty());
            ring.extend(points.into_iter().skip(skip));
        }
        out.push(ring);
    }
    Ok(out)
}
