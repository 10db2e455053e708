use topology::geometry::DatasetLevel;

/// Zoom factor from which small-region labels start appearing.
pub const ZOOM_LABEL_THRESHOLD: f64 = 2.0;

/// Minimum spherical area (steradians) for a label at base zoom.
/// Constituencies have no cutoff; their map labels everything by default.
pub fn label_area_threshold(level: DatasetLevel) -> Option<f64> {
    match level {
        DatasetLevel::Province => Some(1e-5),
        DatasetLevel::City => Some(5e-7),
        DatasetLevel::SubDistrict => Some(5e-7),
        DatasetLevel::Neighborhood => Some(1e-7),
        DatasetLevel::Constituency => None,
    }
}

/// Label visibility at base zoom.
pub fn show_label(show_labels: bool, area_sr: f64, threshold: Option<f64>) -> bool {
    show_labels && threshold.is_none_or(|t| area_sr > t)
}

/// Zooming in divides the effective area cutoff by the square of the zoom
/// factor, so labels appear for regions that grew large enough on screen.
/// Below [`ZOOM_LABEL_THRESHOLD`] the base visibility stands unchanged.
pub fn zoom_adjusted_show_label(
    base: bool,
    show_labels: bool,
    zoom: f64,
    area_sr: f64,
    threshold: Option<f64>,
) -> bool {
    if base {
        return true;
    }
    let Some(t) = threshold else {
        return base;
    };
    show_labels && zoom >= ZOOM_LABEL_THRESHOLD && area_sr > t / (zoom * zoom)
}
