use foundation::math::Vec2;

use crate::theme::MapTheme;

/// Everything needed to draw one region polygon and its label.
///
/// Kept deliberately flat so frames can be diffed per region; see
/// [`RegionRenderState::needs_redraw`].
#[derive(Debug, Clone, PartialEq)]
pub struct RegionRenderState {
    pub code: String,
    pub name: String,
    pub path: String,
    pub centroid: Vec2,
    pub hovered: bool,
    pub selected: bool,
    pub show_label: bool,
    /// Choropleth color, when the region has a value.
    pub fill_override: Option<String>,
}

impl RegionRenderState {
    /// Fill priority: selected > hovered > choropleth override > default.
    pub fn fill<'a>(&'a self, theme: &'a MapTheme) -> &'a str {
        if self.selected {
            &theme.fill_selected
        } else if self.hovered {
            &theme.fill_hover
        } else {
            self.fill_override.as_deref().unwrap_or(&theme.fill)
        }
    }

    /// Whether this region must be re-rendered given its previous state.
    /// Compares exactly the fields that affect output, so hovering one
    /// region never redraws its neighbors.
    pub fn needs_redraw(&self, prev: &RegionRenderState) -> bool {
        self.path != prev.path
            || self.centroid != prev.centroid
            || self.code != prev.code
            || self.hovered != prev.hovered
            || self.selected != prev.selected
            || self.show_label != prev.show_label
            || self.fill_override != prev.fill_override
    }

    /// SVG fragment for this region. Stroke width stays constant on screen
    /// under zoom via `non-scaling-stroke`.
    pub fn to_svg(&self, theme: &MapTheme) -> String {
        let mut out = format!(
            "<g><path d=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"0.5\" \
             vector-effect=\"non-scaling-stroke\" data-code=\"{}\"/>",
            self.path,
            self.fill(theme),
            theme.stroke,
            self.code,
        );
        if self.show_label {
            out.push_str(&format!(
                "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" \
                 dominant-baseline=\"central\" fill=\"{}\" font-size=\"10\" \
                 pointer-events=\"none\">{}</text>",
                self.centroid.x, self.centroid.y, theme.label, self.name,
            ));
        }
        out.push_str("</g>");
        out
    }
}
