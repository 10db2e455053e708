use foundation::math::{Vec2, lerp};

pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 8.0;
/// Per-button-press zoom factor.
pub const ZOOM_STEP: f64 = 1.5;
/// Duration of smooth zoom transitions, seconds.
pub const SMOOTH_ZOOM_DURATION_S: f64 = 0.4;

/// Uniform scale plus translate applied to the whole map group.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportTransform {
    pub scale: f64,
    pub translate: Vec2,
}

impl ViewportTransform {
    pub const IDENTITY: ViewportTransform = ViewportTransform {
        scale: 1.0,
        translate: Vec2::ZERO,
    };

    /// The SVG group `transform` attribute value.
    pub fn svg_attr(&self) -> String {
        format!(
            "translate({},{}) scale({})",
            self.translate.x, self.translate.y, self.scale
        )
    }

    fn lerp_to(self, other: ViewportTransform, t: f64) -> ViewportTransform {
        ViewportTransform {
            scale: lerp(self.scale, other.scale, t),
            translate: Vec2::new(
                lerp(self.translate.x, other.translate.x, t),
                lerp(self.translate.y, other.translate.y, t),
            ),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct ZoomAnimation {
    from: ViewportTransform,
    to: ViewportTransform,
    elapsed_s: f64,
}

/// Zoom and pan over a fixed-size viewport.
///
/// Button zooms and resets animate over [`SMOOTH_ZOOM_DURATION_S`]; a new
/// target interrupts a running animation and retargets from the current
/// transform, so rapid clicks stay continuous. Drag panning applies
/// immediately and only while zoomed in.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportController {
    width: f64,
    height: f64,
    current: ViewportTransform,
    animation: Option<ZoomAnimation>,
}

impl ViewportController {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            current: ViewportTransform::IDENTITY,
            animation: None,
        }
    }

    pub fn transform(&self) -> ViewportTransform {
        self.current
    }

    pub fn scale(&self) -> f64 {
        self.current.scale
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn zoom_in(&mut self) {
        self.animate_to(self.scaled_about_center(ZOOM_STEP));
    }

    pub fn zoom_out(&mut self) {
        self.animate_to(self.scaled_about_center(1.0 / ZOOM_STEP));
    }

    /// Snaps back to identity, dropping any running animation.
    pub fn reset(&mut self) {
        self.animation = None;
        self.current = ViewportTransform::IDENTITY;
    }

    pub fn smooth_reset(&mut self) {
        self.animate_to(ViewportTransform::IDENTITY);
    }

    /// Drag pan. Ignored at base zoom, where the map always fills the
    /// viewport exactly.
    pub fn pan(&mut self, delta: Vec2) {
        if self.current.scale <= MIN_ZOOM {
            return;
        }
        self.animation = None;
        self.current.translate = self.current.translate + delta;
    }

    /// Advances the running animation by `dt_s` seconds.
    pub fn advance(&mut self, dt_s: f64) {
        let Some(mut anim) = self.animation.take() else {
            return;
        };
        anim.elapsed_s += dt_s.max(0.0);
        if anim.elapsed_s >= SMOOTH_ZOOM_DURATION_S {
            self.current = anim.to;
        } else {
            let t = anim.elapsed_s / SMOOTH_ZOOM_DURATION_S;
            self.current = anim.from.lerp_to(anim.to, t);
            self.animation = Some(anim);
        }
    }

    fn animate_to(&mut self, to: ViewportTransform) {
        self.animation = Some(ZoomAnimation {
            from: self.current,
            to,
            elapsed_s: 0.0,
        });
    }

    /// The transform after scaling by `factor` about the viewport center,
    /// clamped to the zoom range. The world point under the center stays put.
    fn scaled_about_center(&self, factor: f64) -> ViewportTransform {
        let target = self.animation.map_or(self.current, |a| a.to);
        let scale = (target.scale * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let center = Vec2::new(self.width / 2.0, self.height / 2.0);
        let anchor = (center - target.translate) * (1.0 / target.scale);
        ViewportTransform {
            scale,
            translate: center - anchor * scale,
        }
    }
}
