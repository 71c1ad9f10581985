//! Mood overlay: cartoon facial features and a tracking icon drawn over
//! the detected face.

mod geometry;
mod icons;

pub use geometry::{brow, eye, mouth, LocalFrame, Shape, Side};
pub use icons::{IconError, IconPlacement, IconSet};

use image::RgbaImage;

use crate::canvas::Canvas;
use crate::detection::DetectionSnapshot;
use crate::mood::{feature_color, FeatureShapes, MoodLabel, MoodProfile};

/// Draws the overlay for the committed mood.
#[derive(Debug, Clone, Default)]
pub struct OverlayRenderer {
    icons: IconSet,
}

impl OverlayRenderer {
    pub fn new(icons: IconSet) -> Self {
        Self { icons }
    }

    pub fn icons(&self) -> &IconSet {
        &self.icons
    }

    /// Eyes, brows and mouth for `mood`, in paint order.
    ///
    /// Brow and mouth variants come from the mood's profile.
    pub fn feature_shapes(snapshot: &DetectionSnapshot, mood: MoodLabel) -> Vec<Shape> {
        let shapes = FeatureShapes::for_mood(mood);
        let landmarks = &snapshot.landmarks;
        vec![
            eye(landmarks, Side::Left),
            brow(landmarks, Side::Left, shapes.brow),
            eye(landmarks, Side::Right),
            brow(landmarks, Side::Right, shapes.brow),
            mouth(landmarks, shapes.mouth),
        ]
    }

    /// The icon to draw for `mood` and where, if the mood has a loaded icon.
    pub fn icon_placement(
        &self,
        snapshot: &DetectionSnapshot,
        mood: MoodLabel,
    ) -> Option<(&RgbaImage, IconPlacement)> {
        let profile = MoodProfile::for_mood(mood)?;
        let icon = self.icons.get(profile.icon)?;
        let placement = IconPlacement::compute(snapshot.bounding_box, profile, icon.dimensions());
        Some((icon, placement))
    }

    /// Paint the overlay for one face onto `canvas`.
    pub fn render(&self, canvas: &mut Canvas, snapshot: &DetectionSnapshot, mood: MoodLabel) {
        let color = feature_color(mood);
        for shape in Self::feature_shapes(snapshot, mood) {
            match shape {
                Shape::Circle { center, radius } => canvas.fill_circle(center, radius, color),
                Shape::Polygon(outline) => canvas.fill_polygon(&outline, color),
            }
        }

        if let Some((icon, at)) = self.icon_placement(snapshot, mood) {
            log::trace!(
                "Icon for {} at ({:.0}, {:.0}) {:.0}x{:.0}",
                mood,
                at.x,
                at.y,
                at.width,
                at.height
            );
            canvas.composite_icon(icon, at.x, at.y, at.width, at.height);
        }
    }
}
