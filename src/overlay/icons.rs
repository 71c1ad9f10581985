//! Tracking icons drawn above the face.

use image::RgbaImage;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::detection::BoundingBox;
use crate::mood::{MoodProfile, PROFILES};

#[derive(Debug, Error)]
pub enum IconError {
    #[error("Icon directory '{}' not found", .0.display())]
    DirectoryMissing(PathBuf),

    #[error("Failed to load icon '{}': {source}", .path.display())]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Where an icon lands on the canvas, in frame pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IconPlacement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl IconPlacement {
    /// Place an icon of `icon_size` over a face box using the profile's offsets.
    ///
    /// The icon is widened by the width offset (staying centered on the
    /// box plus the x offset) and keeps its aspect ratio. Its bottom edge
    /// sits on the top of the box, shifted by the y offset.
    pub fn compute(face: BoundingBox, profile: &MoodProfile, icon_size: (u32, u32)) -> Self {
        let (icon_w, icon_h) = icon_size;
        let width = face.width + profile.icon_width_offset;
        let height = if icon_w == 0 {
            0.0
        } else {
            width / icon_w as f32 * icon_h as f32
        };
        Self {
            x: face.x + profile.icon_x_offset - profile.icon_width_offset / 2.0,
            y: face.y - height + profile.icon_y_offset,
            width,
            height,
        }
    }
}

/// Decoded icon images keyed by icon name (file stem).
#[derive(Debug, Clone, Default)]
pub struct IconSet {
    icons: HashMap<String, RgbaImage>,
}

impl IconSet {
    /// Load `<icon>.png` for every profile from `dir`.
    ///
    /// A missing file only disables that icon; an undecodable one is an error.
    pub fn load(dir: &Path) -> Result<Self, IconError> {
        if !dir.is_dir() {
            return Err(IconError::DirectoryMissing(dir.to_path_buf()));
        }

        let mut set = Self::default();
        for profile in &PROFILES {
            let path = dir.join(format!("{}.png", profile.icon));
            if !path.exists() {
                log::warn!("Icon '{}' missing, {} will have no icon", path.display(), profile.label);
                continue;
            }
            let image = image::open(&path)
                .map_err(|e| IconError::LoadFailed {
                    path: path.clone(),
                    source: e,
                })?
                .to_rgba8();
            log::debug!("Loaded icon {} ({}x{})", path.display(), image.width(), image.height());
            set.insert(profile.icon, image);
        }
        Ok(set)
    }

    pub fn insert(&mut self, name: &str, image: RgbaImage) {
        self.icons.insert(name.to_string(), image);
    }

    pub fn get(&self, name: &str) -> Option<&RgbaImage> {
        self.icons.get(name)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::MoodLabel;
    use image::Rgba;

    fn face() -> BoundingBox {
        BoundingBox {
            x: 100.0,
            y: 200.0,
            width: 150.0,
            height: 180.0,
        }
    }

    #[test]
    fn test_happy_placement() {
        let happy = MoodProfile::for_mood(MoodLabel::Happy).unwrap();
        let placed = IconPlacement::compute(face(), happy, (300, 100));
        assert_eq!(placed.width, 150.0 + happy.icon_width_offset);
        assert_eq!(placed.height, placed.width / 3.0);
        assert_eq!(
            placed.x,
            100.0 + happy.icon_x_offset - happy.icon_width_offset / 2.0
        );
        assert_eq!(placed.y, 200.0 - placed.height + happy.icon_y_offset);
    }

    #[test]
    fn test_surprised_placement_is_widened() {
        let surprised = MoodProfile::for_mood(MoodLabel::Surprised).unwrap();
        let placed = IconPlacement::compute(face(), surprised, (100, 100));
        assert_eq!(placed.width, 300.0);
        assert_eq!(placed.height, 300.0);
        assert_eq!(placed.x, 100.0 + surprised.icon_x_offset - 75.0);
        assert_eq!(placed.y, 200.0 - 300.0 - 50.0);
    }

    #[test]
    fn test_zero_width_icon_has_no_height() {
        let sad = MoodProfile::for_mood(MoodLabel::Sad).unwrap();
        assert_eq!(IconPlacement::compute(face(), sad, (0, 10)).height, 0.0);
    }

    #[test]
    fn test_load_missing_directory() {
        let err = IconSet::load(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, IconError::DirectoryMissing(_)));
    }

    #[test]
    fn test_load_skips_missing_icons() {
        let dir = tempfile::tempdir().unwrap();
        RgbaImage::from_pixel(4, 2, Rgba([1, 2, 3, 255]))
            .save(dir.path().join("halo.png"))
            .unwrap();

        let set = IconSet::load(dir.path()).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("halo").unwrap().dimensions(), (4, 2));
        assert!(set.get("devil").is_none());
    }

    #[test]
    fn test_load_rejects_corrupt_icon() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cloud.png"), b"not a png").unwrap();
        let err = IconSet::load(dir.path()).unwrap_err();
        assert!(matches!(err, IconError::LoadFailed { .. }));
    }
}
