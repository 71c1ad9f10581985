//! Static per-mood presentation table.

use super::label::MoodLabel;

/// Fill color for facial features when the committed mood has no profile.
pub const NEUTRAL_FEATURE_COLOR: [u8; 3] = [0xac, 0x7e, 0x48];

/// How the eyebrows are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowShape {
    /// Bar lifted high above the brow line
    Raised,
    /// Bar tilted toward the nose, pulled down in the middle
    Furrowed,
    /// Bar tilted away from the nose
    Drooped,
    /// Upper half-ellipse arc
    Arched,
    /// Level bar just above the brow line
    Flat,
}

/// How the mouth is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouthShape {
    /// Half-ellipse bowl hanging below the mouth line
    Smile,
    /// Half-ellipse dome above the mouth line
    Frown,
    /// Tall full ellipse
    Open,
    /// Flat bar
    Flat,
}

/// Draw-shape variant for each facial feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureShapes {
    pub brow: BrowShape,
    pub mouth: MouthShape,
}

impl FeatureShapes {
    /// Level brows and a flat mouth, for moods without a profile.
    pub const NEUTRAL: Self = Self {
        brow: BrowShape::Flat,
        mouth: MouthShape::Flat,
    };

    /// Shapes from the mood's profile, neutral when it has none.
    pub fn for_mood(mood: MoodLabel) -> Self {
        MoodProfile::for_mood(mood)
            .map(|p| p.shapes)
            .unwrap_or(Self::NEUTRAL)
    }
}

/// Presentation parameters of a committed mood.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoodProfile {
    pub label: MoodLabel,
    /// Feature fill and theme color
    pub color: [u8; 3],
    /// Playlist handed to the embedded player on commit
    pub playlist: &'static str,
    /// Tracking icon name; the image file is `<icon>.png`
    pub icon: &'static str,
    /// Horizontal icon offset from the face box, pixels
    pub icon_x_offset: f32,
    /// Vertical icon offset from the top of the face box, pixels
    pub icon_y_offset: f32,
    /// Extra icon width beyond the face box width, pixels
    pub icon_width_offset: f32,
    pub shapes: FeatureShapes,
}

const HAPPY: MoodProfile = MoodProfile {
    label: MoodLabel::Happy,
    color: [0x48, 0xac, 0x8e],
    playlist: "https://open.spotify.com/embed/playlist/0dE8vbdraRNCDl1NsYONup",
    icon: "halo",
    icon_x_offset: 0.0,
    icon_y_offset: -75.0,
    icon_width_offset: 0.0,
    shapes: FeatureShapes {
        brow: BrowShape::Raised,
        mouth: MouthShape::Smile,
    },
};

const SAD: MoodProfile = MoodProfile {
    label: MoodLabel::Sad,
    color: [0x48, 0x88, 0xac],
    playlist: "https://open.spotify.com/embed/playlist/17Y3RLFVntdr03GZKu0cGq",
    icon: "cloud",
    icon_x_offset: 0.0,
    icon_y_offset: 0.0,
    icon_width_offset: 0.0,
    shapes: FeatureShapes {
        brow: BrowShape::Drooped,
        mouth: MouthShape::Frown,
    },
};

const SURPRISED: MoodProfile = MoodProfile {
    label: MoodLabel::Surprised,
    color: [0x56, 0x48, 0xac],
    playlist: "https://open.spotify.com/embed/playlist/43Fufavc3oJplTbaDkcdQg",
    icon: "exclamation",
    icon_x_offset: 0.0,
    icon_y_offset: -50.0,
    icon_width_offset: 150.0,
    shapes: FeatureShapes {
        brow: BrowShape::Arched,
        mouth: MouthShape::Open,
    },
};

const ANGRY: MoodProfile = MoodProfile {
    label: MoodLabel::Angry,
    color: [0xac, 0x48, 0x48],
    playlist: "https://open.spotify.com/embed/playlist/1lQDVNlOfd8jkcvdUbU25J",
    icon: "devil",
    icon_x_offset: 0.0,
    icon_y_offset: 0.0,
    icon_width_offset: 0.0,
    shapes: FeatureShapes {
        brow: BrowShape::Furrowed,
        mouth: MouthShape::Flat,
    },
};

/// Every profiled mood.
pub static PROFILES: [MoodProfile; 4] = [HAPPY, SAD, SURPRISED, ANGRY];

impl MoodProfile {
    /// Look up the profile of a mood. Only visual destinations have one.
    pub fn for_mood(mood: MoodLabel) -> Option<&'static MoodProfile> {
        PROFILES.iter().find(|p| p.label == mood)
    }

    /// `#rrggbb` form of [`color`](Self::color).
    pub fn color_hex(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            self.color[0], self.color[1], self.color[2]
        )
    }
}

/// Feature color for a committed mood.
pub fn feature_color(mood: MoodLabel) -> [u8; 3] {
    MoodProfile::for_mood(mood)
        .map(|p| p.color)
        .unwrap_or(NEUTRAL_FEATURE_COLOR)
}
