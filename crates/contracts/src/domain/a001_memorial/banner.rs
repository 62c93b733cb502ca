//! Banner selection: either an image stored under the static root or a
//! solid CSS colour.
//!
//! Image values are persisted as a path relative to [`STATIC_URL`] and
//! rendered with the prefix, so the stored and displayed strings differ.

use serde::{Deserialize, Serialize};

/// Public prefix of the static files root
pub const STATIC_URL: &str = "/static/";

/// Banner colour of a new memorial
pub const DEFAULT_BANNER_COLOR: &str = "#f7e8c9";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerKind {
    Image,
    Color,
}

impl BannerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BannerKind::Image => "image",
            BannerKind::Color => "color",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "image" => Ok(BannerKind::Image),
            "color" => Ok(BannerKind::Color),
            _ => Err("Invalid banner type".into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerSelection {
    pub kind: BannerKind,
    /// Relative storage path for images, CSS colour literal for colours
    pub value: String,
}

impl BannerSelection {
    pub fn image(path: &str) -> Self {
        Self {
            kind: BannerKind::Image,
            value: to_relative_path(path),
        }
    }

    pub fn color(color: &str) -> Self {
        Self {
            kind: BannerKind::Color,
            value: color.trim().to_string(),
        }
    }

    /// Parses the `banner_type` / `banner_value` pair of the edit form
    pub fn from_parts(kind: &str, value: &str) -> Result<Self, String> {
        if kind.trim().is_empty() || value.trim().is_empty() {
            return Err("Missing required fields".into());
        }
        let selection = match BannerKind::parse(kind.trim())? {
            BannerKind::Image => Self::image(value),
            BannerKind::Color => Self::color(value),
        };
        selection.validate()?;
        Ok(selection)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.value.is_empty() {
            return Err("Missing required fields".into());
        }
        match self.kind {
            BannerKind::Image if self.value.contains("..") => {
                Err("Invalid banner image path".into())
            }
            BannerKind::Color if self.value.contains(FORBIDDEN_CSS_CHARS) => {
                Err("Invalid banner color".into())
            }
            _ => Ok(()),
        }
    }

    /// URL for `background-image`, `None` for colour banners
    pub fn display_url(&self) -> Option<String> {
        match self.kind {
            BannerKind::Image => Some(static_url(&self.value)),
            BannerKind::Color => None,
        }
    }
}

const FORBIDDEN_CSS_CHARS: &[char] = &[';', '{', '}', '<', '>', '"', '\''];

/// Reduces an absolute, origin-qualified or `/static/`-prefixed image URL to
/// the path relative to the static root.
pub fn to_relative_path(value: &str) -> String {
    let value = value.trim();
    let path = match value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
    {
        Some(rest) => rest.find('/').map(|i| &rest[i..]).unwrap_or_default(),
        None => value,
    };
    path.strip_prefix(STATIC_URL)
        .unwrap_or(path)
        .trim_start_matches('/')
        .to_string()
}

pub fn static_url(relative: &str) -> String {
    format!("{}{}", STATIC_URL, relative.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_round_trip_keeps_relative_path() {
        let selection = BannerSelection::image("uploads/x.jpg");
        assert_eq!(selection.value, "uploads/x.jpg");
        assert_eq!(selection.display_url().as_deref(), Some("/static/uploads/x.jpg"));
    }

    #[test]
    fn absolute_urls_are_reduced_to_relative() {
        assert_eq!(to_relative_path("/static/uploads/x.jpg"), "uploads/x.jpg");
        assert_eq!(
            to_relative_path("https://example.com/static/banners/sky.png"),
            "banners/sky.png"
        );
        assert_eq!(to_relative_path("http://localhost:3000/static/a.jpg"), "a.jpg");
        assert_eq!(to_relative_path("banners/sky.png"), "banners/sky.png");
    }

    #[test]
    fn from_parts_validates_input() {
        assert_eq!(
            BannerSelection::from_parts("color", " #fff "),
            Ok(BannerSelection::color("#fff"))
        );
        assert_eq!(
            BannerSelection::from_parts("video", "x").unwrap_err(),
            "Invalid banner type"
        );
        assert_eq!(
            BannerSelection::from_parts("image", "").unwrap_err(),
            "Missing required fields"
        );
        assert!(BannerSelection::from_parts("color", "red; display:none").is_err());
        assert!(BannerSelection::from_parts("image", "../../etc/passwd").is_err());
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_string(&BannerKind::Image).unwrap();
        assert_eq!(json, "\"image\"");
    }
}
