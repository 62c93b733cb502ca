use contracts::domain::a001_memorial::banner::{BannerKind, BannerSelection};

pub const BANNER_IMAGE_CLASS: &str = "banner-image";
pub const BANNER_COLOR_CLASS: &str = "banner-color";
pub const TRANSPARENT: &str = "transparent";

/// How the banner is drawn. Exactly one of image / colour is active, the
/// other property is explicitly cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerDisplay {
    pub selection: BannerSelection,
    /// `/static/...` URL when the banner is an image
    pub image_url: Option<String>,
    pub background_color: String,
}

impl BannerDisplay {
    pub fn render(selection: &BannerSelection) -> Self {
        match selection.kind {
            BannerKind::Image => Self {
                selection: selection.clone(),
                image_url: selection.display_url(),
                background_color: TRANSPARENT.to_string(),
            },
            BannerKind::Color => Self {
                selection: selection.clone(),
                image_url: None,
                background_color: selection.value.clone(),
            },
        }
    }

    pub fn class(&self) -> &'static str {
        match self.selection.kind {
            BannerKind::Image => BANNER_IMAGE_CLASS,
            BannerKind::Color => BANNER_COLOR_CLASS,
        }
    }

    pub fn background_image(&self) -> String {
        match &self.image_url {
            Some(url) => format!("url('{}')", url),
            None => "none".to_string(),
        }
    }

    pub fn style(&self) -> String {
        format!(
            "background-image: {}; background-color: {};",
            self.background_image(),
            self.background_color
        )
    }
}
