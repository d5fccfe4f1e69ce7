//! Product imagery: a single URL or a set of size-keyed URLs.

use serde::{Deserialize, Serialize};

/// Viewport widths (px) at which the next larger image is preferred.
const SMALL_MAX_WIDTH: u32 = 480;
const MEDIUM_MAX_WIDTH: u32 = 1024;

/// Size-keyed image URLs.
///
/// Reads both the catalog keys (`PrimarySmall`, ...) and the internal keys
/// (`small`, ...); always writes the internal ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizedImages {
    #[serde(default, alias = "PrimarySmall", skip_serializing_if = "Option::is_none")]
    pub small: Option<String>,
    #[serde(default, alias = "PrimaryMedium", skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(default, alias = "PrimaryLarge", skip_serializing_if = "Option::is_none")]
    pub large: Option<String>,
    #[serde(default, alias = "PrimaryExtraLarge", skip_serializing_if = "Option::is_none")]
    pub extra_large: Option<String>,
}

impl SizedImages {
    fn is_empty(&self) -> bool {
        self.small.is_none()
            && self.medium.is_none()
            && self.large.is_none()
            && self.extra_large.is_none()
    }
}

/// Either one image URL or a [`SizedImages`] record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageSource {
    Url(String),
    Sized(SizedImages),
}

impl ImageSource {
    /// Pick the best URL for a viewport `width` pixels wide.
    pub fn responsive_url(&self, width: u32) -> Option<&str> {
        let sized = match self {
            ImageSource::Url(url) => return non_empty(url),
            ImageSource::Sized(sized) => sized,
        };

        let preferred = if width <= SMALL_MAX_WIDTH && sized.small.is_some() {
            &sized.small
        } else if width <= MEDIUM_MAX_WIDTH && sized.medium.is_some() {
            &sized.medium
        } else {
            &sized.large
        };

        preferred
            .as_deref()
            .or(sized.medium.as_deref())
            .or(sized.large.as_deref())
            .or(sized.small.as_deref())
            .or(sized.extra_large.as_deref())
            .and_then(non_empty)
    }

    /// The URL to use when the viewport is unknown (medium first).
    pub fn primary_url(&self) -> Option<&str> {
        self.responsive_url(MEDIUM_MAX_WIDTH)
    }

    /// Render an HTML `srcset` value. Single URLs have none.
    pub fn srcset(&self) -> String {
        let ImageSource::Sized(sized) = self else {
            return String::new();
        };

        [
            (&sized.small, 480),
            (&sized.medium, 1024),
            (&sized.large, 1920),
        ]
        .into_iter()
        .filter_map(|(url, w)| url.as_deref().map(|u| format!("{} {}w", u, w)))
        .collect::<Vec<_>>()
        .join(", ")
    }

    pub(crate) fn is_empty(&self) -> bool {
        match self {
            ImageSource::Url(url) => url.trim().is_empty(),
            ImageSource::Sized(sized) => sized.is_empty(),
        }
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
