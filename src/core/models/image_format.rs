use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageMimeType {
    Png,
    Jpeg,
}

impl ImageMimeType {
    pub fn from_image_format(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Png => Some(Self::Png),
            image::ImageFormat::Jpeg => Some(Self::Jpeg),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    pub fn as_image_format(&self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

impl fmt::Display for ImageMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_mime())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_image_format_maps_only_png_and_jpeg() {
        assert_eq!(
            ImageMimeType::from_image_format(image::ImageFormat::Png),
            Some(ImageMimeType::Png)
        );
        assert_eq!(
            ImageMimeType::from_image_format(image::ImageFormat::Jpeg),
            Some(ImageMimeType::Jpeg)
        );
        assert_eq!(ImageMimeType::from_image_format(image::ImageFormat::Gif), None);
    }

    #[test]
    fn test_from_path_uses_extension_case_insensitively() {
        assert_eq!(
            ImageMimeType::from_path(Path::new("/tmp/box.JPEG")),
            Some(ImageMimeType::Jpeg)
        );
        assert_eq!(
            ImageMimeType::from_path(Path::new("label.png")),
            Some(ImageMimeType::Png)
        );
        assert_eq!(ImageMimeType::from_path(Path::new("notes.txt")), None);
        assert_eq!(ImageMimeType::from_path(Path::new("no_extension")), None);
    }
}
