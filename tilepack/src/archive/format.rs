//! Stored tile image format.

/// Image format of the tiles stored in an archive.
///
/// Resolved lazily from the archive's `format` metadata value on first
/// open. Informational only: tile lookups return the stored blob verbatim
/// regardless of format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Not yet resolved (archive never opened, or no `format` row)
    Unset,
    /// PNG tiles
    Png,
    /// JPEG tiles (stored as `jpg` in archive metadata)
    Jpeg,
    /// A `format` row exists but names something else
    Unknown,
}

impl ImageFormat {
    /// Classify the archive's `format` metadata value.
    ///
    /// `None` is a present row holding SQL NULL, which classifies as
    /// [`ImageFormat::Unknown`] just like an unrecognized string.
    ///
    /// # Example
    ///
    /// ```
    /// use tilepack::archive::ImageFormat;
    ///
    /// assert_eq!(ImageFormat::classify(Some("png")), ImageFormat::Png);
    /// assert_eq!(ImageFormat::classify(Some("jpg")), ImageFormat::Jpeg);
    /// assert_eq!(ImageFormat::classify(Some("webp")), ImageFormat::Unknown);
    /// assert_eq!(ImageFormat::classify(None), ImageFormat::Unknown);
    /// ```
    pub fn classify(value: Option<&str>) -> ImageFormat {
        match value {
            Some("jpg") => ImageFormat::Jpeg,
            Some("png") => ImageFormat::Png,
            _ => ImageFormat::Unknown,
        }
    }
}
