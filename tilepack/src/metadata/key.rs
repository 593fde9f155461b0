//! Allow-listed metadata key names.

use std::fmt;

/// A metadata key an archive is allowed to serve.
///
/// The set is fixed at compile time; lookups for any name outside this set
/// are a not-found condition rather than a generic table query.
///
/// # Example
///
/// ```
/// use tilepack::metadata::MetadataKey;
///
/// assert_eq!(MetadataKey::from_name("version"), Some(MetadataKey::Version));
/// assert_eq!(MetadataKey::from_name("secret"), None);
/// assert_eq!(MetadataKey::Version.name(), "version");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetadataKey {
    /// Human-readable archive name
    Name,
    /// Layer type ("baselayer" or "overlay")
    Type,
    /// Archive version string
    Version,
    /// Free-form description
    Description,
    /// Stored tile image format ("png" or "jpg")
    Format,
    /// Bounding box as "left,bottom,right,top"
    Bounds,
    /// Attribution text for the imagery source
    Attribution,
}

impl MetadataKey {
    /// Every key in the allow-list, in rendering order.
    pub const ALL: [MetadataKey; 7] = [
        MetadataKey::Name,
        MetadataKey::Type,
        MetadataKey::Version,
        MetadataKey::Description,
        MetadataKey::Format,
        MetadataKey::Bounds,
        MetadataKey::Attribution,
    ];

    /// Look up a key by its wire name.
    ///
    /// Returns `None` for any name outside the allow-list.
    pub fn from_name(name: &str) -> Option<MetadataKey> {
        match name {
            "name" => Some(MetadataKey::Name),
            "type" => Some(MetadataKey::Type),
            "version" => Some(MetadataKey::Version),
            "description" => Some(MetadataKey::Description),
            "format" => Some(MetadataKey::Format),
            "bounds" => Some(MetadataKey::Bounds),
            "attribution" => Some(MetadataKey::Attribution),
            _ => None,
        }
    }

    /// The wire name of this key, as stored in the archive's metadata table.
    pub fn name(self) -> &'static str {
        match self {
            MetadataKey::Name => "name",
            MetadataKey::Type => "type",
            MetadataKey::Version => "version",
            MetadataKey::Description => "description",
            MetadataKey::Format => "format",
            MetadataKey::Bounds => "bounds",
            MetadataKey::Attribution => "attribution",
        }
    }
}

impl fmt::Display for MetadataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
