use crate::ids;

/// Media type and canonical extension sniffed from an image's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageKind {
    pub mime_type: &'static str,
    pub extension: &'static str,
}

/// Pixel size of the fixed-layout canvas. Taken from the cover and applied to
/// every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone)]
pub struct PageAsset {
    /// Zero-padded ordinal, e.g. `001`.
    pub id: String,
    /// `i-` + id; also the stem of the image inside the package.
    pub file_id: String,
    /// Name of the source file, matched against the index.
    pub file_name: String,
    pub binary: Vec<u8>,
    pub kind: ImageKind,
}

impl PageAsset {
    pub fn new(ordinal: usize, file_name: String, binary: Vec<u8>, kind: ImageKind) -> Self {
        let id = ids::page_id(ordinal);
        let file_id = ids::page_file_id(&id);
        Self {
            id,
            file_id,
            file_name,
            binary,
            kind,
        }
    }

    /// `i-001.png`
    pub fn image_name(&self) -> String {
        format!("{}.{}", self.file_id, self.kind.extension)
    }

    /// `p-001`
    pub fn xhtml_id(&self) -> String {
        ids::xhtml_id(&self.id)
    }
}

#[derive(Debug, Clone)]
pub struct CoverAsset {
    pub file_name: String,
    pub binary: Vec<u8>,
    pub kind: ImageKind,
    pub canvas: Canvas,
}

impl CoverAsset {
    pub fn id(&self) -> &'static str {
        ids::COVER_ID
    }

    pub fn file_id(&self) -> &'static str {
        ids::COVER_FILE_ID
    }

    /// `cover.jpg`
    pub fn image_name(&self) -> String {
        format!("{}.{}", ids::COVER_FILE_ID, self.kind.extension)
    }

    /// `p-cover`
    pub fn xhtml_id(&self) -> String {
        ids::xhtml_id(ids::COVER_ID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: ImageKind = ImageKind {
        mime_type: "image/png",
        extension: "png",
    };

    #[test]
    fn page_names_use_assigned_ids_and_sniffed_extension() {
        let page = PageAsset::new(12, "scan_12.PNG".to_owned(), Vec::new(), PNG);
        assert_eq!(page.id, "012");
        assert_eq!(page.file_id, "i-012");
        assert_eq!(page.image_name(), "i-012.png");
        assert_eq!(page.xhtml_id(), "p-012");
        assert_eq!(page.file_name, "scan_12.PNG");
    }

    #[test]
    fn cover_names_are_fixed() {
        let cover = CoverAsset {
            file_name: "Cover.jpeg".to_owned(),
            binary: Vec::new(),
            kind: ImageKind {
                mime_type: "image/jpeg",
                extension: "jpg",
            },
            canvas: Canvas {
                width: 10,
                height: 20,
            },
        };
        assert_eq!(cover.id(), "cover");
        assert_eq!(cover.file_id(), "cover");
        assert_eq!(cover.image_name(), "cover.jpg");
        assert_eq!(cover.xhtml_id(), "p-cover");
    }
}
