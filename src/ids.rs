pub const COVER_ID: &str = "cover";
pub const COVER_FILE_ID: &str = "cover";

const PAGE_ID_WIDTH: usize = 3;

/// `1` -> `"001"`.
pub fn page_id(ordinal: usize) -> String {
    format!("{ordinal:0width$}", width = PAGE_ID_WIDTH)
}

/// `"001"` -> `"i-001"`.
pub fn page_file_id(page_id: &str) -> String {
    format!("i-{page_id}")
}

/// Name of the markup document for a page or the cover: `p-001`, `p-cover`.
pub fn xhtml_id(id: &str) -> String {
    format!("p-{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_zero_padded_to_three_digits() {
        assert_eq!(page_id(1), "001");
        assert_eq!(page_id(42), "042");
        assert_eq!(page_id(999), "999");
        assert_eq!(page_file_id(&page_id(7)), "i-007");
    }

    #[test]
    fn wider_ordinals_are_not_truncated() {
        assert_eq!(page_id(1000), "1000");
    }

    #[test]
    fn markup_ids_cover_both_kinds() {
        assert_eq!(xhtml_id(COVER_ID), "p-cover");
        assert_eq!(xhtml_id("003"), "p-003");
    }
}
