use rayon::prelude::*;

use crate::assets::{Canvas, CoverAsset, PageAsset};
use crate::formats::{DEFAULT_COVER_LABEL, IndexEntry, PackageMetadata, PageDirection, PanelView};
use crate::ids;
use crate::toc::TocEntry;

pub const MIMETYPE: &str = "application/epub+zip";
pub const CONTAINER_PATH: &str = "META-INF/container.xml";
pub const PACKAGE_PATH: &str = "item/standard.opf";
pub const NAV_PATH: &str = "item/nav.xhtml";
pub const NCX_PATH: &str = "item/toc.ncx";
pub const STYLE_PATH: &str = "item/style/fixed-layout-jp.css";
pub const IMAGE_DIR: &str = "item/image";
pub const XHTML_DIR: &str = "item/xhtml";

/// Everything needed to render the package, assembled once per run.
#[derive(Debug, Clone)]
pub struct Publication {
    pub metadata: PackageMetadata,
    pub cover: CoverAsset,
    pub pages: Vec<PageAsset>,
    pub index: Vec<IndexEntry>,
    pub toc: Vec<TocEntry>,
}

impl Publication {
    /// Pages share the cover's canvas.
    pub fn canvas(&self) -> Canvas {
        self.cover.canvas
    }

    pub fn cover_label(&self) -> &str {
        self.index
            .first()
            .map(|entry| entry.label.as_str())
            .unwrap_or(DEFAULT_COVER_LABEL)
    }

    fn label_at(&self, position: usize) -> &str {
        self.index
            .get(position)
            .map(|entry| entry.label.as_str())
            .unwrap_or_default()
    }
}

/// A markup document ready to be stored under `item/xhtml/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XhtmlDocument {
    /// `p-cover.xhtml`, `p-001.xhtml`, ...
    pub file_name: String,
    pub contents: String,
}

#[derive(Debug, Clone)]
pub struct RenderedDocuments {
    pub container_xml: String,
    pub package_opf: String,
    pub nav_xhtml: String,
    pub toc_ncx: String,
    pub stylesheet: String,
    pub cover_xhtml: XhtmlDocument,
    pub pages: Vec<XhtmlDocument>,
}

pub fn render_all(publication: &Publication) -> RenderedDocuments {
    let pages = publication
        .pages
        .par_iter()
        .map(|page| XhtmlDocument {
            file_name: format!("{}.xhtml", page.xhtml_id()),
            contents: render_page_xhtml(publication, page),
        })
        .collect();

    RenderedDocuments {
        container_xml: render_container_xml(),
        package_opf: render_package_opf(publication),
        nav_xhtml: render_nav_xhtml(publication),
        toc_ncx: render_toc_ncx(publication),
        stylesheet: fixed_layout_css(),
        cover_xhtml: XhtmlDocument {
            file_name: format!("{}.xhtml", publication.cover.xhtml_id()),
            contents: render_cover_xhtml(publication),
        },
        pages,
    }
}

pub fn render_container_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="{PACKAGE_PATH}" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#
    )
}

pub fn fixed_layout_css() -> String {
    r#"@charset "UTF-8";

html,
body {
  margin: 0;
  padding: 0;
  font-size: 0;
}

svg {
  margin: 0;
  padding: 0;
}
"#
    .to_string()
}

pub fn render_package_opf(publication: &Publication) -> String {
    let metadata = &publication.metadata;
    let cover = &publication.cover;
    let canvas = publication.canvas();
    let lang = xml_escape(&metadata.language);

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!(
        "<package xmlns=\"http://www.idpf.org/2007/opf\" version=\"3.0\" xml:lang=\"{lang}\" unique-identifier=\"unique-id\" prefix=\"rendition: http://www.idpf.org/vocab/rendition/# ebpaj: http://www.ebpaj.jp/\">\n"
    ));

    out.push_str("<metadata xmlns:dc=\"http://purl.org/dc/elements/1.1/\">\n");
    out.push_str(&format!(
        "<dc:title id=\"title\">{}</dc:title>\n",
        xml_escape(&metadata.title)
    ));
    for (idx, creator) in metadata.creators().enumerate() {
        let seq = idx + 1;
        out.push_str(&format!(
            "<dc:creator id=\"creator{seq:02}\">{}</dc:creator>\n",
            xml_escape(creator)
        ));
        out.push_str(&format!(
            "<meta refines=\"#creator{seq:02}\" property=\"role\" scheme=\"marc:relators\">aut</meta>\n"
        ));
        out.push_str(&format!(
            "<meta refines=\"#creator{seq:02}\" property=\"display-seq\">{seq}</meta>\n"
        ));
    }
    out.push_str(&format!("<dc:language>{lang}</dc:language>\n"));
    out.push_str(&format!(
        "<dc:identifier id=\"unique-id\">urn:uuid:{}</dc:identifier>\n",
        metadata.uuid
    ));
    out.push_str(&format!(
        "<meta property=\"dcterms:modified\">{}</meta>\n",
        xml_escape(&metadata.modified)
    ));
    out.push_str("<meta property=\"rendition:layout\">pre-paginated</meta>\n");
    out.push_str(&format!(
        "<meta property=\"rendition:spread\">{}</meta>\n",
        metadata.panel_view.rendition_spread()
    ));
    out.push_str("<meta property=\"ebpaj:guide-version\">1.1.3</meta>\n");
    out.push_str(&format!(
        "<meta name=\"original-resolution\" content=\"{}x{}\"/>\n",
        canvas.width, canvas.height
    ));
    out.push_str("<meta name=\"book-type\" content=\"comic\"/>\n");
    out.push_str(&format!(
        "<meta name=\"primary-writing-mode\" content=\"{}\"/>\n",
        metadata.direction.writing_mode()
    ));
    out.push_str(&format!(
        "<meta name=\"panel-view\" content=\"{}\"/>\n",
        metadata.panel_view.as_str()
    ));
    out.push_str("<meta name=\"cover\" content=\"cover\"/>\n");
    out.push_str("</metadata>\n");

    out.push_str("<manifest>\n");
    out.push_str(
        "<item media-type=\"application/xhtml+xml\" id=\"toc\" href=\"nav.xhtml\" properties=\"nav\"/>\n",
    );
    out.push_str("<item media-type=\"application/x-dtbncx+xml\" id=\"ncx\" href=\"toc.ncx\"/>\n");
    out.push_str(
        "<item media-type=\"text/css\" id=\"fixed-layout-jp\" href=\"style/fixed-layout-jp.css\"/>\n",
    );
    out.push_str(&format!(
        "<item media-type=\"{}\" id=\"{}\" href=\"image/{}\" properties=\"cover-image\"/>\n",
        cover.kind.mime_type,
        cover.file_id(),
        xml_escape(&cover.image_name())
    ));
    for page in &publication.pages {
        out.push_str(&format!(
            "<item media-type=\"{}\" id=\"{}\" href=\"image/{}\"/>\n",
            page.kind.mime_type,
            page.file_id,
            xml_escape(&page.image_name())
        ));
    }
    out.push_str(&format!(
        "<item media-type=\"application/xhtml+xml\" id=\"{id}\" href=\"xhtml/{id}.xhtml\" properties=\"svg\"/>\n",
        id = cover.xhtml_id()
    ));
    for page in &publication.pages {
        out.push_str(&format!(
            "<item media-type=\"application/xhtml+xml\" id=\"{id}\" href=\"xhtml/{id}.xhtml\" properties=\"svg\"/>\n",
            id = page.xhtml_id()
        ));
    }
    out.push_str("</manifest>\n");

    out.push_str(&format!(
        "<spine page-progression-direction=\"{}\" toc=\"ncx\">\n",
        metadata.direction.as_str()
    ));
    out.push_str(&format!(
        "<itemref linear=\"yes\" idref=\"{}\" properties=\"rendition:page-spread-center\"/>\n",
        cover.xhtml_id()
    ));
    for (idx, page) in publication.pages.iter().enumerate() {
        match page_spread(metadata, idx) {
            Some(spread) => out.push_str(&format!(
                "<itemref linear=\"yes\" idref=\"{}\" properties=\"{spread}\"/>\n",
                page.xhtml_id()
            )),
            None => out.push_str(&format!(
                "<itemref linear=\"yes\" idref=\"{}\"/>\n",
                page.xhtml_id()
            )),
        }
    }
    out.push_str("</spine>\n");
    out.push_str("</package>\n");
    out
}

/// Spread side for the page at `idx` (0-based, cover excluded). The first page
/// opens a spread on the leading side of the reading direction.
fn page_spread(metadata: &PackageMetadata, idx: usize) -> Option<&'static str> {
    if metadata.panel_view != PanelView::Spread {
        return None;
    }
    let leading = idx % 2 == 0;
    let right = match metadata.direction {
        PageDirection::Rtl => leading,
        PageDirection::Ltr => !leading,
    };
    Some(if right {
        "page-spread-right"
    } else {
        "page-spread-left"
    })
}

pub fn render_nav_xhtml(publication: &Publication) -> String {
    let metadata = &publication.metadata;
    let lang = xml_escape(&metadata.language);
    let cover_href = format!("xhtml/{}.xhtml", publication.cover.xhtml_id());
    let cover_label = xml_escape(publication.cover_label());
    let toc_title = xml_escape(&metadata.toc_title);

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<!DOCTYPE html>\n");
    out.push_str(&format!(
        "<html xmlns=\"http://www.w3.org/1999/xhtml\" xmlns:epub=\"http://www.idpf.org/2007/ops\" xml:lang=\"{lang}\" lang=\"{lang}\">\n"
    ));
    out.push_str("<head>\n");
    out.push_str("<meta charset=\"UTF-8\"/>\n");
    out.push_str(&format!("<title>{}</title>\n", xml_escape(&metadata.title)));
    out.push_str("</head>\n");
    out.push_str("<body>\n");

    out.push_str("<nav epub:type=\"toc\" id=\"toc\">\n");
    out.push_str(&format!("<h1>{toc_title}</h1>\n"));
    out.push_str("<ol>\n");
    out.push_str(&format!(
        "<li><a href=\"{cover_href}\">{cover_label}</a></li>\n"
    ));
    for entry in &publication.toc {
        out.push_str(&format!(
            "<li><a href=\"xhtml/{}.xhtml\">{}</a></li>\n",
            ids::xhtml_id(&entry.page_id),
            xml_escape(publication.label_at(entry.position))
        ));
    }
    out.push_str("</ol>\n");
    out.push_str("</nav>\n");

    out.push_str("<nav epub:type=\"landmarks\" id=\"guide\" hidden=\"hidden\">\n");
    out.push_str("<ol>\n");
    out.push_str(&format!(
        "<li><a epub:type=\"cover\" href=\"{cover_href}\">{cover_label}</a></li>\n"
    ));
    out.push_str(&format!(
        "<li><a epub:type=\"toc\" href=\"nav.xhtml\">{toc_title}</a></li>\n"
    ));
    out.push_str("</ol>\n");
    out.push_str("</nav>\n");

    out.push_str("</body>\n");
    out.push_str("</html>\n");
    out
}

pub fn render_toc_ncx(publication: &Publication) -> String {
    let metadata = &publication.metadata;

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(
        "<!DOCTYPE ncx PUBLIC \"-//NISO//DTD ncx 2005-1//EN\" \"http://www.daisy.org/z3986/2005/ncx-2005-1.dtd\">\n",
    );
    out.push_str(&format!(
        "<ncx xmlns=\"http://www.daisy.org/z3986/2005/ncx/\" version=\"2005-1\" xml:lang=\"{}\">\n",
        xml_escape(&metadata.language)
    ));
    out.push_str("<head>\n");
    out.push_str(&format!(
        "<meta name=\"dtb:uid\" content=\"urn:uuid:{}\"/>\n",
        metadata.uuid
    ));
    out.push_str("<meta name=\"dtb:depth\" content=\"1\"/>\n");
    out.push_str("<meta name=\"dtb:totalPageCount\" content=\"0\"/>\n");
    out.push_str("<meta name=\"dtb:maxPageNumber\" content=\"0\"/>\n");
    out.push_str("</head>\n");
    out.push_str(&format!(
        "<docTitle><text>{}</text></docTitle>\n",
        xml_escape(&metadata.title)
    ));
    if let Some(author) = metadata.creators().next() {
        out.push_str(&format!(
            "<docAuthor><text>{}</text></docAuthor>\n",
            xml_escape(author)
        ));
    }

    out.push_str("<navMap>\n");
    let cover_point = std::iter::once((
        publication.cover.xhtml_id(),
        publication.cover_label(),
    ));
    let toc_points = publication.toc.iter().map(|entry| {
        (
            ids::xhtml_id(&entry.page_id),
            publication.label_at(entry.position),
        )
    });
    for (idx, (xhtml_id, label)) in cover_point.chain(toc_points).enumerate() {
        let play = idx + 1;
        out.push_str(&format!(
            "<navPoint id=\"navPoint-{play}\" playOrder=\"{play}\">\n"
        ));
        out.push_str(&format!(
            "<navLabel><text>{}</text></navLabel>\n",
            xml_escape(label)
        ));
        out.push_str(&format!("<content src=\"xhtml/{xhtml_id}.xhtml\"/>\n"));
        out.push_str("</navPoint>\n");
    }
    out.push_str("</navMap>\n");
    out.push_str("</ncx>\n");
    out
}

pub fn render_cover_xhtml(publication: &Publication) -> String {
    render_image_page(
        &publication.metadata,
        publication.canvas(),
        &publication.cover.image_name(),
        Some("cover"),
    )
}

pub fn render_page_xhtml(publication: &Publication, page: &PageAsset) -> String {
    render_image_page(
        &publication.metadata,
        publication.canvas(),
        &page.image_name(),
        None,
    )
}

fn render_image_page(
    metadata: &PackageMetadata,
    canvas: Canvas,
    image_name: &str,
    body_type: Option<&str>,
) -> String {
    let lang = xml_escape(&metadata.language);
    let Canvas { width, height } = canvas;

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<!DOCTYPE html>\n");
    out.push_str(&format!(
        "<html xmlns=\"http://www.w3.org/1999/xhtml\" xmlns:epub=\"http://www.idpf.org/2007/ops\" xml:lang=\"{lang}\" lang=\"{lang}\">\n"
    ));
    out.push_str("<head>\n");
    out.push_str("<meta charset=\"UTF-8\"/>\n");
    out.push_str(&format!("<title>{}</title>\n", xml_escape(&metadata.title)));
    out.push_str(
        "<link rel=\"stylesheet\" type=\"text/css\" href=\"../style/fixed-layout-jp.css\"/>\n",
    );
    out.push_str(&format!(
        "<meta name=\"viewport\" content=\"width={width}, height={height}\"/>\n"
    ));
    out.push_str("</head>\n");
    match body_type {
        Some(body_type) => out.push_str(&format!("<body epub:type=\"{body_type}\">\n")),
        None => out.push_str("<body>\n"),
    }
    out.push_str("<div class=\"main\">\n");
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"100%\" height=\"100%\" viewBox=\"0 0 {width} {height}\">\n"
    ));
    out.push_str(&format!(
        "<image width=\"{width}\" height=\"{height}\" xlink:href=\"../image/{}\"/>\n",
        xml_escape(image_name)
    ));
    out.push_str("</svg>\n");
    out.push_str("</div>\n");
    out.push_str("</body>\n");
    out.push_str("</html>\n");
    out
}

fn xml_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ImageKind;

    const PNG: ImageKind = ImageKind {
        mime_type: "image/png",
        extension: "png",
    };
    const JPEG: ImageKind = ImageKind {
        mime_type: "image/jpeg",
        extension: "jpg",
    };

    fn publication() -> Publication {
        let mut metadata = PackageMetadata::new("Tom & Jerry <1>");
        metadata.uuid = uuid::Uuid::nil();
        metadata.modified = "2024-01-02T03:04:05Z".to_owned();
        metadata.creator1 = Some("Author One".to_owned());

        let pages = vec![
            PageAsset::new(1, "a.png".to_owned(), Vec::new(), PNG),
            PageAsset::new(2, "b.jpg".to_owned(), Vec::new(), JPEG),
        ];
        let toc = vec![
            TocEntry {
                file_id: "i-002".to_owned(),
                page_id: "002".to_owned(),
                position: 1,
            },
            TocEntry {
                file_id: "i-001".to_owned(),
                page_id: "001".to_owned(),
                position: 2,
            },
        ];

        Publication {
            metadata,
            cover: CoverAsset {
                file_name: "cover.jpg".to_owned(),
                binary: Vec::new(),
                kind: JPEG,
                canvas: Canvas {
                    width: 1200,
                    height: 1700,
                },
            },
            pages,
            index: vec![
                IndexEntry::new("cover.jpg", "Cover"),
                IndexEntry::new("b.jpg", "Chapter \"B\""),
                IndexEntry::new("a.png", "Chapter A"),
            ],
            toc,
        }
    }

    #[test]
    fn spine_lists_cover_then_pages_in_id_order() {
        let opf = render_package_opf(&publication());
        let cover = opf.find("idref=\"p-cover\"").expect("cover itemref");
        let first = opf.find("idref=\"p-001\"").expect("p-001 itemref");
        let second = opf.find("idref=\"p-002\"").expect("p-002 itemref");
        assert!(cover < first && first < second);
        assert!(opf.contains("<spine page-progression-direction=\"rtl\" toc=\"ncx\">"));
    }

    #[test]
    fn manifest_lists_every_resource_with_its_media_type() {
        let opf = render_package_opf(&publication());
        for item in [
            "id=\"toc\" href=\"nav.xhtml\" properties=\"nav\"",
            "id=\"ncx\" href=\"toc.ncx\"",
            "id=\"fixed-layout-jp\" href=\"style/fixed-layout-jp.css\"",
            "<item media-type=\"image/jpeg\" id=\"cover\" href=\"image/cover.jpg\" properties=\"cover-image\"/>",
            "<item media-type=\"image/png\" id=\"i-001\" href=\"image/i-001.png\"/>",
            "<item media-type=\"image/jpeg\" id=\"i-002\" href=\"image/i-002.jpg\"/>",
            "id=\"p-cover\" href=\"xhtml/p-cover.xhtml\"",
            "id=\"p-002\" href=\"xhtml/p-002.xhtml\"",
        ] {
            assert!(opf.contains(item), "missing {item} in\n{opf}");
        }
    }

    #[test]
    fn package_carries_metadata_and_canvas() {
        let opf = render_package_opf(&publication());
        assert!(opf.contains("<dc:title id=\"title\">Tom &amp; Jerry &lt;1&gt;</dc:title>"));
        assert!(opf.contains("<dc:creator id=\"creator01\">Author One</dc:creator>"));
        assert!(!opf.contains("creator02"));
        assert!(opf.contains("urn:uuid:00000000-0000-0000-0000-000000000000"));
        assert!(opf.contains("<meta property=\"dcterms:modified\">2024-01-02T03:04:05Z</meta>"));
        assert!(opf.contains("content=\"1200x1700\""));
        assert!(opf.contains("<meta property=\"rendition:spread\">none</meta>"));
    }

    #[test]
    fn spreads_alternate_from_the_leading_side() {
        let mut publication = publication();
        publication.metadata.panel_view = PanelView::Spread;
        let opf = render_package_opf(&publication);
        assert!(opf.contains("idref=\"p-001\" properties=\"page-spread-right\""));
        assert!(opf.contains("idref=\"p-002\" properties=\"page-spread-left\""));

        publication.metadata.direction = PageDirection::Ltr;
        let opf = render_package_opf(&publication);
        assert!(opf.contains("idref=\"p-001\" properties=\"page-spread-left\""));
        assert!(opf.contains("<spine page-progression-direction=\"ltr\" toc=\"ncx\">"));
    }

    #[test]
    fn auto_panel_view_leaves_spread_sides_to_the_reader() {
        let mut publication = publication();
        publication.metadata.panel_view = PanelView::Auto;
        let opf = render_package_opf(&publication);
        assert!(opf.contains("<meta property=\"rendition:spread\">auto</meta>"));
        assert!(opf.contains("<itemref linear=\"yes\" idref=\"p-001\"/>"));
        assert!(opf.contains("<itemref linear=\"yes\" idref=\"p-002\"/>"));
        assert!(!opf.contains("properties=\"page-spread-left\""));
        assert!(!opf.contains("properties=\"page-spread-right\""));
    }

    #[test]
    fn nav_follows_toc_order_with_index_labels() {
        let nav = render_nav_xhtml(&publication());
        let cover = nav
            .find("<li><a href=\"xhtml/p-cover.xhtml\">Cover</a></li>")
            .expect("cover link");
        let b = nav
            .find("<li><a href=\"xhtml/p-002.xhtml\">Chapter &quot;B&quot;</a></li>")
            .expect("chapter b");
        let a = nav
            .find("<li><a href=\"xhtml/p-001.xhtml\">Chapter A</a></li>")
            .expect("chapter a");
        assert!(cover < b && b < a);
        assert!(nav.contains("<h1>目次</h1>"));
    }

    #[test]
    fn ncx_numbers_nav_points_sequentially() {
        let ncx = render_toc_ncx(&publication());
        assert!(ncx.contains("<navPoint id=\"navPoint-1\" playOrder=\"1\">"));
        assert!(ncx.contains("<navPoint id=\"navPoint-3\" playOrder=\"3\">"));
        assert!(!ncx.contains("navPoint-4"));
        assert!(ncx.contains("<content src=\"xhtml/p-cover.xhtml\"/>"));
        assert!(ncx.contains("<docAuthor><text>Author One</text></docAuthor>"));
        assert!(ncx.contains("<meta name=\"dtb:uid\" content=\"urn:uuid:00000000-0000-0000-0000-000000000000\"/>"));
    }

    #[test]
    fn pages_use_the_cover_canvas_and_their_own_image() {
        let publication = publication();
        let page = render_page_xhtml(&publication, &publication.pages[1]);
        assert!(page.contains("<meta name=\"viewport\" content=\"width=1200, height=1700\"/>"));
        assert!(page.contains("xlink:href=\"../image/i-002.jpg\""));
        assert!(page.contains("<body>"));

        let cover = render_cover_xhtml(&publication);
        assert!(cover.contains("<body epub:type=\"cover\">"));
        assert!(cover.contains("xlink:href=\"../image/cover.jpg\""));
    }

    #[test]
    fn rendering_is_deterministic() {
        let publication = publication();
        let first = render_all(&publication);
        let second = render_all(&publication);
        assert_eq!(first.package_opf, second.package_opf);
        assert_eq!(first.nav_xhtml, second.nav_xhtml);
        assert_eq!(first.toc_ncx, second.toc_ncx);
        assert_eq!(first.pages, second.pages);
        assert_eq!(
            first
                .pages
                .iter()
                .map(|p| p.file_name.as_str())
                .collect::<Vec<_>>(),
            vec!["p-001.xhtml", "p-002.xhtml"]
        );
        assert_eq!(first.cover_xhtml.file_name, "p-cover.xhtml");
    }

    #[test]
    fn container_points_at_the_package() {
        assert!(render_container_xml().contains("full-path=\"item/standard.opf\""));
    }
}
