//! lopdf-built fixture documents for unit tests

use lopdf::{content::Content, content::Operation, Dictionary, Document, Object, Stream};

#[derive(Debug, Clone, Copy)]
pub struct TestPage {
    pub width: i64,
    pub height: i64,
    /// Raw /Rotate entry, clockwise
    pub rotate: Option<i64>,
}

impl TestPage {
    pub fn letter() -> Self {
        Self {
            width: 612,
            height: 792,
            rotate: None,
        }
    }

    pub fn rotated(mut self, rotate: i64) -> Self {
        self.rotate = Some(rotate);
        self
    }
}

/// A document of `n` letter pages
pub fn letter_pdf(n: u32) -> Vec<u8> {
    build_pdf(&vec![TestPage::letter(); n as usize], false)
}

/// Build a document from `pages`. With `inherit_box` the pages carry no
/// MediaBox of their own and the page tree root holds the first page's box.
pub fn build_pdf(pages: &[TestPage], inherit_box: bool) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let media_box = |page: &TestPage| {
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(page.width),
            Object::Integer(page.height),
        ])
    };

    let mut kids = Vec::new();
    for (i, page_spec) in pages.iter().enumerate() {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(12)]),
                Operation::new("Td", vec![Object::Integer(72), Object::Integer(72)]),
                Operation::new(
                    "Tj",
                    vec![Object::String(
                        format!("Sheet {}", i + 1).into_bytes(),
                        lopdf::StringFormat::Literal,
                    )],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));

        let mut page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
        ]);
        if !inherit_box {
            page.set("MediaBox", media_box(page_spec));
        }
        if let Some(rotate) = page_spec.rotate {
            page.set("Rotate", Object::Integer(rotate));
        }
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let mut tree = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(pages.len() as i64)),
        ("Kids", Object::Array(kids)),
    ]);
    if let (true, Some(first)) = (inherit_box, pages.first()) {
        tree.set("MediaBox", media_box(first));
    }
    doc.objects.insert(pages_id, Object::Dictionary(tree));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}
