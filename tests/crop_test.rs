//! End-to-end test over a synthetic in-memory PDF: build a three-page
//! exam with marker phrases in its content streams, then run the full
//! pipeline — text extraction, segmentation, cropping, reassembly.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use examsplit::{segment, PdfAssembler, PdfTextFinder, TextFinder};

/// Encode one page's text lines as a content stream. Each line is a
/// `(text, x, baseline y)` triple rendered at 12pt.
fn page_stream(lines: &[(&str, i64, i64)]) -> Vec<u8> {
    let mut operations = vec![Operation::new("BT", vec![])];
    for (text, x, y) in lines {
        operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
        operations.push(Operation::new(
            "Tm",
            vec![
                1.into(),
                0.into(),
                0.into(),
                1.into(),
                (*x).into(),
                (*y).into(),
            ],
        ));
        operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
    }
    operations.push(Operation::new("ET", vec![]));
    Content { operations }.encode().unwrap()
}

/// A three-page exam:
///
/// * page 0: header, "Question 1", footer
/// * page 1: header, "Question 2", footer
/// * page 2: header, "Question 2 continued" banner, "End of Section A"
fn sample_exam() -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let pages: [&[(&str, i64, i64)]; 3] = [
        &[
            ("Specialist Mathematics", 55, 815),
            ("Question 1", 72, 700),
            ("See next page", 250, 40),
        ],
        &[
            ("Specialist Mathematics", 55, 815),
            ("Question 2", 72, 650),
            ("See next page", 250, 40),
        ],
        &[
            ("Specialist Mathematics", 55, 815),
            ("Question 2 continued", 72, 780),
            ("End of Section A", 200, 400),
        ],
    ];

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, page_stream(lines)));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => Object::Array(vec![
                0.into(), 0.into(), 595.into(), 842.into(),
            ]),
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => Object::Array(kids),
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// Media box of a split page, as `[x1, y2, x2, y1]`.
fn media_box(doc: &Document, page_number: u32) -> Vec<f32> {
    let page_id = doc.get_pages()[&page_number];
    let dict = doc.get_dictionary(page_id).unwrap();
    dict.get(b"MediaBox")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o.as_float().unwrap())
        .collect()
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.05
}

#[test]
fn segments_synthetic_exam() {
    let doc = sample_exam();
    let finder = PdfTextFinder::from_document(&doc).unwrap();
    assert_eq!(finder.page_count(), 3);

    let seg = segment(&finder).unwrap();
    assert_eq!(seg.question_count(), 2);
    assert!(seg.warnings.is_empty());

    // 12pt text at baseline 700 → label top edge 700 + 12 * 0.8
    let q1 = seg.get(1).unwrap();
    assert_eq!(q1.len(), 1);
    assert_eq!(q1[0].page, 0);
    assert!(approx(q1[0].viewport.y1, 709.6));
    // bottom bound from the "See next page" footers at baseline 40
    assert!(approx(q1[0].viewport.y2, 37.6));

    // Q2 runs onto page 2, which opens with its continuation banner
    let q2 = seg.get(2).unwrap();
    assert_eq!(q2.iter().map(|p| p.page).collect::<Vec<_>>(), vec![1, 2]);
    assert!(approx(q2[0].viewport.y1, 659.6));
    assert!(approx(q2[1].viewport.y1, 789.6));
}

#[test]
fn split_produces_cropped_documents() {
    let doc = sample_exam();
    let finder = PdfTextFinder::from_document(&doc).unwrap();
    let seg = segment(&finder).unwrap();

    let documents = PdfAssembler::from_document(doc).split(&seg).unwrap();
    assert_eq!(documents.len(), 2);

    let q1 = &documents[&1];
    assert_eq!(q1.get_pages().len(), 1);
    let clip = media_box(q1, 1);
    assert!(approx(clip[0], 0.0));
    assert!(approx(clip[1], 37.6));
    assert!(approx(clip[2], 595.0));
    assert!(approx(clip[3], 709.6));

    let q2 = &documents[&2];
    assert_eq!(q2.get_pages().len(), 2);
    let banner_page = media_box(q2, 2);
    assert!(approx(banner_page[3], 789.6));
}

#[test]
fn split_documents_survive_a_save_reload_cycle() {
    let doc = sample_exam();
    let finder = PdfTextFinder::from_document(&doc).unwrap();
    let seg = segment(&finder).unwrap();
    let documents = PdfAssembler::from_document(doc).split(&seg).unwrap();

    let dir = tempfile::tempdir().unwrap();
    for (question, doc) in documents {
        let path = dir.path().join(format!("question-{}.pdf", question));
        let mut doc = doc;
        doc.save(&path).unwrap();

        let reloaded = Document::load(&path).unwrap();
        assert_eq!(
            reloaded.get_pages().len(),
            seg.get(question).unwrap().len(),
            "question {} page count changed across save/load",
            question
        );
    }
}

#[test]
fn split_bytes_end_to_end() {
    let mut doc = sample_exam();
    let mut data = Vec::new();
    doc.save_to(&mut data).unwrap();

    let documents = examsplit::split_bytes(&data).unwrap();
    assert_eq!(documents.len(), 2);
    assert_eq!(documents[&1].get_pages().len(), 1);
    assert_eq!(documents[&2].get_pages().len(), 2);
}
