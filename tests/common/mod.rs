//! Synthetic PDF builder for integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

pub const PAGE_WIDTH: i64 = 612;
pub const PAGE_HEIGHT: i64 = 792;

/// One text run, positioned with a top-down `y`.
#[derive(Debug, Clone)]
pub struct Run {
    pub text: String,
    pub size: f32,
    pub bold: bool,
    pub x: f32,
    pub y: f32,
}

pub fn run(text: &str, size: f32, x: f32, y: f32) -> Run {
    Run {
        text: text.to_string(),
        size,
        bold: false,
        x,
        y,
    }
}

pub fn bold(text: &str, size: f32, x: f32, y: f32) -> Run {
    Run {
        bold: true,
        ..run(text, size, x, y)
    }
}

/// Build a PDF with one page per entry, Helvetica for regular runs and
/// Helvetica-Bold for bold ones.
pub fn build_pdf(pages: &[Vec<Run>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let heavy = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => heavy,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for runs in pages {
        let mut operations = Vec::new();
        for r in runs {
            let font = if r.bold { "F2" } else { "F1" };
            let baseline = PAGE_HEIGHT as f32 - r.y;
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec![font.into(), Object::Real(r.size)],
            ));
            operations.push(Operation::new(
                "Td",
                vec![Object::Real(r.x), Object::Real(baseline)],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(r.text.as_str())],
            ));
            operations.push(Operation::new("ET", vec![]));
        }

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("content encodes"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("document saves");
    bytes
}

/// Body paragraph lines at 11pt, starting at `y`, 15pt apart.
pub fn body(lines: &[&str], y: f32) -> Vec<Run> {
    lines
        .iter()
        .enumerate()
        .map(|(i, text)| run(text, 11.0, 50.0, y + i as f32 * 15.0))
        .collect()
}

/// A two-page report with a title, numbered sections, a table and a few
/// decoys.
pub fn sample_report() -> Vec<u8> {
    let mut first = vec![
        bold("Annual Report", 24.0, 50.0, 60.0),
        bold("1. Introduction", 16.0, 50.0, 120.0),
    ];
    first.extend(body(
        &[
            "This report covers the operations of the company.",
            "It summarises revenue, costs and the outlook.",
            "Figures are unaudited unless stated otherwise.",
        ],
        150.0,
    ));
    first.push(run("1.1 Scope", 13.0, 50.0, 220.0));
    first.extend(body(
        &[
            "The scope includes all regional subsidiaries.",
            "Joint ventures are reported separately.",
        ],
        245.0,
    ));
    first.push(bold("Centered Pull Quote", 14.0, 250.0, 320.0));

    let long_bold = vec!["word"; 20].join(" ");
    let mut second = vec![bold("2. Results", 16.0, 50.0, 60.0)];
    second.extend(body(
        &[
            "Revenue grew in every region this year.",
            "Costs were held flat against the prior year.",
        ],
        90.0,
    ));
    second.push(run("2.3.1 Details", 11.0, 50.0, 140.0));
    second.push(bold(&long_bold, 12.0, 50.0, 170.0));
    second.extend(body(&["The table below lists quarterly revenue."], 200.0));
    second.extend([
        bold("Quarter", 11.0, 60.0, 400.0),
        bold("Revenue", 11.0, 250.0, 400.0),
        run("Q1", 11.0, 60.0, 415.0),
        run("10", 11.0, 250.0, 415.0),
        run("Q2", 11.0, 60.0, 430.0),
        run("12", 11.0, 250.0, 430.0),
    ]);
    second.extend(body(&["Closing remarks follow in the appendix."], 480.0));

    build_pdf(&[first, second])
}
