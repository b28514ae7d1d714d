use anyhow::Result;
use chrono::NaiveDate;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use super::font_metrics::{encode_win_ansi, FontFace};
use super::layout::{Page, PageConfig};

/// Writes laid-out pages as a PDF using the standard Helvetica faces.
pub fn serialize_to_pdf(pages: &[Page], config: &PageConfig) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = add_font(&mut doc, FontFace::Regular);
    let bold_id = add_font(&mut doc, FontFace::Bold);
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FontFace::Regular.resource_name() => regular_id,
            FontFace::Bold.resource_name() => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let content = page_content(page, config);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(config.width_pt.round() as i64),
            Object::Integer(config.height_pt.round() as i64),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

fn add_font(doc: &mut Document, face: FontFace) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => face.base_font(),
        "Encoding" => "WinAnsiEncoding",
    })
}

fn page_content(page: &Page, config: &PageConfig) -> Content {
    let mut operations = Vec::with_capacity(page.len() * 5);
    for line in page {
        let size = line.style.size(config).round() as i64;
        let y = (config.height_pt - config.margin_pt - line.baseline_pt).round() as i64;
        operations.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![line.style.face().resource_name().into(), Object::Integer(size)],
            ),
            Operation::new(
                "Td",
                vec![
                    Object::Integer(config.margin_pt.round() as i64),
                    Object::Integer(y),
                ],
            ),
            Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(&line.text))]),
            Operation::new("ET", vec![]),
        ]);
    }
    Content { operations }
}

/// `{Display_Name}_Portfolio_{YYYY-MM-DD}.pdf`
pub fn export_filename(display_name: &str, date: NaiveDate) -> String {
    let name = display_name
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    let name = if name.is_empty() {
        "Portfolio".to_string()
    } else {
        name
    };
    format!("{name}_Portfolio_{}.pdf", date.format("%Y-%m-%d"))
}
