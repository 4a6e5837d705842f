// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sample documents for tests. Each page draws a text label, so tests can
// check page order by reading labels back from the output bytes.
//
// Resources and MediaBox live on the /Pages node, not on the pages, which
// exercises inherited-attribute handling during reassembly.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

/// A PDF with `pages` pages labelled `Page 1` .. `Page N`.
pub fn sample_pdf(pages: usize) -> Vec<u8> {
    labelled_pdf("Page", pages)
}

/// A PDF with pages labelled `{prefix} 1` .. `{prefix} N`.
pub fn labelled_pdf(prefix: &str, pages: usize) -> Vec<u8> {
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

    let mut kids = Vec::with_capacity(pages);
    for number in 1..=pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 36.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!("{prefix} {number}"))],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let encoded = content.encode().expect("encode fixture content");
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => pages as i64,
            "Kids" => kids,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut output = Vec::new();
    doc.save_to(&mut output).expect("save fixture");
    output
}

/// Read back the label drawn on each page, in page order.
pub fn page_labels(pdf: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(pdf).expect("load output");
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let content = doc.get_page_content(page_id).expect("page content");
            let text = String::from_utf8_lossy(&content);
            let start = text.find('(').map(|i| i + 1).unwrap_or(0);
            let end = text[start..].find(')').map(|i| start + i).unwrap_or(start);
            text[start..end].to_string()
        })
        .collect()
}

/// A small solid-color PNG.
pub fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 40, 255]));
    let mut output = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut output), image::ImageFormat::Png)
        .expect("encode fixture png");
    output
}
