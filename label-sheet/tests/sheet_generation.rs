use label_sheet::{
    FailurePolicy, LabelBatch, LabelConfig, LabelError, LabelRecord, LabelSheetGenerator,
    RecordingSurface, SurfaceOp, layout_page, write_document,
};
use std::path::Path;

fn write_logo(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("logo.png");
    let mut logo = image::RgbImage::from_pixel(300, 60, image::Rgb([255, 255, 255]));
    for x in 0..150 {
        for y in 0..60 {
            logo.put_pixel(x, y, image::Rgb([200, 20, 20]));
        }
    }
    logo.save(&path).unwrap();
    path
}

fn pdf_page_count(bytes: &[u8]) -> usize {
    let doc = lopdf::Document::load_mem(bytes).expect("valid PDF");
    doc.get_pages().len()
}

/// MediaBox of every page, in points
fn pdf_media_boxes(bytes: &[u8]) -> Vec<Vec<f32>> {
    let doc = lopdf::Document::load_mem(bytes).expect("valid PDF");
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let page = doc.get_dictionary(page_id).expect("page dictionary");
            page.get(b"MediaBox")
                .and_then(lopdf::Object::as_array)
                .expect("page MediaBox")
                .iter()
                .map(|value| match value {
                    lopdf::Object::Integer(i) => *i as f32,
                    lopdf::Object::Real(r) => *r as f32,
                    other => panic!("unexpected MediaBox entry {other:?}"),
                })
                .collect()
        })
        .collect()
}

#[test]
fn test_motor_gear_scenario() {
    let batch = LabelBatch::parse("123456789012, Motor Gear, R12").unwrap();
    let generator = LabelSheetGenerator::new(LabelConfig::default().without_logo());

    let document = generator.generate(&batch).unwrap();

    assert_eq!(document.file_name, "123456789012_labels.pdf");
    assert_eq!(document.pages, 1);
    assert!(document.skipped.is_empty());
    assert_eq!(pdf_page_count(&document.bytes), 1);

    let mut surface = RecordingSurface::new();
    generator.render(&batch, None, &mut surface).unwrap();
    let texts: Vec<&str> = surface
        .ops()
        .iter()
        .filter_map(|op| match op {
            SurfaceOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert!(texts.contains(&"Part: Motor Gear"));
    assert!(texts.contains(&"Rack: R12"));
}

#[test]
fn test_page_per_record_with_fixed_size() {
    let text = "123456789012, Motor Gear, R12\n987654321098, Brake Unit, R34\nA-7, Door Roller, R1\n123456789012, Motor Gear, R12";
    let batch = LabelBatch::parse(text).unwrap();
    let generator = LabelSheetGenerator::new(LabelConfig::default().without_logo());

    let document = generator.generate(&batch).unwrap();
    assert_eq!(document.pages, 4);
    assert_eq!(pdf_page_count(&document.bytes), 4);
    assert_eq!(
        document.file_name,
        "123456789012,987654321098,A-7,123456789012_labels.pdf"
    );

    let mut surface = RecordingSurface::new();
    generator.render(&batch, None, &mut surface).unwrap();
    let sizes: Vec<(f32, f32)> = surface
        .ops()
        .iter()
        .filter_map(|op| match op {
            SurfaceOp::BeginPage {
                width_mm,
                height_mm,
            } => Some((*width_mm, *height_mm)),
            _ => None,
        })
        .collect();
    assert_eq!(sizes, vec![(100.0, 150.0); 4]);

    // 100 x 150 mm in points
    let boxes = pdf_media_boxes(&document.bytes);
    assert_eq!(boxes.len(), 4);
    for media_box in boxes {
        assert_eq!(media_box.len(), 4);
        let expected = [0.0, 0.0, 283.46, 425.20];
        for (value, want) in media_box.iter().zip(expected) {
            assert!((value - want).abs() < 0.01, "{media_box:?}");
        }
    }
}

#[test]
fn test_footer_position_is_identical_on_every_page() {
    let batch = LabelBatch::new(vec![
        LabelRecord::new("1", "A very long part name for a label", "R1"),
        LabelRecord::new("22", "B", "Rack 22 upper shelf"),
        LabelRecord::new("333", "C", "R3"),
    ]);
    let config = LabelConfig::default();

    let mut footers = Vec::new();
    for with_logo in [true, false] {
        for record in batch.iter() {
            let layout = layout_page(record, &config, with_logo);
            let footer = layout.texts().last().unwrap();
            footers.push((footer.0.to_string(), footer.1, footer.2));
        }
    }

    assert!(footers.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(footers[0].0, "FUJITEC SA - JEDDAH WAREHOUSE");
}

#[test]
fn test_layout_is_idempotent() {
    let batch =
        LabelBatch::parse("123456789012, Motor Gear, R12\n987654321098, Brake Unit, R34").unwrap();
    let generator = LabelSheetGenerator::new(LabelConfig::default().without_logo());

    let mut first = RecordingSurface::new();
    let mut second = RecordingSurface::new();
    generator.render(&batch, None, &mut first).unwrap();
    generator.render(&batch, None, &mut second).unwrap();
    assert_eq!(first.ops(), second.ops());

    // Same page count and name from the PDF path as well
    let a = generator.generate(&batch).unwrap();
    let b = generator.generate(&batch).unwrap();
    assert_eq!(a.file_name, b.file_name);
    assert_eq!(pdf_page_count(&a.bytes), pdf_page_count(&b.bytes));
}

#[test]
fn test_logo_present_and_absent() {
    let dir = tempfile::tempdir().unwrap();
    let logo_path = write_logo(dir.path());
    let batch = LabelBatch::parse("123456789012, Motor Gear, R12").unwrap();

    let with_logo = LabelSheetGenerator::new(LabelConfig::default().with_logo(&logo_path));
    let without_logo =
        LabelSheetGenerator::new(LabelConfig::default().with_logo(dir.path().join("missing.png")));

    assert!(with_logo.generate(&batch).is_ok());
    assert!(without_logo.generate(&batch).is_ok());

    let logo = with_logo.load_logo().unwrap();
    assert!(logo.is_some());
    assert!(without_logo.load_logo().unwrap().is_none());

    let mut a = RecordingSurface::new();
    let mut b = RecordingSurface::new();
    with_logo.render(&batch, logo.as_ref(), &mut a).unwrap();
    without_logo.render(&batch, None, &mut b).unwrap();

    let image_frames = |s: &RecordingSurface| -> Vec<label_sheet::Frame> {
        s.ops()
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::Image { frame, .. } => Some(*frame),
                _ => None,
            })
            .collect()
    };
    let a_frames = image_frames(&a);
    let b_frames = image_frames(&b);
    assert_eq!(a_frames.len(), 3);
    assert_eq!(b_frames.len(), 2);

    // 5:1 logo in the 80x20 box: width-constrained, centered vertically
    assert!((a_frames[0].width_mm - 80.0).abs() < 1e-3);
    assert!((a_frames[0].height_mm - 16.0).abs() < 1e-3);

    // Barcode moves up by logo height plus gap
    let shift = b_frames[0].top_mm() - a_frames[1].top_mm();
    assert!((shift - 27.0).abs() < 1e-3);
}

#[test]
fn test_encoding_error_aborts_by_default() {
    let batch = LabelBatch::parse("OK-1, Gear, R1\nGÜL-2, Gear, R2").unwrap();
    let generator = LabelSheetGenerator::new(LabelConfig::default().without_logo());

    match generator.generate(&batch) {
        Err(LabelError::Encoding { identifier, .. }) => assert_eq!(identifier, "GÜL-2"),
        other => panic!("expected encoding error, got {other:?}"),
    }
}

#[test]
fn test_skip_policy_produces_partial_sheet() {
    let batch = LabelBatch::parse("OK-1, Gear, R1\nGÜL-2, Gear, R2\nOK-3, Gear, R3").unwrap();
    let generator = LabelSheetGenerator::new(
        LabelConfig::default()
            .without_logo()
            .with_failure_policy(FailurePolicy::SkipRecord),
    );

    let document = generator.generate(&batch).unwrap();
    assert_eq!(document.pages, 2);
    assert_eq!(pdf_page_count(&document.bytes), 2);
    assert_eq!(document.skipped.len(), 1);
    assert_eq!(document.skipped[0].identifier, "GÜL-2");
}

#[test]
fn test_skip_policy_names_sheet_after_its_pages() {
    let batch = LabelBatch::parse("OK-1, Gear, R1\nBAD-Ü, Gear, R2").unwrap();
    let generator = LabelSheetGenerator::new(
        LabelConfig::default()
            .without_logo()
            .with_failure_policy(FailurePolicy::SkipRecord),
    );

    let document = generator.generate(&batch).unwrap();
    assert_eq!(document.pages, 1);
    assert_eq!(document.file_name, "OK-1_labels.pdf");
}

#[test]
fn test_generated_sheet_written_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let batch = LabelBatch::parse("123456789012, Motor Gear, R12").unwrap();
    let document = LabelSheetGenerator::new(LabelConfig::default().without_logo())
        .generate(&batch)
        .unwrap();

    let path = write_document(dir.path(), &document).unwrap();
    assert_eq!(path.file_name().unwrap(), "123456789012_labels.pdf");
    assert_eq!(pdf_page_count(&std::fs::read(&path).unwrap()), 1);
}
