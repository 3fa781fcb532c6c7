//! Integration tests for page classification through the public API.

use pdfblocks::pipeline::{
    is_heading, LineClassifier, LineKind, NumericDensityFilter, SectionContext,
    TableRowReconstructor,
};
use pdfblocks::{
    parse_source, render, BlockKind, ContentBlock, ExtractedPage, ImageDescriptor, JsonFormat,
    MemorySource, PageAssembler, ParseOptions,
};
use serde_json::json;

fn two_page_source() -> MemorySource {
    MemorySource::new(vec![
        ExtractedPage::new(["OVERVIEW", "The fund targets long-term capital growth"])
            .with_images(1),
        ExtractedPage::default().with_images(2),
    ])
}

#[test]
fn test_end_to_end_two_pages() {
    let doc = parse_source(two_page_source(), ParseOptions::default()).unwrap();

    assert_eq!(doc.page_count(), 2);
    assert_eq!(doc.pages[0].page_number, 1);
    assert_eq!(doc.pages[1].page_number, 2);

    assert_eq!(
        doc.pages[0].content,
        vec![
            ContentBlock::paragraph(
                Some("OVERVIEW"),
                None,
                "The fund targets long-term capital growth"
            ),
            ContentBlock::chart("Detected image #1, possible chart or graphic"),
        ]
    );
    assert_eq!(
        doc.pages[1].content,
        vec![
            ContentBlock::chart("Detected image #1, possible chart or graphic"),
            ContentBlock::chart("Detected image #2, possible chart or graphic"),
        ]
    );
}

#[test]
fn test_end_to_end_json_shape() {
    let doc = parse_source(two_page_source(), ParseOptions::default()).unwrap();
    let json = render::to_json(&doc, JsonFormat::Compact).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(
        value,
        json!({
            "pages": [
                {
                    "page_number": 1,
                    "content": [
                        {
                            "type": "paragraph",
                            "section": "OVERVIEW",
                            "sub_section": null,
                            "text": "The fund targets long-term capital growth"
                        },
                        {
                            "type": "chart",
                            "description": "Detected image #1, possible chart or graphic",
                            "table_data": []
                        }
                    ]
                },
                {
                    "page_number": 2,
                    "content": [
                        {
                            "type": "chart",
                            "description": "Detected image #1, possible chart or graphic",
                            "table_data": []
                        },
                        {
                            "type": "chart",
                            "description": "Detected image #2, possible chart or graphic",
                            "table_data": []
                        }
                    ]
                }
            ]
        })
    );
}

#[test]
fn test_heading_rules() {
    assert!(is_heading("FUND OBJECTIVE"));
    assert!(is_heading("2.1 Portfolio"));
    assert!(!is_heading("Portfolio managers"));

    let classifier = LineClassifier::new();
    assert_eq!(classifier.classify("2.1 Portfolio"), LineKind::Heading);
    assert_eq!(classifier.classify("2.1Portfolio"), LineKind::Subsection);
    assert_eq!(classifier.classify("Portfolio managers"), LineKind::Body);
}

#[test]
fn test_numeric_density_examples() {
    let filter = NumericDensityFilter::new();
    let context = SectionContext::new();
    assert!(filter.filter("1.5 2.0 3.5 text", &context).is_none());
    assert!(filter
        .filter("Revenue grew by 12% this quarter", &context)
        .is_some());
}

#[test]
fn test_table_row_example() {
    let rebuilt = TableRowReconstructor::reconstruct(&["Revenue   12.5", "Growth", "8.3"]);
    assert_eq!(
        rebuilt.rows,
        vec![
            vec!["Revenue".to_string(), "12.5".to_string()],
            vec!["Growth 8.3".to_string()],
        ]
    );
}

#[test]
fn test_subsection_context_on_paragraphs() {
    let assembler = PageAssembler::new();
    let page = assembler.assemble(
        1,
        &["PERFORMANCE", "1.1Returns", "Steady over the period"],
        &[],
    );
    match &page.content[0] {
        ContentBlock::Paragraph {
            section,
            sub_section,
            text,
        } => {
            assert_eq!(section.as_deref(), Some("PERFORMANCE"));
            assert_eq!(sub_section.as_deref(), Some("1.1Returns"));
            assert_eq!(text, "Steady over the period");
        }
        other => panic!("expected paragraph, got {:?}", other),
    }
}

#[test]
fn test_context_resets_between_pages() {
    let source = MemorySource::new(vec![
        ExtractedPage::new(["HOLDINGS", "Mostly large caps"]),
        ExtractedPage::new(["Continued from the previous page"]),
    ]);
    let doc = parse_source(source, ParseOptions::default()).unwrap();
    assert_eq!(doc.pages[1].content[0].section(), None);
}

#[test]
fn test_assembly_is_idempotent() {
    let lines = ["RISK", "Equity    45.2", "Moderate volatility", "Bonds  30.0"];
    let images = [ImageDescriptor::named("Im1")];
    let assembler = PageAssembler::new();
    assert_eq!(
        assembler.assemble(7, &lines, &images),
        assembler.assemble(7, &lines, &images)
    );
}

#[test]
fn test_block_order_paragraphs_table_charts() {
    let page = PageAssembler::new().assemble(
        3,
        &["ALLOCATION", "Mostly equities", "Equity    45.2"],
        &[ImageDescriptor::named("Im1")],
    );
    let kinds: Vec<_> = page.content.iter().map(|b| b.kind()).collect();
    assert_eq!(
        kinds,
        vec![BlockKind::Paragraph, BlockKind::Paragraph, BlockKind::Table, BlockKind::Chart]
    );
    match &page.content[2] {
        ContentBlock::Table {
            section,
            description,
            ..
        } => {
            assert_eq!(section.as_deref(), Some("ALLOCATION"));
            assert_eq!(description, "Text-based Table #1 on page 3");
        }
        other => panic!("expected table, got {:?}", other),
    }
}
