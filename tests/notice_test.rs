//! End-to-end tests for notice generation.

mod common;

use common::*;
use noticegen::docx::{ParagraphFormat, RunFormat};
use noticegen::{
    generate_notices, AccountRecord, Document, FailureKind, GroupOutcome, NoticeAssembler,
    NoticeOptions, Tone,
};
use std::fs;

const TWO_BANKS_CSV: &str = "Account Number,Account Holder Name,IFSC Code\n\
1001,Asha Rao,ICIC0001234\n\
2002,Ravi Kumar,HDFC0005678\n";

fn output_files(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_one_notice_per_bank() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_csv(dir.path(), TWO_BANKS_CSV);
    let template = write_template(dir.path(), &notice_body());
    let out = dir.path().join("notices");

    let report = generate_notices(&data, &template, NoticeOptions::new().with_output_dir(&out)).unwrap();

    assert!(report.is_success());
    assert_eq!(report.summary(), "Generated 2/2 notices");
    assert!(report.rejected.is_empty());
    assert_eq!(
        output_files(&out),
        vec![
            "Notice_HDFC BANK_HDFC0005678.docx",
            "Notice_ICICI BANK_ICIC0001234.docx"
        ]
    );

    let hdfc = Document::open(out.join("Notice_HDFC BANK_HDFC0005678.docx")).unwrap();
    assert_eq!(
        data_rows(&hdfc),
        vec![vec!["2002", "Ravi Kumar", "HDFC0005678"]]
    );
    let icici = Document::open(out.join("Notice_ICICI BANK_ICIC0001234.docx")).unwrap();
    assert_eq!(data_rows(&icici), vec![vec!["1001", "Asha Rao", "ICIC0001234"]]);
}

#[test]
fn test_placeholder_and_anchor_in_output() {
    let assembler = NoticeAssembler::new(build_docx(&notice_body()), NoticeOptions::default()).unwrap();
    let mut group = noticegen::OrganizationGroup::new("HDFC BANK", "HDFC");
    group.records.push(AccountRecord::new("2002", "Ravi Kumar", "HDFC0005678"));

    let (doc, warnings) = assembler.build_notice(&group).unwrap();
    assert!(warnings.is_empty());

    let paragraphs: Vec<_> = doc.body_paragraphs().map(|(_, p)| p).collect();
    assert_eq!(paragraphs[1].plain_text(), "To, The Manager, HDFC BANK");
    // the split placeholder lands in the bold run where it started
    let bold_run = paragraphs[1].children_named("r").nth(1).unwrap();
    assert_eq!(bold_run.plain_text(), "HDFC BANK");
    assert_eq!(RunFormat::from_run(bold_run).bold, Some(true));
    assert_eq!(paragraphs[2].plain_text(), "Dear HDFC BANK customer");

    let target = paragraphs[5];
    assert_eq!(target.plain_text(), "HDFC BANK");
    assert_eq!(
        ParagraphFormat::from_paragraph(target).style_id.as_deref(),
        Some("Heading3")
    );
    let run = RunFormat::from_run(target.child("r").unwrap());
    assert_eq!(run.font_name.as_deref(), Some("Cambria"));
    assert_eq!(run.bold, Some(true));
}

#[test]
fn test_generated_rows_follow_template_style() {
    let assembler = NoticeAssembler::new(build_docx(&notice_body()), NoticeOptions::default()).unwrap();
    let mut group = noticegen::OrganizationGroup::new("ICICI BANK", "ICIC");
    for i in 0..3 {
        group
            .records
            .push(AccountRecord::new(format!("10{i}"), format!("Holder {i}"), "ICIC0001234"));
    }

    let (doc, _) = assembler.build_notice(&group).unwrap();
    let rows = data_rows(&doc);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2], vec!["102", "Holder 2", "ICIC0001234"]);

    let table = noticegen::find_accounts_table(doc.body()).unwrap();
    let row = noticegen::table::data_rows(table).next().unwrap();
    for (cell, width) in row.children_named("tc").zip([2000u32, 4000, 3000]) {
        assert_eq!(noticegen::docx::props::read_cell_width(cell), Some(width));
        let run = RunFormat::from_run(cell.find_path(&["p", "r"]).unwrap());
        assert_eq!(run.font_name.as_deref(), Some("Times New Roman"));
        assert_eq!(run.font_size, Some(12.0));
        let spacing = cell.find_path(&["p", "pPr", "spacing"]).unwrap();
        assert_eq!(spacing.attr("after"), Some("0"));
    }
}

#[test]
fn test_missing_table_fails_each_group() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_csv(dir.path(), TWO_BANKS_CSV);
    let template = write_template(dir.path(), &tableless_body());
    let out = dir.path().join("notices");

    let report = generate_notices(&data, &template, NoticeOptions::new().with_output_dir(&out)).unwrap();

    assert_eq!(report.groups.len(), 2);
    assert_eq!(report.success_count(), 0);
    assert!(!report.is_success());
    for group in &report.groups {
        match &group.outcome {
            GroupOutcome::Failed { kind, .. } => assert_eq!(*kind, FailureKind::TableNotFound),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
    assert!(output_files(&out).is_empty());
}

#[test]
fn test_untouched_parts_survive() {
    let template = build_docx(&notice_body());
    let assembler = NoticeAssembler::new(template.clone(), NoticeOptions::default()).unwrap();
    let mut group = noticegen::OrganizationGroup::new("HDFC BANK", "HDFC");
    group.records.push(AccountRecord::new("1", "A", "HDFC0005678"));

    let (doc, _) = assembler.build_notice(&group).unwrap();
    let reloaded = Document::from_bytes(&doc.to_bytes().unwrap()).unwrap();
    let original = Document::from_bytes(&template).unwrap();

    assert_eq!(
        reloaded.part_names().collect::<Vec<_>>(),
        original.part_names().collect::<Vec<_>>()
    );
    for name in [
        "[Content_Types].xml",
        "docProps/core.xml",
        "word/styles.xml",
        "word/media/image1.png",
    ] {
        assert_eq!(reloaded.part(name), original.part(name), "{name}");
    }
    assert_eq!(reloaded.part("word/media/image1.png"), Some(IMAGE_BYTES));
}

#[test]
fn test_invalid_records_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_csv(
        dir.path(),
        "A/C No,Beneficiary Name,IFSC\n1,Asha,ICIC0001234\n2,Ravi,NOTACODE\n3,,HDFC0005678\n",
    );
    let template = write_template(dir.path(), &notice_body());
    let out = dir.path().join("notices");

    let report = generate_notices(&data, &template, NoticeOptions::new().with_output_dir(&out)).unwrap();

    assert_eq!(report.groups.len(), 1);
    assert!(report.is_success());
    let lines: Vec<usize> = report.rejected.iter().map(|r| r.record.line).collect();
    assert_eq!(lines, vec![3, 4]);
    assert_eq!(report.rejected_sample(), vec!["NOTACODE", "HDFC0005678"]);
}

#[test]
fn test_urgent_tone_emphasis() {
    let options = NoticeOptions::default().with_tone(Tone::Urgent);
    let assembler = NoticeAssembler::new(build_docx(&notice_body()), options).unwrap();
    let mut group = noticegen::OrganizationGroup::new("HDFC BANK", "HDFC");
    group.records.push(AccountRecord::new("1", "A", "HDFC0005678"));

    let (doc, _) = assembler.build_notice(&group).unwrap();
    let (_, heading) = doc.body_paragraphs().next().unwrap();
    let run = RunFormat::from_run(heading.child("r").unwrap());
    assert_eq!(run.color.as_deref(), Some("990000"));
    assert_eq!(run.bold, Some(true));
    // the original font is kept
    assert_eq!(run.font_name.as_deref(), Some("Times New Roman"));
}

#[test]
fn test_unknown_prefix_gets_synthesized_name() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_csv(
        dir.path(),
        "Account No,Account Name,IFSC\n77,Zed,ZZZZ0001111\n",
    );
    let template = write_template(dir.path(), &notice_body());
    let out = dir.path().join("notices");

    let report = generate_notices(&data, &template, NoticeOptions::new().with_output_dir(&out)).unwrap();
    assert_eq!(report.groups[0].org_name, "ZZZZ BANK");
    assert!(out.join("Notice_ZZZZ BANK_ZZZZ0001111.docx").is_file());
}
