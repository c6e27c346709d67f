//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

pub const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

pub const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

pub const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image1.png"/></Relationships>"#;

pub const CORE_PROPS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>Freeze notice</dc:title></cp:coreProperties>"#;

/// Bytes standing in for an embedded image.
pub const IMAGE_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3, 4];

pub const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri"/><w:sz w:val="22"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style><w:style w:type="paragraph" w:styleId="Heading3"><w:name w:val="heading 3"/><w:basedOn w:val="Normal"/><w:pPr><w:keepNext/><w:spacing w:before="40"/></w:pPr><w:rPr><w:rFonts w:ascii="Cambria" w:hAnsi="Cambria"/><w:b/><w:sz w:val="24"/></w:rPr></w:style></w:styles>"#;

/// Header row of the accounts table with explicit widths.
pub const ACCOUNTS_HEADER: &str = r#"<w:tr><w:tc><w:tcPr><w:tcW w:w="2000" w:type="dxa"/></w:tcPr><w:p><w:r><w:t>Account Number</w:t></w:r></w:p></w:tc><w:tc><w:tcPr><w:tcW w:w="4000" w:type="dxa"/></w:tcPr><w:p><w:r><w:t>Account Holder Name</w:t></w:r></w:p></w:tc><w:tc><w:tcPr><w:tcW w:w="3000" w:type="dxa"/></w:tcPr><w:p><w:r><w:t>IFSC Code</w:t></w:r></w:p></w:tc></w:tr>"#;

/// A stale data row left in the template.
pub const STALE_ROW: &str = r#"<w:tr><w:tc><w:p><w:pPr><w:spacing w:before="0" w:after="0"/></w:pPr><w:r><w:t>999</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>Old Holder</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>ICIC0000000</w:t></w:r></w:p></w:tc></w:tr>"#;

/// A complete notice template body.
pub fn notice_body() -> String {
    format!(
        concat!(
            r#"<w:p><w:r><w:rPr><w:rFonts w:ascii="Times New Roman" w:hAnsi="Times New Roman"/><w:b/><w:sz w:val="24"/></w:rPr><w:t>NOTICE UNDER SECTION 102</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t xml:space="preserve">To, The Manager, </w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>ICICI</w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve"> BANK</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>Dear ICICI BANK customer</w:t></w:r></w:p>"#,
            r#"<w:tbl><w:tblPr><w:tblStyle w:val="TableGrid"/></w:tblPr><w:tblGrid><w:gridCol w:w="2000"/><w:gridCol w:w="4000"/><w:gridCol w:w="3000"/></w:tblGrid>{header}{stale}{stale}</w:tbl>"#,
            r#"<w:p><w:r><w:t>Kindly cooperate with the investigation.</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>NODAL OFFICER</w:t></w:r></w:p>"#,
            r#"<w:p><w:pPr><w:pStyle w:val="Heading3"/></w:pPr><w:r><w:t>ICICI BANK</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:drawing/></w:r></w:p>"#,
            r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:left="1440" w:right="1440"/></w:sectPr>"#,
        ),
        header = ACCOUNTS_HEADER,
        stale = STALE_ROW,
    )
}

/// A template body without any accounts table.
pub fn tableless_body() -> String {
    concat!(
        r#"<w:p><w:r><w:t>Dear ICICI BANK customer</w:t></w:r></w:p>"#,
        r#"<w:p><w:r><w:t>NODAL OFFICER</w:t></w:r></w:p>"#,
        r#"<w:p><w:r><w:t>ICICI BANK</w:t></w:r></w:p>"#,
    )
    .to_string()
}

pub fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{W_NS}"><w:body>{body}</w:body></w:document>"#
    )
}

/// Build a `.docx` package with the given body and the shared parts.
pub fn build_docx(body: &str) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    let document = document_xml(body);
    let parts: [(&str, &[u8]); 7] = [
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("_rels/.rels", PACKAGE_RELS.as_bytes()),
        ("docProps/core.xml", CORE_PROPS.as_bytes()),
        ("word/document.xml", document.as_bytes()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS.as_bytes()),
        ("word/styles.xml", STYLES.as_bytes()),
        ("word/media/image1.png", IMAGE_BYTES),
    ];
    for (name, data) in parts {
        zip.start_file(name, options).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

pub fn write_template(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("template.docx");
    fs::write(&path, build_docx(body)).unwrap();
    path
}

pub fn write_csv(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("accounts.csv");
    fs::write(&path, contents).unwrap();
    path
}

/// Cell texts of every data row of the accounts table.
pub fn data_rows(doc: &noticegen::Document) -> Vec<Vec<String>> {
    let table = noticegen::find_accounts_table(doc.body()).expect("accounts table");
    noticegen::table::data_rows(table)
        .map(|row| row.children_named("tc").map(|c| c.plain_text()).collect())
        .collect()
}
