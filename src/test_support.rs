// Shared fixtures for in-crate tests.

use crate::load::RawTable;
use crate::normalize::{normalize, CaseTable};
use anyhow::Result;
use std::io::{Cursor, Write};
use tempfile::NamedTempFile;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use zip::write::FileOptions;
use zip::CompressionMethod;

pub(crate) fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,casedash=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Cell kinds the fixture workbook knows how to write.
#[derive(Debug, Clone, Copy)]
pub(crate) enum FixtureCell<'a> {
    Text(&'a str),
    Number(f64),
    /// Excel serial number formatted with the built-in `dd/mm/yyyy` style.
    Date(f64),
    Empty,
}

/// Builds a small but structurally real `.xlsx` file for the workbook reader.
pub(crate) struct WorkbookFixture<'a> {
    sheets: Vec<(&'a str, Vec<Vec<FixtureCell<'a>>>)>,
}

impl<'a> WorkbookFixture<'a> {
    pub(crate) fn new() -> Self {
        Self { sheets: Vec::new() }
    }

    pub(crate) fn sheet(mut self, name: &'a str, rows: Vec<Vec<FixtureCell<'a>>>) -> Self {
        self.sheets.push((name, rows));
        self
    }

    pub(crate) fn write(&self) -> Result<NamedTempFile> {
        let mut shared: Vec<String> = Vec::new();
        let mut sheet_xml = Vec::new();
        for (_, rows) in &self.sheets {
            sheet_xml.push(worksheet_xml(rows, &mut shared));
        }

        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options: FileOptions<'_, ()> =
                FileOptions::default().compression_method(CompressionMethod::Deflated);

            zip.start_file("[Content_Types].xml", options)?;
            zip.write_all(self.content_types_xml().as_bytes())?;
            zip.start_file("_rels/.rels", options)?;
            zip.write_all(ROOT_RELS_XML.as_bytes())?;
            zip.start_file("xl/workbook.xml", options)?;
            zip.write_all(self.workbook_xml().as_bytes())?;
            zip.start_file("xl/_rels/workbook.xml.rels", options)?;
            zip.write_all(self.rels_xml().as_bytes())?;
            zip.start_file("xl/sharedStrings.xml", options)?;
            zip.write_all(shared_strings_xml(&shared).as_bytes())?;
            zip.start_file("xl/styles.xml", options)?;
            zip.write_all(STYLES_XML.as_bytes())?;
            for (idx, xml) in sheet_xml.iter().enumerate() {
                zip.start_file(format!("xl/worksheets/sheet{}.xml", idx + 1), options)?;
                zip.write_all(xml.as_bytes())?;
            }
            zip.finish()?;
        }

        let mut tmp = tempfile::Builder::new().suffix(".xlsx").tempfile()?;
        tmp.write_all(&buf)?;
        tmp.flush()?;
        Ok(tmp)
    }

    fn content_types_xml(&self) -> String {
        let overrides: String = (1..=self.sheets.len())
            .map(|n| {
                format!(
                    r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                    n
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>{}</Types>"#,
            overrides
        )
    }

    fn workbook_xml(&self) -> String {
        let sheets: String = self
            .sheets
            .iter()
            .enumerate()
            .map(|(idx, (name, _))| {
                format!(
                    r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                    escape(name),
                    idx + 1,
                    idx + 1
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{}</sheets></workbook>"#,
            sheets
        )
    }

    fn rels_xml(&self) -> String {
        let rels: String = (1..=self.sheets.len())
            .map(|n| {
                format!(
                    r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                    n, n
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
            rels
        )
    }
}

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><cellXfs count="2"><xf numFmtId="0"/><xf numFmtId="14" applyNumberFormat="1"/></cellXfs></styleSheet>"#;

fn worksheet_xml(rows: &[Vec<FixtureCell<'_>>], shared: &mut Vec<String>) -> String {
    let mut body = String::new();
    for (r, row) in rows.iter().enumerate() {
        body.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, cell) in row.iter().enumerate() {
            let reference = format!("{}{}", column_letters(c), r + 1);
            match cell {
                FixtureCell::Text(s) => {
                    let idx = match shared.iter().position(|x| x == s) {
                        Some(idx) => idx,
                        None => {
                            shared.push(s.to_string());
                            shared.len() - 1
                        }
                    };
                    body.push_str(&format!(r#"<c r="{}" t="s"><v>{}</v></c>"#, reference, idx));
                }
                FixtureCell::Number(n) => {
                    body.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, n))
                }
                FixtureCell::Date(n) => {
                    body.push_str(&format!(r#"<c r="{}" s="1"><v>{}</v></c>"#, reference, n))
                }
                FixtureCell::Empty => {}
            }
        }
        body.push_str("</row>");
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
        body
    )
}

fn shared_strings_xml(shared: &[String]) -> String {
    let items: String = shared
        .iter()
        .map(|s| format!(r#"<si><t xml:space="preserve">{}</t></si>"#, escape(s)))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{n}" uniqueCount="{n}">{}</sst>"#,
        items,
        n = shared.len()
    )
}

fn column_letters(mut idx: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push((b'A' + (idx % 26) as u8) as char);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    letters.iter().rev().collect()
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Builds a [`RawTable`] from string literals; `None` is an empty cell.
pub(crate) fn raw_table(headers: &[&str], rows: &[&[Option<&str>]]) -> RawTable {
    RawTable {
        headers: headers.iter().map(|h| h.to_string()).collect(),
        rows: rows
            .iter()
            .map(|row| row.iter().map(|c| c.map(str::to_string)).collect())
            .collect(),
    }
}

/// The spreadsheet as court staff export it: Portuguese headers, one duplicated case,
/// a bad date, padded text and literal "nan"/"None" strings.
pub(crate) fn sample_raw() -> RawTable {
    raw_table(
        &[
            "Número do Processo",
            "Etiquetas",
            "Prioridade",
            "Data de Distribuição",
            "Local de Ocorrência",
            "Bairro/Localidade",
            "Órgão Julgador",
        ],
        &[
            &[
                Some("0800123-45.2021.8.18.0055"),
                Some("Medida Protetiva"),
                Some("Alta"),
                Some("15/03/2021"),
                Some("Zona Urbana - Inhuma"),
                Some("Centro"),
                Some("Vara Única"),
            ],
            &[
                Some("0800456-12.2022.8.18.0055"),
                None,
                Some("Normal"),
                Some("02/11/2022"),
                Some("Zona Rural - Inhuma"),
                Some("Povoado Bom Jesus"),
                Some("Vara Única"),
            ],
            &[
                Some("0800789-33.2022.8.18.0055"),
                Some("Inquérito"),
                Some("Alta"),
                Some("20/11/2022"),
                Some("Zona Urbana - Lagoa do Sítio"),
                Some("Centro"),
                Some("Vara Única"),
            ],
            &[
                Some("0800123-45.2021.8.18.0055"),
                Some("Duplicada"),
                Some("Normal"),
                Some("16/03/2021"),
                Some("Zona Rural - Inhuma"),
                Some("Centro"),
                Some("Vara Única"),
            ],
            &[
                Some("0800999-01.2023.8.18.0055"),
                None,
                Some("  Alta "),
                Some("not a date"),
                Some("Zona Urbana"),
                None,
                None,
            ],
            &[
                Some("0801000-77.2023.8.18.0055"),
                Some("nan"),
                Some("None"),
                Some("05/01/2023"),
                None,
                Some("Centro"),
                None,
            ],
        ],
    )
}

pub(crate) fn sample_cases() -> CaseTable {
    normalize(sample_raw()).expect("sample table normalizes")
}
