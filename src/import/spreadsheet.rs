// src/import/spreadsheet.rs
use crate::import::{
    error::SpreadsheetError,
    row::{CellValue, ImportRow},
};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Cursor;

pub const ACCEPTED_EXTENSIONS: &[&str] = &[".xlsx", ".xls", ".csv"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetKind {
    Csv,
    Workbook,
}

impl SpreadsheetKind {
    /// Decide pelo sufixo do nome (sem distinguir maiúsculas).
    pub fn from_filename(filename: &str) -> Result<Self, SpreadsheetError> {
        let lower = filename.trim().to_lowercase();
        match ACCEPTED_EXTENSIONS.iter().find(|ext| lower.ends_with(**ext)) {
            Some(&".csv") => Ok(SpreadsheetKind::Csv),
            Some(_) => Ok(SpreadsheetKind::Workbook),
            None => Err(SpreadsheetError::UnsupportedExtension(filename.to_string())),
        }
    }
}

pub fn is_accepted_filename(filename: &str) -> bool {
    SpreadsheetKind::from_filename(filename).is_ok()
}

/// Lê a primeira folha: primeira linha = cabeçalhos, linhas vazias ignoradas.
pub fn read_rows(filename: &str, bytes: &[u8]) -> Result<Vec<ImportRow>, SpreadsheetError> {
    let rows = match SpreadsheetKind::from_filename(filename)? {
        SpreadsheetKind::Csv => read_csv(bytes)?,
        SpreadsheetKind::Workbook => read_workbook(bytes)?,
    };
    tracing::debug!("'{}': {} linhas com dados", filename, rows.len());
    Ok(rows)
}

fn read_csv(bytes: &[u8]) -> Result<Vec<ImportRow>, SpreadsheetError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    while reader.read_record(&mut record)? {
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(rows.len() + 2);

        let mut row = ImportRow::new(line);
        for (header, field) in headers.iter().zip(record.iter()) {
            let field = field.trim();
            if header.is_empty() || field.is_empty() {
                continue;
            }
            row.insert(header.as_str(), csv_cell(field));
        }
        if !row.is_empty() {
            rows.push(row);
        }
    }
    Ok(rows)
}

// Campos puramente numéricos passam a número, como nas células Excel
fn csv_cell(field: &str) -> CellValue {
    if looks_numeric(field) {
        if let Ok(n) = field.parse::<f64>() {
            if n.is_finite() {
                return CellValue::Number(n);
            }
        }
    }
    CellValue::Text(field.to_string())
}

fn looks_numeric(field: &str) -> bool {
    let has_digit = field.bytes().any(|b| b.is_ascii_digit());
    let charset_ok = field
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'));
    // "007" é um código, não um número
    let leading_zero = field.len() > 1 && field.starts_with('0') && !field.starts_with("0.");
    has_digit && charset_ok && !leading_zero
}

fn read_workbook(bytes: &[u8]) -> Result<Vec<ImportRow>, SpreadsheetError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let first_sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(SpreadsheetError::NoSheets)?;
    let range = workbook.worksheet_range(&first_sheet)?;

    let first_line = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);
    let mut sheet_rows = range.rows();
    let Some(header_cells) = sheet_rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_cells
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, cells) in sheet_rows.enumerate() {
        let mut row = ImportRow::new(first_line + idx + 1);
        for (header, cell) in headers.iter().zip(cells.iter()) {
            if header.is_empty() {
                continue;
            }
            if let Some(value) = workbook_cell(cell) {
                row.insert(header.as_str(), value);
            }
        }
        if !row.is_empty() {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn workbook_cell(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| CellValue::Text(s.to_string()))
        }
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Bool(b) => Some(CellValue::Text(b.to_string())),
        // Datas Excel continuam como número de série
        Data::DateTime(dt) => Some(CellValue::Number(dt.as_f64())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn extension_check_ignores_case() {
        let cases = vec![
            ("tarefas.csv", Some(SpreadsheetKind::Csv)),
            ("TAREFAS.XLSX", Some(SpreadsheetKind::Workbook)),
            ("antigo.Xls", Some(SpreadsheetKind::Workbook)),
            ("notas.txt", None),
            ("csv", None),
            ("", None),
        ];
        for (name, expected) in cases {
            assert_eq!(SpreadsheetKind::from_filename(name).ok(), expected, "ficheiro {:?}", name);
        }
        assert!(matches!(
            read_rows("notas.pdf", b"x"),
            Err(SpreadsheetError::UnsupportedExtension(_))
        ));
    }

    #[test]
    fn csv_rows_keep_sheet_line_numbers() {
        let data = "\u{feff}Title, Subject ,Due Date,Progress\n\
                    Ensaio,English,2024-03-15,40\n\
                    ,,,\n\
                    Teste,Science,45000,\n";
        let rows = read_rows("t.csv", data.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].get("Title"), Some(&text("Ensaio")));
        assert_eq!(rows[0].get("Subject"), Some(&text("English")));
        assert_eq!(rows[0].get("Due Date"), Some(&text("2024-03-15")));
        assert_eq!(rows[0].get("Progress"), Some(&CellValue::Number(40.0)));

        assert_eq!(rows[1].line, 4);
        assert_eq!(rows[1].get("Due Date"), Some(&CellValue::Number(45000.0)));
        assert_eq!(rows[1].get("Progress"), None);
    }

    #[test]
    fn csv_short_rows_and_codes() {
        let data = "Title,Subject,Due Date\nAgente 007,History\n007,Science,03/15/2024\n";
        let rows = read_rows("t.csv", data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Due Date"), None);
        assert_eq!(rows[1].get("Title"), Some(&text("007")));
        assert_eq!(rows[1].get("Due Date"), Some(&text("03/15/2024")));
    }

    #[test]
    fn empty_csv_has_no_rows() {
        assert!(read_rows("vazio.csv", b"").unwrap().is_empty());
        assert!(read_rows("so_cabecalho.csv", b"Title,Subject\n").unwrap().is_empty());
    }

    #[test]
    fn reads_first_sheet_of_workbook() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Assignment").unwrap();
        sheet.write_string(0, 1, "Course").unwrap();
        sheet.write_string(0, 2, "Deadline").unwrap();
        sheet.write_string(1, 0, "Relatório").unwrap();
        sheet.write_string(1, 1, "Science").unwrap();
        sheet.write_number(1, 2, 45000.0).unwrap();
        // linha 3 fica vazia
        sheet.write_string(3, 0, "Leitura").unwrap();
        sheet.write_string(3, 1, "English").unwrap();
        sheet.write_string(3, 2, "2024-04-01").unwrap();
        let other = workbook.add_worksheet();
        other.write_string(0, 0, "Ignorada").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let rows = read_rows("tarefas.xlsx", &bytes).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].get("Assignment"), Some(&text("Relatório")));
        assert_eq!(rows[0].get("Deadline"), Some(&CellValue::Number(45000.0)));
        assert_eq!(rows[1].line, 4);
        assert_eq!(rows[1].get("Course"), Some(&text("English")));
    }

    #[test]
    fn garbage_workbook_is_an_error() {
        let result = read_rows("estragado.xlsx", b"isto nao e um zip");
        assert!(matches!(result, Err(SpreadsheetError::Workbook(_))));
    }
}
