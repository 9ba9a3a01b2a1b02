// src/import/columns.rs
use crate::import::row::{CellValue, ImportRow};

/// Campos canónicos de uma tarefa que podem vir de uma coluna da folha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Title,
    Subject,
    DueDate,
    Description,
    Priority,
    Teacher,
    Status,
    Progress,
}

/// Sinónimos aceites para cada campo, pela ordem de precedência.
pub const COLUMN_SYNONYMS: &[(CanonicalField, &[&str])] = &[
    (
        CanonicalField::Title,
        &[
            "Title", "title", "TITLE", "Assignment", "assignment", "ASSIGNMENT", "Task", "task",
            "TASK", "Name", "name", "NAME",
        ],
    ),
    (
        CanonicalField::Subject,
        &[
            "Subject", "subject", "SUBJECT", "Course", "course", "COURSE", "Class", "class",
            "CLASS",
        ],
    ),
    (
        CanonicalField::DueDate,
        &[
            "Due Date", "DueDate", "due date", "dueDate", "DUE_DATE", "DUE Date", "Due", "due",
            "DUE", "Date", "date", "DATE", "Deadline", "deadline", "DEADLINE",
        ],
    ),
    (
        CanonicalField::Description,
        &[
            "Description", "description", "DESCRIPTION", "Details", "details", "DETAILS", "Notes",
            "notes", "NOTES", "Instructions", "instructions", "INSTRUCTIONS",
        ],
    ),
    (
        CanonicalField::Priority,
        &["Priority", "priority", "PRIORITY", "Importance", "importance", "IMPORTANCE"],
    ),
    (
        CanonicalField::Teacher,
        &[
            "Teacher", "teacher", "TEACHER", "Instructor", "instructor", "INSTRUCTOR", "Professor",
            "professor", "PROFESSOR",
        ],
    ),
    (CanonicalField::Status, &["Status", "status", "STATUS"]),
    (CanonicalField::Progress, &["Progress", "progress", "PROGRESS"]),
];

pub const DEFAULT_PRIORITY: &str = "medium";
pub const DEFAULT_STATUS: &str = "pending";

pub fn synonyms_for(field: CanonicalField) -> &'static [&'static str] {
    COLUMN_SYNONYMS
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, synonyms)| *synonyms)
        .unwrap_or(&[])
}

/// Primeira célula não vazia entre os sinónimos do campo.
pub fn lookup(row: &ImportRow, field: CanonicalField) -> Option<&CellValue> {
    synonyms_for(field)
        .iter()
        .filter_map(|header| row.get(header))
        .find(|value| !value.is_blank())
}

/// Linha com os campos já resolvidos, mas ainda por validar.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRow {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub due_date: Option<CellValue>,
    pub description: String,
    pub priority: String,
    pub teacher: String,
    pub status: String,
    pub progress: CellValue,
}

pub fn map_row(row: &ImportRow) -> MappedRow {
    let text = |field| lookup(row, field).map(CellValue::as_text);

    MappedRow {
        title: text(CanonicalField::Title),
        subject: text(CanonicalField::Subject),
        due_date: lookup(row, CanonicalField::DueDate).cloned(),
        description: text(CanonicalField::Description).unwrap_or_default(),
        priority: text(CanonicalField::Priority).unwrap_or_else(|| DEFAULT_PRIORITY.to_string()),
        teacher: text(CanonicalField::Teacher).unwrap_or_default(),
        status: text(CanonicalField::Status).unwrap_or_else(|| DEFAULT_STATUS.to_string()),
        progress: lookup(row, CanonicalField::Progress)
            .cloned()
            .unwrap_or(CellValue::Number(0.0)),
    }
}
