// src/import/fields.rs
use crate::{
    import::{columns::MappedRow, error::RowError, row::CellValue},
    models::assignment::{NewAssignment, Priority, Status},
};
use chrono::{DateTime, Utc};

pub const MIN_PROGRESS: i64 = 0;
pub const MAX_PROGRESS: i64 = 100;

/// Linha com os campos obrigatórios presentes e os vocabulários normalizados.
/// A data de entrega ainda está em bruto.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRow {
    pub title: String,
    pub subject: String,
    pub due_date: CellValue,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: Status,
    pub progress: i64,
    pub teacher: Option<String>,
}

impl ValidatedRow {
    pub fn into_new_assignment(self, user_id: &str, due_date: DateTime<Utc>) -> NewAssignment {
        NewAssignment {
            user_id: user_id.to_string(),
            title: self.title,
            description: self.description,
            subject: self.subject,
            due_date,
            priority: self.priority,
            status: self.status,
            progress: self.progress,
            teacher: self.teacher,
        }
    }
}

pub fn validate(mapped: MappedRow) -> Result<ValidatedRow, RowError> {
    let title = non_empty(mapped.title.as_deref());
    let subject = non_empty(mapped.subject.as_deref());
    let due_date = mapped.due_date.clone().filter(|v| !v.is_blank());

    let (Some(title), Some(subject), Some(due_date)) = (title, subject, due_date) else {
        return Err(RowError::MissingRequiredField {
            title: mapped.title.unwrap_or_default(),
            subject: mapped.subject.unwrap_or_default(),
            due_date: mapped.due_date.map(|v| v.as_text()).unwrap_or_default(),
        });
    };

    Ok(ValidatedRow {
        title,
        subject,
        due_date,
        description: non_empty(Some(mapped.description.as_str())),
        priority: normalize_priority(&mapped.priority),
        status: normalize_status(&mapped.status),
        progress: normalize_progress(&mapped.progress),
        teacher: non_empty(Some(mapped.teacher.as_str())),
    })
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Vocabulário exato primeiro; depois inferência por palavras; senão `medium`.
pub fn normalize_priority(raw: &str) -> Priority {
    let value = raw.trim().to_lowercase();
    match value.as_str() {
        "low" => Priority::Low,
        "medium" => Priority::Medium,
        "high" => Priority::High,
        v if v.contains("high") || v.contains("urgent") || v == "3" => Priority::High,
        v if v.contains("low") || v == "1" => Priority::Low,
        _ => Priority::Medium,
    }
}

pub fn normalize_status(raw: &str) -> Status {
    let value = raw.trim().to_lowercase();
    match value.as_str() {
        "pending" => Status::Pending,
        "in-progress" => Status::InProgress,
        "completed" => Status::Completed,
        v if v.contains("complete") || v.contains("done") || v.contains("finished") => {
            Status::Completed
        }
        v if v.contains("progress") || v.contains("working") || v.contains("started") => {
            Status::InProgress
        }
        _ => Status::Pending,
    }
}

/// Inteiro em `[0, 100]`; 0 quando não há número.
pub fn normalize_progress(value: &CellValue) -> i64 {
    let parsed = match value {
        CellValue::Number(n) if n.is_finite() => Some(n.trunc() as i64),
        CellValue::Number(_) => None,
        CellValue::Text(s) => parse_leading_int(s),
    };
    parsed.unwrap_or(0).clamp(MIN_PROGRESS, MAX_PROGRESS)
}

// Lê o inteiro no início do texto ("45%" -> 45, "12.7" -> 12)
fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits: &str = &rest[..rest.bytes().take_while(u8::is_ascii_digit).count()];
    if digits.is_empty() {
        return None;
    }
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}
