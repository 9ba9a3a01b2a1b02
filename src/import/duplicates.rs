// src/import/duplicates.rs
use crate::models::assignment::{Assignment, NewAssignment};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DuplicateKey {
    title: String,
    subject: String,
    // Dia civil (UTC) da entrega; a hora é ignorada
    day: NaiveDate,
}

impl DuplicateKey {
    fn new(title: &str, subject: &str, due_date: DateTime<Utc>) -> Self {
        Self {
            title: title.to_string(),
            subject: subject.to_string(),
            day: due_date.date_naive(),
        }
    }
}

/// Índice em memória (título, disciplina, dia) das tarefas já existentes.
/// Carregado uma vez por importação e atualizado a cada tarefa criada.
#[derive(Debug, Default)]
pub struct DuplicateIndex {
    keys: HashSet<DuplicateKey>,
}

impl DuplicateIndex {
    pub fn from_assignments(existing: &[Assignment]) -> Self {
        let keys = existing
            .iter()
            .map(|a| DuplicateKey::new(&a.title, &a.subject, a.due_date))
            .collect();
        Self { keys }
    }

    pub fn is_duplicate(&self, candidate: &NewAssignment) -> bool {
        self.keys
            .contains(&DuplicateKey::new(&candidate.title, &candidate.subject, candidate.due_date))
    }

    pub fn record(&mut self, assignment: &Assignment) {
        self.keys
            .insert(DuplicateKey::new(&assignment.title, &assignment.subject, assignment.due_date));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignment::{Priority, Status};
    use chrono::TimeZone;

    fn existing(title: &str, subject: &str, due_date: DateTime<Utc>) -> Assignment {
        Assignment {
            id: "id".into(),
            user_id: "default".into(),
            title: title.into(),
            description: None,
            subject: subject.into(),
            due_date,
            priority: Priority::Medium,
            status: Status::Pending,
            progress: 0,
            teacher: None,
            created_at: due_date,
            updated_at: due_date,
        }
    }

    fn candidate(title: &str, subject: &str, due_date: DateTime<Utc>) -> NewAssignment {
        NewAssignment {
            user_id: "default".into(),
            title: title.into(),
            description: None,
            subject: subject.into(),
            due_date,
            priority: Priority::Medium,
            status: Status::Pending,
            progress: 0,
            teacher: None,
        }
    }

    #[test]
    fn same_day_ignores_time_of_day() {
        let morning = Utc.with_ymd_and_hms(2024, 3, 15, 8, 0, 0).unwrap();
        let night = Utc.with_ymd_and_hms(2024, 3, 15, 23, 59, 0).unwrap();
        let index = DuplicateIndex::from_assignments(&[existing("Ensaio", "English", morning)]);

        assert!(index.is_duplicate(&candidate("Ensaio", "English", night)));
    }

    #[test]
    fn any_differing_key_part_is_not_a_duplicate() {
        let due = Utc.with_ymd_and_hms(2024, 3, 15, 8, 0, 0).unwrap();
        let index = DuplicateIndex::from_assignments(&[existing("Ensaio", "English", due)]);

        let cases = vec![
            candidate("ensaio", "English", due),
            candidate("Ensaio ", "English", due),
            candidate("Ensaio", "History", due),
            candidate("Ensaio", "English", due + chrono::Duration::days(1)),
        ];
        for c in cases {
            assert!(!index.is_duplicate(&c), "{:?}", c);
        }
    }

    #[test]
    fn recorded_assignments_are_seen() {
        let due = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();
        let mut index = DuplicateIndex::default();
        assert!(!index.is_duplicate(&candidate("Teste", "Science", due)));

        index.record(&existing("Teste", "Science", due));
        assert!(index.is_duplicate(&candidate("Teste", "Science", due)));
    }
}
