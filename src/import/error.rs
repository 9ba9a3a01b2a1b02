// src/import/error.rs
use thiserror::Error;

/// Motivos para uma linha não ser importada. Nunca abortam a importação.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("campos obrigatórios em falta: Title=\"{title}\", Subject=\"{subject}\", DueDate=\"{due_date}\"")]
    MissingRequiredField {
        title: String,
        subject: String,
        due_date: String,
    },

    #[error("formato de data inválido para a tarefa \"{title}\": {raw}")]
    InvalidDate { title: String, raw: String },

    #[error("tarefa duplicada ignorada: {title} ({subject})")]
    DuplicateRow { title: String, subject: String },

    #[error("erro ao processar a tarefa: {0}")]
    RowProcessing(String),
}

impl RowError {
    /// Duplicados são informativos, não falhas.
    pub fn is_informational(&self) -> bool {
        matches!(self, RowError::DuplicateRow { .. })
    }
}

/// Erros ao ler o ficheiro inteiro.
#[derive(Debug, Error)]
pub enum SpreadsheetError {
    #[error("extensão de ficheiro não suportada: '{0}'")]
    UnsupportedExtension(String),

    #[error("CSV ilegível: {0}")]
    Csv(#[from] csv::Error),

    #[error("livro Excel ilegível: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("o livro não tem folhas")]
    NoSheets,
}
