//! Importação de tarefas a partir de folhas de cálculo.
//!
//! Pipeline por linha: colunas -> validação -> data -> duplicados -> gravação.
//! Erros de linha acumulam numa lista; só erros do ficheiro inteiro abortam.

pub mod columns;
pub mod dates;
pub mod duplicates;
pub mod error;
pub mod fields;
pub mod orchestrator;
pub mod row;
pub mod spreadsheet;
pub mod store;

pub use orchestrator::{import_spreadsheet, ImportOptions, ImportSummary};
pub use store::ImportStore;
