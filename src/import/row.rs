// src/import/row.rs
use std::{collections::HashMap, fmt};

/// Valor de uma célula, depois da conversão folha -> objeto.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl CellValue {
    /// Texto vazio (ou só espaços) conta como célula em branco.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    pub fn as_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            // Inteiros sem casas decimais
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Uma linha da folha, com os cabeçalhos originais como chaves. Não é persistida.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportRow {
    /// Número da linha na folha (1 = cabeçalho)
    pub line: usize,
    cells: HashMap<String, CellValue>,
}

impl ImportRow {
    pub fn new(line: usize) -> Self {
        Self { line, cells: HashMap::new() }
    }

    /// Insere uma célula; cabeçalhos repetidos mantêm a primeira coluna.
    pub fn insert(&mut self, header: impl Into<String>, value: CellValue) {
        self.cells.entry(header.into()).or_insert(value);
    }

    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.cells.get(header)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.values().all(CellValue::is_blank)
    }

    pub fn from_pairs<K, I>(line: usize, pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, CellValue)>,
    {
        let mut row = Self::new(line);
        for (header, value) in pairs {
            row.insert(header, value);
        }
        row
    }
}
