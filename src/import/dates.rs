// src/import/dates.rs
use crate::import::row::CellValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

/// Número de série de 1970-01-01 no sistema de datas das folhas (época 1899-12-30).
pub const SERIAL_UNIX_EPOCH: f64 = 25569.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

static SLASH_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("regex de data com barras"));
static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").expect("regex de data ISO"));

// Formatos tentados pelo parser genérico, antes dos padrões com barras
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%a %b %d %Y",
    "%A, %B %d, %Y",
];

/// Como interpretar `NN/NN/AAAA`. Por omissão mês/dia/ano.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlashDateOrder {
    #[default]
    MonthFirst,
    DayFirst,
}

impl FromStr for SlashDateOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mdy" | "month-first" | "us" => Ok(SlashDateOrder::MonthFirst),
            "dmy" | "day-first" => Ok(SlashDateOrder::DayFirst),
            other => Err(format!("SLASH_DATE_ORDER desconhecido: '{}' (use mdy ou dmy)", other)),
        }
    }
}

/// Converte um número de série da folha num instante UTC.
pub fn serial_to_datetime(serial: f64) -> Option<DateTime<Utc>> {
    if !serial.is_finite() {
        return None;
    }
    let seconds = ((serial - SERIAL_UNIX_EPOCH) * SECONDS_PER_DAY).round();
    DateTime::from_timestamp(seconds as i64, 0)
}

/// Normaliza o valor da coluna de entrega.
/// `None` quando nenhuma interpretação dá uma data válida.
pub fn normalize_due_date(value: &CellValue, order: SlashDateOrder) -> Option<DateTime<Utc>> {
    match value {
        CellValue::Number(serial) => serial_to_datetime(*serial),
        CellValue::Text(raw) => {
            let clean = raw.trim();
            if clean.is_empty() {
                return None;
            }
            parse_generic(clean).or_else(|| parse_patterns(clean, order))
        }
    }
}

fn parse_generic(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.and_utc());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .map(midnight_utc)
}

fn parse_patterns(s: &str, order: SlashDateOrder) -> Option<DateTime<Utc>> {
    if let Some(caps) = SLASH_DATE.captures(s) {
        let first: u32 = caps[1].parse().ok()?;
        let second: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        let (month, day) = match order {
            SlashDateOrder::MonthFirst => (first, second),
            SlashDateOrder::DayFirst => (second, first),
        };
        return NaiveDate::from_ymd_opt(year, month, day).map(midnight_utc);
    }

    if let Some(caps) = ISO_DATE.captures(s) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day).map(midnight_utc);
    }

    None
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn ymd(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn serial_numbers_use_the_1899_epoch() {
        assert_eq!(serial_to_datetime(SERIAL_UNIX_EPOCH), Some(ymd(1970, 1, 1)));
        assert_eq!(serial_to_datetime(45000.0), Some(ymd(2023, 3, 15)));
        assert_eq!(
            serial_to_datetime(45000.5),
            Some(Utc.with_ymd_and_hms(2023, 3, 15, 12, 0, 0).unwrap())
        );
        assert_eq!(serial_to_datetime(f64::NAN), None);
        assert_eq!(serial_to_datetime(f64::INFINITY), None);
    }

    #[test]
    fn parses_text_layouts() {
        let cases = vec![
            ("2024-03-15", ymd(2024, 3, 15)),
            ("2024-3-5", ymd(2024, 3, 5)),
            ("03/15/2024", ymd(2024, 3, 15)),
            ("3/5/2024", ymd(2024, 3, 5)),
            ("2024/03/15", ymd(2024, 3, 15)),
            ("March 15, 2024", ymd(2024, 3, 15)),
            ("15 Mar 2024", ymd(2024, 3, 15)),
            ("  2024-03-15  ", ymd(2024, 3, 15)),
            ("2024-03-15T23:59:00Z", Utc.with_ymd_and_hms(2024, 3, 15, 23, 59, 0).unwrap()),
            ("2024-03-15 08:30", Utc.with_ymd_and_hms(2024, 3, 15, 8, 30, 0).unwrap()),
        ];

        for (input, expected) in cases {
            assert_eq!(
                normalize_due_date(&text(input), SlashDateOrder::MonthFirst),
                Some(expected),
                "entrada {:?}",
                input
            );
        }
    }

    #[test]
    fn rejects_invalid_dates() {
        let cases = vec!["amanhã", "2024-02-30", "13/13/2024", "02/30/2024", "", "   "];
        for input in cases {
            assert_eq!(
                normalize_due_date(&text(input), SlashDateOrder::MonthFirst),
                None,
                "entrada {:?}",
                input
            );
        }
    }

    #[test]
    fn slash_order_is_configurable() {
        let value = text("04/03/2024");
        assert_eq!(normalize_due_date(&value, SlashDateOrder::MonthFirst), Some(ymd(2024, 4, 3)));
        assert_eq!(normalize_due_date(&value, SlashDateOrder::DayFirst), Some(ymd(2024, 3, 4)));

        // Dia > 12 só é válido numa das ordens
        let day_first = text("25/12/2024");
        assert_eq!(normalize_due_date(&day_first, SlashDateOrder::MonthFirst), None);
        assert_eq!(
            normalize_due_date(&day_first, SlashDateOrder::DayFirst),
            Some(ymd(2024, 12, 25))
        );
    }

    #[test]
    fn order_names_parse() {
        assert_eq!("MDY".parse::<SlashDateOrder>(), Ok(SlashDateOrder::MonthFirst));
        assert_eq!("day-first".parse::<SlashDateOrder>(), Ok(SlashDateOrder::DayFirst));
        assert!("ymd".parse::<SlashDateOrder>().is_err());
    }
}
