//! Фильтрация записей продаж по набору необязательных критериев.
//!
//! Все активные критерии объединяются через AND. Пустые строки (так приходят
//! незаполненные поля формы) считаются неактивными.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::projections::p900_tobacco_sales::TobaccoSaleDto;

/// Критерии фильтрации реестра продаж
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesFilter {
    /// Подстрока по билету, производителю, станции, покупателю и сорту
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub station: Option<String>,
    #[serde(default)]
    pub buyer: Option<String>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Подстрока по номеру или имени производителя
    #[serde(default)]
    pub grower: Option<String>,
    #[serde(default)]
    pub ticket_no: Option<String>,
    /// Включительно, "YYYY-MM-DD"
    #[serde(default)]
    pub date_from: Option<String>,
    /// Включительно, "YYYY-MM-DD"
    #[serde(default)]
    pub date_to: Option<String>,
}

impl SalesFilter {
    /// Обрезает пробелы и превращает пустые значения в `None`
    pub fn normalized(&self) -> Self {
        Self {
            search: active(&self.search),
            station: active(&self.station),
            buyer: active(&self.buyer),
            grade: active(&self.grade),
            status: active(&self.status),
            grower: active(&self.grower),
            ticket_no: active(&self.ticket_no),
            date_from: active(&self.date_from),
            date_to: active(&self.date_to),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.normalized() == Self::default()
    }

    /// Нижняя граница периода; `None`, если не задана или не разбирается
    pub fn date_from_parsed(&self) -> Option<NaiveDate> {
        active(&self.date_from).and_then(|s| parse_date(&s))
    }

    /// Верхняя граница периода; `None`, если не задана или не разбирается
    pub fn date_to_parsed(&self) -> Option<NaiveDate> {
        active(&self.date_to).and_then(|s| parse_date(&s))
    }

    /// Границы периода, которые заданы, но не являются датой
    pub fn invalid_bounds(&self) -> Vec<String> {
        [&self.date_from, &self.date_to]
            .into_iter()
            .filter_map(active)
            .filter(|s| parse_date(s).is_none())
            .collect()
    }

    /// Проверяет запись по всем активным критериям
    pub fn matches(&self, sale: &TobaccoSaleDto) -> bool {
        self.normalized().matches_normalized(sale)
    }

    /// То же, что `matches`, но фильтр уже нормализован
    fn matches_normalized(&self, sale: &TobaccoSaleDto) -> bool {
        let f = self;

        if let Some(search) = &f.search {
            let needle = search.to_lowercase();
            let haystacks = [
                sale.ticket_no.as_str(),
                sale.grower_no.as_str(),
                sale.grower_name.as_deref().unwrap_or(""),
                sale.station.as_str(),
                sale.buyer.as_str(),
                sale.grade.as_str(),
            ];
            if !haystacks.iter().any(|h| contains_ci(h, &needle)) {
                return false;
            }
        }

        if !eq_ci_opt(&f.station, &sale.station)
            || !eq_ci_opt(&f.buyer, &sale.buyer)
            || !eq_ci_opt(&f.grade, &sale.grade)
            || !eq_ci_opt(&f.status, sale.status_label())
        {
            return false;
        }

        if let Some(grower) = &f.grower {
            let needle = grower.to_lowercase();
            if !contains_ci(&sale.grower_no, &needle)
                && !contains_ci(sale.grower_name.as_deref().unwrap_or(""), &needle)
            {
                return false;
            }
        }

        if let Some(ticket) = &f.ticket_no {
            if !contains_ci(&sale.ticket_no, &ticket.to_lowercase()) {
                return false;
            }
        }

        let from = f.date_from_parsed();
        let to = f.date_to_parsed();
        if from.is_some() || to.is_some() {
            let Some(date) = parse_date(&sale.sale_date) else {
                return false;
            };
            if from.is_some_and(|from| date < from) || to.is_some_and(|to| date > to) {
                return false;
            }
        }

        true
    }

    /// Человекочитаемый список активных критериев (для заголовка отчёта).
    /// Период строится только из разобранных границ, остальные помечаются.
    pub fn describe(&self) -> Vec<String> {
        let f = self.normalized();
        let mut parts = Vec::new();

        let iso = |d: NaiveDate| d.format("%Y-%m-%d").to_string();
        match (f.date_from_parsed(), f.date_to_parsed()) {
            (Some(from), Some(to)) => parts.push(format!("Period: {} — {}", iso(from), iso(to))),
            (Some(from), None) => parts.push(format!("Period: from {}", iso(from))),
            (None, Some(to)) => parts.push(format!("Period: up to {}", iso(to))),
            (None, None) => {}
        }
        for raw in f.invalid_bounds() {
            parts.push(format!("Ignored date bound: \"{}\"", raw));
        }
        if let Some(v) = &f.station {
            parts.push(format!("Station: {}", v));
        }
        if let Some(v) = &f.buyer {
            parts.push(format!("Buyer: {}", v));
        }
        if let Some(v) = &f.grade {
            parts.push(format!("Grade: {}", v));
        }
        if let Some(v) = &f.status {
            parts.push(format!("Status: {}", v));
        }
        if let Some(v) = &f.grower {
            parts.push(format!("Grower contains \"{}\"", v));
        }
        if let Some(v) = &f.ticket_no {
            parts.push(format!("Ticket contains \"{}\"", v));
        }
        if let Some(v) = &f.search {
            parts.push(format!("Search: \"{}\"", v));
        }
        parts
    }
}

/// Фильтрует записи, сохраняя исходный порядок
pub fn filter_records(records: &[TobaccoSaleDto], filter: &SalesFilter) -> Vec<TobaccoSaleDto> {
    let filter = filter.normalized();
    if filter == SalesFilter::default() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|sale| filter.matches_normalized(sale))
        .cloned()
        .collect()
}

/// Разбирает "YYYY-MM-DD" (допускается хвост времени "T...")
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let date_part = value.trim().split('T').next().unwrap_or("");
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn active(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn eq_ci_opt(expected: &Option<String>, actual: &str) -> bool {
    match expected {
        Some(expected) => expected.to_lowercase() == actual.trim().to_lowercase(),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(ticket: &str, date: &str, station: &str, buyer: &str) -> TobaccoSaleDto {
        TobaccoSaleDto {
            id: ticket.to_string(),
            ticket_no: ticket.to_string(),
            sale_date: date.to_string(),
            station: station.to_string(),
            buyer: buyer.to_string(),
            grower_no: format!("G-{}", ticket),
            grower_name: Some("Tendai Moyo".to_string()),
            grade: "L1O".to_string(),
            bales: 2,
            mass_kg: 200.0,
            price_per_kg: 3.0,
            value: 600.0,
            currency_code: None,
            status: Some("sold".to_string()),
        }
    }

    fn sample() -> Vec<TobaccoSaleDto> {
        vec![
            sale("T1", "2024-03-01", "Harare", "Alliance"),
            sale("T2", "2024-03-15", "Marondera", "Alliance"),
            sale("T3", "2024-04-02", "Harare", "Mashonaland Tobacco"),
            sale("T4", "not-a-date", "Karoi", "Alliance"),
        ]
    }

    fn tickets(records: &[TobaccoSaleDto]) -> Vec<&str> {
        records.iter().map(|r| r.ticket_no.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let records = sample();
        let filter = SalesFilter {
            station: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(filter.is_empty());
        assert_eq!(filter_records(&records, &filter).len(), 4);
    }

    #[test]
    fn test_station_equality_is_case_insensitive() {
        let filter = SalesFilter {
            station: Some("harare".to_string()),
            ..Default::default()
        };
        assert_eq!(tickets(&filter_records(&sample(), &filter)), vec!["T1", "T3"]);

        // Подстрока для равенства не подходит
        let filter = SalesFilter {
            station: Some("Hara".to_string()),
            ..Default::default()
        };
        assert!(filter_records(&sample(), &filter).is_empty());
    }

    #[test]
    fn test_search_substring_across_fields() {
        let filter = SalesFilter {
            search: Some("mashonaland".to_string()),
            ..Default::default()
        };
        assert_eq!(tickets(&filter_records(&sample(), &filter)), vec!["T3"]);

        let filter = SalesFilter {
            search: Some("moyo".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_records(&sample(), &filter).len(), 4);
    }

    #[test]
    fn test_date_range_is_inclusive_and_drops_unparsable_dates() {
        let filter = SalesFilter {
            date_from: Some("2024-03-01".to_string()),
            date_to: Some("2024-03-15".to_string()),
            ..Default::default()
        };
        assert_eq!(tickets(&filter_records(&sample(), &filter)), vec!["T1", "T2"]);

        let filter = SalesFilter {
            date_from: Some("2024-04-01".to_string()),
            ..Default::default()
        };
        assert_eq!(tickets(&filter_records(&sample(), &filter)), vec!["T3"]);
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let filter = SalesFilter {
            date_from: Some("2024-05-01".to_string()),
            date_to: Some("2024-03-01".to_string()),
            ..Default::default()
        };
        assert!(filter_records(&sample(), &filter).is_empty());
    }

    #[test]
    fn test_invalid_bound_is_ignored_and_reported() {
        let filter = SalesFilter {
            date_from: Some("01/03/2024".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_records(&sample(), &filter).len(), 4);
        assert_eq!(filter.invalid_bounds(), vec!["01/03/2024".to_string()]);
    }

    #[test]
    fn test_criteria_are_combined_with_and() {
        let filter = SalesFilter {
            buyer: Some("Alliance".to_string()),
            date_to: Some("2024-03-31".to_string()),
            ticket_no: Some("t2".to_string()),
            ..Default::default()
        };
        assert_eq!(tickets(&filter_records(&sample(), &filter)), vec!["T2"]);
    }

    #[test]
    fn test_status_filter_on_missing_status() {
        let mut records = sample();
        records[0].status = None;
        let filter = SalesFilter {
            status: Some("SOLD".to_string()),
            ..Default::default()
        };
        assert_eq!(tickets(&filter_records(&records, &filter)), vec!["T2", "T3", "T4"]);
    }

    #[test]
    fn test_parse_date_accepts_datetime() {
        assert_eq!(
            parse_date("2024-03-15T14:02:26Z"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(parse_date("15.03.2024"), None);
    }

    #[test]
    fn test_describe_skips_unparsable_bounds() {
        let records = vec![sale("T9", "2023-11-20", "Harare", "Alliance")];
        let filter = SalesFilter {
            date_from: Some("01/03/2024".to_string()),
            date_to: Some(" 2024-03-31 ".to_string()),
            ..Default::default()
        };
        // Нижняя граница не действует, поэтому и в заголовке её нет
        assert_eq!(tickets(&filter_records(&records, &filter)), vec!["T9"]);
        assert_eq!(
            filter.describe(),
            vec![
                "Period: up to 2024-03-31".to_string(),
                "Ignored date bound: \"01/03/2024\"".to_string()
            ]
        );
    }

    #[test]
    fn test_filter_records_and_matches_agree() {
        let records = sample();
        let filter = SalesFilter {
            station: Some("  harare ".to_string()),
            grower: Some(" moyo".to_string()),
            date_from: Some("2024-03-01 ".to_string()),
            ..Default::default()
        };
        let filtered = filter_records(&records, &filter);
        assert_eq!(tickets(&filtered), vec!["T1", "T3"]);
        let by_matches: Vec<&str> = records
            .iter()
            .filter(|s| filter.matches(s))
            .map(|s| s.ticket_no.as_str())
            .collect();
        assert_eq!(by_matches, tickets(&filtered));
    }

    #[test]
    fn test_describe() {
        let filter = SalesFilter {
            date_from: Some("2024-03-01".to_string()),
            date_to: Some("2024-03-31".to_string()),
            station: Some("Harare".to_string()),
            search: Some(" ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            filter.describe(),
            vec![
                "Period: 2024-03-01 — 2024-03-31".to_string(),
                "Station: Harare".to_string()
            ]
        );
    }
}
