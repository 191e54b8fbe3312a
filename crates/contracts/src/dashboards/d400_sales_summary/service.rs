use std::collections::BTreeMap;

use super::dto::{GroupBy, SalesSummary, SummaryRow, SummaryTotals};
use crate::projections::p900_tobacco_sales::TobaccoSaleDto;

/// Группирует записи по составному ключу и накапливает суммы.
///
/// Части ключа сравниваются без учёта регистра, как и в фильтрах; в строке
/// показывается написание первой встреченной записи. Строки упорядочены по
/// ключу (лексикографически по частям, поэтому ISO-даты идут хронологически).
/// Итог равен сумме строк.
pub fn aggregate(records: &[TobaccoSaleDto], group_by: &GroupBy) -> SalesSummary {
    let mut groups: BTreeMap<Vec<String>, (Vec<String>, SummaryTotals)> = BTreeMap::new();

    for sale in records {
        let key = group_by.key_of(sale);
        let folded: Vec<String> = key.iter().map(|part| part.to_lowercase()).collect();
        groups
            .entry(folded)
            .or_insert_with(|| (key, SummaryTotals::default()))
            .1
            .add(sale);
    }

    let mut totals = SummaryTotals::default();
    let rows: Vec<SummaryRow> = groups
        .into_values()
        .map(|(key, group_totals)| {
            totals.merge(&group_totals);
            SummaryRow {
                key,
                totals: group_totals,
            }
        })
        .collect();

    SalesSummary {
        dimensions: group_by.dimensions().to_vec(),
        rows,
        totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d400_sales_summary::dto::{Dimension, EMPTY_KEY};

    fn sale(date: &str, station: &str, buyer: &str, mass: f64, value: f64) -> TobaccoSaleDto {
        TobaccoSaleDto {
            sale_date: date.to_string(),
            station: station.to_string(),
            buyer: buyer.to_string(),
            bales: 1,
            mass_kg: mass,
            value,
            ..Default::default()
        }
    }

    fn sample() -> Vec<TobaccoSaleDto> {
        vec![
            sale("2024-03-02", "Karoi", "Alliance", 100.0, 300.0),
            sale("2024-03-01", "Harare", "Alliance", 200.0, 500.0),
            sale("2024-03-01", "Harare", "", 50.0, 150.0),
            sale("2024-03-02", "Harare", "TSL", 0.0, 0.0),
        ]
    }

    #[test]
    fn test_group_by_station() {
        let summary = aggregate(&sample(), &GroupBy::single(Dimension::Station));
        assert_eq!(summary.rows.len(), 2);
        assert_eq!(summary.rows[0].key, vec!["Harare".to_string()]);
        assert_eq!(summary.rows[0].totals.records, 3);
        assert_eq!(summary.rows[0].totals.bales, 3);
        assert_eq!(summary.rows[0].totals.mass_kg, 250.0);
        assert_eq!(summary.rows[0].totals.value, 650.0);
        assert!((summary.rows[0].totals.avg_price - 2.6).abs() < 1e-9);
        assert_eq!(summary.rows[1].key, vec!["Karoi".to_string()]);
    }

    #[test]
    fn test_composite_key_ordering() {
        let group_by = GroupBy::new(vec![Dimension::Date, Dimension::Station]).unwrap();
        let summary = aggregate(&sample(), &group_by);
        let keys: Vec<Vec<&str>> = summary
            .rows
            .iter()
            .map(|r| r.key.iter().map(String::as_str).collect())
            .collect();
        assert_eq!(
            keys,
            vec![
                vec!["2024-03-01", "Harare"],
                vec!["2024-03-02", "Harare"],
                vec!["2024-03-02", "Karoi"],
            ]
        );
        assert_eq!(summary.dimensions, vec![Dimension::Date, Dimension::Station]);
    }

    #[test]
    fn test_totals_match_rows_and_input() {
        let records = sample();
        let summary = aggregate(&records, &GroupBy::single(Dimension::Buyer));
        let row_records: usize = summary.rows.iter().map(|r| r.totals.records).sum();
        assert_eq!(row_records, records.len());
        assert_eq!(summary.totals.records, records.len());
        assert_eq!(summary.totals.value, 950.0);
        assert_eq!(summary.totals.mass_kg, 350.0);
        assert!(summary.rows.iter().any(|r| r.key == vec![EMPTY_KEY.to_string()]));
    }

    #[test]
    fn test_zero_mass_gives_zero_avg_price() {
        let summary = aggregate(&sample(), &GroupBy::single(Dimension::Buyer));
        let tsl = summary
            .rows
            .iter()
            .find(|r| r.key == vec!["TSL".to_string()])
            .unwrap();
        assert_eq!(tsl.totals.avg_price, 0.0);
    }

    #[test]
    fn test_grouping_ignores_case_and_keeps_first_spelling() {
        let records = vec![
            sale("2024-03-01", "Harare", "Alliance", 100.0, 300.0),
            sale("2024-03-01", "HARARE", "alliance", 50.0, 100.0),
            sale("2024-03-02", "karoi", "TSL", 10.0, 30.0),
        ];
        let summary = aggregate(&records, &GroupBy::single(Dimension::Station));
        let keys: Vec<&str> = summary.rows.iter().map(|r| r.key[0].as_str()).collect();
        assert_eq!(keys, vec!["Harare", "karoi"]);
        assert_eq!(summary.rows[0].totals.records, 2);
        assert_eq!(summary.rows[0].totals.value, 400.0);

        let group_by = GroupBy::new(vec![Dimension::Buyer, Dimension::Station]).unwrap();
        let summary = aggregate(&records, &group_by);
        assert_eq!(summary.rows.len(), 2);
        assert_eq!(summary.rows[0].key, vec!["Alliance".to_string(), "Harare".to_string()]);
    }

    #[test]
    fn test_empty_input() {
        let summary = aggregate(&[], &GroupBy::default());
        assert!(summary.rows.is_empty());
        assert_eq!(summary.totals, SummaryTotals::default());
    }
}
