use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::projections::p900_tobacco_sales::TobaccoSaleDto;

/// Значение для пустой части ключа группировки
pub const EMPTY_KEY: &str = "(none)";

/// Измерение, по которому группируются продажи
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Date,
    /// "YYYY-MM" от даты продажи
    Month,
    Station,
    Buyer,
    Grade,
    Grower,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Date,
        Dimension::Month,
        Dimension::Station,
        Dimension::Buyer,
        Dimension::Grade,
        Dimension::Grower,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Date => "date",
            Dimension::Month => "month",
            Dimension::Station => "station",
            Dimension::Buyer => "buyer",
            Dimension::Grade => "grade",
            Dimension::Grower => "grower",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Dimension::Date => "Date",
            Dimension::Month => "Month",
            Dimension::Station => "Station",
            Dimension::Buyer => "Buyer",
            Dimension::Grade => "Grade",
            Dimension::Grower => "Grower",
        }
    }

    /// Значение измерения для записи; пустое значение -> `EMPTY_KEY`
    pub fn key_of(&self, sale: &TobaccoSaleDto) -> String {
        let raw = match self {
            Dimension::Date => sale.sale_date.split('T').next().unwrap_or("").to_string(),
            Dimension::Month => sale.sale_date.chars().take(7).collect(),
            Dimension::Station => sale.station.clone(),
            Dimension::Buyer => sale.buyer.clone(),
            Dimension::Grade => sale.grade.clone(),
            Dimension::Grower => sale.grower_label(),
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            EMPTY_KEY.to_string()
        } else {
            trimmed.to_string()
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Dimension::ALL
            .into_iter()
            .find(|d| d.as_str() == key)
            .ok_or_else(|| anyhow::anyhow!("Unknown grouping dimension: {}", s))
    }
}

/// Составной ключ группировки: непустой список измерений без повторов
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Dimension>", into = "Vec<Dimension>")]
pub struct GroupBy(Vec<Dimension>);

impl GroupBy {
    pub fn new(dimensions: Vec<Dimension>) -> anyhow::Result<Self> {
        if dimensions.is_empty() {
            anyhow::bail!("At least one grouping dimension is required");
        }
        for (i, dim) in dimensions.iter().enumerate() {
            if dimensions[..i].contains(dim) {
                anyhow::bail!("Grouping dimension repeated: {}", dim);
            }
        }
        Ok(Self(dimensions))
    }

    pub fn single(dimension: Dimension) -> Self {
        Self(vec![dimension])
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.0
    }

    pub fn key_of(&self, sale: &TobaccoSaleDto) -> Vec<String> {
        self.0.iter().map(|d| d.key_of(sale)).collect()
    }

    /// "station,date": формат query-параметра
    pub fn to_query_value(&self) -> String {
        self.0
            .iter()
            .map(Dimension::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// "Station / Date" для заголовков отчёта
    pub fn title(&self) -> String {
        self.0
            .iter()
            .map(Dimension::title)
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

impl Default for GroupBy {
    fn default() -> Self {
        Self::single(Dimension::Date)
    }
}

impl FromStr for GroupBy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dimensions = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(Dimension::from_str)
            .collect::<anyhow::Result<Vec<_>>>()?;
        GroupBy::new(dimensions)
    }
}

impl TryFrom<Vec<Dimension>> for GroupBy {
    type Error = anyhow::Error;

    fn try_from(value: Vec<Dimension>) -> Result<Self, Self::Error> {
        GroupBy::new(value)
    }
}

impl From<GroupBy> for Vec<Dimension> {
    fn from(value: GroupBy) -> Self {
        value.0
    }
}

/// Накопленные суммы по группе
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryTotals {
    pub records: usize,
    pub bales: i64,
    pub mass_kg: f64,
    pub value: f64,
    /// value / mass_kg, 0 при нулевой массе
    pub avg_price: f64,
}

impl SummaryTotals {
    pub fn add(&mut self, sale: &TobaccoSaleDto) {
        self.records += 1;
        self.bales += sale.bales;
        self.mass_kg += sale.mass_kg;
        self.value += sale.value;
        self.refresh_avg();
    }

    pub fn merge(&mut self, other: &SummaryTotals) {
        self.records += other.records;
        self.bales += other.bales;
        self.mass_kg += other.mass_kg;
        self.value += other.value;
        self.refresh_avg();
    }

    fn refresh_avg(&mut self) {
        self.avg_price = if self.mass_kg.abs() > f64::EPSILON {
            self.value / self.mass_kg
        } else {
            0.0
        };
    }
}

/// Строка сводки: ключ группы + суммы
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub key: Vec<String>,
    #[serde(flatten)]
    pub totals: SummaryTotals,
}

/// Результат агрегации
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub dimensions: Vec<Dimension>,
    pub rows: Vec<SummaryRow>,
    pub totals: SummaryTotals,
}

/// Query для сводки: группировка приходит строкой "station,date",
/// критерии фильтра приходят отдельной структурой `SalesFilter`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesSummaryParams {
    #[serde(default)]
    pub group_by: Option<String>,
}

impl SalesSummaryParams {
    pub fn group_by(&self) -> anyhow::Result<GroupBy> {
        match self.group_by.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => value.parse(),
            _ => Ok(GroupBy::default()),
        }
    }
}

/// Шапка печатного отчёта из секции `[report]` конфигурации сервера
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSettings {
    pub title: String,
    pub organization: String,
    #[serde(default)]
    pub currency: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            title: "Tobacco Sales Report".to_string(),
            organization: "Tobacco Trading Association".to_string(),
            currency: "USD".to_string(),
        }
    }
}

impl ReportSettings {
    /// "Tobacco Sales Report by Station / Date"
    pub fn title_for(&self, group_by: &GroupBy) -> String {
        format!("{} by {}", self.title, group_by.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_settings_title() {
        let settings = ReportSettings {
            title: "Karoi Floor Sales".to_string(),
            ..Default::default()
        };
        let group_by = GroupBy::new(vec![Dimension::Buyer, Dimension::Month]).unwrap();
        assert_eq!(settings.title_for(&group_by), "Karoi Floor Sales by Buyer / Month");

        let parsed: ReportSettings =
            serde_json::from_str(r#"{"title":"T","organization":"O"}"#).unwrap();
        assert_eq!(parsed.currency, "");
    }

    #[test]
    fn test_group_by_from_str() {
        let group_by: GroupBy = "station, date".parse().unwrap();
        assert_eq!(group_by.dimensions(), &[Dimension::Station, Dimension::Date]);
        assert_eq!(group_by.to_query_value(), "station,date");
        assert_eq!(group_by.title(), "Station / Date");
    }

    #[test]
    fn test_group_by_rejects_bad_input() {
        assert!("".parse::<GroupBy>().is_err());
        assert!("station,station".parse::<GroupBy>().is_err());
        assert!("warehouse".parse::<GroupBy>().is_err());
    }

    #[test]
    fn test_group_by_serde_validates() {
        let ok: GroupBy = serde_json::from_str(r#"["buyer","month"]"#).unwrap();
        assert_eq!(ok.dimensions(), &[Dimension::Buyer, Dimension::Month]);
        assert!(serde_json::from_str::<GroupBy>("[]").is_err());
    }

    #[test]
    fn test_key_of_blank_and_month() {
        let sale = TobaccoSaleDto {
            sale_date: "2024-03-15".to_string(),
            buyer: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(Dimension::Month.key_of(&sale), "2024-03");
        assert_eq!(Dimension::Buyer.key_of(&sale), EMPTY_KEY);
    }

    #[test]
    fn test_params_default_group_by() {
        let params = SalesSummaryParams::default();
        assert_eq!(params.group_by().unwrap(), GroupBy::single(Dimension::Date));
    }
}
