use serde::de;
use serde::{Deserialize, Deserializer, Serialize};

use crate::shared::paging::{DEFAULT_PAGE_SIZE, Page};
use crate::shared::sorting::{SortColumn, SortDirection};

/// Одна запись реестра продаж табака (строка билета аукциона)
///
/// Поля совпадают с тем, что отдаёт удалённый API. Отсутствующие и `null`
/// числовые поля становятся нулями, текстовые становятся пустыми строками.
/// Идентификаторы принимаются и строкой, и числом.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TobaccoSaleDto {
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub ticket_no: String,
    /// Дата продажи "YYYY-MM-DD"
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub sale_date: String,

    /// Аукционный пол / закупочная станция
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub station: String,
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub buyer: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub grower_no: String,
    #[serde(default)]
    pub grower_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub grade: String,

    // Quantities and money
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub bales: i64,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub mass_kg: f64,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub price_per_kg: f64,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub value: f64,
    #[serde(default)]
    pub currency_code: Option<String>,

    /// sold / rejected / withdrawn
    #[serde(default)]
    pub status: Option<String>,
}

impl TobaccoSaleDto {
    /// Номер производителя и имя (если есть) для отображения
    pub fn grower_label(&self) -> String {
        match self.grower_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => format!("{} {}", self.grower_no, name),
            _ => self.grower_no.clone(),
        }
    }

    pub fn status_label(&self) -> &str {
        self.status.as_deref().unwrap_or("")
    }
}

/// Конверт ответа удалённого API `{count, data}`.
/// Голый массив разбирается напрямую как `Vec<TobaccoSaleDto>`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamEnvelope {
    #[serde(default)]
    pub count: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub data: Vec<TobaccoSaleDto>,
}

fn deserialize_null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
    Float(f64),
}

/// Номера из JS/TS бэкендов часто приходят числами
fn deserialize_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<StringOrNumber>::deserialize(deserializer)? {
        Some(StringOrNumber::String(s)) => Ok(s),
        Some(StringOrNumber::Int(n)) => Ok(n.to_string()),
        Some(StringOrNumber::Float(f)) => Ok(f.to_string()),
        None => Ok(String::new()),
    }
}

fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<StringOrNumber>::deserialize(deserializer)? {
        Some(StringOrNumber::Float(f)) => Ok(f),
        Some(StringOrNumber::Int(n)) => Ok(n as f64),
        Some(StringOrNumber::String(s)) if s.trim().is_empty() => Ok(0.0),
        Some(StringOrNumber::String(s)) => s.trim().parse::<f64>().map_err(de::Error::custom),
        None => Ok(0.0),
    }
}

fn deserialize_lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<StringOrNumber>::deserialize(deserializer)? {
        Some(StringOrNumber::Int(n)) => Ok(n),
        // 3.0 от JS-сериализатора
        Some(StringOrNumber::Float(f)) if f.fract() == 0.0 => Ok(f as i64),
        Some(StringOrNumber::Float(f)) => Err(de::Error::custom(format!(
            "expected whole number, got {}",
            f
        ))),
        Some(StringOrNumber::String(s)) if s.trim().is_empty() => Ok(0),
        Some(StringOrNumber::String(s)) => s.trim().parse::<i64>().map_err(de::Error::custom),
        None => Ok(0),
    }
}

/// Параметры сортировки и страницы для серверного списка.
/// Критерии фильтра приходят отдельной структурой `SalesFilter` из той же query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TobaccoSalesListParams {
    #[serde(default)]
    pub sort: Option<SortColumn>,
    #[serde(default)]
    pub direction: Option<SortDirection>,
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for TobaccoSalesListParams {
    fn default() -> Self {
        Self {
            sort: None,
            direction: None,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Response для списка продаж
pub type TobaccoSalesListResponse = Page<TobaccoSaleDto>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_array_payload() {
        let json = r#"[{"id":"1","ticket_no":"T-1","sale_date":"2024-03-15","station":"Harare","buyer":"ABC","grower_no":"G1","grade":"L1O","bales":3,"mass_kg":250.5,"price_per_kg":3.1,"value":776.55}]"#;
        let records: Vec<TobaccoSaleDto> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].station, "Harare");
        assert_eq!(records[0].bales, 3);
        assert_eq!(records[0].grower_name, None);
    }

    #[test]
    fn test_envelope_payload_and_missing_fields() {
        let json = r#"{"count":2,"data":[{"id":"1","extra_field":true},{"id":"2","value":10.0}]}"#;
        let envelope: UpstreamEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.count, Some(2));
        assert_eq!(envelope.data.len(), 2);
        assert_eq!(envelope.data[0].mass_kg, 0.0);
        assert_eq!(envelope.data[0].station, "");
        assert_eq!(envelope.data[1].value, 10.0);
    }

    #[test]
    fn test_null_fields_become_defaults() {
        let json = r#"[{"id":"1","buyer":null,"mass_kg":null,"bales":null,"grower_name":null,"status":null},{"id":"2","buyer":"TSL"}]"#;
        let records: Vec<TobaccoSaleDto> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].buyer, "");
        assert_eq!(records[0].mass_kg, 0.0);
        assert_eq!(records[0].bales, 0);
        assert_eq!(records[0].status, None);
        assert_eq!(records[1].buyer, "TSL");

        let envelope: UpstreamEnvelope =
            serde_json::from_str(r#"{"count":null,"data":[{"id":"1","mass_kg":null}]}"#).unwrap();
        assert_eq!(envelope.data.len(), 1);
        assert_eq!(envelope.data[0].mass_kg, 0.0);
    }

    #[test]
    fn test_numeric_identifiers_and_string_amounts() {
        let json = r#"[{"id":1,"ticket_no":20417,"grower_no":"V0123","bales":"4","mass_kg":"120.5","value":361,"price_per_kg":3}]"#;
        let records: Vec<TobaccoSaleDto> = serde_json::from_str(json).unwrap();
        assert_eq!(records[0].id, "1");
        assert_eq!(records[0].ticket_no, "20417");
        assert_eq!(records[0].grower_no, "V0123");
        assert_eq!(records[0].bales, 4);
        assert_eq!(records[0].mass_kg, 120.5);
        assert_eq!(records[0].value, 361.0);
        assert_eq!(records[0].price_per_kg, 3.0);
    }

    #[test]
    fn test_bad_field_error_names_the_problem() {
        let err = serde_json::from_str::<Vec<TobaccoSaleDto>>(r#"[{"id":"1","mass_kg":"heavy"}]"#)
            .unwrap_err();
        assert!(err.to_string().contains("invalid float literal"));
        assert_eq!(err.line(), 1);
    }

    #[test]
    fn test_grower_label() {
        let mut sale = TobaccoSaleDto {
            grower_no: "G17".to_string(),
            ..Default::default()
        };
        assert_eq!(sale.grower_label(), "G17");
        sale.grower_name = Some("  ".to_string());
        assert_eq!(sale.grower_label(), "G17");
        sale.grower_name = Some("Moyo".to_string());
        assert_eq!(sale.grower_label(), "G17 Moyo");
    }

    #[test]
    fn test_list_params_defaults() {
        let params: TobaccoSalesListParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page, 0);
        assert_eq!(params.page_size, DEFAULT_PAGE_SIZE);
        assert!(params.sort.is_none());
    }
}
