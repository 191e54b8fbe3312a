//! Сортировка реестра продаж по одной колонке с переключением направления.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::projections::p900_tobacco_sales::TobaccoSaleDto;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Date,
    Ticket,
    Station,
    Buyer,
    Grower,
    Grade,
    Bales,
    Mass,
    Price,
    Value,
    Status,
}

impl SortColumn {
    pub const ALL: [SortColumn; 11] = [
        SortColumn::Date,
        SortColumn::Ticket,
        SortColumn::Station,
        SortColumn::Buyer,
        SortColumn::Grower,
        SortColumn::Grade,
        SortColumn::Bales,
        SortColumn::Mass,
        SortColumn::Price,
        SortColumn::Value,
        SortColumn::Status,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::Date => "date",
            SortColumn::Ticket => "ticket",
            SortColumn::Station => "station",
            SortColumn::Buyer => "buyer",
            SortColumn::Grower => "grower",
            SortColumn::Grade => "grade",
            SortColumn::Bales => "bales",
            SortColumn::Mass => "mass",
            SortColumn::Price => "price",
            SortColumn::Value => "value",
            SortColumn::Status => "status",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SortColumn::Date => "Date",
            SortColumn::Ticket => "Ticket",
            SortColumn::Station => "Station",
            SortColumn::Buyer => "Buyer",
            SortColumn::Grower => "Grower",
            SortColumn::Grade => "Grade",
            SortColumn::Bales => "Bales",
            SortColumn::Mass => "Mass (kg)",
            SortColumn::Price => "Price/kg",
            SortColumn::Value => "Value",
            SortColumn::Status => "Status",
        }
    }

    /// Числовые колонки выравниваются по правому краю
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            SortColumn::Bales | SortColumn::Mass | SortColumn::Price | SortColumn::Value
        )
    }

    /// Сравнивает две записи по этой колонке (по возрастанию)
    pub fn compare(&self, a: &TobaccoSaleDto, b: &TobaccoSaleDto) -> Ordering {
        match self {
            SortColumn::Date => a.sale_date.cmp(&b.sale_date),
            SortColumn::Ticket => cmp_text(&a.ticket_no, &b.ticket_no),
            SortColumn::Station => cmp_text(&a.station, &b.station),
            SortColumn::Buyer => cmp_text(&a.buyer, &b.buyer),
            SortColumn::Grower => cmp_text(&a.grower_label(), &b.grower_label()),
            SortColumn::Grade => cmp_text(&a.grade, &b.grade),
            SortColumn::Bales => a.bales.cmp(&b.bales),
            SortColumn::Mass => a.mass_kg.total_cmp(&b.mass_kg),
            SortColumn::Price => a.price_per_kg.total_cmp(&b.price_per_kg),
            SortColumn::Value => a.value.total_cmp(&b.value),
            SortColumn::Status => cmp_text(a.status_label(), b.status_label()),
        }
    }
}

impl FromStr for SortColumn {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        SortColumn::ALL
            .into_iter()
            .find(|c| c.as_str() == key)
            .ok_or_else(|| anyhow::anyhow!("Unknown sort column: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Asc => " ▲",
            SortDirection::Desc => " ▼",
        }
    }
}

/// Текущая сортировка списка
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: SortColumn::Date,
            direction: SortDirection::Desc,
        }
    }
}

impl SortState {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Клик по заголовку: та же колонка меняет направление,
    /// новая колонка сортируется по возрастанию
    pub fn toggle(self, column: SortColumn) -> Self {
        if self.column == column {
            Self::new(column, self.direction.toggle())
        } else {
            Self::new(column, SortDirection::Asc)
        }
    }

    /// Индикатор для заголовка колонки
    pub fn indicator_for(&self, column: SortColumn) -> &'static str {
        if self.column == column {
            self.direction.indicator()
        } else {
            " ⇅"
        }
    }
}

/// Сортирует записи на месте. Сортировка стабильная: равные ключи сохраняют
/// исходный порядок при любом направлении.
pub fn sort_records(records: &mut [TobaccoSaleDto], state: SortState) {
    records.sort_by(|a, b| {
        let cmp = state.column.compare(a, b);
        match state.direction {
            SortDirection::Asc => cmp,
            SortDirection::Desc => cmp.reverse(),
        }
    });
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
