/// Форматирует число с разделителями тысяч (точками)
///
/// # Примеры
/// ```
/// use contracts::shared::format::format_number;
/// assert_eq!(format_number(1234567), "1.234.567");
/// assert_eq!(format_number(42), "42");
/// ```
pub fn format_number(n: u64) -> String {
    group_thousands(&n.to_string(), '.')
}

/// Количество (записи, тюки): тысячи через пробел, как в суммах и массе
///
/// ```
/// use contracts::shared::format::format_count;
/// assert_eq!(format_count(1234), "1 234");
/// assert_eq!(format_count(-1500), "-1 500");
/// ```
pub fn format_count(n: i64) -> String {
    let grouped = group_thousands(&n.unsigned_abs().to_string(), ' ');
    if n < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Денежная сумма: два знака после запятой, тысячи через пробел
pub fn format_money(value: f64) -> String {
    format_decimal(value, 2)
}

/// Масса в кг: один знак после запятой
pub fn format_mass(value: f64) -> String {
    format_decimal(value, 1)
}

/// "YYYY-MM-DD" (или ISO datetime) -> "DD.MM.YYYY"; остальное без изменений
pub fn format_date(date_str: &str) -> String {
    let date_part = date_str.split('T').next().unwrap_or(date_str);
    if let Some((year, rest)) = date_part.split_once('-') {
        if let Some((month, day)) = rest.split_once('-') {
            return format!("{}.{}.{}", day, month, year);
        }
    }
    date_str.to_string()
}

fn format_decimal(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "—".to_string();
    }
    let rendered = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rendered.as_str(), None),
    };
    let mut result = String::new();
    // -0.00 не показываем со знаком
    if value < 0.0 && rendered.chars().any(|c| c.is_ascii_digit() && c != '0') {
        result.push('-');
    }
    result.push_str(&group_thousands(int_part, ' '));
    if let Some(frac) = frac_part {
        result.push('.');
        result.push_str(frac);
    }
    result
}

fn group_thousands(digits: &str, separator: char) -> String {
    let mut result = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(separator);
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}
