//! Адреса API и общий GET-запрос
//!
//! Фронтенд отдаётся тем же сервером, что и API, поэтому база берётся из
//! текущего origin страницы.

use gloo_net::http::Request;
use serde::de::DeserializeOwned;

/// Базовый URL API ("http://host:port") или пустая строка для относительных путей
pub fn api_base() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

/// Полный URL для пути вида "/api/..."
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// GET с разбором JSON. Ошибки превращаются в строку для баннера на странице.
pub async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, String> {
    let url = api_url(path);

    let response = Request::get(&url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        let body = response.text().await.unwrap_or_default();
        return Err(http_error_message(response.status(), &body));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

fn http_error_message(status: u16, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("HTTP error: {}", status)
    } else {
        format!("HTTP error {}: {}", status, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_message() {
        assert_eq!(http_error_message(502, ""), "HTTP error: 502");
        assert_eq!(
            http_error_message(502, " Upstream API returned 503 \n"),
            "HTTP error 502: Upstream API returned 503"
        );
    }
}
