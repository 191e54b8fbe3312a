use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Local;
use contracts::shared::format::format_number;
use std::time::Duration;

/// Middleware для логирования HTTP запросов
///
/// Одна строка на запрос: время | длительность | размер ответа | статус метод путь.
/// Отчёты и выгрузки бывают большими, поэтому размер считается по реальному телу.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!("Failed to read response body for {} {}: {}", method, path, e);
            println!(
                "{}",
                render_line(start.elapsed(), None, parts.status, &method, &path)
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    println!(
        "{}",
        render_line(
            start.elapsed(),
            Some(bytes.len()),
            parts.status,
            &method,
            &path
        )
    );

    Response::from_parts(parts, Body::from(bytes))
}

/// Голубой для успешных ответов, коричневый для остальных
fn status_color(status: StatusCode) -> &'static str {
    if status.is_success() {
        "36"
    } else {
        "33"
    }
}

fn render_line(
    elapsed: Duration,
    size: Option<usize>,
    status: StatusCode,
    method: &Method,
    path: &str,
) -> String {
    let size = match size {
        Some(size) => format_number(size as u64),
        None => "error".to_string(),
    };
    format!(
        "\x1b[{}m{}\x1b[0m | {:>5}ms | {:>12} | {} {:>6} {}",
        status_color(status),
        Local::now().format("%H:%M:%S"),
        elapsed.as_millis(),
        size,
        status.as_u16(),
        method.as_str(),
        path
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_line_contains_size_and_path() {
        let line = render_line(
            Duration::from_millis(42),
            Some(1234567),
            StatusCode::OK,
            &Method::GET,
            "/api/d400/sales-summary",
        );
        assert!(line.starts_with("\x1b[36m"));
        assert!(line.contains("1.234.567"));
        assert!(line.contains("42ms"));
        assert!(line.ends_with("200    GET /api/d400/sales-summary"));
    }

    #[test]
    fn test_render_line_error() {
        let line = render_line(
            Duration::from_millis(1),
            None,
            StatusCode::BAD_GATEWAY,
            &Method::GET,
            "/api/p900/tobacco-sales/all",
        );
        assert!(line.starts_with("\x1b[33m"));
        assert!(line.contains("error"));
    }
}
