/// Выгрузка отчётов из браузера: скачивание файла и печать HTML
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, HtmlIFrameElement, Url};

/// id скрытого iframe для печати
const PRINT_FRAME_ID: &str = "report-print-frame";

/// Скачивает текст как файл (CSV уже содержит BOM для Excel)
pub fn download_text(content: &str, mime_type: &str, filename: &str) -> Result<(), String> {
    let blob = create_blob(content, mime_type)?;
    download_blob(&blob, filename)
}

/// Создает Blob объект из текста
fn create_blob(content: &str, mime_type: &str) -> Result<Blob, String> {
    let array = js_sys::Array::new();
    array.push(&wasm_bindgen::JsValue::from_str(content));

    let properties = BlobPropertyBag::new();
    properties.set_type(mime_type);

    Blob::new_with_str_sequence_and_options(&array, &properties)
        .map_err(|e| format!("Failed to create blob: {:?}", e))
}

/// Инициирует скачивание Blob через браузер
fn download_blob(blob: &Blob, filename: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window object")?;
    let document = window.document().ok_or("No document object")?;
    let body = document.body().ok_or("No body element")?;

    let url = Url::create_object_url_with_blob(blob)
        .map_err(|e| format!("Failed to create object URL: {:?}", e))?;

    let anchor = document
        .create_element("a")
        .map_err(|e| format!("Failed to create anchor: {:?}", e))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|e| format!("Failed to cast to anchor: {:?}", e))?;

    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor
        .style()
        .set_property("display", "none")
        .map_err(|e| format!("Failed to set style: {:?}", e))?;

    // Добавляем в DOM, кликаем и удаляем
    body.append_child(&anchor)
        .map_err(|e| format!("Failed to append anchor: {:?}", e))?;
    anchor.click();
    body.remove_child(&anchor)
        .map_err(|e| format!("Failed to remove anchor: {:?}", e))?;

    Url::revoke_object_url(&url).map_err(|e| format!("Failed to revoke URL: {:?}", e))?;

    Ok(())
}

/// Печать HTML-отчёта через скрытый iframe.
///
/// Страница отчёта сама вызывает `window.print()` после загрузки, диалог
/// печати браузера позволяет сохранить её в PDF. Предыдущий iframe удаляется.
pub fn print_html(html: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window object")?;
    let document = window.document().ok_or("No document object")?;
    let body = document.body().ok_or("No body element")?;

    if let Some(old) = document.get_element_by_id(PRINT_FRAME_ID) {
        old.remove();
    }

    let iframe = document
        .create_element("iframe")
        .map_err(|e| format!("Failed to create iframe: {:?}", e))?
        .dyn_into::<HtmlIFrameElement>()
        .map_err(|e| format!("Failed to cast to iframe: {:?}", e))?;

    iframe.set_id(PRINT_FRAME_ID);
    iframe
        .set_attribute(
            "style",
            "position: fixed; right: 0; bottom: 0; width: 0; height: 0; border: 0;",
        )
        .map_err(|e| format!("Failed to set style: {:?}", e))?;
    iframe.set_srcdoc(html);

    body.append_child(&iframe)
        .map_err(|e| format!("Failed to append iframe: {:?}", e))?;

    Ok(())
}
