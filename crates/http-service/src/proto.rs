use genbridge_service::ImagePayload;
use mime::Mime;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;

/// Name of the multipart field that carries the image.
pub const IMAGE_FIELD: &str = "file";

const MAX_DETAIL_LEN: usize = 200;

// ------------------------------
// Types received from the server
// ------------------------------

/// The body of an error reply. The `detail` is usually a string, but
/// validation errors carry a list of objects.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
struct ErrorBody {
    detail: Value,
}

// -----------
// Conversions
// -----------

/// Extracts a human readable reason from the body of an error reply.
pub fn error_detail(body: &str) -> String {
    let detail = match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => body.trim().to_owned(),
    };
    if detail.chars().count() <= MAX_DETAIL_LEN {
        return detail;
    }
    let mut truncated: String = detail.chars().take(MAX_DETAIL_LEN).collect();
    truncated.push('…');
    truncated
}

/// Returns `true` if the content type header denotes a JSON body.
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|v| v.parse().ok())
        .map(|m: Mime| {
            m.subtype() == mime::JSON || m.suffix() == Some(mime::JSON)
        })
        .unwrap_or(false)
}

#[inline]
pub fn create_caption_form(
    image: &ImagePayload,
) -> Result<Form, reqwest::Error> {
    let part = Part::bytes(image.bytes().to_vec())
        .file_name(image.file_name().to_owned())
        .mime_str(image.mime().as_ref())?;
    Ok(Form::new().part(IMAGE_FIELD, part))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail() {
        assert_eq!(
            error_detail(r#"{"detail":"Gemini Image API Error: quota"}"#),
            "Gemini Image API Error: quota"
        );
        assert_eq!(
            error_detail(r#"{"detail":[{"loc":["body","message"]}]}"#),
            r#"[{"loc":["body","message"]}]"#
        );
        assert_eq!(error_detail("  Bad Gateway\n"), "Bad Gateway");

        let long = "x".repeat(MAX_DETAIL_LEN + 10);
        let detail = error_detail(&long);
        assert_eq!(detail.chars().count(), MAX_DETAIL_LEN + 1);
        assert!(detail.ends_with('…'));
    }

    #[test]
    fn test_is_json_content_type() {
        assert!(is_json_content_type(Some("application/json")));
        assert!(is_json_content_type(Some("application/json; charset=utf-8")));
        assert!(is_json_content_type(Some("application/problem+json")));
        assert!(!is_json_content_type(Some("text/html")));
        assert!(!is_json_content_type(Some("???")));
        assert!(!is_json_content_type(None));
    }
}
