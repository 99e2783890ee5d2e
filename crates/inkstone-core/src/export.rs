//! Client-side export transforms.
//!
//! Both exports are pure functions of the buffer content: no network
//! calls, no timestamps, same input gives the same bytes.

/// A downloadable file produced by an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Offers the plain-text form of the buffer as `manuscript-{id}.txt`.
pub fn export_text(document_id: u64, plain_text: &str) -> ExportFile {
    ExportFile {
        file_name: format!("manuscript-{document_id}.txt"),
        mime_type: "text/plain",
        bytes: plain_text.as_bytes().to_vec(),
    }
}

/// Wraps the rich buffer content in a minimal standalone HTML document and
/// offers it as `manuscript-{id}.html`.
pub fn export_html(document_id: u64, content: &str) -> ExportFile {
    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Manuscript - Project {document_id}</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; line-height: 1.6; max-width: 800px; margin: 0 auto; padding: 20px; }}
        h1, h2, h3, h4, h5, h6 {{ margin-top: 1.5em; margin-bottom: 0.5em; }}
        p {{ margin-bottom: 1em; }}
    </style>
</head>
<body>
{content}
</body>
</html>
"#
    );

    ExportFile {
        file_name: format!("manuscript-{document_id}.html"),
        mime_type: "text/html",
        bytes: html.into_bytes(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_export_is_named_after_the_document() {
        let file = export_text(42, "one two three");
        assert_eq!(file.file_name, "manuscript-42.txt");
        assert_eq!(file.mime_type, "text/plain");
        assert_eq!(file.bytes, b"one two three");
    }

    #[test]
    fn html_export_wraps_the_content_in_a_standalone_document() {
        let file = export_html(42, "<p>hello</p>");
        let html = String::from_utf8(file.bytes).unwrap();
        assert_eq!(file.file_name, "manuscript-42.html");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<meta charset=\"UTF-8\">"));
        assert!(html.contains("<title>Manuscript - Project 42</title>"));
        assert!(html.contains("<p>hello</p>"));
    }

    #[test]
    fn exports_are_idempotent() {
        assert_eq!(export_text(1, "same"), export_text(1, "same"));
        assert_eq!(export_html(1, "<p>same</p>"), export_html(1, "<p>same</p>"));
    }
}
