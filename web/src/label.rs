//! Minimal label rendering.
//!
//! Real barcode/QR image generation is out of scope; deployments that need
//! scannable labels plug a richer [`LabelRenderer`] into the environment.
//! This implementation emits a small SVG carrying the tracking number, which
//! is enough for display and printing.

use packstation_core::environment::{Label, LabelRenderer};

/// Renders a tracking number as a plain SVG label.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgLabelRenderer;

impl LabelRenderer for SvgLabelRenderer {
    fn render(&self, code: &str) -> Label {
        let escaped = code
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;");
        let svg = format!(
            concat!(
                "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"320\" height=\"96\">",
                "<rect width=\"320\" height=\"96\" fill=\"white\" stroke=\"black\"/>",
                "<text x=\"160\" y=\"56\" text-anchor=\"middle\" ",
                "font-family=\"monospace\" font-size=\"28\">{}</text>",
                "</svg>"
            ),
            escaped
        );
        Label {
            content_type: "image/svg+xml",
            bytes: svg.into_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_tracking_number() {
        let label = SvgLabelRenderer.render("T-ABC123");
        assert_eq!(label.content_type, "image/svg+xml");
        let svg = String::from_utf8(label.bytes).unwrap_or_default();
        assert!(svg.contains("T-ABC123"));
    }

    #[test]
    fn escapes_markup_in_code() {
        let label = SvgLabelRenderer.render("<x&y>");
        let svg = String::from_utf8(label.bytes).unwrap_or_default();
        assert!(svg.contains("&lt;x&amp;y&gt;"));
        assert!(!svg.contains("<x&y>"));
    }
}
