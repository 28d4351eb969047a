//! Standalone SVG export
//!
//! Serialized surfaces are normalized into a self-describing document:
//! namespace declarations are added when the serializer omitted them and an
//! XML prolog is prepended.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::consts::EXPORT_FILE_NAME;
use crate::surface::{SVG_NS, Surface, XLINK_NS};

/// XML prolog for exported documents
pub const XML_PROLOG: &str = "<?xml version=\"1.0\" standalone=\"no\"?>\r\n";

/// Export failure. Hosts log these and keep animating.
#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    /// Serializer or download primitive failed in the host environment
    Host(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "export i/o error: {e}"),
            ExportError::Host(msg) => write!(f, "export host error: {msg}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(e) => Some(e),
            ExportError::Host(_) => None,
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}

/// The opening `<svg ...>` tag, if the source starts with one
fn root_tag(source: &str) -> Option<&str> {
    if !source.starts_with("<svg") {
        return None;
    }
    source.find('>').map(|end| &source[..end])
}

/// Insert `decl` right after the leading `<svg` of `source`
fn inject_root_attr(source: &str, decl: &str) -> String {
    match source.strip_prefix("<svg") {
        Some(rest) => format!("<svg {decl}{rest}"),
        None => source.to_string(),
    }
}

/// Add missing namespace declarations and the XML prolog
pub fn standalone(source: &str) -> String {
    let mut source = source.to_string();

    let has_svg_ns = root_tag(&source)
        .is_some_and(|tag| tag.contains(&format!("xmlns=\"{SVG_NS}\"")));
    if !has_svg_ns {
        source = inject_root_attr(&source, &format!("xmlns=\"{SVG_NS}\""));
    }

    let has_xlink = root_tag(&source).is_some_and(|tag| tag.contains(&format!("\"{XLINK_NS}\"")));
    if !has_xlink {
        source = inject_root_attr(&source, &format!("xmlns:xlink=\"{XLINK_NS}\""));
    }

    format!("{XML_PROLOG}{source}")
}

/// Serialize a surface into a standalone document
pub fn document<S: Surface + ?Sized>(surface: &S) -> Result<String, ExportError> {
    surface.to_svg_source().map(|source| standalone(&source))
}

/// Write the standalone document to `dir/mitosys.svg`
pub fn write_to_dir<S: Surface + ?Sized>(surface: &S, dir: &Path) -> Result<PathBuf, ExportError> {
    let doc = document(surface)?;
    let path = dir.join(EXPORT_FILE_NAME);
    let len = doc.len();
    std::fs::write(&path, doc)?;
    log::info!("Exported {} ({} bytes)", path.display(), len);
    Ok(path)
}

/// `data:` URL for the browser download link
#[cfg(target_arch = "wasm32")]
pub fn data_url(document: &str) -> String {
    let encoded: String = js_sys::encode_uri_component(document).into();
    format!("data:image/svg+xml;charset=utf-8,{encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Bounds;
    use crate::surface::SvgDocument;

    #[test]
    fn test_adds_missing_namespaces() {
        let out = standalone("<svg width=\"10\"><rect/></svg>");
        assert_eq!(
            out,
            "<?xml version=\"1.0\" standalone=\"no\"?>\r\n\
             <svg xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
             xmlns=\"http://www.w3.org/2000/svg\" width=\"10\"><rect/></svg>"
        );
    }

    #[test]
    fn test_keeps_existing_namespaces() {
        let src = "<svg xmlns=\"http://www.w3.org/2000/svg\" \
                   xmlns:xlink=\"http://www.w3.org/1999/xlink\"></svg>";
        let out = standalone(src);
        assert_eq!(out, format!("{XML_PROLOG}{src}"));
    }

    #[test]
    fn test_namespace_check_only_looks_at_root() {
        // An xlink URI deeper in the document does not count for the root
        let src = "<svg xmlns=\"http://www.w3.org/2000/svg\"><a href=\"http://www.w3.org/1999/xlink\"/></svg>";
        let out = standalone(src);
        assert!(out.contains("<svg xmlns:xlink=\"http://www.w3.org/1999/xlink\" xmlns="));
    }

    #[test]
    fn test_document_from_svg_surface() {
        let mut doc = SvgDocument::new();
        doc.reset(Bounds::new(300.0, 200.0));
        let out = document(&doc).unwrap();
        assert!(out.starts_with(XML_PROLOG));
        assert_eq!(out.matches("xmlns=\"http://www.w3.org/2000/svg\"").count(), 1);
        assert_eq!(out.matches("xmlns:xlink=").count(), 1);
    }

    #[test]
    fn test_write_to_dir() {
        let dir = std::env::temp_dir().join(format!("mitosys-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut doc = SvgDocument::new();
        doc.reset(Bounds::new(10.0, 10.0));

        let path = write_to_dir(&doc, &dir).unwrap();
        assert_eq!(path.file_name().unwrap(), "mitosys.svg");
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with(XML_PROLOG));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_to_missing_dir_is_io_error() {
        let doc = SvgDocument::new();
        let err = write_to_dir(&doc, Path::new("/nonexistent/mitosys/dir")).unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
    }
}
