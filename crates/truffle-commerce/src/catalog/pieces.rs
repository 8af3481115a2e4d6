//! Pieces-per-box derivation for size options.

use std::num::NonZeroU32;
use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::CatalogOption;
use crate::diagnostics::{Diagnostic, DiagnosticSink};

static PIECES_IN_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\((\d+)\s*pieces?\)").expect("valid pieces regex"));

/// Parse a count from a label such as `"Small Box (4 pieces)"`.
pub fn pieces_from_label(label: &str) -> Option<NonZeroU32> {
    PIECES_IN_LABEL
        .captures(label)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .and_then(NonZeroU32::new)
}

/// Pieces in one box of `size`.
///
/// Prefers the structured quantity, then the label, then `default`.
/// Size entries created by different admin flows may fill in only one of
/// the two representations.
pub fn piece_count(
    size: &CatalogOption,
    default: NonZeroU32,
    sink: &dyn DiagnosticSink,
) -> NonZeroU32 {
    if let Some(pieces) = size.quantity.and_then(NonZeroU32::new) {
        return pieces;
    }
    if let Some(pieces) = pieces_from_label(&size.label) {
        return pieces;
    }

    sink.emit(Diagnostic::PieceCountDefaulted {
        option_id: size.id.to_string(),
        label: size.label.clone(),
        pieces: default.get(),
    });
    default
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingSink;

    fn six() -> NonZeroU32 {
        NonZeroU32::new(6).unwrap()
    }

    #[test]
    fn test_label_pattern() {
        assert_eq!(pieces_from_label("Small Box (4 pieces)").map(|n| n.get()), Some(4));
        assert_eq!(pieces_from_label("Single (1 Piece)").map(|n| n.get()), Some(1));
        assert_eq!(pieces_from_label("Gift box (12pieces)").map(|n| n.get()), Some(12));
        assert_eq!(pieces_from_label("Box of 4"), None);
        assert_eq!(pieces_from_label("Empty (0 pieces)"), None);
    }

    #[test]
    fn test_quantity_field_preferred() {
        let sink = RecordingSink::new();
        let size = CatalogOption::new("large", "Large Box (12 pieces)").with_quantity(9);
        assert_eq!(piece_count(&size, six(), &sink).get(), 9);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_label_used_without_quantity() {
        let sink = RecordingSink::new();
        let size = CatalogOption::new("small", "Small Box (4 pieces)");
        assert_eq!(piece_count(&size, six(), &sink).get(), 4);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_defaults_to_six() {
        let sink = RecordingSink::new();
        let size = CatalogOption::new("none", "Regular");
        assert_eq!(piece_count(&size, six(), &sink).get(), 6);
        assert_eq!(sink.kinds(), vec!["piece_count_defaulted"]);
    }
}
