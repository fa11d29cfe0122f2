const OCCUPIED_KEYWORDS: [&str; 3] = ["persona", "ocupado", "alguien"];
const FREE_KEYWORDS: [&str; 3] = ["libre", "vacío", "nadie"];

pub const CAMERA_ACCESS_ERROR: &str =
    "Error al acceder a la cámara. Por favor, permite el acceso.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationKind {
    Occupied,
    Free,
    Raw,
}

/// Maps a class label to its presentation by case-insensitive substring
/// match against the keyword sets. Unknown labels fall back to `Raw`.
pub fn classify_label(label: &str) -> PresentationKind {
    let lowered = label.to_lowercase();
    if OCCUPIED_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        PresentationKind::Occupied
    } else if FREE_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        PresentationKind::Free
    } else {
        PresentationKind::Raw
    }
}

pub fn format_probability(probability: f32) -> String {
    format!("{:.1}%", probability * 100.0)
}

pub fn format_caption(label: &str, probability: f32, kind: PresentationKind) -> String {
    let percent = format_probability(probability);
    match kind {
        PresentationKind::Occupied => format!("👤 Persona Detectada\n{percent}"),
        PresentationKind::Free => format!("✅ Espacio Libre\n{percent}"),
        PresentationKind::Raw => format!("{label}\n{percent}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_label_occupied() {
        assert_eq!(
            classify_label("Persona ocupada"),
            PresentationKind::Occupied
        );
        assert_eq!(classify_label("ALGUIEN presente"), PresentationKind::Occupied);
    }

    #[test]
    fn test_classify_label_free() {
        assert_eq!(classify_label("Espacio Libre"), PresentationKind::Free);
        assert_eq!(classify_label("espacio vacío"), PresentationKind::Free);
        assert_eq!(classify_label("Nadie"), PresentationKind::Free);
    }

    #[test]
    fn test_classify_label_fallback() {
        assert_eq!(classify_label("Otro"), PresentationKind::Raw);
        assert_eq!(classify_label(""), PresentationKind::Raw);
    }

    #[test]
    fn test_format_probability_one_decimal() {
        assert_eq!(format_probability(0.9), "90.0%");
        assert_eq!(format_probability(0.333), "33.3%");
        assert_eq!(format_probability(1.0), "100.0%");
    }

    #[test]
    fn test_format_caption_occupied() {
        let caption = format_caption("Persona ocupada", 0.9, PresentationKind::Occupied);
        assert_eq!(caption, "👤 Persona Detectada\n90.0%");
    }

    #[test]
    fn test_format_caption_free() {
        let caption = format_caption("Espacio Libre", 0.755, PresentationKind::Free);
        assert_eq!(caption, "✅ Espacio Libre\n75.5%");
    }

    #[test]
    fn test_format_caption_raw_keeps_label() {
        let caption = format_caption("Otro", 0.42, PresentationKind::Raw);
        assert_eq!(caption, "Otro\n42.0%");
    }
}
