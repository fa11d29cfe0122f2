#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub probability: f32,
}

impl Prediction {
    pub fn new(label: impl Into<String>, probability: f32) -> Self {
        Self {
            label: label.into(),
            probability,
        }
    }
}

/// Returns the entry with the greatest probability. The comparison is
/// strictly greater, so ties keep the first-seen entry.
pub fn select_best(predictions: &[Prediction]) -> Option<&Prediction> {
    let mut best: Option<&Prediction> = None;
    for prediction in predictions {
        match best {
            Some(current) if prediction.probability <= current.probability => {}
            _ => best = Some(prediction),
        }
    }
    best
}
