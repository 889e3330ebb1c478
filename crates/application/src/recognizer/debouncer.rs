/// Turns the per-frame label stream into speak decisions.
///
/// Speaks only when the label differs from the previous one. The held label
/// survives zero-hand frames and muting; only [`reset`](Self::reset) clears it.
#[derive(Debug, Default, Clone)]
pub struct PredictionDebouncer {
    last_label: Option<String>,
}

impl PredictionDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one prediction. Returns the label to speak, if any.
    pub fn observe(&mut self, label: &str) -> Option<String> {
        if self.last_label.as_deref() == Some(label) {
            return None;
        }
        self.last_label = Some(label.to_string());
        Some(label.to_string())
    }

    /// Back to idle: the next prediction is always spoken.
    pub fn reset(&mut self) {
        self.last_label = None;
    }

    pub fn last_label(&self) -> Option<&str> {
        self.last_label.as_deref()
    }
}
