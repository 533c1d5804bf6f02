//! Field-level fallback values taken from a preset

/// Scalar fields a preset can hand down to a content entry
///
/// Each variant exports the fields it has and picks up the ones it has
/// from another entry; fields missing on either side are ignored.
#[derive(Debug, Clone, Default)]
pub(crate) struct PresetFields {
    pub desc: Option<String>,
    pub value: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub x2: Option<f64>,
    pub y2: Option<f64>,
    pub font: Option<String>,
    pub fontsize: Option<f64>,
    pub align: Option<String>,
    pub color: Option<String>,
    pub transparency: Option<f64>,
    pub lines: Option<u32>,
    pub trigger: Option<String>,
    pub choices: Option<String>,
}

/// Set `slot` from `fallback` if it is still unset
pub(crate) fn fill<T: Clone>(slot: &mut Option<T>, fallback: &Option<T>) {
    if slot.is_none() {
        slot.clone_from(fallback);
    }
}
