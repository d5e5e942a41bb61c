/// Document visibility gate; moves forward only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum GateState {
    Hidden,
    Scheduled,
    Visible,
}
