#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub value: f64,

    pub timestamp_seconds: i64,
}
