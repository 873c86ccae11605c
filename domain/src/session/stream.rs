//! Events emitted while a statement is being generated

/// One event from a statement stream.
///
/// Any number of `Delta` fragments arrive first; the stream ends with a
/// single `Completed` (carrying the generator's full text, possibly empty)
/// or `Error`. Anything received after the terminal event is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Delta(String),
    Completed(String),
    Error(String),
}
