/// How a finished workflow should be announced to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// State of one remotely-fetched value: every list view goes through the
/// same idle → loading → ready/failed cycle instead of carrying its own
/// loading/error flag pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Remote<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Remote<T> {
    pub fn loading(&mut self) {
        *self = Remote::Loading;
    }

    pub fn ready(&mut self, value: T) {
        *self = Remote::Ready(value);
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        *self = Remote::Failed(error.into());
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Remote::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Remote::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Remote::Failed(e) => Some(e),
            _ => None,
        }
    }
}
