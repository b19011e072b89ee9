use std::fmt;

/// A figure shown to editors, tagged with whether the backend measured it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric<T> {
    Measured(T),
    Estimated(T),
}

impl<T: Copy> Metric<T> {
    pub fn value(&self) -> T {
        match self {
            Metric::Measured(v) | Metric::Estimated(v) => *v,
        }
    }

    pub fn is_estimated(&self) -> bool {
        matches!(self, Metric::Estimated(_))
    }
}

impl<T: fmt::Display> fmt::Display for Metric<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Measured(v) => write!(f, "{}", v),
            Metric::Estimated(v) => write!(f, "~{} (est.)", v),
        }
    }
}
