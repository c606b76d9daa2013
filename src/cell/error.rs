use std::fmt;

/// Failure channel of a [`crate::cell::SettlementFuture`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection<E> {
    /// The cell settled on the rejection track with this error.
    Rejected(E),
    /// The settle capability was dropped without being invoked, so the
    /// future can never settle with a value or a user error.
    Abandoned,
}

impl<E> Rejection<E> {
    pub fn is_abandoned(&self) -> bool {
        matches!(self, Self::Abandoned)
    }

    pub fn as_error(&self) -> Option<&E> {
        match self {
            Self::Rejected(error) => Some(error),
            Self::Abandoned => None,
        }
    }

    pub fn into_error(self) -> Option<E> {
        match self {
            Self::Rejected(error) => Some(error),
            Self::Abandoned => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for Rejection<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(error) => write!(f, "{error}"),
            Self::Abandoned => write!(f, "settlement was abandoned before it settled"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for Rejection<E> {}
