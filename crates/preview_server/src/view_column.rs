use serde::{Deserialize, Serialize};

/// Editor slot a document is shown in, counted from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewColumn(pub i64);

impl ViewColumn {
    pub const ONE: Self = Self(1);
    pub const TWO: Self = Self(2);
    pub const THREE: Self = Self(3);

    /// Slot next to this one, only the first two slots have a neighbour.
    pub fn beside(self) -> Self {
        match self {
            Self::ONE => Self::TWO,
            Self::TWO => Self::THREE,
            other => other,
        }
    }
}

impl Default for ViewColumn {
    fn default() -> Self {
        Self::ONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beside() {
        assert_eq!(ViewColumn(1).beside(), ViewColumn(2));
        assert_eq!(ViewColumn(2).beside(), ViewColumn(3));
        assert_eq!(ViewColumn(3).beside(), ViewColumn(3));
        assert_eq!(ViewColumn(7).beside(), ViewColumn(7));
        assert_eq!(ViewColumn(-1).beside(), ViewColumn(-1));
    }

    #[test]
    fn test_serde_as_number() {
        assert_eq!(serde_json::to_string(&ViewColumn::TWO).unwrap(), "2");
        assert_eq!(
            serde_json::from_str::<ViewColumn>("3").unwrap(),
            ViewColumn::THREE
        );
    }
}
