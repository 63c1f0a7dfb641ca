/// Synthetic identifier for a tokenizable parcel, rendered as `TK-###`.
///
/// The number is the feature's 1-based position in its loaded collection.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(u32);

impl TokenId {
    pub const PREFIX: &'static str = "TK-";

    /// Builds the id for the feature at `index` (0-based).
    pub fn from_index(index: usize) -> Self {
        TokenId(u32::try_from(index).map_or(u32::MAX, |i| i.saturating_add(1)))
    }

    pub fn ordinal(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{:03}", Self::PREFIX, self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::TokenId;

    #[test]
    fn pads_to_three_digits() {
        assert_eq!(TokenId::from_index(0).to_string(), "TK-001");
        assert_eq!(TokenId::from_index(41).to_string(), "TK-042");
        assert_eq!(TokenId::from_index(998).to_string(), "TK-999");
    }

    #[test]
    fn grows_past_three_digits() {
        assert_eq!(TokenId::from_index(999).to_string(), "TK-1000");
        assert_eq!(TokenId::from_index(999).ordinal(), 1000);
    }
}
