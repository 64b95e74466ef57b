use std::fmt;
use uuid::Uuid;

/// Correlation id grouping the legs of a multi-leg execution, e.g.
/// `BRK-1f2e3d4c`. Leg client order ids are derived from it so that the
/// journal and the exchange both show which orders belong together.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkId(String);

impl LinkId {
    fn generate(prefix: &str) -> Self {
        let token = Uuid::new_v4().simple().to_string();
        LinkId(format!("{}-{}", prefix, &token[..8]))
    }

    pub fn bracket() -> Self {
        Self::generate("BRK")
    }

    pub fn oco() -> Self {
        Self::generate("OCO")
    }

    pub fn twap() -> Self {
        Self::generate("TWAP")
    }

    /// Client order id for a named leg, e.g. `BRK-1f2e3d4c-ENTRY`.
    pub fn leg(&self, suffix: &str) -> String {
        format!("{}-{}", self.0, suffix)
    }

    /// Client order id for the 1-based TWAP slice `index`.
    pub fn slice(&self, index: u32) -> String {
        format!("{}-S{}", self.0, index)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_ids_carry_prefix_and_hex_token() {
        let link = LinkId::bracket();
        let (prefix, token) = link.as_str().split_once('-').unwrap();
        assert_eq!(prefix, "BRK");
        assert_eq!(token.len(), 8);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn leg_and_slice_ids_extend_the_link() {
        let link = LinkId::twap();
        assert_eq!(link.leg("TP"), format!("{}-TP", link));
        assert_eq!(link.slice(3), format!("{}-S3", link));
    }

    #[test]
    fn links_are_unique() {
        assert_ne!(LinkId::oco(), LinkId::oco());
    }
}
