use serde::Deserialize;

/// Offset-based paging shared by the list endpoints.
#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

pub fn default_limit() -> i64 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        let p: Pagination = serde_json::from_str("{}").expect("empty object");
        assert_eq!(p.skip, 0);
        assert_eq!(p.limit, 100);
    }

    #[test]
    fn explicit_values_win() {
        let p: Pagination = serde_json::from_str(r#"{"skip": 40, "limit": 20}"#).expect("object");
        assert_eq!(p.skip, 40);
        assert_eq!(p.limit, 20);
    }
}
