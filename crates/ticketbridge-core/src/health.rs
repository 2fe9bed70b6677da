use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub store: bool,
    pub tracker: bool,
}

impl HealthReport {
    /// Aggregate health: every component must be reachable.
    pub fn healthy(&self) -> bool {
        self.store && self.tracker
    }

    pub fn status_str(&self) -> &'static str {
        if self.healthy() {
            "ok"
        } else {
            "degraded"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healthy_is_logical_and() {
        let cases = [
            (true, true, true),
            (true, false, false),
            (false, true, false),
            (false, false, false),
        ];
        for (store, tracker, expected) in cases {
            let report = HealthReport { store, tracker };
            assert_eq!(report.healthy(), expected, "{report:?}");
        }
    }

    #[test]
    fn status_str_reflects_aggregate() {
        assert_eq!(HealthReport { store: true, tracker: true }.status_str(), "ok");
        assert_eq!(
            HealthReport { store: true, tracker: false }.status_str(),
            "degraded"
        );
    }
}
