use serde::Serialize;

/// Longest worksheet name a spreadsheet accepts.
pub const SHEET_NAME_MAX_CHARS: usize = 31;

/// An `(id, display name)` pair as used by the ranking form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Choice {
    pub id: &'static str,
    pub name: &'static str,
}

impl Choice {
    const fn new(id: &'static str, name: &'static str) -> Self {
        Self { id, name }
    }
}

pub const KINDS: [Choice; 3] = [
    Choice::new("hits", "人氣榜"),
    Choice::new("bestsale", "訂購榜"),
    Choice::new("pearl", "珍珠榜"),
];

pub const CATEGORIES: [Choice; 3] = [
    Choice::new("1", "愛情文藝"),
    Choice::new("2", "耽美"),
    Choice::new("10", "百合"),
];

pub const PERIODS: [Choice; 2] = [
    Choice::new("weekly", "週榜"),
    Choice::new("monthly", "月榜"),
];

/// One ranking view: a board kind filtered by category over a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RankingDimension {
    pub kind: Choice,
    pub category: Choice,
    pub period: Choice,
}

impl RankingDimension {
    /// Every dimension, kind outermost and period innermost.
    pub fn all() -> Vec<Self> {
        let mut out = Vec::with_capacity(KINDS.len() * CATEGORIES.len() * PERIODS.len());
        for kind in KINDS {
            for category in CATEGORIES {
                for period in PERIODS {
                    out.push(Self {
                        kind,
                        category,
                        period,
                    });
                }
            }
        }
        out
    }

    pub fn display_name(&self) -> String {
        format!(
            "{}-{}-{}",
            self.kind.name, self.category.name, self.period.name
        )
    }

    pub fn sheet_name(&self) -> String {
        truncate_sheet_name(&self.display_name())
    }
}

pub fn truncate_sheet_name(name: &str) -> String {
    name.chars().take(SHEET_NAME_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn all_enumerates_eighteen_dimensions_kind_outer_period_inner() {
        let all = RankingDimension::all();
        assert_eq!(all.len(), 18);

        assert_eq!(all[0].display_name(), "人氣榜-愛情文藝-週榜");
        assert_eq!(all[1].display_name(), "人氣榜-愛情文藝-月榜");
        assert_eq!(all[2].display_name(), "人氣榜-耽美-週榜");
        assert_eq!(all[6].display_name(), "訂購榜-愛情文藝-週榜");
        assert_eq!(all[17].display_name(), "珍珠榜-百合-月榜");
    }

    #[test]
    fn sheet_names_are_short_and_unique() {
        let names = RankingDimension::all()
            .iter()
            .map(RankingDimension::sheet_name)
            .collect::<Vec<_>>();
        assert!(names.iter().all(|n| n.chars().count() <= 32));
        let unique = names.iter().collect::<HashSet<_>>();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        let long = "排".repeat(40);
        let truncated = truncate_sheet_name(&long);
        assert_eq!(truncated.chars().count(), SHEET_NAME_MAX_CHARS);
        assert_eq!(truncate_sheet_name("short"), "short");
    }
}
