use crate::scoring::{BattleType, FormulaConfig, WeekKey};
use serde::{Deserialize, Serialize};

/// Lifecycle of a stored formula. Publishing is one-way: a published
/// formula is read-only forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormulaStatus {
    Draft,
    Published,
}

impl FormulaStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Published => "Published",
        }
    }
}

/// A stored scoring formula and the week window it applies to.
///
/// Open-ended bounds are allowed: a missing start applies from the
/// beginning of time, a missing end applies indefinitely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaRecord {
    pub id: String,
    pub name: String,
    pub battle_type: BattleType,
    #[serde(default)]
    pub effective_start_week: Option<WeekKey>,
    #[serde(default)]
    pub effective_end_week: Option<WeekKey>,
    pub version: u32,
    pub status: FormulaStatus,
    pub config: FormulaConfig,
}

impl FormulaRecord {
    pub fn draft(id: impl Into<String>, name: impl Into<String>, battle_type: BattleType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            battle_type,
            effective_start_week: None,
            effective_end_week: None,
            version: 1,
            status: FormulaStatus::Draft,
            config: FormulaConfig::default(),
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == FormulaStatus::Published
    }

    /// Whether this formula governs the given battle and week. Only
    /// published formulas are ever active.
    pub fn is_active_for(&self, battle_type: BattleType, week: WeekKey) -> bool {
        if !self.is_published() || self.battle_type != battle_type {
            return false;
        }
        if let Some(start) = self.effective_start_week {
            if week < start {
                return false;
            }
        }
        if let Some(end) = self.effective_end_week {
            if week > end {
                return false;
            }
        }
        true
    }
}

/// Fields a draft edit may change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DraftUpdate {
    #[serde(default)]
    pub name: Option<String>,
    pub config: FormulaConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week(raw: &str) -> WeekKey {
        raw.parse().expect("valid week key")
    }

    #[test]
    fn activation_respects_status_battle_and_window() {
        let mut record = FormulaRecord::draft("f1", "February split", BattleType::Leaders);
        record.effective_start_week = Some(week("2026-W05"));
        record.effective_end_week = Some(week("2026-W08"));

        // Drafts are never active.
        assert!(!record.is_active_for(BattleType::Leaders, week("2026-W06")));

        record.status = FormulaStatus::Published;
        assert!(record.is_active_for(BattleType::Leaders, week("2026-W05")));
        assert!(record.is_active_for(BattleType::Leaders, week("2026-W08")));
        assert!(!record.is_active_for(BattleType::Leaders, week("2026-W04")));
        assert!(!record.is_active_for(BattleType::Leaders, week("2026-W09")));
        assert!(!record.is_active_for(BattleType::Depots, week("2026-W06")));
    }

    #[test]
    fn open_ended_windows_apply_everywhere() {
        let mut record = FormulaRecord::draft("f1", "Season default", BattleType::Companies);
        record.status = FormulaStatus::Published;
        assert!(record.is_active_for(BattleType::Companies, week("2020-W01")));
        assert!(record.is_active_for(BattleType::Companies, week("2030-W52")));
    }
}
