use crate::scoring::BattleType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One daily performance entry for one agent, already normalized to the
/// canonical shape at the backend boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPerformanceRecord {
    pub id: String,
    pub agent_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub leads: f64,
    #[serde(default)]
    pub payins: f64,
    #[serde(default)]
    pub sales: f64,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub voided: bool,
    #[serde(default)]
    pub leads_depot_id: Option<String>,
    #[serde(default)]
    pub sales_depot_id: Option<String>,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub platoon_id: Option<String>,
}

/// Role classification, resolved once when agent rows enter the system.
///
/// The upstream roster stores free-form role strings; the first four
/// variants all denote a platoon leader for leaderboard purposes and
/// everything else classifies as support staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum AgentRole {
    Platoon,
    Leader,
    Squad,
    Team,
    Support,
}

impl AgentRole {
    pub fn classify(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "platoon" => Self::Platoon,
            "leader" => Self::Leader,
            "squad" => Self::Squad,
            "team" => Self::Team,
            _ => Self::Support,
        }
    }

    pub const fn is_leader(self) -> bool {
        !matches!(self, Self::Support)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Platoon => "Platoon",
            Self::Leader => "Leader",
            Self::Squad => "Squad",
            Self::Team => "Team",
            Self::Support => "Support",
        }
    }
}

impl From<String> for AgentRole {
    fn from(raw: String) -> Self {
        Self::classify(&raw)
    }
}

/// A roster member; leaders are the agents ranked in the leaders battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub role: AgentRole,
    #[serde(default)]
    pub depot_id: Option<String>,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub platoon_id: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Organizational grouping unit above the agent: a depot or a company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgUnit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Resolved identity of the group a record rolls up into.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSeed {
    pub key: String,
    pub name: String,
    pub photo_url: String,
}

/// Lookup tables joining performance records to agents, depots, and
/// companies.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    agents: HashMap<String, Agent>,
    depots: HashMap<String, OrgUnit>,
    companies: HashMap<String, OrgUnit>,
}

impl Roster {
    pub fn new(agents: Vec<Agent>, depots: Vec<OrgUnit>, companies: Vec<OrgUnit>) -> Self {
        Self {
            agents: agents
                .into_iter()
                .map(|agent| (agent.id.clone(), agent))
                .collect(),
            depots: depots
                .into_iter()
                .map(|unit| (unit.id.clone(), unit))
                .collect(),
            companies: companies
                .into_iter()
                .map(|unit| (unit.id.clone(), unit))
                .collect(),
        }
    }

    pub fn agent(&self, id: &str) -> Option<&Agent> {
        self.agents.get(id)
    }

    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    pub fn leaders_count(&self) -> usize {
        self.agents
            .values()
            .filter(|agent| agent.role.is_leader())
            .count()
    }

    pub fn depots_count(&self) -> usize {
        self.depots.len()
    }

    pub fn companies_count(&self) -> usize {
        self.companies.len()
    }

    pub fn upsert_agent(&mut self, agent: Agent) {
        self.agents.entry(agent.id.clone()).or_insert(agent);
    }

    pub fn upsert_depot(&mut self, unit: OrgUnit) {
        self.depots.entry(unit.id.clone()).or_insert(unit);
    }

    pub fn upsert_company(&mut self, unit: OrgUnit) {
        self.companies.entry(unit.id.clone()).or_insert(unit);
    }

    /// Resolve the grouping key and display identity for one record in
    /// the given battle. `None` means the record has no resolvable group
    /// in this dimension (unassigned data) and is skipped.
    pub fn group_seed(
        &self,
        battle_type: BattleType,
        record: &RawPerformanceRecord,
    ) -> Option<GroupSeed> {
        match battle_type {
            BattleType::Leaders => {
                let agent = self.agents.get(&record.agent_id)?;
                if !agent.role.is_leader() {
                    return None;
                }
                Some(GroupSeed {
                    key: agent.id.clone(),
                    name: non_empty(&agent.name)
                        .unwrap_or("Unknown Leader")
                        .to_owned(),
                    photo_url: agent.photo_url.clone().unwrap_or_default(),
                })
            }
            BattleType::Depots => {
                let agent = self.agents.get(&record.agent_id);
                let key = record
                    .leads_depot_id
                    .as_deref()
                    .or(record.sales_depot_id.as_deref())
                    .or_else(|| agent.and_then(|a| a.depot_id.as_deref()))
                    .and_then(non_empty)?;
                let depot = self.depots.get(key);
                Some(GroupSeed {
                    key: key.to_owned(),
                    name: depot
                        .and_then(|unit| non_empty(&unit.name))
                        .unwrap_or("Unknown Depot")
                        .to_owned(),
                    photo_url: depot
                        .and_then(|unit| unit.photo_url.clone())
                        .unwrap_or_default(),
                })
            }
            BattleType::Companies => {
                let agent = self.agents.get(&record.agent_id);
                let key = record
                    .company_id
                    .as_deref()
                    .or_else(|| agent.and_then(|a| a.company_id.as_deref()))
                    .and_then(non_empty)?;
                let company = self.companies.get(key);
                Some(GroupSeed {
                    key: key.to_owned(),
                    name: company
                        .and_then(|unit| non_empty(&unit.name))
                        .unwrap_or("Unknown Commander")
                        .to_owned(),
                    photo_url: company
                        .and_then(|unit| unit.photo_url.clone())
                        .unwrap_or_default(),
                })
            }
        }
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
