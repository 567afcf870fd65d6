use super::domain::{Agent, AgentRole, OrgUnit, RawPerformanceRecord, Roster};
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum BattleDataImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidDate { line: u64, value: String },
}

impl std::fmt::Display for BattleDataImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BattleDataImportError::Io(err) => write!(f, "failed to read battle export: {}", err),
            BattleDataImportError::Csv(err) => write!(f, "invalid battle CSV data: {}", err),
            BattleDataImportError::InvalidDate { line, value } => {
                write!(f, "row {} has an unparseable date '{}'", line, value)
            }
        }
    }
}

impl std::error::Error for BattleDataImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BattleDataImportError::Io(err) => Some(err),
            BattleDataImportError::Csv(err) => Some(err),
            BattleDataImportError::InvalidDate { .. } => None,
        }
    }
}

impl From<std::io::Error> for BattleDataImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for BattleDataImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// One row of the joined daily-performance export: the raw entry plus
/// the agent and org attributes it was joined to.
#[derive(Debug, Deserialize)]
struct ExportRow {
    #[serde(default)]
    id: Option<String>,
    agent_id: String,
    date: String,
    #[serde(default, deserialize_with = "number_or_zero")]
    leads: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    payins: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    sales: f64,
    #[serde(default = "default_true", deserialize_with = "flag_default_true")]
    approved: bool,
    #[serde(default, deserialize_with = "flag_default_false")]
    voided: bool,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    leads_depot_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    sales_depot_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    company_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    platoon_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    agent_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    agent_role: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    photo_url: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    depot_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    company_name: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    let parsed = opt
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse::<f64>().ok())
        .unwrap_or(0.0);
    Ok(if parsed.is_finite() { parsed } else { 0.0 })
}

fn parse_flag(raw: Option<String>, default: bool) -> bool {
    match raw.as_deref().map(str::trim) {
        None | Some("") => default,
        Some(value) => matches!(
            value.to_ascii_lowercase().as_str(),
            "true" | "t" | "yes" | "y" | "1"
        ),
    }
}

fn default_true() -> bool {
    true
}

fn flag_default_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(parse_flag(opt, true))
}

fn flag_default_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(parse_flag(opt, false))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

/// Records plus the roster reconstructed from the export's joined
/// columns.
#[derive(Debug, Default)]
pub struct BattleDataset {
    pub records: Vec<RawPerformanceRecord>,
    pub roster: Roster,
}

/// Reads a joined daily-performance CSV export into canonical records
/// and a roster. Fixture and demo plumbing; the hosted backend remains
/// the system of record.
pub struct BattleDataImporter;

impl BattleDataImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<BattleDataset, BattleDataImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<BattleDataset, BattleDataImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut dataset = BattleDataset::default();

        for (index, result) in csv_reader.deserialize::<ExportRow>().enumerate() {
            let row = result?;
            let line = index as u64 + 2;

            let date = parse_date(&row.date).ok_or(BattleDataImportError::InvalidDate {
                line,
                value: row.date.clone(),
            })?;

            if let Some(name) = &row.agent_name {
                dataset.roster.upsert_agent(Agent {
                    id: row.agent_id.clone(),
                    name: name.clone(),
                    role: AgentRole::classify(row.agent_role.as_deref().unwrap_or_default()),
                    depot_id: row.leads_depot_id.clone(),
                    company_id: row.company_id.clone(),
                    platoon_id: row.platoon_id.clone(),
                    photo_url: row.photo_url.clone(),
                });
            }
            if let (Some(depot_id), Some(depot_name)) = (&row.leads_depot_id, &row.depot_name) {
                dataset.roster.upsert_depot(OrgUnit {
                    id: depot_id.clone(),
                    name: depot_name.clone(),
                    photo_url: None,
                });
            }
            if let (Some(company_id), Some(company_name)) = (&row.company_id, &row.company_name) {
                dataset.roster.upsert_company(OrgUnit {
                    id: company_id.clone(),
                    name: company_name.clone(),
                    photo_url: None,
                });
            }

            let id = row
                .id
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| format!("{}_{}", date, row.agent_id));
            dataset.records.push(RawPerformanceRecord {
                id,
                agent_id: row.agent_id,
                date,
                leads: row.leads,
                payins: row.payins,
                sales: row.sales,
                approved: row.approved,
                voided: row.voided,
                leads_depot_id: row.leads_depot_id,
                sales_depot_id: row.sales_depot_id,
                company_id: row.company_id,
                platoon_id: row.platoon_id,
            });
        }

        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const EXPORT: &str = "\
agent_id,date,leads,payins,sales,agent_name,agent_role,leads_depot_id,depot_name,company_id,company_name
a1,2026-02-02,12,1500,40000,Sgt. Pepper,platoon,d1,North Depot,c1,Acme Energy
a1,2026-02-03,3,,10000,Sgt. Pepper,platoon,d1,North Depot,c1,Acme Energy
a2,2026-02-02T09:30:00Z,7,0,noise,Maj. Tom,team,d2,South Depot,c1,Acme Energy
";

    #[test]
    fn imports_records_and_rebuilds_the_roster() {
        let dataset =
            BattleDataImporter::from_reader(Cursor::new(EXPORT)).expect("export parses");

        assert_eq!(dataset.records.len(), 3);
        assert_eq!(dataset.roster.leaders_count(), 2);
        assert_eq!(dataset.roster.depots_count(), 2);
        assert_eq!(dataset.roster.companies_count(), 1);

        let first = &dataset.records[0];
        assert_eq!(first.id, "2026-02-02_a1");
        assert_eq!(first.leads, 12.0);
        assert!(first.approved);
        assert!(!first.voided);

        // Blank and unparseable numeric cells coerce to zero.
        assert_eq!(dataset.records[1].payins, 0.0);
        assert_eq!(dataset.records[2].sales, 0.0);

        // RFC3339 timestamps collapse to their calendar date.
        assert_eq!(
            dataset.records[2].date,
            NaiveDate::from_ymd_opt(2026, 2, 2).expect("valid date")
        );
    }

    #[test]
    fn rejects_rows_with_unparseable_dates() {
        let csv = "agent_id,date,leads\na1,02/03/2026,5\n";
        let err = BattleDataImporter::from_reader(Cursor::new(csv))
            .expect_err("invalid date rejected");
        assert!(matches!(
            err,
            BattleDataImportError::InvalidDate { line: 2, .. }
        ));
    }

    #[test]
    fn voided_and_approval_flags_parse_leniently() {
        let csv = "\
agent_id,date,leads,approved,voided
a1,2026-02-02,5,no,TRUE
a1,2026-02-03,5,,
";
        let dataset = BattleDataImporter::from_reader(Cursor::new(csv)).expect("export parses");
        assert!(!dataset.records[0].approved);
        assert!(dataset.records[0].voided);
        assert!(dataset.records[1].approved);
        assert!(!dataset.records[1].voided);
    }
}
