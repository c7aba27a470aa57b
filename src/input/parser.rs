use super::{ImportError, ValidationError};
use crate::profiles::engagement::ContactEngagement;
use crate::profiles::funding::FundingProfile;
use crate::profiles::revenue::{RevenueStream, StreamType};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct RevenueRow {
    id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    stream_type: StreamType,
    current_revenue: f64,
    #[serde(default)]
    forecast_revenue: Option<f64>,
    #[serde(default)]
    growth: Option<f64>,
    #[serde(default)]
    margin: Option<f64>,
    #[serde(default)]
    customers: Option<u64>,
    #[serde(default)]
    avg_revenue_per_customer: Option<f64>,
}

impl RevenueRow {
    fn into_stream(self) -> RevenueStream {
        RevenueStream {
            name: self.name.unwrap_or_else(|| self.id.clone()),
            forecast_revenue: self.forecast_revenue.unwrap_or(self.current_revenue),
            id: self.id,
            stream_type: self.stream_type,
            current_revenue: self.current_revenue,
            growth: self.growth,
            margin: self.margin,
            customers: self.customers.unwrap_or(0),
            avg_revenue_per_customer: self.avg_revenue_per_customer,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ContactRow {
    contact_id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    times_contacted: u32,
    times_responded: u32,
    times_followed_up: u32,
    #[serde(default)]
    avg_response_time_minutes: Option<f64>,
}

impl ContactRow {
    /// A blank response time is only allowed for contacts never reached;
    /// treating it as zero would score as an instant reply.
    fn into_contact(self) -> Result<ContactEngagement, ValidationError> {
        let avg_response_time_minutes = match self.avg_response_time_minutes {
            Some(minutes) => minutes,
            None if self.times_contacted == 0 => 0.0,
            None => {
                return Err(ValidationError::Missing {
                    field: "avg_response_time_minutes",
                    reason: "the contact has been reached",
                })
            }
        };
        Ok(ContactEngagement {
            contact_id: self.contact_id,
            name: self.name.unwrap_or_default(),
            times_contacted: self.times_contacted,
            times_responded: self.times_responded,
            times_followed_up: self.times_followed_up,
            avg_response_time_minutes,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn open(path: &Path) -> Result<std::fs::File, ImportError> {
    std::fs::File::open(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Keeps records that validate; rejected rows are logged and skipped.
fn keep_valid<T>(
    records: Vec<T>,
    id: impl Fn(&T) -> &str,
    validate: impl Fn(&T) -> Result<(), ValidationError>,
) -> Result<Vec<T>, ImportError> {
    let mut kept = Vec::with_capacity(records.len());
    for record in records {
        match validate(&record) {
            Ok(()) => kept.push(record),
            Err(err) => warn!(record = id(&record), error = %err, "skipping invalid row"),
        }
    }

    if kept.is_empty() {
        return Err(ImportError::Empty);
    }
    Ok(kept)
}

/// Reads a revenue portfolio CSV.
///
/// Blank `growth`, `margin`, or `avg_revenue_per_customer` cells are treated
/// as unrecorded rather than zero. A blank forecast falls back to current revenue.
pub fn read_revenue_streams<R: Read>(reader: R) -> Result<Vec<RevenueStream>, ImportError> {
    let mut csv_reader = csv_reader(reader);
    let mut streams = Vec::new();
    for record in csv_reader.deserialize::<RevenueRow>() {
        streams.push(record?.into_stream());
    }

    keep_valid(streams, |s| s.id.as_str(), RevenueStream::validate)
}

pub fn load_revenue_streams<P: AsRef<Path>>(path: P) -> Result<Vec<RevenueStream>, ImportError> {
    read_revenue_streams(open(path.as_ref())?)
}

/// Reads a team engagement CSV, one row per contact.
pub fn read_contacts<R: Read>(reader: R) -> Result<Vec<ContactEngagement>, ImportError> {
    let mut csv_reader = csv_reader(reader);
    let mut contacts = Vec::new();
    for record in csv_reader.deserialize::<ContactRow>() {
        let row = record?;
        let contact_id = row.contact_id.clone();
        match row.into_contact() {
            Ok(contact) => contacts.push(contact),
            Err(err) => warn!(record = %contact_id, error = %err, "skipping invalid row"),
        }
    }

    keep_valid(contacts, |c| c.contact_id.as_str(), ContactEngagement::validate)
}

pub fn load_contacts<P: AsRef<Path>>(path: P) -> Result<Vec<ContactEngagement>, ImportError> {
    read_contacts(open(path.as_ref())?)
}

/// Loads a single applicant profile from JSON. Unlike the CSV loaders an
/// invalid profile is an error, since there is nothing else to fall back on.
pub fn load_funding_profile<P: AsRef<Path>>(path: P) -> Result<FundingProfile, ImportError> {
    let file = open(path.as_ref())?;
    let profile: FundingProfile = serde_json::from_reader(std::io::BufReader::new(file))?;
    profile.validate().map_err(|source| ImportError::Invalid {
        record: profile.id.clone(),
        source,
    })?;
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PORTFOLIO: &str = "\
id,name,stream_type,current_revenue,forecast_revenue,growth,margin,customers,avg_revenue_per_customer
core, Core Subscriptions ,subscription,2000000,2300000,12.5,45,800,2500
new,,usage-based,150000,,,,40,
";

    #[test]
    fn revenue_rows_map_blank_cells_to_unrecorded() {
        let streams = read_revenue_streams(PORTFOLIO.as_bytes()).expect("portfolio parses");

        assert_eq!(streams.len(), 2);
        assert_eq!(streams[0].name, "Core Subscriptions");
        assert_eq!(streams[0].stream_type, StreamType::Subscription);
        assert_eq!(streams[0].growth, Some(12.5));

        let new = &streams[1];
        assert_eq!(new.name, "new");
        assert_eq!(new.stream_type, StreamType::UsageBased);
        assert_eq!(new.forecast_revenue, 150_000.0);
        assert_eq!(new.growth, None);
        assert_eq!(new.margin, None);
        assert_eq!(new.avg_revenue_per_customer, None);
    }

    #[test]
    fn invalid_rows_are_skipped() {
        let csv = "\
id,stream_type,current_revenue,margin
good,one-time,1000,40
bad,one-time,1000,140
";
        let streams = read_revenue_streams(csv.as_bytes()).expect("one row survives");
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0].id, "good");
    }

    #[test]
    fn all_rows_invalid_is_an_empty_import() {
        let csv = "id,stream_type,current_revenue\nbad,one-time,-5\n";
        match read_revenue_streams(csv.as_bytes()) {
            Err(ImportError::Empty) => {}
            other => panic!("expected empty import, got {other:?}"),
        }
    }

    #[test]
    fn unknown_stream_type_is_a_csv_error() {
        let csv = "id,stream_type,current_revenue\nx,barter,10\n";
        match read_revenue_streams(csv.as_bytes()) {
            Err(ImportError::Csv(_)) => {}
            other => panic!("expected csv error, got {other:?}"),
        }
    }

    #[test]
    fn contacts_parse_and_validate_bounds() {
        let csv = "\
contact_id,name,times_contacted,times_responded,times_followed_up,avg_response_time_minutes
c-1,Ada,10,8,6,5
c-2,,0,0,0,
c-3,Over,2000,1,1,30
";
        let contacts = read_contacts(csv.as_bytes()).expect("contacts parse");

        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[0].name, "Ada");
        assert_eq!(contacts[1].name, "");
        assert_eq!(contacts[1].avg_response_time_minutes, 0.0);
    }

    #[test]
    fn reached_contact_without_response_time_is_skipped() {
        let csv = "\
contact_id,name,times_contacted,times_responded,times_followed_up,avg_response_time_minutes
c-1,Ada,10,8,6,
c-2,Bo,10,8,6,30
";
        let contacts = read_contacts(csv.as_bytes()).expect("one contact survives");
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].contact_id, "c-2");

        let only_blank = "\
contact_id,name,times_contacted,times_responded,times_followed_up,avg_response_time_minutes
c-1,Ada,10,8,6,
";
        match read_contacts(only_blank.as_bytes()) {
            Err(ImportError::Empty) => {}
            other => panic!("expected empty import, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = load_contacts("/nonexistent/team.csv").expect_err("file is missing");
        assert!(err.to_string().contains("/nonexistent/team.csv"));
    }
}
