use crate::domain::model::{Connection, Offer, Station, Train, Traveler};
use crate::utils::error::{CheckError, Result};
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

pub const DEFAULT_BOOKING_URL: &str = "https://www.nightjet.com/nj-booking-ocp";

/// The booking API localizes station and compartment names; offers are
/// extracted from the German payload.
const LANG: &str = "de";

#[derive(Debug, Deserialize)]
struct StartResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
struct StationEntry {
    number: Value,
    #[serde(default)]
    name: String,
    /// Non-empty for meta stations; holds the station-area display name.
    #[serde(default)]
    meta: String,
}

#[derive(Debug, Deserialize)]
struct ConnectionsResponse {
    #[serde(default)]
    connections: Option<Vec<ConnectionEntry>>,
}

#[derive(Debug, Deserialize)]
struct ConnectionEntry {
    from: StopEntry,
    to: StopEntry,
    #[serde(default)]
    trains: Vec<TrainEntry>,
}

#[derive(Debug, Deserialize)]
struct StopEntry {
    number: Value,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct TrainEntry {
    train: String,
    departure: StopTimeEntry,
    arrival: StopTimeEntry,
}

#[derive(Debug, Deserialize)]
struct StopTimeEntry {
    #[serde(default)]
    local: String,
    #[serde(default)]
    utc: Value,
}

/// Client for the Nightjet booking API. `connect` opens a session and keeps
/// the issued token for the offer requests that require it.
pub struct NightjetClient {
    client: Client,
    base_url: String,
    token: String,
}

impl NightjetClient {
    pub async fn connect(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let client = Client::new();

        let endpoint = format!("{}/init/start", base_url);
        tracing::debug!("Starting booking session at {}", endpoint);
        let response = client
            .post(&endpoint)
            .json(&serde_json::json!({ "lang": LANG }))
            .send()
            .await?;
        ensure_success(&endpoint, &response)?;

        let start: StartResponse = response.json().await?;
        tracing::debug!("Booking session established");

        Ok(Self {
            client,
            base_url,
            token: start.token,
        })
    }

    /// Looks up a station by name query and resolves the result list down to
    /// a single station: one meta (station area) match wins over plain
    /// matches, any remaining ambiguity is an error.
    pub async fn find_station(&self, query: &str) -> Result<Station> {
        let endpoint = format!("{}/stations/find", self.base_url);
        tracing::debug!("Looking up station '{}'", query);
        let response = self
            .client
            .get(&endpoint)
            .query(&[("lang", LANG), ("name", query)])
            .send()
            .await?;
        ensure_success(&endpoint, &response)?;

        let entries: Vec<StationEntry> = response.json().await?;
        resolve_station(query, entries)
    }

    /// One page of connections from `date` onwards; `skip` is the number of
    /// connections already consumed from earlier pages.
    pub async fn connections(
        &self,
        from: &Station,
        to: &Station,
        date: NaiveDate,
        skip: usize,
    ) -> Result<Vec<Connection>> {
        let endpoint = format!(
            "{}/connection/{}/{}/{}",
            self.base_url,
            from.eva_number,
            to.eva_number,
            date.format("%Y-%m-%d")
        );
        tracing::debug!("Fetching connections from {} (skip={})", endpoint, skip);
        let response = self
            .client
            .get(&endpoint)
            .query(&[("skip", skip)])
            .send()
            .await?;
        ensure_success(&endpoint, &response)?;

        let body: ConnectionsResponse = response.json().await?;
        body.connections
            .unwrap_or_default()
            .into_iter()
            .map(connection_from_entry)
            .collect()
    }

    /// Fetches offers for one connection, filtered to its departure train.
    pub async fn offers(
        &self,
        connection: &Connection,
        travelers: &[Traveler],
    ) -> Result<Vec<Offer>> {
        let departure = connection.departure_train()?;

        let objects: Vec<Value> = travelers
            .iter()
            .map(|t| {
                serde_json::json!({
                    "type": "person",
                    "gender": t.gender.as_str(),
                    "birthDate": t.birth_date(),
                    "cards": [],
                })
            })
            .collect();

        let body = serde_json::json!({
            "lang": LANG,
            "njFrom": connection.from.eva_number,
            "njTo": connection.to.eva_number,
            "njDep": departure.departure_stamp,
            "maxChanges": 0,
            "connections": 1,
            "filter": {
                "njTrain": departure.ident,
                "njDeparture": departure.departure_stamp,
            },
            "objects": objects,
        });

        let endpoint = format!("{}/offer/get", self.base_url);
        tracing::debug!("Fetching offers for train {}", departure.ident);
        let response = self
            .client
            .post(&endpoint)
            .json(&body)
            .header("Content-Type", "application/json; charset=utf-8")
            .header("X-Token", &self.token)
            .send()
            .await?;
        ensure_success(&endpoint, &response)?;

        let payload: Value = response.json().await?;
        Ok(offers_from_json(&payload))
    }
}

fn ensure_success(endpoint: &str, response: &reqwest::Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(CheckError::ApiStatusError {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        })
    }
}

fn resolve_station(query: &str, entries: Vec<StationEntry>) -> Result<Station> {
    let metas: Vec<&StationEntry> = entries.iter().filter(|e| !e.meta.is_empty()).collect();

    if metas.len() > 1 {
        return Err(CheckError::AmbiguousStation {
            query: query.to_string(),
            candidates: describe_entries(&metas),
        });
    }
    if let Some(entry) = metas.first() {
        return Ok(Station {
            eva_number: parse_i64("station number", &entry.number)?,
            name: entry.meta.clone(),
            meta: true,
        });
    }

    let plain: Vec<&StationEntry> = entries.iter().filter(|e| e.meta.is_empty()).collect();
    match plain.as_slice() {
        [entry] => Ok(Station {
            eva_number: parse_i64("station number", &entry.number)?,
            name: entry.name.clone(),
            meta: false,
        }),
        [] => Err(CheckError::StationNotFound {
            query: query.to_string(),
        }),
        _ => Err(CheckError::AmbiguousStation {
            query: query.to_string(),
            candidates: describe_entries(&plain),
        }),
    }
}

fn describe_entries(entries: &[&StationEntry]) -> String {
    let names: Vec<String> = entries
        .iter()
        .map(|e| {
            let name = if e.meta.is_empty() { &e.name } else { &e.meta };
            format!("{} ({})", name, e.number)
        })
        .collect();
    names.join(", ")
}

fn connection_from_entry(entry: ConnectionEntry) -> Result<Connection> {
    let trains: Result<Vec<Train>> = entry.trains.into_iter().map(train_from_entry).collect();
    Ok(Connection {
        from: Station {
            eva_number: parse_i64("from station number", &entry.from.number)?,
            name: entry.from.name,
            meta: false,
        },
        to: Station {
            eva_number: parse_i64("to station number", &entry.to.number)?,
            name: entry.to.name,
            meta: false,
        },
        trains: trains?,
    })
}

fn train_from_entry(entry: TrainEntry) -> Result<Train> {
    let departure_stamp = parse_i64("departure timestamp", &entry.departure.utc)?;
    Ok(Train {
        ident: entry.train,
        departure_local: entry.departure.local,
        departure_stamp,
        arrival_local: entry.arrival.local,
    })
}

// The API is loose about numeric fields; eva numbers and timestamps show up
// both as numbers and as strings.
fn parse_i64(field: &str, value: &Value) -> Result<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .ok_or_else(|| CheckError::ProcessingError {
            message: format!("Expected a number for {}, got: {}", field, value),
        })
}

/// Extracts offers from the arbitrarily nested offer payload: every element
/// of any `offers` array is an offer, and its compartment names are all
/// `name.de` values under any `compartments` array inside it.
pub fn offers_from_json(payload: &Value) -> Vec<Offer> {
    let mut nodes = Vec::new();
    collect_array_items(payload, "offers", &mut nodes);

    nodes
        .iter()
        .map(|offer| Offer {
            name: offer
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("Unnamed offer")
                .to_string(),
            details: compartment_names(offer),
        })
        .collect()
}

fn compartment_names(offer: &Value) -> Vec<String> {
    let mut nodes = Vec::new();
    collect_array_items(offer, "compartments", &mut nodes);

    nodes
        .iter()
        .filter_map(|c| c.get("name").and_then(|n| n.get("de")).and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}

fn collect_array_items<'a>(value: &'a Value, key: &str, out: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                if k == key {
                    if let Value::Array(items) = v {
                        out.extend(items.iter());
                    }
                }
                collect_array_items(v, key, out);
            }
        }
        Value::Array(items) => {
            for v in items {
                collect_array_items(v, key, out);
            }
        }
        _ => {}
    }
}
