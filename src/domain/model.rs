use crate::utils::error::{CheckError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Connections reported per route when the query carries no count field.
pub const DEFAULT_CONNECTION_COUNT: usize = 3;

/// A booking-API station. Meta stations stand for a whole station area
/// (e.g. all Vienna stations) and render with an "Area" suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub eva_number: i64,
    pub name: String,
    pub meta: bool,
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} ({})",
            self.name,
            if self.meta { " Area" } else { "" },
            self.eva_number
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Train {
    pub ident: String,
    pub departure_local: String,
    /// UTC departure timestamp, echoed back to the API as the offer filter.
    pub departure_stamp: i64,
    pub arrival_local: String,
}

impl fmt::Display for Train {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} - {})",
            self.ident, self.departure_local, self.arrival_local
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub from: Station,
    pub to: Station,
    pub trains: Vec<Train>,
}

impl Connection {
    /// The first train carries the departure the offer request filters on.
    pub fn departure_train(&self) -> Result<&Train> {
        self.trains.first().ok_or_else(|| CheckError::EmptyConnection {
            from: self.from.name.clone(),
            to: self.to.name.clone(),
        })
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let trains: Vec<String> = self.trains.iter().map(|t| t.to_string()).collect();
        write!(f, "{} -> {}: {}", self.from, self.to, trains.join(", "))
    }
}

/// A bookable offer with its compartment names (e.g. seat, couchette, sleeper).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub name: String,
    pub details: Vec<String>,
}

impl fmt::Display for Offer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ({})", self.name, self.details.join(", "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Traveler {
    pub gender: Gender,
    pub year_of_birth: i32,
}

impl Traveler {
    pub fn female(year_of_birth: i32) -> Self {
        Self {
            gender: Gender::Female,
            year_of_birth,
        }
    }

    pub fn male(year_of_birth: i32) -> Self {
        Self {
            gender: Gender::Male,
            year_of_birth,
        }
    }

    /// The API wants a full birth date; only the year matters for pricing,
    /// so a fixed mid-year day fills the rest.
    pub fn birth_date(&self) -> String {
        format!("{}-06-08", self.year_of_birth)
    }
}

impl FromStr for Traveler {
    type Err = CheckError;

    /// Parses the `GENDER:YEAR` CLI shape, e.g. `female:1983`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| CheckError::InvalidConfigValueError {
            field: "traveler".to_string(),
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let (gender, year) = s
            .split_once(':')
            .ok_or_else(|| invalid("Expected GENDER:YEAR, e.g. female:1983"))?;

        let gender = match gender.trim() {
            "female" => Gender::Female,
            "male" => Gender::Male,
            _ => return Err(invalid("Gender must be 'female' or 'male'")),
        };

        let year_of_birth: i32 = year
            .trim()
            .parse()
            .map_err(|_| invalid("Year of birth must be a number"))?;

        Ok(Self {
            gender,
            year_of_birth,
        })
    }
}

fn default_count() -> usize {
    DEFAULT_CONNECTION_COUNT
}

/// One route to check: where from, where to, from which date, and how many
/// connections to report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteQuery {
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    #[serde(default = "default_count")]
    pub count: usize,
}

impl FromStr for RouteQuery {
    type Err = CheckError;

    /// Parses the `Origin|Destination|Date[|Count]` CLI shape.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: String| CheckError::InvalidConfigValueError {
            field: "route".to_string(),
            value: s.to_string(),
            reason,
        };

        let fields: Vec<&str> = s.split('|').map(str::trim).collect();
        if fields.len() < 3 || fields.len() > 4 {
            return Err(invalid(format!(
                "Expected Origin|Destination|Date[|Count], got {} field(s)",
                fields.len()
            )));
        }

        if fields[0].is_empty() || fields[1].is_empty() {
            return Err(invalid("Origin and destination cannot be empty".to_string()));
        }

        let date = NaiveDate::parse_from_str(fields[2], "%Y-%m-%d")
            .map_err(|e| invalid(format!("Expected a YYYY-MM-DD date: {}", e)))?;

        let count = match fields.get(3) {
            Some(raw) => raw
                .parse()
                .map_err(|_| invalid("Count must be a positive number".to_string()))?,
            None => DEFAULT_CONNECTION_COUNT,
        };

        Ok(Self {
            origin: fields[0].to_string(),
            destination: fields[1].to_string(),
            date,
            count,
        })
    }
}

impl fmt::Display for RouteQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}",
            self.origin, self.destination, self.date, self.count
        )
    }
}

/// Offers found for one connection. An empty offer list is a valid result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionOffers {
    pub connection: Connection,
    pub offers: Vec<Offer>,
}

/// Everything gathered for one route query. `exhausted` is set when
/// pagination ran out of matches before the requested count, including the
/// case where `connections` stays empty altogether.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteOffers {
    pub query: RouteQuery,
    pub from: Station,
    pub to: Station,
    pub connections: Vec<ConnectionOffers>,
    pub exhausted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ReportFormat {
    Html,
    Text,
}

/// Transform stage output: the report rendered in both formats, plus the
/// route data it was built from.
#[derive(Debug, Clone)]
pub struct ReportBundle {
    pub routes: Vec<RouteOffers>,
    pub html_output: String,
    pub text_output: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_query_with_count() {
        let route: RouteQuery = "München|Mailand|2025-10-18|6".parse().unwrap();
        assert_eq!(route.origin, "München");
        assert_eq!(route.destination, "Mailand");
        assert_eq!(route.date, NaiveDate::from_ymd_opt(2025, 10, 18).unwrap());
        assert_eq!(route.count, 6);
    }

    #[test]
    fn test_route_query_default_count() {
        let route: RouteQuery = "Wien|Hamburg|2025-11-02".parse().unwrap();
        assert_eq!(route.count, DEFAULT_CONNECTION_COUNT);
    }

    #[test]
    fn test_route_query_trims_fields() {
        let route: RouteQuery = " Wien | Hamburg | 2025-11-02 | 2 ".parse().unwrap();
        assert_eq!(route.origin, "Wien");
        assert_eq!(route.destination, "Hamburg");
        assert_eq!(route.count, 2);
    }

    #[test]
    fn test_route_query_rejects_bad_shapes() {
        assert!("Wien|Hamburg".parse::<RouteQuery>().is_err());
        assert!("Wien|Hamburg|2025-11-02|3|extra".parse::<RouteQuery>().is_err());
        assert!("Wien||2025-11-02".parse::<RouteQuery>().is_err());
        assert!("Wien|Hamburg|02.11.2025".parse::<RouteQuery>().is_err());
        assert!("Wien|Hamburg|2025-11-02|many".parse::<RouteQuery>().is_err());
    }

    #[test]
    fn test_traveler_parsing() {
        let traveler: Traveler = "female:1983".parse().unwrap();
        assert_eq!(traveler, Traveler::female(1983));
        assert_eq!(traveler.birth_date(), "1983-06-08");

        assert!("1983".parse::<Traveler>().is_err());
        assert!("other:1983".parse::<Traveler>().is_err());
        assert!("male:soon".parse::<Traveler>().is_err());
    }

    #[test]
    fn test_station_display() {
        let plain = Station {
            eva_number: 8000261,
            name: "München Hbf".to_string(),
            meta: false,
        };
        assert_eq!(plain.to_string(), "München Hbf (8000261)");

        let meta = Station {
            eva_number: 8100000,
            name: "Wien".to_string(),
            meta: true,
        };
        assert_eq!(meta.to_string(), "Wien Area (8100000)");
    }

    #[test]
    fn test_connection_display_and_departure_train() {
        let connection = Connection {
            from: Station {
                eva_number: 1,
                name: "A".to_string(),
                meta: false,
            },
            to: Station {
                eva_number: 2,
                name: "B".to_string(),
                meta: false,
            },
            trains: vec![Train {
                ident: "NJ 40295".to_string(),
                departure_local: "2025-10-18 18:10".to_string(),
                departure_stamp: 1760811000000,
                arrival_local: "2025-10-19 06:30".to_string(),
            }],
        };

        assert_eq!(
            connection.to_string(),
            "A (1) -> B (2): NJ 40295 (2025-10-18 18:10 - 2025-10-19 06:30)"
        );
        assert_eq!(connection.departure_train().unwrap().ident, "NJ 40295");

        let empty = Connection {
            trains: Vec::new(),
            ..connection
        };
        assert!(empty.departure_train().is_err());
    }

    #[test]
    fn test_offer_display() {
        let offer = Offer {
            name: "Sparschiene Komfort".to_string(),
            details: vec!["Sitzwagen".to_string(), "Liegewagen".to_string()],
        };
        assert_eq!(offer.to_string(), "Sparschiene Komfort: (Sitzwagen, Liegewagen)");
    }
}
