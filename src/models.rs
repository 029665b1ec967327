use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Join,
    Maybe,
    Pass,
    None,
}

impl Status {
    /// Roster position: joiners first, then undecided, then passing.
    pub fn order(self) -> u8 {
        match self {
            Status::Join => 0,
            Status::Maybe => 1,
            Status::Pass => 2,
            Status::None => 3,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Join => "join",
            Status::Maybe => "maybe",
            Status::Pass => "pass",
            Status::None => "none",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub nickname: String,
    pub status: Status,
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayDocument {
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub revision: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserMapping {
    pub nickname: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    #[serde(default)]
    pub attendance: BTreeMap<String, DayDocument>,
    #[serde(default)]
    pub user_mappings: BTreeMap<String, UserMapping>,
}

/// Fired after a day document has been written.
#[derive(Debug, Clone)]
pub struct DayChange {
    pub date_key: String,
    pub document: DayDocument,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub nickname: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub device_id: String,
    pub nickname: String,
    pub previous_nickname: Option<String>,
    pub restored_status: Option<Status>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: Status,
}

#[derive(Debug, Deserialize)]
pub struct PutDayRequest {
    pub participants: Vec<Participant>,
    pub expected_revision: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IdentityResponse {
    pub device_id: String,
    pub nickname: Option<String>,
    pub registered: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    #[default]
    Clear,
    Cloudy,
    Rain,
    Storm,
    Wind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub condition: WeatherCondition,
    pub temp: i32,
}

impl Default for Weather {
    fn default() -> Self {
        Self {
            condition: WeatherCondition::Clear,
            temp: 18,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub join: usize,
    pub maybe: usize,
    pub pass: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    CanPlay,
    CanPractice,
    NotEnough,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub date_key: String,
    pub date_label: String,
    pub revision: u64,
    pub participants: Vec<Participant>,
    pub counts: StatusCounts,
    pub tier: Tier,
    pub color: String,
    pub message: String,
    pub nickname: Option<String>,
    pub my_status: Status,
    pub starting_soon: bool,
    pub weather: Weather,
    pub weather_warning: bool,
}
