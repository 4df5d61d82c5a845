use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;
use serde::Serialize;

pub const STATUS_OK: &str = "ok";

/// Source markup as read from storage, before any cleanup.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub source: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    pub status: String,
    pub result: OrderResult,
}

impl OrderRecord {
    pub fn ok(trips: Vec<TripRecord>, prices: Vec<PriceEntry>) -> Self {
        Self {
            status: STATUS_OK.to_string(),
            result: OrderResult {
                trips,
                custom: CustomSection { prices },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderResult {
    pub trips: Vec<TripRecord>,
    pub custom: CustomSection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomSection {
    pub prices: Vec<PriceEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    pub code: String,
    pub name: String,
    pub details: TripDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDetails {
    /// `NaN` when the total could not be read; serialized as `null`.
    pub price: f64,
    pub round_trips: Vec<RoundTripRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundTripRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub date: String,
    pub trains: Vec<TrainSegment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainSegment {
    pub departure_time: String,
    pub departure_station: String,
    pub arrival_time: String,
    pub arrival_station: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passengers: Option<Vec<Passenger>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Passenger {
    #[serde(rename = "type")]
    pub kind: String,
    pub age: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceEntry {
    pub value: f64,
}

fn validate_text(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::ValidationError {
            message: format!("{field_name} is empty"),
        });
    }
    Ok(())
}

fn validate_amount(field_name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EtlError::ValidationError {
            message: format!("{field_name} is not a readable amount"),
        })
    }
}

/// Strict post-assembly check. Assembly itself never fails; this pass only
/// accepts or rejects the degraded record.
impl Validate for OrderRecord {
    fn validate(&self) -> Result<()> {
        if self.status != STATUS_OK {
            return Err(EtlError::ValidationError {
                message: format!("unexpected status '{}'", self.status),
            });
        }

        let [trip] = self.result.trips.as_slice() else {
            return Err(EtlError::ValidationError {
                message: format!("expected exactly one trip, found {}", self.result.trips.len()),
            });
        };

        validate_text("trips[0].code", &trip.code)?;
        validate_text("trips[0].name", &trip.name)?;
        validate_amount("trips[0].details.price", trip.details.price)?;

        if trip.details.round_trips.is_empty() {
            return Err(EtlError::ValidationError {
                message: "no round trip found".to_string(),
            });
        }
        for (index, round_trip) in trip.details.round_trips.iter().enumerate() {
            validate_text(
                &format!("trips[0].details.roundTrips[{index}].date"),
                &round_trip.date,
            )?;
        }

        for (index, price) in self.result.custom.prices.iter().enumerate() {
            validate_amount(&format!("custom.prices[{index}].value"), price.value)?;
        }

        Ok(())
    }
}
