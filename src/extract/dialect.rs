//! Structural conventions of the order-confirmation markup.

use crate::markup::selector::{Selector, SelectorError};
use serde::{Deserialize, Serialize};

/// Non-breaking space as it appears, still escaped, in cell text.
pub const NBSP_MARKER: &str = "&nbsp;";
/// Precedes the passenger type inside the fare-details cell.
pub const FARE_TYPE_MARKER: &str = ". Billet ";
/// Precedes the passenger age label inside the typology cell.
pub const TYPOLOGY_MARKER: &str = ";passager";
/// Separates hours from minutes in displayed times (`16h37`).
pub const TIME_DELIMITER: char = 'h';
pub const CURRENCY_SYMBOL: char = '€';

/// Selector sources, one per located field. Every entry can be overridden
/// from the `[selectors]` table of a TOML config; omitted entries keep the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialectSelectors {
    pub intro_rows: String,
    pub trip_code: String,
    pub trip_name: String,
    pub trip_info: String,
    pub total_amount: String,
    pub price_wrapper: String,
    pub wrapped_price_cells: String,
    pub price_cells: String,
    pub fare_details: String,
    pub typology: String,
    pub passengers_table: String,
    pub passengers_body: String,
    pub passenger_rows: String,
    pub travel_date: String,
    pub travel_way: String,
    pub departure_time: String,
    pub departure_station: String,
    pub arrival_time: String,
    pub arrival_station: String,
    pub segment: String,
    pub product_details: String,
    pub product_header: String,
}

impl Default for DialectSelectors {
    fn default() -> Self {
        Self {
            intro_rows: "#intro > tbody > tr".to_string(),
            trip_code: "td.pnr-ref".to_string(),
            trip_name: "td.pnr-name".to_string(),
            trip_info: "> span.pnr-info".to_string(),
            total_amount: "table.total-amount".to_string(),
            price_wrapper: "tbody".to_string(),
            wrapped_price_cells: "> tbody > tr > td".to_string(),
            price_cells: "> td".to_string(),
            fare_details: "td.fare-details".to_string(),
            typology: "td.typology".to_string(),
            passengers_table: "table.passengers:first".to_string(),
            passengers_body: "> tbody:first".to_string(),
            passenger_rows: "> tr".to_string(),
            travel_date: "td.product-travel-date".to_string(),
            travel_way: "td.travel-way".to_string(),
            departure_time: "td.origin-destination-hour.segment-departure".to_string(),
            departure_station: "td.origin-destination-station.segment-departure".to_string(),
            arrival_time: "td.origin-destination-border.origin-destination-hour.segment-arrival"
                .to_string(),
            arrival_station:
                "td.origin-destination-border.origin-destination-station.segment-arrival"
                    .to_string(),
            segment: "td.segment".to_string(),
            product_details: "table.product-details".to_string(),
            product_header: ".product-header".to_string(),
        }
    }
}

/// Compiled form of [`DialectSelectors`].
#[derive(Debug, Clone)]
pub struct Dialect {
    pub intro_rows: Selector,
    pub trip_code: Selector,
    pub trip_name: Selector,
    pub trip_info: Selector,
    pub total_amount: Selector,
    pub price_wrapper: Selector,
    pub wrapped_price_cells: Selector,
    pub price_cells: Selector,
    pub fare_details: Selector,
    pub typology: Selector,
    pub passengers_table: Selector,
    pub passengers_body: Selector,
    pub passenger_rows: Selector,
    pub travel_date: Selector,
    pub travel_way: Selector,
    pub departure_time: Selector,
    pub departure_station: Selector,
    pub arrival_time: Selector,
    pub arrival_station: Selector,
    pub segment: Selector,
    pub product_details: Selector,
    pub product_header: Selector,
}

impl Dialect {
    pub fn compile(selectors: &DialectSelectors) -> Result<Self, SelectorError> {
        Ok(Self {
            intro_rows: Selector::parse(&selectors.intro_rows)?,
            trip_code: Selector::parse(&selectors.trip_code)?,
            trip_name: Selector::parse(&selectors.trip_name)?,
            trip_info: Selector::parse(&selectors.trip_info)?,
            total_amount: Selector::parse(&selectors.total_amount)?,
            price_wrapper: Selector::parse(&selectors.price_wrapper)?,
            wrapped_price_cells: Selector::parse(&selectors.wrapped_price_cells)?,
            price_cells: Selector::parse(&selectors.price_cells)?,
            fare_details: Selector::parse(&selectors.fare_details)?,
            typology: Selector::parse(&selectors.typology)?,
            passengers_table: Selector::parse(&selectors.passengers_table)?,
            passengers_body: Selector::parse(&selectors.passengers_body)?,
            passenger_rows: Selector::parse(&selectors.passenger_rows)?,
            travel_date: Selector::parse(&selectors.travel_date)?,
            travel_way: Selector::parse(&selectors.travel_way)?,
            departure_time: Selector::parse(&selectors.departure_time)?,
            departure_station: Selector::parse(&selectors.departure_station)?,
            arrival_time: Selector::parse(&selectors.arrival_time)?,
            arrival_station: Selector::parse(&selectors.arrival_station)?,
            segment: Selector::parse(&selectors.segment)?,
            product_details: Selector::parse(&selectors.product_details)?,
            product_header: Selector::parse(&selectors.product_header)?,
        })
    }

    /// The dialect with its stock selectors.
    pub fn standard() -> Result<Self, SelectorError> {
        Self::compile(&DialectSelectors::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selectors_compile() {
        let dialect = Dialect::standard().unwrap();
        assert_eq!(dialect.trip_code.as_str(), "td.pnr-ref");
        assert_eq!(dialect.product_header.as_str(), ".product-header");
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let selectors: DialectSelectors = toml::from_str(r#"trip_code = "td.booking-ref""#).unwrap();

        assert_eq!(selectors.trip_code, "td.booking-ref");
        assert_eq!(selectors.trip_name, DialectSelectors::default().trip_name);
    }

    #[test]
    fn test_invalid_override_is_reported() {
        let selectors = DialectSelectors {
            segment: "td[class=segment]".to_string(),
            ..DialectSelectors::default()
        };

        assert!(matches!(
            Dialect::compile(&selectors),
            Err(SelectorError::UnexpectedChar { found: '[', .. })
        ));
    }
}
