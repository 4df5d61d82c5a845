//! One function per output field, each a pure read of the document.
//!
//! Missing elements degrade to `""`, `NaN` or an empty list; nothing in
//! here returns an error.

use crate::domain::model::{Passenger, PriceEntry, RoundTripRecord, TrainSegment};
use crate::extract::dialect::{Dialect, FARE_TYPE_MARKER, NBSP_MARKER, TYPOLOGY_MARKER};
use crate::extract::locale::{parse_travel_date, DateLocale};
use crate::extract::policy::{LegPolicy, SegmentField};
use crate::extract::price::{replace_time_delimiter, sanitize_price};
use crate::markup::document::Document;
use crate::markup::selection::Selection;
use crate::markup::selector::Selector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripInfoKind {
    Code,
    Name,
}

/// Per-field columns of the train table, read once and indexed by leg.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainColumns {
    pub departure_times: Vec<String>,
    pub departure_stations: Vec<String>,
    pub arrival_times: Vec<String>,
    pub arrival_stations: Vec<String>,
    pub types: Vec<String>,
    pub numbers: Vec<String>,
}

impl TrainColumns {
    pub fn segment(&self, index: usize) -> TrainSegment {
        let pick = |column: &[String]| column.get(index).cloned().unwrap_or_default();
        TrainSegment {
            departure_time: pick(&self.departure_times),
            departure_station: pick(&self.departure_stations),
            arrival_time: pick(&self.arrival_times),
            arrival_station: pick(&self.arrival_stations),
            kind: pick(&self.types),
            number: pick(&self.numbers),
            passengers: None,
        }
    }
}

pub struct FieldExtractor<'a> {
    document: &'a Document,
    dialect: &'a Dialect,
    locale: &'a DateLocale,
}

impl<'a> FieldExtractor<'a> {
    pub fn new(document: &'a Document, dialect: &'a Dialect, locale: &'a DateLocale) -> Self {
        Self {
            document,
            dialect,
            locale,
        }
    }

    /// Year printed in the last cell of the intro table's last row
    /// (`"…2019&nbsp;…"`). Shorter text is returned as is.
    pub fn travel_year(&self) -> String {
        let cell = self
            .document
            .query(&self.dialect.intro_rows)
            .last()
            .children(Some("td"))
            .last()
            .text();
        let head = cell.split(NBSP_MARKER).next().unwrap_or_default();
        let chars: Vec<char> = head.chars().collect();
        chars[chars.len().saturating_sub(4)..].iter().collect()
    }

    pub fn trip_info(&self, kind: TripInfoKind) -> String {
        let selector = match kind {
            TripInfoKind::Code => &self.dialect.trip_code,
            TripInfoKind::Name => &self.dialect.trip_name,
        };
        self.document
            .query(selector)
            .last()
            .find(&self.dialect.trip_info)
            .text()
            .replace(' ', "")
    }

    pub fn total_price(&self) -> f64 {
        self.price_item(&self.document.query(&self.dialect.total_amount))
    }

    /// Amount in the last cell of a price table. Some tables wrap their rows
    /// in a single `tbody`, others put the cells right under the table.
    pub fn price_item(&self, scope: &Selection<'_>) -> f64 {
        let wrapped = scope.find(&self.dialect.price_wrapper).len() == 1;
        let cells = if wrapped {
            scope.find(&self.dialect.wrapped_price_cells)
        } else {
            scope.find(&self.dialect.price_cells)
        };
        sanitize_price(&cells.last().text())
    }

    /// First word of the section between the first and second `". Billet "`
    /// of the first fare-details cell.
    pub fn passenger_type(&self) -> String {
        let details = self.document.query(&self.dialect.fare_details).first().text();
        match details.split(FARE_TYPE_MARKER).nth(1) {
            Some(section) => section.split(' ').next().unwrap_or_default().to_string(),
            None => {
                tracing::debug!("No fare type marker in fare details");
                String::new()
            }
        }
    }

    /// Section between the first and second `";passager"` of the first
    /// typology cell.
    pub fn passenger_age(&self) -> String {
        let typology = self.document.query(&self.dialect.typology).first().text();
        match typology.split(TYPOLOGY_MARKER).nth(1) {
            Some(section) => section.trim().to_string(),
            None => {
                tracing::debug!("No passenger marker in typology");
                String::new()
            }
        }
    }

    /// One entry per non-empty row of the first passengers table.
    ///
    /// Type and age come from the header-level cells, so every entry carries
    /// the same values: the dialect does not expose them per row.
    pub fn passengers(&self) -> Vec<Passenger> {
        let kind = self.passenger_type();
        let age = self.passenger_age();

        self.document
            .query(&self.dialect.passengers_table)
            .find(&self.dialect.passengers_body)
            .find(&self.dialect.passenger_rows)
            .iter()
            .filter(|row| !row.children(Some("td")).text().is_empty())
            .map(|_| Passenger {
                kind: kind.clone(),
                age: age.clone(),
            })
            .collect()
    }

    pub fn travel_dates(&self) -> Vec<String> {
        let year = self.travel_year();
        self.document
            .query(&self.dialect.travel_date)
            .iter()
            .map(|cell| parse_travel_date(&format!("{} {}", cell.text(), year), self.locale))
            .collect()
    }

    /// Trimmed text of every element matching `selector`, in document order.
    pub fn train_info(&self, selector: &Selector) -> Vec<String> {
        self.document.query(selector).texts()
    }

    pub fn travel_types(&self) -> Vec<String> {
        self.train_info(&self.dialect.travel_way)
    }

    pub fn departure_times(&self) -> Vec<String> {
        self.times(&self.dialect.departure_time)
    }

    pub fn departure_stations(&self) -> Vec<String> {
        self.train_info(&self.dialect.departure_station)
    }

    pub fn arrival_times(&self) -> Vec<String> {
        self.times(&self.dialect.arrival_time)
    }

    pub fn arrival_stations(&self) -> Vec<String> {
        self.train_info(&self.dialect.arrival_station)
    }

    fn times(&self, selector: &Selector) -> Vec<String> {
        self.train_info(selector)
            .iter()
            .map(|time| replace_time_delimiter(time))
            .collect()
    }

    pub fn train_types_and_numbers(&self, field: SegmentField) -> Vec<String> {
        self.train_info(&self.dialect.segment)
            .into_iter()
            .map(|entry| entry.replace(NBSP_MARKER, ""))
            .filter(|entry| !entry.is_empty())
            .enumerate()
            .filter(|(index, _)| field.owns(*index))
            .map(|(_, entry)| entry)
            .collect()
    }

    pub fn train_columns(&self) -> TrainColumns {
        TrainColumns {
            departure_times: self.departure_times(),
            departure_stations: self.departure_stations(),
            arrival_times: self.arrival_times(),
            arrival_stations: self.arrival_stations(),
            types: self.train_types_and_numbers(SegmentField::Type),
            numbers: self.train_types_and_numbers(SegmentField::Number),
        }
    }

    pub fn train_item(&self, index: usize) -> TrainSegment {
        self.train_columns().segment(index)
    }

    /// One record per product-details table. Each holds a single train
    /// segment; `policy` decides which legs also get the passenger list.
    pub fn round_trips(&self, policy: &LegPolicy) -> Vec<RoundTripRecord> {
        let leg_count = self.document.query(&self.dialect.product_details).len();
        let types = self.travel_types();
        let dates = self.travel_dates();
        let columns = self.train_columns();

        (0..leg_count)
            .map(|index| {
                let mut train = columns.segment(index);
                if policy.attaches_passengers(index, leg_count) {
                    train.passengers = Some(self.passengers());
                }
                RoundTripRecord {
                    kind: types.get(index).cloned().unwrap_or_default(),
                    date: dates.get(index).cloned().unwrap_or_default(),
                    trains: vec![train],
                }
            })
            .collect()
    }

    pub fn prices(&self) -> Vec<PriceEntry> {
        self.document
            .query(&self.dialect.product_header)
            .iter()
            .map(|header| PriceEntry {
                value: self.price_item(&header.to_selection()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract<T>(markup: &str, read: impl FnOnce(&FieldExtractor<'_>) -> T) -> T {
        let document = Document::parse(markup);
        let dialect = Dialect::standard().unwrap();
        let locale = DateLocale::french();
        read(&FieldExtractor::new(&document, &dialect, &locale))
    }

    #[test]
    fn test_travel_year() {
        let markup = r#"<table id="intro"><tbody><tr></tr><tr></tr><tr><td>2019&nbsp;hello</td></tr></tbody></table>"#;
        assert_eq!(extract(markup, |f| f.travel_year()), "2019");
    }

    #[test]
    fn test_travel_year_keeps_short_text() {
        let markup = r#"<table id="intro"><tbody><tr><td>19&nbsp;x</td></tr></tbody></table>"#;
        assert_eq!(extract(markup, |f| f.travel_year()), "19");
        assert_eq!(extract("<p></p>", |f| f.travel_year()), "");
    }

    #[test]
    fn test_trip_info_uses_last_match() {
        let markup = concat!(
            r#"<td class="pnr-ref"><span class="pnr-info">OLD</span></td>"#,
            r#"<td class="pnr-ref"><span class="pnr-info">   SNI KXP   </span></td>"#,
        );
        assert_eq!(extract(markup, |f| f.trip_info(TripInfoKind::Code)), "SNIKXP");
        assert_eq!(extract(markup, |f| f.trip_info(TripInfoKind::Name)), "");
    }

    #[test]
    fn test_train_types_and_numbers_skip_decoration_cells() {
        let markup = concat!(
            r#"<td class="segment"> TGV </td><td class="segment"> 6687 </td>"#,
            r#"<td class="segment segment-departure"><img src="a.gif" alt="">&nbsp;</td>"#,
            r#"<td class="segment"> TER </td><td class="segment"> 8812 </td>"#,
        );
        assert_eq!(
            extract(markup, |f| f.train_types_and_numbers(SegmentField::Type)),
            vec!["TGV", "TER"]
        );
        assert_eq!(
            extract(markup, |f| f.train_types_and_numbers(SegmentField::Number)),
            vec!["6687", "8812"]
        );
    }

    #[test]
    fn test_train_item_out_of_range_is_blank() {
        let segment = extract("<div></div>", |f| f.train_item(3));
        assert_eq!(segment, TrainSegment::default());
    }

    #[test]
    fn test_passenger_markers_missing() {
        let markup = r#"<td class="fare-details">Billet</td><td class="typology">adulte</td>"#;
        assert_eq!(extract(markup, |f| f.passenger_type()), "");
        assert_eq!(extract(markup, |f| f.passenger_age()), "");
    }

    #[test]
    fn test_repeated_markers_stop_at_the_next_one() {
        let fare = r#"<td class="fare-details">Tarif. Billet Loisir. Billet non remboursable.</td>"#;
        assert_eq!(extract(fare, |f| f.passenger_type()), "Loisir");

        let typology = r#"<td class="typology">1er&nbsp;passager(adulte)&nbsp;passager x</td>"#;
        assert_eq!(extract(typology, |f| f.passenger_age()), "(adulte)&nbsp");
    }

    #[test]
    fn test_price_item_with_several_wrappers_reads_direct_cells() {
        let markup = r#"<table class="total-amount"><tbody></tbody><tbody></tbody><td> 12,00 € </td></table>"#;
        assert_eq!(extract(markup, |f| f.total_price()), 12.0);
    }

    #[test]
    fn test_missing_total_is_nan() {
        assert!(extract("<div></div>", |f| f.total_price()).is_nan());
    }
}
