use crate::domain::model::{OrderRecord, TripDetails, TripRecord};
use crate::extract::dialect::{Dialect, DialectSelectors};
use crate::extract::fields::{FieldExtractor, TripInfoKind};
use crate::extract::locale::DateLocale;
use crate::extract::policy::LegPolicy;
use crate::markup::document::Document;
use crate::markup::normalizer::normalize;
use crate::markup::selector::SelectorError;

/// Builds the whole order record from one document.
#[derive(Debug, Clone)]
pub struct OrderAssembler {
    dialect: Dialect,
    locale: DateLocale,
    policy: LegPolicy,
}

impl OrderAssembler {
    pub fn new(dialect: Dialect, locale: DateLocale, policy: LegPolicy) -> Self {
        Self {
            dialect,
            locale,
            policy,
        }
    }

    /// Default dialect, French locale, passengers on the last leg.
    pub fn standard() -> Result<Self, SelectorError> {
        Ok(Self::new(
            Dialect::standard()?,
            DateLocale::french(),
            LegPolicy::default(),
        ))
    }

    pub fn from_selectors(
        selectors: &DialectSelectors,
        policy: LegPolicy,
    ) -> Result<Self, SelectorError> {
        Ok(Self::new(
            Dialect::compile(selectors)?,
            DateLocale::french(),
            policy,
        ))
    }

    pub fn assemble(&self, document: &Document) -> OrderRecord {
        let fields = FieldExtractor::new(document, &self.dialect, &self.locale);

        let code = fields.trip_info(TripInfoKind::Code);
        let name = fields.trip_info(TripInfoKind::Name);
        let price = fields.total_price();
        let round_trips = fields.round_trips(&self.policy);
        let prices = fields.prices();

        tracing::debug!(
            "Assembled trip '{}' with {} round trips and {} prices",
            code,
            round_trips.len(),
            prices.len()
        );

        OrderRecord::ok(
            vec![TripRecord {
                code,
                name,
                details: TripDetails { price, round_trips },
            }],
            prices,
        )
    }

    /// Normalize raw markup, parse it and assemble the record.
    pub fn assemble_markup(&self, raw: &str) -> OrderRecord {
        let cleaned = normalize(raw);
        self.assemble(&Document::parse(&cleaned))
    }
}
