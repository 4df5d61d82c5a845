//! Field extraction for the order-confirmation dialect.

pub mod assembler;
pub mod dialect;
pub mod fields;
pub mod locale;
pub mod policy;
pub mod price;

pub use assembler::OrderAssembler;
pub use dialect::{Dialect, DialectSelectors};
pub use fields::{FieldExtractor, TrainColumns, TripInfoKind};
pub use locale::{parse_travel_date, DateLocale};
pub use policy::{LegPolicy, SegmentField};
