pub mod advisor;
pub mod error;
pub mod extractor;
pub mod parsing;
pub mod prompt;
pub mod query;
pub mod selector;

pub use advisor::PriceAdvisor;
pub use error::PriceError;
pub use parsing::{parse_price_range, ExtractionStrategy};
pub use query::{format_price, PriceQuery, PriceRange};
pub use selector::{select_model, WorkingModel, MODEL_CANDIDATES};
