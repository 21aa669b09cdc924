/// Data layer: core types, loading, normalization and filtering.
///
/// Architecture:
/// ```text
///   data/dados.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read CSV once → RawTable (memoized by DatasetLoader)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  parse `dia`, drop bad dates → Dataset + dropped count
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  inclusive date interval → new Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  series   │  indicator columns → (date, value) points
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod series;
