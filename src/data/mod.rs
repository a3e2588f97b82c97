/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  remote CSV / local file
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch + parse rows → Vec<Record>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year predicate → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  group + count → (key, count) tables
///   └───────────┘
/// ```
pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
