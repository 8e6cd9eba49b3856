//! # vecstore - An In-Memory Vector Store
//!
//! vecstore keeps numeric vectors in memory, in insertion order, and answers
//! nearest-neighbor queries under Euclidean distance by scanning every stored
//! vector. Vectors can be inserted one at a time or ingested in bulk from
//! delimited text, one vector per line.
//!
//! Nothing is persisted; the store lives as long as its owner.
//!
//! ## Example
//!
//! ```
//! use vecstore::{VectorRecord, VectorStore};
//!
//! let mut store = VectorStore::new();
//!
//! // Insert vectors
//! store.insert(VectorRecord::from_values(vec![0.0, 0.0])).unwrap();
//! store.ingest_delimited("3,4\n10,10\n".lines(), ',').unwrap();
//!
//! // Find the closest one
//! let hit = store.nearest(&VectorRecord::from_values(vec![2.0, 3.0])).unwrap();
//! assert_eq!(hit.index, 1);
//! assert_eq!(hit.record.values(), &[3.0, 4.0]);
//! ```

mod error;
mod ingest;
mod search;
mod store;
pub mod vector;

pub use error::{Result, VectorError};
pub use ingest::{parse_delimited, parse_delimited_line, parse_finite};
pub use search::{k_nearest, nearest, CandidateSource, Neighbor};
pub use store::VectorStore;
pub use vector::{euclidean_distance, VectorRecord};
