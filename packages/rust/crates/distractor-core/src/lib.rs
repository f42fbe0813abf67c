#![allow(clippy::doc_markdown)]

//! distractor-core - Conversation normalization and schema-evolving CSV store
//!
//! Stateless building blocks for the distractor annotation tool.
//!
//! # Features
//!
//! - **Normalizer**: native turns, strict JSON, single-quoted JSON, or raw passthrough
//! - **Store**: append with transparent header migration, no row ever dropped
//! - **Dataset**: header normalization and required-column validation
//!
//! # Architecture
//!
//! ```text
//! distractor-core/src/
//! ├── lib.rs          # Re-exports (this file)
//! ├── error.rs        # DatasetError enum
//! ├── conversation.rs # Parse chain, Turn, last assistant turn
//! ├── json.rs         # Cell JSON text layout
//! ├── projection.rs   # Pure row projection and migration
//! ├── store.rs        # CSV append / atomic rewrite
//! └── dataset.rs      # Input dataset loading
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use distractor_core::{append, last_assistant_turn, AnnotationRecord};
//!
//! let bot_turn = last_assistant_turn(&serde_json::json!("[{'role': 'assistant', 'content': 'hi'}]"));
//! let record = AnnotationRecord::from([("domain".to_string(), "travel".to_string())]);
//! append("travel.csv", &record, &["timestamp", "domain"])?;
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod conversation;
mod dataset;
mod error;
mod json;
mod projection;
mod store;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use conversation::{
    NormalizedConversation, PARSE_CHAIN, ParseAttempt, Role, Turn, canonical_turns,
    last_assistant_turn, normalize, parse_blank_text, parse_single_quoted_json,
    parse_strict_json, parse_structured,
};
pub use dataset::{
    Dataset, DatasetRow, REQUIRED_COLUMNS, UNKNOWN_DOMAIN, normalize_header, validate_columns,
};
pub use error::DatasetError;
pub use json::{SpacedFormatter, to_json_text};
pub use projection::{
    AnnotationRecord, header_matches, migrate_rows, project_record, row_to_record,
};
pub use store::{StoreSnapshot, append, read_store};
