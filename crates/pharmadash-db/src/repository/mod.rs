//! # Repository Module
//!
//! Database repository implementations for PharmaDash.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  DashboardService                                                      │
//! │       │                                                                 │
//! │       │  gateway.fetch_recent_sales(50, &filter)                       │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── fetch_recent(&self, limit, filter)                                │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, sale)                                               │
//! │  ├── persist_status(&self, id, status)                                 │
//! │  └── delete(&self, id)                                                 │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`SaleRepository`](sale::SaleRepository) - Sales and their line items
//! - [`ProductRepository`](product::ProductRepository) - Product stock levels

pub mod product;
pub mod sale;
