//! # Repository Module
//!
//! Database repository implementations for Almacen POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  CLI command                                                           │
//! │       │                                                                 │
//! │       │  db.products().search("galaxy", 20)                            │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── search(&self, query, limit)                                       │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, product)                                            │
//! │  └── adjust_stock(&self, id, delta)                                    │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Methods ending in `_tx` take a `&mut SqliteConnection` so the quick sale
//! can run them inside its own transaction.
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Product CRUD, search, stock
//! - [`CategoryRepository`](category::CategoryRepository) - Category CRUD
//! - [`BrandRepository`](brand::BrandRepository) - Brand CRUD
//! - [`InvoiceRepository`](invoice::InvoiceRepository) - Invoices and items
//! - [`DashboardRepository`](dashboard::DashboardRepository) - Aggregate figures

pub mod brand;
pub mod category;
pub mod dashboard;
pub mod invoice;
pub mod product;
