//! # normanpd
//!
//! Turns Norman PD daily incident PDF reports into structured incident
//! records, stores them in SQLite and draws summary charts over them.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────────────────────┐   ┌──────────┐
//! │  Sources    │──▶│          Pipeline            │──▶│  SQLite  │
//! │ upload/URL  │   │ pages → lines → records      │   │ incidents│
//! └─────────────┘   └──────────────────────────────┘   └────┬─────┘
//!                                                           │
//!                                     ┌─────────────────────┤
//!                                     ▼                     ▼
//!                                ┌──────────┐         ┌──────────┐
//!                                │   CLI    │         │   HTTP   │
//!                                │(normanpd)│         │ + charts │
//!                                └──────────┘         └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! normanpd init                              # create database
//! normanpd ingest reports/2024-01-01.pdf     # process local PDFs
//! normanpd fetch https://example.com/a.pdf   # process PDFs by URL
//! normanpd stats                             # counts per nature
//! normanpd serve                             # start HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`date`] | Leading-date predicate |
//! | [`reconstruct`] | Merging wrapped lines into logical lines |
//! | [`nature`] | Nature vocabulary and ordered matching |
//! | [`record`] | Logical line → incident record |
//! | [`pipeline`] | End-to-end processing of a batch |
//! | [`extract`] | PDF page text |
//! | [`fetch`] | Downloading reports by URL |
//! | [`store`] | The `incidents` table |
//! | [`viz`] | Charts |
//! | [`server`] | HTTP interface |
//! | [`config`] | TOML configuration |

pub mod config;
pub mod date;
pub mod db;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod ingest;
pub mod list;
pub mod migrate;
pub mod models;
pub mod nature;
pub mod pipeline;
pub mod reconstruct;
pub mod record;
pub mod server;
pub mod stats;
pub mod store;
pub mod uploads;
pub mod viz;
