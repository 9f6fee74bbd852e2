//! UIコンポーネント

pub mod detail_view;
pub mod gallery;
pub mod header;
pub mod ignore_panel;
pub mod results_table;
