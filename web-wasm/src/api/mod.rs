//! データ取得

pub mod manifest;
