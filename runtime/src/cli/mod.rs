//! CLI subcommand implementations for the yubimoji binary.

pub mod inspect_cmd;
pub mod output;
pub mod predict_cmd;
pub mod serve;
