//! `qtable` subcommands

pub mod act;
pub mod init;
pub mod inspect;
