//! coursebot core library — course catalog stores, intent matching, flex card
//! composition, reply dispatch, and the LINE webhook gateway used by the CLI.

pub mod card;
pub mod catalog;
pub mod config;
pub mod dispatcher;
pub mod gateway;
pub mod handler;
pub mod init;
pub mod line;
pub mod matcher;
