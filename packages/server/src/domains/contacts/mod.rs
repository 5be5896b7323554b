//! Contacts domain - match address-book numbers against registered users

pub mod actions;
