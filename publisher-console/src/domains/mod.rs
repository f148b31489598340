//! Domain modules for the publisher console

pub mod catalog;
