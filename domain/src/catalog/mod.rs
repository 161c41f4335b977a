//! Catalog items subject to voting

pub mod item;

pub use item::Item;
