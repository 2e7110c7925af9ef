pub mod browse;
pub mod clickme;
pub mod collect;
pub mod help;
pub mod pages;
