pub mod catalog;
pub mod proposal;
pub mod rfq;
pub mod user;
