pub mod birthday;
pub mod page;
