pub mod dashboard;
pub mod html;
pub mod page;
