pub mod clicks;
pub mod purchases;
pub mod realtime;
pub mod segments;
pub mod uviews;
pub mod views;
