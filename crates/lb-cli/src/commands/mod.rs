pub mod apply;
pub mod cache;
pub mod dispatch;
pub mod render;
pub mod review;
pub mod run;
pub mod task;
