//! Lines, runs and the queries built on them.

pub mod cursor;
pub mod iter;
pub mod justify;
pub mod line;
pub mod line_data;
pub mod lines;
pub mod run;
pub mod selection;
