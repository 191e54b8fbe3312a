pub mod filtering;
pub mod format;
pub mod paging;
pub mod report;
pub mod sorting;
