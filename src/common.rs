pub mod db_utils;
pub mod error;
pub mod lifecycle;
pub mod pagination;
pub mod validation;
