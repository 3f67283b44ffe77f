pub mod db_error;
pub mod short_id;
pub mod url_sanitizer;
