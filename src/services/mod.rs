pub mod short_code;
pub mod url;

pub use self::short_code::ShortCodeGenerator;
pub use self::url::ShortenerService;
